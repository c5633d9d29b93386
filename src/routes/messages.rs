use actix_web::{get, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::AppResult,
    routes::{render, DELETE_TEMPLATE, HOME_URL},
    services,
    types::DbPool,
    utils::{redirect, Identity},
};

#[get("/message/{id}/delete")]
pub async fn delete_message_page(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message_id = id.into_inner().to_string();
    let message = services::run(&pool, move |conn| {
        services::messages::message_for_author(conn, &identity, &message_id)
    })
    .await?;

    Ok(render(DELETE_TEMPLATE, json!({ "obj": message })))
}

#[post("/message/{id}/delete")]
pub async fn delete_message(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let message_id = id.into_inner().to_string();
    services::run(&pool, move |conn| {
        services::messages::delete_message(conn, &identity, &message_id)
    })
    .await?;

    Ok(redirect(HOME_URL))
}
