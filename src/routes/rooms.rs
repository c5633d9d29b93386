use crate::{
    db,
    error::AppResult,
    forms::{FormErrors, MessageForm, RoomForm},
    models::{RoomDetail, RoomListing, Topic},
    routes::{render, render_with, DELETE_TEMPLATE, HOME_URL},
    services,
    types::DbPool,
    utils::{redirect, Identity},
};
use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

const ROOM_TEMPLATE: &str = "base/room.html";
const FORM_TEMPLATE: &str = "base/room_form.html";

#[derive(Serialize)]
struct RoomContext {
    #[serde(flatten)]
    detail: RoomDetail,
    form: MessageForm,
    errors: FormErrors,
}

#[derive(Serialize)]
struct RoomFormContext {
    form: RoomForm,
    errors: FormErrors,
    topics: Vec<Topic>,
    room: Option<RoomListing>,
}

fn form_page(status: StatusCode, context: RoomFormContext) -> HttpResponse {
    render_with(status, FORM_TEMPLATE, context)
}

#[get("/room/{id}")]
pub async fn room(pool: web::Data<DbPool>, id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();
    let detail =
        services::run(&pool, move |conn| services::rooms::room_detail(conn, &room_id)).await?;

    Ok(render(
        ROOM_TEMPLATE,
        RoomContext {
            detail,
            form: MessageForm::default(),
            errors: FormErrors::default(),
        },
    ))
}

#[post("/room/{id}")]
pub async fn post_message(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
    form: web::Form<MessageForm>,
) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();

    let body = match form.validate() {
        Ok(body) => body,
        Err(errors) => {
            let detail =
                services::run(&pool, move |conn| services::rooms::room_detail(conn, &room_id))
                    .await?;
            return Ok(render_with(
                StatusCode::UNPROCESSABLE_ENTITY,
                ROOM_TEMPLATE,
                RoomContext {
                    detail,
                    form: form.into_inner(),
                    errors,
                },
            ));
        }
    };

    let location = format!("/room/{room_id}");
    services::run(&pool, move |conn| {
        services::messages::post_message(conn, &identity, &room_id, &body)
    })
    .await?;

    Ok(redirect(&location))
}

#[get("/room/new")]
pub async fn new_room_page(pool: web::Data<DbPool>, _identity: Identity) -> AppResult<HttpResponse> {
    let topics = services::run(&pool, |conn| Ok(db::topics::all_topics(conn)?)).await?;

    Ok(form_page(
        StatusCode::OK,
        RoomFormContext {
            form: RoomForm::default(),
            errors: FormErrors::default(),
            topics,
            room: None,
        },
    ))
}

#[post("/room/new")]
pub async fn create_room(
    pool: web::Data<DbPool>,
    identity: Identity,
    form: web::Form<RoomForm>,
) -> AppResult<HttpResponse> {
    let new_room = match form.validate() {
        Ok(new_room) => new_room,
        Err(errors) => {
            let topics = services::run(&pool, |conn| Ok(db::topics::all_topics(conn)?)).await?;
            return Ok(form_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                RoomFormContext {
                    form: form.into_inner(),
                    errors,
                    topics,
                    room: None,
                },
            ));
        }
    };

    services::run(&pool, move |conn| {
        services::rooms::create_room(conn, &identity, &new_room)
    })
    .await?;

    Ok(redirect(HOME_URL))
}

#[get("/room/{id}/edit")]
pub async fn edit_room_page(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();
    let (listing, topics) = services::run(&pool, move |conn| {
        let listing = services::rooms::room_for_host(conn, &identity, &room_id)?;
        Ok((listing, db::topics::all_topics(conn)?))
    })
    .await?;

    Ok(form_page(
        StatusCode::OK,
        RoomFormContext {
            form: RoomForm::from(&listing),
            errors: FormErrors::default(),
            topics,
            room: Some(listing),
        },
    ))
}

#[post("/room/{id}/edit")]
pub async fn update_room(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
    form: web::Form<RoomForm>,
) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();

    let new_room = match form.validate() {
        Ok(new_room) => new_room,
        Err(errors) => {
            // ownership is checked before any form feedback is shown
            let (listing, topics) = services::run(&pool, move |conn| {
                let listing = services::rooms::room_for_host(conn, &identity, &room_id)?;
                Ok((listing, db::topics::all_topics(conn)?))
            })
            .await?;
            return Ok(form_page(
                StatusCode::UNPROCESSABLE_ENTITY,
                RoomFormContext {
                    form: form.into_inner(),
                    errors,
                    topics,
                    room: Some(listing),
                },
            ));
        }
    };

    services::run(&pool, move |conn| {
        services::rooms::update_room(conn, &identity, &room_id, &new_room)
    })
    .await?;

    Ok(redirect(HOME_URL))
}

#[get("/room/{id}/delete")]
pub async fn delete_room_page(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();
    let listing = services::run(&pool, move |conn| {
        services::rooms::room_for_host(conn, &identity, &room_id)
    })
    .await?;

    Ok(render(DELETE_TEMPLATE, json!({ "obj": listing.room })))
}

#[post("/room/{id}/delete")]
pub async fn delete_room(
    pool: web::Data<DbPool>,
    identity: Identity,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let room_id = id.into_inner().to_string();
    services::run(&pool, move |conn| {
        services::rooms::delete_room(conn, &identity, &room_id)
    })
    .await?;

    Ok(redirect(HOME_URL))
}
