use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

use crate::{
    db,
    error::{AppError, AppResult},
    forms::{FormErrors, ProfileForm},
    routes::{render, render_with},
    services,
    types::DbPool,
    utils::{redirect, Identity},
};

const PROFILE_TEMPLATE: &str = "base/profile.html";
const EDIT_TEMPLATE: &str = "base/update-user.html";

fn edit_page(status: StatusCode, form: &ProfileForm, errors: FormErrors) -> HttpResponse {
    render_with(
        status,
        EDIT_TEMPLATE,
        json!({
            "form": form,
            "errors": errors,
        }),
    )
}

#[get("/profile/{user_id}")]
pub async fn profile(pool: web::Data<DbPool>, user_id: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let user_id = user_id.into_inner().to_string();

    let (user, rooms, room_messages, topics) = services::run(&pool, move |conn| {
        let user = db::users::find_user_by_uid(conn, &user_id)?.ok_or(AppError::NotFound)?;
        let rooms = db::rooms::rooms_hosted_by(conn, &user_id)?;
        let room_messages = db::messages::messages_by_author(conn, &user_id)?;
        let topics = db::topics::topic_listings(conn, "")?;

        Ok((user, rooms, room_messages, topics))
    })
    .await?;

    Ok(render(
        PROFILE_TEMPLATE,
        json!({
            "user": user,
            "rooms": rooms,
            "room_messages": room_messages,
            "topics": topics,
        }),
    ))
}

#[get("/profile/edit")]
pub async fn edit_profile_page(
    pool: web::Data<DbPool>,
    identity: Identity,
) -> AppResult<HttpResponse> {
    let user = services::run(&pool, move |conn| {
        services::users::current_user(conn, &identity)
    })
    .await?;

    Ok(edit_page(
        StatusCode::OK,
        &ProfileForm::from(&user),
        FormErrors::default(),
    ))
}

#[post("/profile/edit")]
pub async fn update_profile(
    pool: web::Data<DbPool>,
    identity: Identity,
    form: web::Form<ProfileForm>,
) -> AppResult<HttpResponse> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => return Ok(edit_page(StatusCode::UNPROCESSABLE_ENTITY, &form, errors)),
    };

    let result = services::run(&pool, move |conn| {
        services::users::update_profile(conn, &identity, &update)
    })
    .await;

    match result {
        Ok(user) => {
            log::info!("user {} updated their profile", user.id);
            Ok(redirect(&format!("/profile/{}", user.id)))
        }
        Err(AppError::Invalid(errors)) => {
            Ok(edit_page(StatusCode::UNPROCESSABLE_ENTITY, &form, errors))
        }
        Err(err) => Err(err),
    }
}
