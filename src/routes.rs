use actix_web::{http::StatusCode, web, HttpResponse};
use serde::Serialize;

pub mod auth;
pub mod home;
pub mod messages;
pub mod rooms;
pub mod users;

pub const HOME_URL: &str = "/";
pub const DELETE_TEMPLATE: &str = "base/delete.html";

/// A template name plus the context it is rendered with.
#[derive(Debug, Serialize)]
pub struct Page<'a, C> {
    pub template: &'a str,
    pub context: C,
}

pub fn render<C: Serialize>(template: &str, context: C) -> HttpResponse {
    render_with(StatusCode::OK, template, context)
}

pub fn render_with<C: Serialize>(status: StatusCode, template: &str, context: C) -> HttpResponse {
    HttpResponse::build(status).json(Page { template, context })
}

/// Registers every page. Literal paths go before the `{id}` paths they shadow.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login_page)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register_page)
        .service(auth::register)
        .service(home::home)
        .service(home::topics_page)
        .service(home::activity_feed)
        .service(rooms::new_room_page)
        .service(rooms::create_room)
        .service(rooms::room)
        .service(rooms::post_message)
        .service(rooms::edit_room_page)
        .service(rooms::update_room)
        .service(rooms::delete_room_page)
        .service(rooms::delete_room)
        .service(messages::delete_message_page)
        .service(messages::delete_message)
        .service(users::edit_profile_page)
        .service(users::update_profile)
        .service(users::profile);
}
