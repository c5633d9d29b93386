use actix_session::{config::PersistentSession, storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    body::MessageBody,
    cookie::time::Duration,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware, web, App, Error,
};

use crate::{config::Config, middlewares::auth::Authentication, routes, types::DbPool};

const SESSION_TTL_HOURS: i64 = 12;

/// Assembles the application: state, session cookie, login guard and pages.
pub fn build_app(
    pool: DbPool,
    config: web::Data<Config>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), config.session_key.clone())
        .cookie_secure(config.secure_cookies)
        .session_lifecycle(
            PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    App::new()
        .app_data(web::Data::new(pool))
        .app_data(config)
        .wrap(Authentication)
        .wrap(session)
        .wrap(middleware::Logger::default())
        .configure(routes::configure)
        .wrap(middleware::NormalizePath::trim())
}
