use actix_web::{
    error::BlockingError,
    http::{header::ContentType, StatusCode},
    HttpResponse, ResponseError,
};
use serde_json::json;
use thiserror::Error;

use crate::{forms::FormErrors, utils::redirect, LOGIN_URL};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("You are not allowed here")]
    NotAllowed,

    #[error("Signin required.")]
    LoginRequired,

    #[error("Invalid form data")]
    Invalid(FormErrors),

    #[error("{0}")]
    Authentication(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] BlockingError),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("Session error: {0}")]
    SessionInsert(#[from] actix_session::SessionInsertError),

    #[error("Session error: {0}")]
    SessionGet(#[from] actix_session::SessionGetError),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::NotAllowed => StatusCode::FORBIDDEN,
            AppError::LoginRequired => StatusCode::FOUND,
            AppError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            AppError::LoginRequired => redirect(LOGIN_URL),
            AppError::Invalid(errors) => HttpResponse::build(status).json(json!({
                "errors": errors,
            })),
            _ if status.is_server_error() => {
                log::error!("{self}");
                HttpResponse::build(status)
                    .insert_header(ContentType::plaintext())
                    .body("Internal server error")
            }
            _ => HttpResponse::build(status)
                .insert_header(ContentType::plaintext())
                .body(self.to_string()),
        }
    }
}
