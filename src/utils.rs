use std::future::{ready, Ready};

use actix_session::{Session, SessionExt};
use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest, HttpResponse};

use crate::error::AppError;

/// Session key holding the signed-in user's id.
pub const USER_ID: &str = "user_id";

/// The signed-in user making the request.
///
/// Handlers that mutate state take this as an explicit argument and pass it
/// down to the service layer; it is never read from ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn from_session(session: &Session) -> Option<Self> {
        session.get::<String>(USER_ID).unwrap_or(None).map(Self::new)
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Identity::from_session(&req.get_session()).ok_or(AppError::LoginRequired))
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Query string `q` shared by the search pages.
#[derive(Debug, Default, serde::Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn text(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}
