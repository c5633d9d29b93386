use actix_web::web;
use diesel::SqliteConnection;

use crate::{
    error::{AppError, AppResult},
    types::DbPool,
    utils::Identity,
};

pub mod messages;
pub mod rooms;
pub mod users;

/// Runs `f` on the blocking pool with a pooled connection.
pub async fn run<T, F>(pool: &web::Data<DbPool>, f: F) -> AppResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    web::block(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await?
}

/// Refuses the operation unless `identity` owns the entity.
pub fn ensure_owner(identity: &Identity, owner_id: &str) -> AppResult<()> {
    if identity.is(owner_id) {
        Ok(())
    } else {
        log::warn!("user {} denied access to entity owned by {owner_id}", identity.user_id);
        Err(AppError::NotAllowed)
    }
}
