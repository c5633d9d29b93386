use bcrypt::{hash, verify};
use diesel::{
    result::{DatabaseErrorKind, Error as DieselError},
    SqliteConnection,
};

use crate::{
    db,
    error::{AppError, AppResult},
    forms::{FormErrors, USERNAME_TAKEN},
    models::{NewUser, ProfileChanges, ProfileUpdate, User},
    utils::Identity,
};

pub const UNKNOWN_USERNAME: &str = "Username does not exist";
pub const BAD_CREDENTIALS: &str = "Username OR password is incorrect";

fn username_taken() -> AppError {
    AppError::Invalid(FormErrors::single("username", USERNAME_TAKEN))
}

/// Maps a unique violation on `users.username` to a form error.
fn map_unique(err: DieselError) -> AppError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => username_taken(),
        err => err.into(),
    }
}

pub fn register(conn: &mut SqliteConnection, new: &NewUser, cost: u32) -> AppResult<User> {
    if db::users::username_taken(conn, &new.username, None)? {
        return Err(username_taken());
    }

    let hashed = hash(&new.password, cost)?;
    let user = db::users::insert_new_user(conn, &new.username, &hashed).map_err(map_unique)?;

    log::info!("registered user {} ({})", user.username, user.id);
    Ok(user)
}

/// Checks credentials; the username is matched case-insensitively.
pub fn authenticate(conn: &mut SqliteConnection, username: &str, password: &str) -> AppResult<User> {
    let username = username.trim().to_lowercase();

    let Some(user) = db::users::find_user_by_username(conn, &username)? else {
        return Err(AppError::Authentication(UNKNOWN_USERNAME));
    };

    if verify(password, &user.password)? {
        Ok(user)
    } else {
        log::warn!("failed sign in for {username}");
        Err(AppError::Authentication(BAD_CREDENTIALS))
    }
}

pub fn current_user(conn: &mut SqliteConnection, identity: &Identity) -> AppResult<User> {
    db::users::find_user_by_uid(conn, &identity.user_id)?.ok_or(AppError::NotFound)
}

pub fn update_profile(
    conn: &mut SqliteConnection,
    identity: &Identity,
    update: &ProfileUpdate,
) -> AppResult<User> {
    let username = match &update.username {
        Some(username) => username.clone(),
        None => current_user(conn, identity)?.username,
    };

    if db::users::username_taken(conn, &username, Some(&identity.user_id))? {
        return Err(username_taken());
    }

    let changes = ProfileChanges {
        username: &username,
        email: &update.email,
        first_name: &update.first_name,
        last_name: &update.last_name,
    };

    db::users::update_profile(conn, &identity.user_id, &changes).map_err(map_unique)
}
