use crate::{
    db::iso_date,
    models::{ProfileChanges, User},
};
use diesel::prelude::*;
use uuid::Uuid;

pub fn find_user_by_uid(conn: &mut SqliteConnection, uid: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::*;

    users
        .filter(id.eq(uid))
        .select(User::as_select())
        .first(conn)
        .optional()
}

pub fn find_user_by_username(conn: &mut SqliteConnection, un: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl::*;

    users
        .filter(username.eq(un))
        .select(User::as_select())
        .first(conn)
        .optional()
}

/// Whether `un` belongs to anyone other than `except`.
pub fn username_taken(
    conn: &mut SqliteConnection,
    un: &str,
    except: Option<&str>,
) -> QueryResult<bool> {
    use crate::schema::users::dsl::*;

    let owner: Option<String> = users
        .filter(username.eq(un))
        .select(id)
        .first(conn)
        .optional()?;

    Ok(owner.is_some_and(|owner| Some(owner.as_str()) != except))
}

/// Inserts a user whose `password` is already hashed.
pub fn insert_new_user(conn: &mut SqliteConnection, un: &str, hashed: &str) -> QueryResult<User> {
    use crate::schema::users::dsl::*;

    let new_user = User {
        id: Uuid::new_v4().to_string(),
        username: un.to_owned(),
        email: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        password: hashed.to_owned(),
        created_at: iso_date(),
    };
    diesel::insert_into(users).values(&new_user).execute(conn)?;

    Ok(new_user)
}

pub fn update_profile(
    conn: &mut SqliteConnection,
    uid: &str,
    changes: &ProfileChanges,
) -> QueryResult<User> {
    use crate::schema::users::dsl::*;

    diesel::update(users.filter(id.eq(uid)))
        .set(changes)
        .execute(conn)?;

    users
        .filter(id.eq(uid))
        .select(User::as_select())
        .first(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_conn, user};

    #[test]
    fn finds_users_by_id_and_name() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");

        let by_id = find_user_by_uid(&mut conn, &alice.id).unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        let by_name = find_user_by_username(&mut conn, "alice").unwrap().unwrap();
        assert_eq!(by_name.id, alice.id);

        assert!(find_user_by_username(&mut conn, "Alice").unwrap().is_none());
    }

    #[test]
    fn usernames_are_unique() {
        let mut conn = test_conn();
        user(&mut conn, "alice");

        let err = insert_new_user(&mut conn, "alice", "hash").unwrap_err();
        assert!(matches!(
            err,
            diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::UniqueViolation,
                _
            )
        ));
    }

    #[test]
    fn username_taken_ignores_the_owner() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");

        assert!(username_taken(&mut conn, "alice", None).unwrap());
        assert!(!username_taken(&mut conn, "alice", Some(&alice.id)).unwrap());
        assert!(!username_taken(&mut conn, "bob", None).unwrap());
    }
}
