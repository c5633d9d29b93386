use diesel::{Connection, SqliteConnection};

use crate::{
    db,
    error::{AppError, AppResult},
    models::Message,
    services::ensure_owner,
    utils::Identity,
};

/// Posts `body` to a room and enrolls the poster as a participant.
pub fn post_message(
    conn: &mut SqliteConnection,
    identity: &Identity,
    room_id: &str,
    body: &str,
) -> AppResult<Message> {
    conn.transaction(|conn| {
        db::rooms::find_room(conn, room_id)?.ok_or(AppError::NotFound)?;

        let message = db::messages::create_message(conn, room_id, &identity.user_id, body)?;
        if db::rooms_participants::join_room(conn, &identity.user_id, room_id)? {
            log::info!("user {} joined room {room_id}", identity.user_id);
        }

        Ok(message)
    })
}

/// Loads a message for its author, refusing everybody else.
pub fn message_for_author(
    conn: &mut SqliteConnection,
    identity: &Identity,
    message_id: &str,
) -> AppResult<Message> {
    let message = db::messages::find_message(conn, message_id)?.ok_or(AppError::NotFound)?;
    ensure_owner(identity, &message.user_id)?;

    Ok(message)
}

pub fn delete_message(
    conn: &mut SqliteConnection,
    identity: &Identity,
    message_id: &str,
) -> AppResult<Message> {
    conn.transaction(|conn| {
        let message = message_for_author(conn, identity, message_id)?;
        db::messages::delete_message(conn, message_id)?;

        log::info!("user {} deleted message {message_id}", identity.user_id);
        Ok(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::rooms_participants::{is_participant, participants},
        test_utils::{room, test_conn, user},
    };

    #[test]
    fn posting_enrolls_the_poster_once() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let bob = Identity::new(user(&mut conn, "bob").id);
        let lobby = room(&mut conn, &alice, "General", "Lobby");

        post_message(&mut conn, &bob, &lobby.id, "hi").unwrap();
        post_message(&mut conn, &bob, &lobby.id, "hi again").unwrap();

        assert!(is_participant(&mut conn, &bob.user_id, &lobby.id).unwrap());
        assert!(!is_participant(&mut conn, &alice.id, &lobby.id).unwrap());
        assert_eq!(participants(&mut conn, &lobby.id).unwrap().len(), 1);
        assert_eq!(db::messages::messages_in_room(&mut conn, &lobby.id).unwrap().len(), 2);
    }

    #[test]
    fn posting_to_missing_room_is_not_found() {
        let mut conn = test_conn();
        let bob = Identity::new(user(&mut conn, "bob").id);

        let err = post_message(&mut conn, &bob, "missing", "hi").unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn only_the_author_can_delete() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let author = Identity::new(alice.id.clone());
        let bob = Identity::new(user(&mut conn, "bob").id);
        let lobby = room(&mut conn, &alice, "General", "Lobby");
        let message = post_message(&mut conn, &author, &lobby.id, "mine").unwrap();

        let err = delete_message(&mut conn, &bob, &message.id).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed));
        assert_eq!(
            db::messages::find_message(&mut conn, &message.id).unwrap(),
            Some(message.clone())
        );

        let deleted = delete_message(&mut conn, &author, &message.id).unwrap();
        assert_eq!(deleted.id, message.id);
        assert!(db::messages::find_message(&mut conn, &message.id).unwrap().is_none());
    }
}
