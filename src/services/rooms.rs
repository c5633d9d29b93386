use diesel::{Connection, SqliteConnection};

use crate::{
    db::{self, iso_date},
    error::{AppError, AppResult},
    models::{NewRoom, Room, RoomChanges, RoomDetail, RoomListing},
    services::ensure_owner,
    utils::Identity,
};

pub fn create_room(conn: &mut SqliteConnection, identity: &Identity, new: &NewRoom) -> AppResult<Room> {
    conn.transaction(|conn| {
        let topic = db::topics::get_or_create_topic(conn, &new.topic)?;
        let room = db::rooms::create_room(
            conn,
            &identity.user_id,
            &topic.id,
            &new.name,
            &new.description,
        )?;

        log::info!("user {} created room {}", identity.user_id, room.id);
        Ok(room)
    })
}

pub fn room_detail(conn: &mut SqliteConnection, room_id: &str) -> AppResult<RoomDetail> {
    let listing = db::rooms::find_room_listing(conn, room_id)?.ok_or(AppError::NotFound)?;
    let room_messages = db::messages::messages_in_room(conn, room_id)?;
    let participants = db::rooms_participants::participants(conn, room_id)?;

    Ok(RoomDetail {
        listing,
        room_messages,
        participants,
    })
}

/// Loads a room for its host, refusing everybody else.
pub fn room_for_host(
    conn: &mut SqliteConnection,
    identity: &Identity,
    room_id: &str,
) -> AppResult<RoomListing> {
    let listing = db::rooms::find_room_listing(conn, room_id)?.ok_or(AppError::NotFound)?;
    ensure_owner(identity, &listing.room.host_id)?;

    Ok(listing)
}

pub fn update_room(
    conn: &mut SqliteConnection,
    identity: &Identity,
    room_id: &str,
    new: &NewRoom,
) -> AppResult<Room> {
    conn.transaction(|conn| {
        let room = db::rooms::find_room(conn, room_id)?.ok_or(AppError::NotFound)?;
        ensure_owner(identity, &room.host_id)?;

        let topic = db::topics::get_or_create_topic(conn, &new.topic)?;
        let updated_at = iso_date();
        let room = db::rooms::update_room(
            conn,
            room_id,
            &RoomChanges {
                topic_id: &topic.id,
                name: &new.name,
                description: &new.description,
                updated_at: &updated_at,
            },
        )?;

        log::info!("user {} updated room {room_id}", identity.user_id);
        Ok(room)
    })
}

pub fn delete_room(conn: &mut SqliteConnection, identity: &Identity, room_id: &str) -> AppResult<()> {
    conn.transaction(|conn| {
        let room = db::rooms::find_room(conn, room_id)?.ok_or(AppError::NotFound)?;
        ensure_owner(identity, &room.host_id)?;

        db::rooms::delete_room(conn, room_id)?;

        log::info!("user {} deleted room {room_id}", identity.user_id);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use diesel::prelude::*;

    use super::*;
    use crate::{
        schema::{rooms, topics},
        test_utils::{test_conn, user},
    };

    fn new_room(topic: &str, name: &str, description: &str) -> NewRoom {
        NewRoom {
            topic: topic.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
        }
    }

    fn count_topics(conn: &mut SqliteConnection) -> i64 {
        topics::table.count().get_result(conn).unwrap()
    }

    fn count_rooms(conn: &mut SqliteConnection) -> i64 {
        rooms::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn creating_with_new_topic_creates_it_once() {
        let mut conn = test_conn();
        let alice = Identity::new(user(&mut conn, "alice").id);

        let room = create_room(&mut conn, &alice, &new_room("Python", "Learn", "")).unwrap();

        assert_eq!(count_topics(&mut conn), 1);
        assert_eq!(count_rooms(&mut conn), 1);
        assert_eq!(room.host_id, alice.user_id);

        let listing = db::rooms::find_room_listing(&mut conn, &room.id).unwrap().unwrap();
        assert_eq!(listing.topic.name, "Python");

        create_room(&mut conn, &alice, &new_room("Python", "Again", "")).unwrap();
        assert_eq!(count_topics(&mut conn), 1);
        assert_eq!(count_rooms(&mut conn), 2);
    }

    #[test]
    fn host_can_update() {
        let mut conn = test_conn();
        let alice = Identity::new(user(&mut conn, "alice").id);
        let room = create_room(&mut conn, &alice, &new_room("Python", "Learn", "")).unwrap();

        let updated = update_room(
            &mut conn,
            &alice,
            &room.id,
            &new_room("Rust", "Learn more", "ownership"),
        )
        .unwrap();

        assert_eq!(updated.name, "Learn more");
        assert_eq!(updated.description, "ownership");
        assert_ne!(updated.topic_id, room.topic_id);
        assert!(updated.updated_at >= room.updated_at);
        assert_eq!(updated.created_at, room.created_at);
    }

    #[test]
    fn non_host_cannot_update_or_delete() {
        let mut conn = test_conn();
        let alice = Identity::new(user(&mut conn, "alice").id);
        let bob = Identity::new(user(&mut conn, "bob").id);
        let room = create_room(&mut conn, &alice, &new_room("Python", "Learn", "")).unwrap();

        let err = update_room(&mut conn, &bob, &room.id, &new_room("Go", "Hijacked", "")).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed));

        let err = delete_room(&mut conn, &bob, &room.id).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed));

        let err = room_for_host(&mut conn, &bob, &room.id).unwrap_err();
        assert!(matches!(err, AppError::NotAllowed));

        let unchanged = db::rooms::find_room(&mut conn, &room.id).unwrap().unwrap();
        assert_eq!(unchanged, room);
        assert_eq!(count_topics(&mut conn), 1);
    }

    #[test]
    fn host_can_delete() {
        let mut conn = test_conn();
        let alice = Identity::new(user(&mut conn, "alice").id);
        let room = create_room(&mut conn, &alice, &new_room("Python", "Learn", "")).unwrap();

        delete_room(&mut conn, &alice, &room.id).unwrap();
        assert_eq!(count_rooms(&mut conn), 0);

        let err = delete_room(&mut conn, &alice, &room.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[test]
    fn detail_of_missing_room_is_not_found() {
        let mut conn = test_conn();
        assert!(matches!(
            room_detail(&mut conn, "missing"),
            Err(AppError::NotFound)
        ));
    }
}
