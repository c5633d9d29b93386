use diesel::prelude::*;
use uuid::Uuid;

use crate::{
    db::{contains_pattern, iso_date, ESCAPE},
    models::{Message, MessageListing, Room, RoomMessage, Topic, User},
    schema::{messages, rooms, topics, users},
};

pub fn create_message(
    conn: &mut SqliteConnection,
    room_id: &str,
    user_id: &str,
    body: &str,
) -> QueryResult<Message> {
    let now = iso_date();
    let new_message = Message {
        id: Uuid::new_v4().to_string(),
        room_id: room_id.to_owned(),
        user_id: user_id.to_owned(),
        body: body.to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };

    diesel::insert_into(messages::table)
        .values(&new_message)
        .execute(conn)?;

    Ok(new_message)
}

pub fn find_message(conn: &mut SqliteConnection, message_id: &str) -> QueryResult<Option<Message>> {
    messages::table
        .find(message_id)
        .select(Message::as_select())
        .first(conn)
        .optional()
}

pub fn delete_message(conn: &mut SqliteConnection, message_id: &str) -> QueryResult<usize> {
    diesel::delete(messages::table.find(message_id)).execute(conn)
}

/// Messages of one room, newest first.
pub fn messages_in_room(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<Vec<RoomMessage>> {
    let rows = messages::table
        .inner_join(users::table)
        .filter(messages::room_id.eq(room_id))
        .order(messages::created_at.desc())
        .select((Message::as_select(), User::as_select()))
        .load::<(Message, User)>(conn)?;

    Ok(rows.into_iter().map(RoomMessage::from).collect())
}

/// Messages posted in rooms whose topic name contains `q`, newest first.
pub fn search_messages(conn: &mut SqliteConnection, q: &str) -> QueryResult<Vec<MessageListing>> {
    let rows = messages::table
        .inner_join(users::table)
        .inner_join(rooms::table.inner_join(topics::table))
        .filter(topics::name.like(contains_pattern(q)).escape(ESCAPE))
        .order(messages::created_at.desc())
        .select((
            Message::as_select(),
            User::as_select(),
            Room::as_select(),
            Topic::as_select(),
        ))
        .load::<(Message, User, Room, Topic)>(conn)?;

    Ok(rows.into_iter().map(MessageListing::from).collect())
}

pub fn messages_by_author(
    conn: &mut SqliteConnection,
    user_id: &str,
) -> QueryResult<Vec<MessageListing>> {
    let rows = messages::table
        .inner_join(users::table)
        .inner_join(rooms::table.inner_join(topics::table))
        .filter(messages::user_id.eq(user_id))
        .order(messages::created_at.desc())
        .select((
            Message::as_select(),
            User::as_select(),
            Room::as_select(),
            Topic::as_select(),
        ))
        .load::<(Message, User, Room, Topic)>(conn)?;

    Ok(rows.into_iter().map(MessageListing::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{room, test_conn, user};

    #[test]
    fn room_messages_are_newest_first() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let lobby = room(&mut conn, &alice, "General", "Lobby");

        create_message(&mut conn, &lobby.id, &alice.id, "first").unwrap();
        create_message(&mut conn, &lobby.id, &alice.id, "second").unwrap();

        let bodies = messages_in_room(&mut conn, &lobby.id)
            .unwrap()
            .into_iter()
            .map(|m| m.message.body)
            .collect::<Vec<_>>();
        assert_eq!(bodies, ["second", "first"]);
    }

    #[test]
    fn search_filters_on_topic_name_only() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let python = room(&mut conn, &alice, "Python", "Snakes");
        let rust = room(&mut conn, &alice, "Rust", "python is slow");

        create_message(&mut conn, &python.id, &alice.id, "import this").unwrap();
        create_message(&mut conn, &rust.id, &alice.id, "python?").unwrap();

        let found = search_messages(&mut conn, "PYTH").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].room.id, python.id);
        assert_eq!(found[0].topic.name, "Python");
        assert_eq!(found[0].author.username, "alice");

        assert_eq!(search_messages(&mut conn, "").unwrap().len(), 2);
    }

    #[test]
    fn lists_messages_by_author() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let bob = user(&mut conn, "bob");
        let lobby = room(&mut conn, &alice, "General", "Lobby");

        create_message(&mut conn, &lobby.id, &alice.id, "from alice").unwrap();
        let from_bob = create_message(&mut conn, &lobby.id, &bob.id, "from bob").unwrap();

        let authored = messages_by_author(&mut conn, &bob.id).unwrap();
        assert_eq!(authored.len(), 1);
        assert_eq!(authored[0].message, from_bob);
    }

    #[test]
    fn delete_removes_one_message() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let lobby = room(&mut conn, &alice, "General", "Lobby");
        let message = create_message(&mut conn, &lobby.id, &alice.id, "bye").unwrap();

        assert_eq!(delete_message(&mut conn, &message.id).unwrap(), 1);
        assert!(find_message(&mut conn, &message.id).unwrap().is_none());
        assert_eq!(delete_message(&mut conn, &message.id).unwrap(), 0);
    }
}
