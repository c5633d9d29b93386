use diesel::prelude::*;

use crate::{
    models::{RoomParticipant, User},
    schema::{rooms_participants, users},
};

/// Enrolls `user_id` in `room_id`; enrolling an existing participant is a no-op.
pub fn join_room(conn: &mut SqliteConnection, user_id: &str, room_id: &str) -> QueryResult<bool> {
    let inserted = diesel::insert_or_ignore_into(rooms_participants::table)
        .values(RoomParticipant {
            room_id: room_id.to_owned(),
            user_id: user_id.to_owned(),
        })
        .execute(conn)?;

    Ok(inserted == 1)
}

pub fn is_participant(conn: &mut SqliteConnection, user_id: &str, room_id: &str) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        rooms_participants::table.filter(
            rooms_participants::room_id
                .eq(room_id)
                .and(rooms_participants::user_id.eq(user_id)),
        ),
    ))
    .get_result(conn)
}

pub fn participants(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<Vec<User>> {
    rooms_participants::table
        .inner_join(users::table)
        .filter(rooms_participants::room_id.eq(room_id))
        .order(users::username.asc())
        .select(User::as_select())
        .load(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{room, test_conn, user};

    #[test]
    fn joining_twice_is_a_no_op() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        let lobby = room(&mut conn, &alice, "General", "Lobby");

        assert!(!is_participant(&mut conn, &alice.id, &lobby.id).unwrap());
        assert!(join_room(&mut conn, &alice.id, &lobby.id).unwrap());
        assert!(!join_room(&mut conn, &alice.id, &lobby.id).unwrap());
        assert!(is_participant(&mut conn, &alice.id, &lobby.id).unwrap());

        let members = participants(&mut conn, &lobby.id).unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, alice.id);
    }
}
