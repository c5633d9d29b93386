use crate::schema::{messages, rooms, rooms_participants, topics, users};
use crate::{
    db::{contains_pattern, iso_date, ESCAPE},
    models::{Room, RoomChanges, RoomListing, Topic, User},
};
use diesel::prelude::*;
use uuid::Uuid;

pub fn find_room(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<Option<Room>> {
    rooms::table
        .find(room_id)
        .select(Room::as_select())
        .first(conn)
        .optional()
}

pub fn find_room_listing(
    conn: &mut SqliteConnection,
    room_id: &str,
) -> QueryResult<Option<RoomListing>> {
    let row = rooms::table
        .inner_join(topics::table)
        .inner_join(users::table)
        .filter(rooms::id.eq(room_id))
        .select((Room::as_select(), Topic::as_select(), User::as_select()))
        .first::<(Room, Topic, User)>(conn)
        .optional()?;

    Ok(row.map(RoomListing::from))
}

/// Rooms whose topic name, name or description contains `q`, ignoring case.
pub fn search_rooms(conn: &mut SqliteConnection, q: &str) -> QueryResult<Vec<RoomListing>> {
    let pattern = contains_pattern(q);

    let rows = rooms::table
        .inner_join(topics::table)
        .inner_join(users::table)
        .filter(
            topics::name
                .like(&pattern)
                .escape(ESCAPE)
                .or(rooms::name.like(&pattern).escape(ESCAPE))
                .or(rooms::description.like(&pattern).escape(ESCAPE)),
        )
        .order((rooms::updated_at.desc(), rooms::created_at.desc()))
        .select((Room::as_select(), Topic::as_select(), User::as_select()))
        .load::<(Room, Topic, User)>(conn)?;

    Ok(rows.into_iter().map(RoomListing::from).collect())
}

pub fn rooms_hosted_by(
    conn: &mut SqliteConnection,
    host_id: &str,
) -> QueryResult<Vec<RoomListing>> {
    let rows = rooms::table
        .inner_join(topics::table)
        .inner_join(users::table)
        .filter(rooms::host_id.eq(host_id))
        .order((rooms::updated_at.desc(), rooms::created_at.desc()))
        .select((Room::as_select(), Topic::as_select(), User::as_select()))
        .load::<(Room, Topic, User)>(conn)?;

    Ok(rows.into_iter().map(RoomListing::from).collect())
}

pub fn create_room(
    conn: &mut SqliteConnection,
    host_id: &str,
    topic_id: &str,
    room_name: &str,
    description: &str,
) -> QueryResult<Room> {
    let now = iso_date();
    let new_room = Room {
        id: Uuid::new_v4().to_string(),
        host_id: host_id.to_owned(),
        topic_id: topic_id.to_owned(),
        name: room_name.to_owned(),
        description: description.to_owned(),
        created_at: now.clone(),
        updated_at: now,
    };

    diesel::insert_into(rooms::table)
        .values(&new_room)
        .execute(conn)?;

    Ok(new_room)
}

pub fn update_room(
    conn: &mut SqliteConnection,
    room_id: &str,
    changes: &RoomChanges,
) -> QueryResult<Room> {
    diesel::update(rooms::table.find(room_id))
        .set(changes)
        .execute(conn)?;

    rooms::table
        .find(room_id)
        .select(Room::as_select())
        .first(conn)
}

/// Deletes a room together with its messages and participant rows.
pub fn delete_room(conn: &mut SqliteConnection, room_id: &str) -> QueryResult<usize> {
    conn.transaction(|conn| {
        diesel::delete(messages::table.filter(messages::room_id.eq(room_id))).execute(conn)?;
        diesel::delete(rooms_participants::table.filter(rooms_participants::room_id.eq(room_id)))
            .execute(conn)?;
        diesel::delete(rooms::table.find(room_id)).execute(conn)
    })
}
