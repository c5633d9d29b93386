use crate::schema::*;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

// db models
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, Insertable,
)]
#[diesel(table_name = users)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub created_at: String,
}

#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Queryable, Selectable, Identifiable, Insertable,
)]
#[diesel(table_name = topics)]
pub struct Topic {
    pub id: String,
    pub name: String,
    pub created_at: String,
}

#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, Selectable, Queryable, Identifiable, Insertable,
)]
#[diesel(table_name = rooms)]
pub struct Room {
    pub id: String,
    pub host_id: String,
    pub topic_id: String,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Queryable,
    Identifiable,
    Associations,
    Insertable,
    Selectable,
)]
#[diesel(belongs_to(Room))]
#[diesel(belongs_to(User))]
#[diesel(table_name = messages)]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub user_id: String,
    pub body: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Identifiable, Selectable, Insertable, Queryable, Associations, Debug, Clone)]
#[diesel(belongs_to(Room))]
#[diesel(belongs_to(User))]
#[diesel(table_name = rooms_participants)]
#[diesel(primary_key(room_id, user_id))]
pub struct RoomParticipant {
    pub room_id: String,
    pub user_id: String,
}

/// Columns a room edit replaces.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = rooms)]
pub struct RoomChanges<'a> {
    pub topic_id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub updated_at: &'a str,
}

/// Columns a profile edit replaces.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChanges<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

// business models
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct NewRoom {
    pub topic: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ProfileUpdate {
    /// `None` keeps the current username.
    pub username: Option<String>,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

// view models
#[derive(Debug, Clone, Serialize)]
pub struct RoomListing {
    pub room: Room,
    pub topic: Topic,
    pub host: User,
}

impl From<(Room, Topic, User)> for RoomListing {
    fn from((room, topic, host): (Room, Topic, User)) -> Self {
        Self { room, topic, host }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicListing {
    pub topic: Topic,
    pub room_count: i64,
}

/// A message shown inside its own room.
#[derive(Debug, Clone, Serialize)]
pub struct RoomMessage {
    pub message: Message,
    pub author: User,
}

impl From<(Message, User)> for RoomMessage {
    fn from((message, author): (Message, User)) -> Self {
        Self { message, author }
    }
}

/// A message shown in a feed, outside its room.
#[derive(Debug, Clone, Serialize)]
pub struct MessageListing {
    pub message: Message,
    pub author: User,
    pub room: Room,
    pub topic: Topic,
}

impl From<(Message, User, Room, Topic)> for MessageListing {
    fn from((message, author, room, topic): (Message, User, Room, Topic)) -> Self {
        Self {
            message,
            author,
            room,
            topic,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomDetail {
    #[serde(flatten)]
    pub listing: RoomListing,
    pub room_messages: Vec<RoomMessage>,
    pub participants: Vec<User>,
}
