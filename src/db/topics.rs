use std::collections::HashMap;

use crate::{
    db::{contains_pattern, iso_date, ESCAPE},
    models::{Topic, TopicListing},
    schema::{rooms, topics},
};
use diesel::{dsl::count_star, prelude::*};
use uuid::Uuid;

/// Looks a topic up by exact name, inserting it first if absent.
///
/// The unique index on `topics.name` makes concurrent callers converge on a
/// single row.
pub fn get_or_create_topic(conn: &mut SqliteConnection, name: &str) -> QueryResult<Topic> {
    let candidate = Topic {
        id: Uuid::new_v4().to_string(),
        name: name.to_owned(),
        created_at: iso_date(),
    };

    let inserted = diesel::insert_or_ignore_into(topics::table)
        .values(&candidate)
        .execute(conn)?;
    if inserted == 1 {
        log::info!("created topic {name:?}");
    }

    topics::table
        .filter(topics::name.eq(name))
        .select(Topic::as_select())
        .first(conn)
}

pub fn all_topics(conn: &mut SqliteConnection) -> QueryResult<Vec<Topic>> {
    search_topics(conn, "")
}

pub fn search_topics(conn: &mut SqliteConnection, q: &str) -> QueryResult<Vec<Topic>> {
    topics::table
        .filter(topics::name.like(contains_pattern(q)).escape(ESCAPE))
        .order(topics::name.asc())
        .select(Topic::as_select())
        .load(conn)
}

/// Topics matching `q`, each with the number of rooms filed under it.
pub fn topic_listings(conn: &mut SqliteConnection, q: &str) -> QueryResult<Vec<TopicListing>> {
    let topics = search_topics(conn, q)?;

    let counts: HashMap<String, i64> = rooms::table
        .group_by(rooms::topic_id)
        .select((rooms::topic_id, count_star()))
        .load::<(String, i64)>(conn)?
        .into_iter()
        .collect();

    Ok(topics
        .into_iter()
        .map(|topic| TopicListing {
            room_count: counts.get(&topic.id).copied().unwrap_or(0),
            topic,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{room, test_conn, user};

    fn topic_count(conn: &mut SqliteConnection) -> i64 {
        topics::table.count().get_result(conn).unwrap()
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let mut conn = test_conn();

        let first = get_or_create_topic(&mut conn, "Python").unwrap();
        let second = get_or_create_topic(&mut conn, "Python").unwrap();

        assert_eq!(first, second);
        assert_eq!(topic_count(&mut conn), 1);
    }

    #[test]
    fn topic_names_are_case_sensitive() {
        let mut conn = test_conn();

        let upper = get_or_create_topic(&mut conn, "Python").unwrap();
        let lower = get_or_create_topic(&mut conn, "python").unwrap();

        assert_ne!(upper.id, lower.id);
        assert_eq!(topic_count(&mut conn), 2);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut conn = test_conn();
        for name in ["Python", "JavaScript", "Rust"] {
            get_or_create_topic(&mut conn, name).unwrap();
        }

        let names = |found: Vec<Topic>| found.into_iter().map(|t| t.name).collect::<Vec<_>>();

        assert_eq!(names(search_topics(&mut conn, "SCRIPT").unwrap()), ["JavaScript"]);
        assert_eq!(names(search_topics(&mut conn, "t").unwrap()), ["JavaScript", "Python", "Rust"]);
        assert!(search_topics(&mut conn, "%").unwrap().is_empty());
    }

    #[test]
    fn listings_count_rooms() {
        let mut conn = test_conn();
        let alice = user(&mut conn, "alice");
        room(&mut conn, &alice, "Python", "one");
        room(&mut conn, &alice, "Python", "two");
        get_or_create_topic(&mut conn, "Go").unwrap();

        let listings = topic_listings(&mut conn, "").unwrap();
        let counts = listings
            .iter()
            .map(|l| (l.topic.name.as_str(), l.room_count))
            .collect::<Vec<_>>();
        assert_eq!(counts, [("Go", 0), ("Python", 2)]);
    }
}
