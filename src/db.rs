use chrono::{SecondsFormat, Utc};
use diesel::{connection::SimpleConnection, QueryResult, SqliteConnection};

pub mod messages;
pub mod rooms;
pub mod rooms_participants;
pub mod topics;
pub mod users;

pub(crate) const ESCAPE: char = '\\';

const MIGRATIONS: &[&str] = &[include_str!(
    "../migrations/2024-03-02-120000_create_studybud/up.sql"
)];

pub(crate) fn iso_date() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// Builds a `LIKE` pattern matching `q` anywhere, with `q` taken literally.
pub(crate) fn contains_pattern(q: &str) -> String {
    let mut pattern = String::with_capacity(q.len() + 2);
    pattern.push('%');
    for c in q.chars() {
        if matches!(c, '%' | '_' | ESCAPE) {
            pattern.push(ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

pub fn run_migrations(conn: &mut SqliteConnection) -> QueryResult<()> {
    for migration in MIGRATIONS {
        conn.batch_execute(migration)?;
    }

    Ok(())
}
