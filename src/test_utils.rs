use actix_web::{
    cookie::{Cookie, Key},
    dev::ServiceResponse,
    http::header,
    test::TestRequest,
    web,
};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    Connection, SqliteConnection,
};

use crate::{
    config::Config,
    db,
    models::{Room, User},
    types::DbPool,
};

pub const PASSWORD: &str = "correct horse battery";
pub const TEST_COST: u32 = 4;

pub fn test_conn() -> SqliteConnection {
    let mut conn = SqliteConnection::establish(":memory:").unwrap();
    db::run_migrations(&mut conn).unwrap();
    conn
}

/// A single-connection pool, so every checkout sees the same in-memory database.
pub fn test_pool() -> DbPool {
    let pool = Pool::builder()
        .max_size(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .build(ConnectionManager::<SqliteConnection>::new(":memory:"))
        .unwrap();
    db::run_migrations(&mut pool.get().unwrap()).unwrap();
    pool
}

pub fn user(conn: &mut SqliteConnection, username: &str) -> User {
    let hashed = bcrypt::hash(PASSWORD, TEST_COST).unwrap();
    db::users::insert_new_user(conn, username, &hashed).unwrap()
}

pub fn room(conn: &mut SqliteConnection, host: &User, topic: &str, name: &str) -> Room {
    let topic = db::topics::get_or_create_topic(conn, topic).unwrap();
    db::rooms::create_room(conn, &host.id, &topic.id, name, "").unwrap()
}

pub fn login_request(username: &str) -> TestRequest {
    TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", PASSWORD)])
}

pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "id")
        .expect("response sets a session cookie")
        .into_owned()
}

pub fn location<B>(res: &ServiceResponse<B>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

pub fn test_config() -> web::Data<Config> {
    web::Data::new(Config {
        database_url: ":memory:".to_owned(),
        server_addr: "127.0.0.1".to_owned(),
        server_port: 0,
        workers: 1,
        bcrypt_cost: TEST_COST,
        secure_cookies: false,
        session_key: Key::generate(),
    })
}
