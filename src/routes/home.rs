use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::{
    db,
    error::AppResult,
    routes::render,
    services,
    types::DbPool,
    utils::SearchQuery,
};

#[get("/")]
pub async fn home(pool: web::Data<DbPool>, query: web::Query<SearchQuery>) -> AppResult<HttpResponse> {
    let q = query.text().to_owned();

    let (rooms, topics, room_messages) = {
        let q = q.clone();
        services::run(&pool, move |conn| {
            Ok((
                db::rooms::search_rooms(conn, &q)?,
                db::topics::topic_listings(conn, "")?,
                db::messages::search_messages(conn, &q)?,
            ))
        })
        .await?
    };

    log::debug!("home search {q:?} matched {} rooms", rooms.len());

    Ok(render(
        "base/home.html",
        json!({
            "q": q,
            "room_count": rooms.len(),
            "rooms": rooms,
            "topics": topics,
            "room_messages": room_messages,
        }),
    ))
}

#[get("/topics")]
pub async fn topics_page(pool: web::Data<DbPool>, query: web::Query<SearchQuery>) -> AppResult<HttpResponse> {
    let q = query.text().to_owned();

    let topics = {
        let q = q.clone();
        services::run(&pool, move |conn| Ok(db::topics::topic_listings(conn, &q)?)).await?
    };

    Ok(render(
        "base/topics.html",
        json!({
            "topics": topics,
            "q": q,
        }),
    ))
}

#[get("/activity")]
pub async fn activity_feed(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let room_messages =
        services::run(&pool, |conn| Ok(db::messages::search_messages(conn, "")?)).await?;

    Ok(render(
        "base/activity.html",
        json!({
            "room_messages": room_messages,
        }),
    ))
}
