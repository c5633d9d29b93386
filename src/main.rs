use diesel::{
    r2d2::{self, ConnectionManager},
    SqliteConnection,
};
use env_logger::Env;
use server::build_app;

mod config;
mod db;
mod error;
mod forms;
mod middlewares;
mod models;
mod routes;
mod schema;
mod server;
mod services;
#[cfg(test)]
mod test_utils;
mod types;
mod utils;

pub const LOGIN_URL: &str = "/login";

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = actix_web::web::Data::new(config::Config::load());

    let manager = ConnectionManager::<SqliteConnection>::new(&config.database_url);
    let pool = r2d2::Pool::builder()
        .build(manager)
        .map_err(std::io::Error::other)?;

    {
        let mut conn = pool.get().map_err(std::io::Error::other)?;
        db::run_migrations(&mut conn).map_err(std::io::Error::other)?;
    }

    let server_addr = config.server_addr.clone();
    let server_port = config.server_port;
    let workers = config.workers;

    let app = actix_web::HttpServer::new(move || build_app(pool.clone(), config.clone()))
        .workers(workers)
        .bind((server_addr.as_str(), server_port))?
        .run();

    log::info!("Server running at http://{server_addr}:{server_port}");

    app.await
}
