use std::{env, fmt::Display, str::FromStr};

use actix_web::cookie::Key;
use log::{info, warn};

const DEFAULT_WORKERS: usize = 2;

pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub server_port: u16,
    pub workers: usize,
    pub bcrypt_cost: u32,
    pub secure_cookies: bool,
    pub session_key: Key,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", "studybud.db"),
            server_addr: try_load("SERVER_ADDR", "127.0.0.1"),
            server_port: try_load("SERVER_PORT", "8080"),
            workers: workers(),
            bcrypt_cost: try_load("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string()),
            secure_cookies: try_load("SECURE_COOKIES", "false"),
            session_key: session_key(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let value = var(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    match value.parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!("Invalid {key} value {value:?}: {e}, using default: {default}");
            default
                .parse()
                .unwrap_or_else(|e| panic!("default for {key} does not parse: {e}"))
        }
    }
}

/// Worker count from `WORKERS`; zero falls back to the default.
fn workers() -> usize {
    match try_load("WORKERS", &DEFAULT_WORKERS.to_string()) {
        0 => {
            warn!("Invalid WORKERS value 0, using default: {DEFAULT_WORKERS}");
            DEFAULT_WORKERS
        }
        n => n,
    }
}

/// Cookie signing key from `SESSION_KEY`, which must hold at least 64 bytes.
fn session_key() -> Key {
    match var("SESSION_KEY").map(|raw| Key::try_from(raw.as_bytes())) {
        Some(Ok(key)) => key,
        Some(Err(e)) => {
            warn!("SESSION_KEY rejected ({e}), generating a random key");
            Key::generate()
        }
        None => {
            warn!("SESSION_KEY not set, generating a random key; sessions will not survive a restart");
            Key::generate()
        }
    }
}
