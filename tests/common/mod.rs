#![allow(dead_code)]

use hrm_gateway::{auth::jwt::generate_token, auth::password::hash_password, config::Config};
use sqlx::{MySqlPool, mysql::MySqlPoolOptions};

pub const SECRET: &str = "integration-secret";

/// `None` when `TEST_DATABASE_URL` is unset, so the suite can run without MySQL.
pub async fn pool() -> Option<MySqlPool> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set; skipping database test");
            return None;
        }
    };

    let pool = MySqlPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");

    hrm_gateway::db::run_migrations(&pool)
        .await
        .expect("apply migrations");

    Some(pool)
}

pub fn config() -> Config {
    Config {
        database_url: std::env::var("TEST_DATABASE_URL").unwrap_or_default(),
        jwt_secret: SECRET.into(),
        server_addr: "127.0.0.1:0".into(),
        frontend_url: "*".into(),
        token_ttl: 3600,
        api_prefix: String::new(),
        db_max_connections: 4,
        db_acquire_timeout_secs: 5,
        run_migrations: false,
        rate_login_per_min: 6000,
        rate_protected_per_min: 6000,
        log_dir: "logs".into(),
        log_level: tracing::Level::DEBUG,
    }
}

pub fn bearer() -> String {
    format!("Bearer {}", generate_token(1, "suite@company.com", SECRET, 3600).unwrap())
}

pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@company.com", uuid::Uuid::new_v4())
}

pub async fn insert_admin(pool: &MySqlPool, email: &str, password: &str) -> u64 {
    sqlx::query("INSERT INTO admins (email, password_hash) VALUES (?, ?)")
        .bind(email)
        .bind(hash_password(password).unwrap())
        .execute(pool)
        .await
        .unwrap()
        .last_insert_id()
}

pub async fn count(pool: &MySqlPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

macro_rules! app {
    ($pool:expr) => {{
        let config = $crate::common::config();
        let limiters = hrm_gateway::routes::Limiters::from_config(&config).unwrap();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new(config.clone()))
                .configure(|cfg| hrm_gateway::routes::configure(cfg, &config, &limiters)),
        )
        .await
    }};
}
pub(crate) use app;

pub fn request(method: actix_web::http::Method, uri: &str) -> actix_web::test::TestRequest {
    actix_web::test::TestRequest::default()
        .method(method)
        .uri(uri)
        .peer_addr("127.0.0.1:41000".parse().unwrap())
        .insert_header(("authorization", bearer()))
}
