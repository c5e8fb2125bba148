use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use anyhow::Context;

use hrm_gateway::config::Config;
use hrm_gateway::db::{init_db, run_migrations};
use hrm_gateway::docs::ApiDoc;
use hrm_gateway::routes::{self, Limiters};

use tracing::{info, warn};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(config.log_level)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config)
        .await
        .context("Failed to connect to database")?;

    if config.run_migrations {
        run_migrations(&pool).await.context("Failed to run migrations")?;
    } else {
        warn!("RUN_MIGRATIONS is off; assuming the schema is already in place");
    }

    let limiters = Limiters::from_config(&config)?;
    let server_addr = config.server_addr.clone();
    let pool_data = Data::new(pool.clone());
    let config_data = Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .configure(|cfg| routes::configure(cfg, &config, &limiters))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    info!("Server stopped, closing database pool");
    pool.close().await;

    Ok(())
}
