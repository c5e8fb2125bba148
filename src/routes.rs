use crate::{
    api::{self, report},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    cors::{self, CorsPolicy},
    error::ApiError,
    resource::handlers::method_not_allowed,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{error::JsonPayloadError, middleware::from_fn, web};
use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::debug;

pub type Limiter = Governor<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-peer-IP rate limiters, built once and shared by every worker.
#[derive(Clone)]
pub struct Limiters {
    pub login: Arc<Limiter>,
    pub protected: Arc<Limiter>,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            login: Arc::new(build_limiter(config.rate_login_per_min)?),
            protected: Arc::new(build_limiter(config.rate_protected_per_min)?),
        })
    }
}

fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit: {requests_per_min} requests/min"))?;

    Ok(Governor::new(&cfg))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .content_type_required(false)
        .error_handler(|err, _req| {
            debug!(error = %err, "Rejected request body");
            let message = match &err {
                JsonPayloadError::Deserialize(e) if e.is_data() => "Invalid request body",
                _ => "Request body must be valid JSON",
            };
            ApiError::validation(message).into()
        })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    cfg.app_data(json_config());

    // Public
    cfg.service(
        web::resource("/auth/login")
            .route(web::post().to(handlers::login))
            .default_service(web::to(method_not_allowed))
            .wrap(limiters.login.clone())
            .wrap(from_fn(cors::layer(CorsPolicy::LOGIN))),
    );

    // Protected; each resource layers CORS, then the limiter, then auth
    cfg.service(
        web::scope(&config.api_prefix)
            .configure(|cfg| api::configure_resources(cfg, &limiters.protected))
            .service(
                web::resource("/query")
                    .route(web::post().to(report::run_report))
                    .default_service(web::to(method_not_allowed))
                    .wrap(from_fn(auth_middleware))
                    .wrap(limiters.protected.clone())
                    .wrap(from_fn(cors::layer(CorsPolicy::REPORT))),
            ),
    );
}
