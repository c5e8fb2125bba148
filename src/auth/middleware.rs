use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web::Data,
};
use tracing::{debug, error};

use crate::{auth::auth::AuthUser, auth::jwt::verify_token, config::Config, error::ApiError};

/// Pulls the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn reject(req: ServiceRequest, err: ApiError) -> Result<ServiceResponse<BoxBody>, Error> {
    Ok(req.into_response(err.error_response()))
}

pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let secret = match req.app_data::<Data<Config>>() {
        Some(config) => config.jwt_secret.clone(),
        None => {
            error!("App config missing");
            return reject(req, ApiError::Internal);
        }
    };

    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            debug!(path = %req.path(), "Missing or malformed Authorization header");
            return reject(req, ApiError::Unauthorized);
        }
    };

    let claims = match verify_token(token, &secret) {
        Ok(c) => c,
        Err(e) => {
            debug!(path = %req.path(), error = %e, "Token rejected");
            return reject(req, ApiError::InvalidToken);
        }
    };

    req.extensions_mut().insert(AuthUser::from(claims));

    next.call(req).await
}
