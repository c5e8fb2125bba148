use actix_web::{HttpResponse, web};
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument, warn};

use crate::{
    auth::{jwt::generate_token, password::verify_password},
    config::Config,
    error::ApiError,
    models::{AdminCredentials, LoginReqDto, LoginResponse},
};

/// Admin login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Token issued, valid for one hour", body = LoginResponse),
        (status = 400, description = "Email or password missing", body = Object, example = json!({
            "error": "Email and password are required"
        })),
        (status = 401, description = "Unknown email or wrong password", body = Object, example = json!({
            "error": "Invalid credentials"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login", skip(payload, pool, config))]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let payload = payload.into_inner();
    let (email, password) = match (payload.email, payload.password) {
        (Some(e), Some(p)) if !e.trim().is_empty() && !p.is_empty() => (e, p),
        _ => {
            info!("Validation failed: empty email or password");
            return Err(ApiError::validation("Email and password are required"));
        }
    };

    debug!("Fetching admin from database");

    let admin = sqlx::query_as::<_, AdminCredentials>(
        r#"
        SELECT id, email, password_hash
        FROM admins
        WHERE email = ?
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool.get_ref())
    .await?;

    // Unknown email and wrong password must look the same to the caller.
    let admin = match admin {
        Some(a) => a,
        None => {
            info!("Invalid credentials: admin not found");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if let Err(e) = verify_password(&password, &admin.password_hash) {
        if !matches!(e, argon2::password_hash::Error::Password) {
            warn!(admin_id = admin.id, error = %e, "Stored password hash is unusable");
        }
        info!(admin_id = admin.id, "Invalid credentials: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    let token = generate_token(admin.id, &admin.email, &config.jwt_secret, config.token_ttl)
        .map_err(|e| {
            error!(error = %e, "Failed to sign token");
            ApiError::Internal
        })?;

    info!(admin_id = admin.id, "Login successful");

    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}
