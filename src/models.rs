use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "admin@company.com")]
    pub email: Option<String>,
    #[schema(example = "s3cret-pass")]
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// Credentials row used only by login; never serialized.
#[derive(FromRow)]
pub struct AdminCredentials {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Admin id
    pub id: u64,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}
