use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Public view of an admin; the password hash is never selected.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Admin {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "admin@company.com")]
    pub email: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
