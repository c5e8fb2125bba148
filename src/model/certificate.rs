use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Certificate {
    pub id: u64,
    #[schema(example = "ISO 27001 Lead Auditor")]
    pub name: String,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2027-01-01", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "compliance")]
    pub kind: String,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
