use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Attendance {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-01-05", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: String,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

/// Attendance row with the employee's name attached.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: Attendance,
    #[schema(example = "John Doe")]
    pub employee_name: String,
}
