use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Task {
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "Prepare onboarding pack")]
    pub title: String,
    pub description: String,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "2026-02-01", format = "date", value_type = String)]
    pub due_date: NaiveDate,
    #[schema(format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TaskDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: Task,
    #[schema(example = "John Doe")]
    pub employee_name: String,
}
