use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "John Doe",
        "email": "john.doe@company.com",
        "position": "Backend Engineer",
        "joining_date": "2024-01-01",
        "salary": 85000.0,
        "created_at": "2024-01-01T09:00:00Z"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "Backend Engineer")]
    pub position: String,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub joining_date: NaiveDate,

    #[schema(example = 85000.0)]
    pub salary: f64,

    #[schema(example = "2024-01-01T09:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
}
