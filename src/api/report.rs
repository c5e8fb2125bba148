//! Fixed, parameterized reports served from `/query`.
//!
//! Callers pick a report by name and supply positional parameters; the SQL
//! text itself is never taken from the request.

use std::str::FromStr;

use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, MySqlPool, mysql::MySqlRow};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::certificate::Certificate,
    utils::db_utils::{FieldKind, SqlValue, convert, to_arguments},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Report {
    EmployeeDirectory,
    AttendanceOnDate,
    AttendanceSummary,
    TasksByStatus,
    OverdueTasks,
    ExpiringCertificates,
}

impl Report {
    pub fn params(&self) -> &'static [(&'static str, FieldKind)] {
        match self {
            Report::EmployeeDirectory => &[],
            Report::AttendanceOnDate => &[("date", FieldKind::Date)],
            Report::AttendanceSummary => &[("from", FieldKind::Date), ("to", FieldKind::Date)],
            Report::TasksByStatus => &[("status", FieldKind::Text)],
            Report::OverdueTasks => &[("as_of", FieldKind::Date)],
            Report::ExpiringCertificates => &[("before", FieldKind::Date)],
        }
    }

    pub fn sql(&self) -> &'static str {
        match self {
            Report::EmployeeDirectory => {
                r#"
                SELECT id, name, email, position, joining_date
                FROM employees
                ORDER BY name, id
                "#
            }
            Report::AttendanceOnDate => {
                r#"
                SELECT a.id, a.employee_id, e.name AS employee_name, a.date, a.status
                FROM attendance a
                JOIN employees e ON a.employee_id = e.id
                WHERE a.date = ?
                ORDER BY e.name, a.id
                "#
            }
            Report::AttendanceSummary => {
                r#"
                SELECT a.employee_id, e.name AS employee_name, a.status, COUNT(*) AS days
                FROM attendance a
                JOIN employees e ON a.employee_id = e.id
                WHERE a.date BETWEEN ? AND ?
                GROUP BY a.employee_id, e.name, a.status
                ORDER BY e.name, a.status
                "#
            }
            Report::TasksByStatus => {
                r#"
                SELECT t.id, t.employee_id, e.name AS employee_name, t.title, t.status, t.due_date
                FROM tasks t
                JOIN employees e ON t.employee_id = e.id
                WHERE t.status = ?
                ORDER BY t.due_date, t.id
                "#
            }
            Report::OverdueTasks => {
                r#"
                SELECT t.id, t.employee_id, e.name AS employee_name, t.title, t.status, t.due_date
                FROM tasks t
                JOIN employees e ON t.employee_id = e.id
                WHERE t.due_date < ? AND t.status <> 'completed'
                ORDER BY t.due_date, t.id
                "#
            }
            Report::ExpiringCertificates => {
                r#"
                SELECT id, name, start_date, end_date, type, created_at
                FROM certificates
                WHERE end_date <= ?
                ORDER BY end_date, id
                "#
            }
        }
    }

    /// Checks arity and kind of the positional parameters.
    pub fn bind_params(&self, params: &[Value]) -> Result<Vec<SqlValue>, ApiError> {
        let expected = self.params();

        if params.len() != expected.len() {
            let names: Vec<&str> = expected.iter().map(|(n, _)| *n).collect();
            return Err(ApiError::validation(format!(
                "Report `{self}` expects {} parameter(s): [{}]",
                expected.len(),
                names.join(", ")
            )));
        }

        expected
            .iter()
            .zip(params)
            .map(|((name, kind), value)| convert(name, *kind, value))
            .collect()
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ReportRequest {
    /// Report name, e.g. `attendance_on_date`
    #[schema(example = "attendance_on_date")]
    pub query: Option<String>,
    /// Positional parameters
    #[schema(value_type = Option<Vec<Object>>, example = json!(["2026-01-05"]))]
    pub params: Option<Vec<Value>>,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct DirectoryEntry {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub position: String,
    #[schema(format = "date", value_type = String)]
    pub joining_date: NaiveDate,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AttendanceEntry {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: String,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct AttendanceTally {
    pub employee_id: u64,
    pub employee_name: String,
    pub status: String,
    pub days: i64,
}

#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct TaskEntry {
    pub id: u64,
    pub employee_id: u64,
    pub employee_name: String,
    pub title: String,
    pub status: String,
    #[schema(format = "date", value_type = String)]
    pub due_date: NaiveDate,
}

async fn fetch<T>(pool: &MySqlPool, report: Report, values: Vec<SqlValue>) -> Result<HttpResponse, ApiError>
where
    T: for<'r> FromRow<'r, MySqlRow> + Serialize + Send + Unpin,
{
    let rows = sqlx::query_as_with::<_, T, _>(report.sql(), to_arguments(values))
        .fetch_all(pool)
        .await?;

    debug!(report = %report, rows = rows.len(), "Report fetched");

    Ok(HttpResponse::Ok().json(rows))
}

/// Run a named report
#[utoipa::path(
    post,
    path = "/query",
    request_body = ReportRequest,
    responses(
        (status = 200, description = "Report rows", body = Object),
        (status = 400, description = "Unknown report or bad parameters", body = Object, example = json!({
            "error": "Unknown report: drop_everything"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Report"
)]
pub async fn run_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<ReportRequest>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();

    let name = payload
        .query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::validation("Query is required"))?;

    let report = Report::from_str(name)
        .map_err(|_| ApiError::validation(format!("Unknown report: {name}")))?;

    let values = report.bind_params(payload.params.as_deref().unwrap_or_default())?;

    info!(admin_id = auth.admin_id, report = %report, "Running report");

    let pool = pool.get_ref();
    match report {
        Report::EmployeeDirectory => fetch::<DirectoryEntry>(pool, report, values).await,
        Report::AttendanceOnDate => fetch::<AttendanceEntry>(pool, report, values).await,
        Report::AttendanceSummary => fetch::<AttendanceTally>(pool, report, values).await,
        Report::TasksByStatus | Report::OverdueTasks => {
            fetch::<TaskEntry>(pool, report, values).await
        }
        Report::ExpiringCertificates => fetch::<Certificate>(pool, report, values).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strum::IntoEnumIterator;

    #[test]
    fn names_are_snake_case() {
        assert_eq!(
            Report::from_str("attendance_summary").unwrap(),
            Report::AttendanceSummary
        );
        assert_eq!(Report::ExpiringCertificates.to_string(), "expiring_certificates");
        assert!(Report::from_str("SELECT * FROM admins").is_err());
    }

    #[test]
    fn placeholders_match_declared_params() {
        for report in Report::iter() {
            assert_eq!(
                report.sql().matches('?').count(),
                report.params().len(),
                "{report}"
            );
        }
    }

    #[test]
    fn binds_typed_params() {
        let values = Report::AttendanceSummary
            .bind_params(&[json!("2026-01-01"), json!("2026-01-31")])
            .unwrap();
        assert_eq!(
            values,
            vec![
                SqlValue::Date(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()),
                SqlValue::Date(NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()),
            ]
        );
    }

    #[test]
    fn rejects_wrong_arity_and_kind() {
        let err = Report::OverdueTasks.bind_params(&[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Report `overdue_tasks` expects 1 parameter(s): [as_of]"
        );

        assert!(Report::AttendanceOnDate.bind_params(&[json!("yesterday")]).is_err());
        assert!(Report::EmployeeDirectory.bind_params(&[json!(1)]).is_err());
    }
}
