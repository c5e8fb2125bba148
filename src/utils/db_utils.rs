use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::{
    Arguments, Executor, MySql,
    mysql::{MySqlArguments, MySqlQueryResult},
};

use crate::error::ApiError;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    F64(f64),
    Date(NaiveDate),
}

/// How a JSON input value is interpreted before binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// `YYYY-MM-DD`
    Date,
    Number,
    /// Positive integer id of another row.
    Reference,
}

impl FieldKind {
    pub fn openapi_type(&self) -> &'static str {
        match self {
            FieldKind::Text | FieldKind::Date => "string",
            FieldKind::Number => "number",
            FieldKind::Reference => "integer",
        }
    }
}

/// Absent, `null` and blank strings all count as "not supplied".
pub fn supplied<'a>(obj: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    match obj.get(name) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

pub fn as_object(payload: &Value) -> Result<&Map<String, Value>, ApiError> {
    payload
        .as_object()
        .ok_or_else(|| ApiError::validation("Payload must be a JSON object"))
}

/// Convert one supplied JSON value into a typed bind value.
pub fn convert(name: &str, kind: FieldKind, value: &Value) -> Result<SqlValue, ApiError> {
    match (kind, value) {
        (FieldKind::Text, Value::String(s)) => Ok(SqlValue::String(s.trim().to_string())),
        (FieldKind::Text, _) => Err(ApiError::validation(format!(
            "Field `{name}` must be a string"
        ))),

        (FieldKind::Date, Value::String(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(SqlValue::Date)
            .map_err(|_| {
                ApiError::validation(format!("Field `{name}` must be a date (YYYY-MM-DD)"))
            }),
        (FieldKind::Date, _) => Err(ApiError::validation(format!(
            "Field `{name}` must be a date (YYYY-MM-DD)"
        ))),

        (FieldKind::Number, Value::Number(n)) => n
            .as_f64()
            .map(SqlValue::F64)
            .ok_or_else(|| ApiError::validation(format!("Field `{name}` must be a number"))),
        (FieldKind::Number, Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(SqlValue::F64)
            .ok_or_else(|| ApiError::validation(format!("Field `{name}` must be a number"))),
        (FieldKind::Number, _) => Err(ApiError::validation(format!(
            "Field `{name}` must be a number"
        ))),

        (FieldKind::Reference, Value::Number(n)) => n
            .as_u64()
            .filter(|id| *id > 0)
            .map(SqlValue::U64)
            .ok_or_else(|| ApiError::validation(format!("Field `{name}` must be a valid id"))),
        (FieldKind::Reference, Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|id| *id > 0)
            .map(SqlValue::U64)
            .ok_or_else(|| ApiError::validation(format!("Field `{name}` must be a valid id"))),
        (FieldKind::Reference, _) => Err(ApiError::validation(format!(
            "Field `{name}` must be a valid id"
        ))),
    }
}

/// ===============================
/// SQL statement container
/// ===============================
#[derive(Debug)]
pub struct SqlStatement {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

pub type Assignment = (&'static str, SqlValue);

pub fn quote(ident: &str) -> String {
    format!("`{ident}`")
}

/// INSERT INTO t (`a`, `b`) VALUES (?, ?)
pub fn build_insert_sql(table: &str, assignments: Vec<Assignment>) -> SqlStatement {
    let columns = assignments
        .iter()
        .map(|(col, _)| quote(col))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; assignments.len()].join(", ");

    SqlStatement {
        sql: format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})"),
        values: assignments.into_iter().map(|(_, v)| v).collect(),
    }
}

/// UPDATE t SET `a` = ?, `b` = ? WHERE `id` = ?
pub fn build_update_sql(table: &str, assignments: Vec<Assignment>, id: u64) -> SqlStatement {
    let set_clause = assignments
        .iter()
        .map(|(col, _)| format!("{} = ?", quote(col)))
        .collect::<Vec<_>>()
        .join(", ");

    let mut values: Vec<SqlValue> = assignments.into_iter().map(|(_, v)| v).collect();
    values.push(SqlValue::U64(id));

    SqlStatement {
        sql: format!("UPDATE {table} SET {set_clause} WHERE `id` = ?"),
        values,
    }
}

pub fn to_arguments(values: Vec<SqlValue>) -> MySqlArguments {
    let mut args = MySqlArguments::default();

    for value in values {
        match value {
            SqlValue::String(v) => args.add(v),
            SqlValue::U64(v) => args.add(v),
            SqlValue::F64(v) => args.add(v),
            SqlValue::Date(v) => args.add(v),
        }
    }

    args
}

/// ===============================
/// Execute a write statement
/// ===============================
pub async fn execute<'q, E>(
    executor: E,
    statement: &'q SqlStatement,
) -> Result<MySqlQueryResult, sqlx::Error>
where
    E: Executor<'q, Database = MySql>,
{
    let args = to_arguments(statement.values.clone());
    sqlx::query_with(&statement.sql, args).execute(executor).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_and_null_are_not_supplied() {
        let body = json!({ "name": "  ", "email": null, "position": "Engineer" });
        let obj = body.as_object().unwrap();

        assert!(supplied(obj, "name").is_none());
        assert!(supplied(obj, "email").is_none());
        assert!(supplied(obj, "salary").is_none());
        assert_eq!(supplied(obj, "position"), Some(&json!("Engineer")));
    }

    #[test]
    fn converts_by_kind() {
        assert_eq!(
            convert("joining_date", FieldKind::Date, &json!("2024-03-01")).unwrap(),
            SqlValue::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(
            convert("salary", FieldKind::Number, &json!("4200.50")).unwrap(),
            SqlValue::F64(4200.5)
        );
        assert_eq!(
            convert("employee_id", FieldKind::Reference, &json!(7)).unwrap(),
            SqlValue::U64(7)
        );
        assert_eq!(
            convert("name", FieldKind::Text, &json!(" Jane ")).unwrap(),
            SqlValue::String("Jane".into())
        );
    }

    #[test]
    fn rejects_wrong_kinds() {
        let err = convert("due_date", FieldKind::Date, &json!("01/02/2024")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Field `due_date` must be a date (YYYY-MM-DD)"
        );

        assert!(convert("employee_id", FieldKind::Reference, &json!(0)).is_err());
        assert!(convert("employee_id", FieldKind::Reference, &json!(-3)).is_err());
        assert!(convert("salary", FieldKind::Number, &json!("lots")).is_err());
        assert!(convert("name", FieldKind::Text, &json!(42)).is_err());
    }

    #[test]
    fn builds_insert_and_update() {
        let insert = build_insert_sql(
            "certificates",
            vec![
                ("name", SqlValue::String("First aid".into())),
                ("type", SqlValue::String("safety".into())),
            ],
        );
        assert_eq!(
            insert.sql,
            "INSERT INTO certificates (`name`, `type`) VALUES (?, ?)"
        );
        assert_eq!(insert.values.len(), 2);

        let update = build_update_sql(
            "tasks",
            vec![("status", SqlValue::String("done".into()))],
            12,
        );
        assert_eq!(update.sql, "UPDATE tasks SET `status` = ? WHERE `id` = ?");
        assert_eq!(update.values.last(), Some(&SqlValue::U64(12)));
    }
}
