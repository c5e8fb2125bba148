use serde_json::Value;
use tracing::debug;

use super::Write;
use crate::{
    error::ApiError,
    utils::db_utils::{Assignment, FieldKind, as_object, convert, quote, supplied},
};

/// A writable column.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Required on create only; a full update may leave it out.
    pub create_only: bool,
}

impl Field {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Field { name, kind, create_only: false }
    }

    pub const fn create_only(name: &'static str, kind: FieldKind) -> Self {
        Field { name, kind, create_only: true }
    }

    pub fn required_for(&self, write: Write) -> bool {
        write == Write::Create || !self.create_only
    }
}

/// Single-column lookup into another table, exposed under `alias`.
#[derive(Debug, Clone, Copy)]
pub struct Join {
    pub table: &'static str,
    pub foreign_key: &'static str,
    pub column: &'static str,
    pub alias: &'static str,
}

/// Everything the generic handlers need to know about one table.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// URL segment, e.g. `employees` for `/employees/{id}`.
    pub path: &'static str,
    pub table: &'static str,
    /// Used in messages: "{label} not found".
    pub label: &'static str,
    pub tag: &'static str,
    /// Columns returned to clients, in order.
    pub columns: &'static [&'static str],
    pub fields: &'static [Field],
    pub join: Option<Join>,
}

const ROW_ALIAS: &str = "r";
const JOIN_ALIAS: &str = "j";

impl Schema {
    pub fn collection_path(&self) -> String {
        format!("/{}", self.path)
    }

    pub fn item_path(&self) -> String {
        format!("/{}/{{id}}", self.path)
    }

    fn projection(&self, alias: Option<&str>) -> String {
        self.columns
            .iter()
            .map(|c| match alias {
                Some(a) => format!("{a}.{}", quote(c)),
                None => quote(c),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn list_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} ORDER BY `created_at` DESC, `id` DESC",
            self.projection(None),
            self.table
        )
    }

    pub fn row_sql(&self) -> String {
        format!(
            "SELECT {} FROM {} WHERE `id` = ?",
            self.projection(None),
            self.table
        )
    }

    /// Single-row read, enriched with the joined column when the table has one.
    pub fn detail_sql(&self) -> String {
        match &self.join {
            None => self.row_sql(),
            Some(join) => format!(
                "SELECT {}, {JOIN_ALIAS}.{} AS {} FROM {} {ROW_ALIAS} JOIN {} {JOIN_ALIAS} ON {ROW_ALIAS}.{} = {JOIN_ALIAS}.`id` WHERE {ROW_ALIAS}.`id` = ?",
                self.projection(Some(ROW_ALIAS)),
                quote(join.column),
                quote(join.alias),
                self.table,
                join.table,
                quote(join.foreign_key),
            ),
        }
    }

    pub fn delete_sql(&self) -> String {
        format!("DELETE FROM {} WHERE `id` = ?", self.table)
    }

    pub fn required_fields(&self, write: Write) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(move |f| f.required_for(write))
    }

    pub fn optional_fields(&self, write: Write) -> impl Iterator<Item = &Field> + '_ {
        self.fields.iter().filter(move |f| !f.required_for(write))
    }

    /// Checks that every required field is supplied and every supplied field is
    /// well-typed, then returns the column/value pairs in declaration order.
    /// Nothing is written when this fails.
    pub fn assignments(&self, payload: &Value, write: Write) -> Result<Vec<Assignment>, ApiError> {
        let obj = as_object(payload)?;

        let missing: Vec<&str> = self
            .required_fields(write)
            .filter(|f| supplied(obj, f.name).is_none())
            .map(|f| f.name)
            .collect();

        if !missing.is_empty() {
            debug!(table = self.table, ?missing, "Required fields missing");
            return Err(ApiError::validation("All fields are required"));
        }

        self.fields
            .iter()
            .filter_map(|f| supplied(obj, f.name).map(|value| (f, value)))
            .map(|(f, value)| convert(f.name, f.kind, value).map(|v| (f.name, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::db_utils::SqlValue;
    use serde_json::json;

    const TASKS: Schema = Schema {
        path: "tasks",
        table: "tasks",
        label: "Task",
        tag: "Tasks",
        columns: &["id", "employee_id", "title", "created_at"],
        fields: &[
            Field::new("employee_id", FieldKind::Reference),
            Field::new("title", FieldKind::Text),
        ],
        join: Some(Join {
            table: "employees",
            foreign_key: "employee_id",
            column: "name",
            alias: "employee_name",
        }),
    };

    #[test]
    fn builds_read_statements() {
        assert_eq!(TASKS.collection_path(), "/tasks");
        assert_eq!(TASKS.item_path(), "/tasks/{id}");
        assert_eq!(
            TASKS.list_sql(),
            "SELECT `id`, `employee_id`, `title`, `created_at` FROM tasks ORDER BY `created_at` DESC, `id` DESC"
        );
        assert_eq!(
            TASKS.row_sql(),
            "SELECT `id`, `employee_id`, `title`, `created_at` FROM tasks WHERE `id` = ?"
        );
        assert_eq!(TASKS.delete_sql(), "DELETE FROM tasks WHERE `id` = ?");
    }

    #[test]
    fn detail_joins_employee_name() {
        assert_eq!(
            TASKS.detail_sql(),
            "SELECT r.`id`, r.`employee_id`, r.`title`, r.`created_at`, j.`name` AS `employee_name` \
             FROM tasks r JOIN employees j ON r.`employee_id` = j.`id` WHERE r.`id` = ?"
        );

        let plain = Schema { join: None, ..TASKS };
        assert_eq!(plain.detail_sql(), plain.row_sql());
    }

    #[test]
    fn assignments_follow_field_order() {
        let body = json!({ "title": "Quarterly review", "employee_id": "4", "extra": true });
        let assignments = TASKS.assignments(&body, Write::Create).unwrap();

        assert_eq!(
            assignments,
            vec![
                ("employee_id", SqlValue::U64(4)),
                ("title", SqlValue::String("Quarterly review".into())),
            ]
        );
    }

    #[test]
    fn any_missing_field_is_rejected() {
        let err = TASKS
            .assignments(&json!({ "title": "Quarterly review" }), Write::Replace)
            .unwrap_err();
        assert_eq!(err, ApiError::validation("All fields are required"));

        let err = TASKS
            .assignments(&json!({ "title": "", "employee_id": 4 }), Write::Create)
            .unwrap_err();
        assert_eq!(err, ApiError::validation("All fields are required"));
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(TASKS.assignments(&json!(["title"]), Write::Create).is_err());
    }

    #[test]
    fn create_only_fields_may_be_left_out_of_updates() {
        const ACCOUNTS: Schema = Schema {
            path: "accounts",
            table: "accounts",
            label: "Account",
            tag: "Account",
            columns: &["id", "email", "created_at"],
            fields: &[
                Field::new("email", FieldKind::Text),
                Field::create_only("pin", FieldKind::Text),
            ],
            join: None,
        };

        let body = json!({ "email": "a@b.co" });
        let err = ACCOUNTS.assignments(&body, Write::Create).unwrap_err();
        assert_eq!(err, ApiError::validation("All fields are required"));

        let assignments = ACCOUNTS.assignments(&body, Write::Replace).unwrap();
        assert_eq!(assignments, vec![("email", SqlValue::String("a@b.co".into()))]);

        let required: Vec<&str> = ACCOUNTS.required_fields(Write::Replace).map(|f| f.name).collect();
        let optional: Vec<&str> = ACCOUNTS.optional_fields(Write::Replace).map(|f| f.name).collect();
        assert_eq!(required, ["email"]);
        assert_eq!(optional, ["pin"]);
    }
}
