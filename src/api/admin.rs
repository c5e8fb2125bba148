use serde_json::Value;
use tracing::error;

use crate::{
    auth::password::hash_password,
    error::ApiError,
    model::admin::Admin,
    resource::{Field, Resource, Schema, Write},
    utils::db_utils::{Assignment, FieldKind, SqlValue, as_object, convert, supplied},
};

pub struct Admins;

impl Resource for Admins {
    const SCHEMA: Schema = Schema {
        path: "admins",
        table: "admins",
        label: "Admin",
        tag: "Admin",
        columns: &["id", "email", "created_at"],
        fields: &[
            Field::new("email", FieldKind::Text),
            Field::create_only("password", FieldKind::Text),
        ],
        join: None,
    };

    type Row = Admin;
    type Detail = Admin;

    /// Email is always required. The password is required on create, optional
    /// on update, and only ever stored as an argon2 hash.
    fn assignments(payload: &Value, write: Write) -> Result<Vec<Assignment>, ApiError> {
        let obj = as_object(payload)?;
        let email = supplied(obj, "email");
        let password = supplied(obj, "password");

        let email = match (write, email, password) {
            (Write::Create, Some(email), Some(_)) => email,
            (Write::Create, _, _) => {
                return Err(ApiError::validation("Email and password are required"));
            }
            (Write::Replace, Some(email), _) => email,
            (Write::Replace, None, _) => return Err(ApiError::validation("Email is required")),
        };

        let mut assignments = vec![("email", convert("email", FieldKind::Text, email)?)];

        if let Some(password) = password {
            let password = password
                .as_str()
                .ok_or_else(|| ApiError::validation("Field `password` must be a string"))?;

            let hashed = hash_password(password).map_err(|e| {
                error!(error = %e, "Failed to hash password");
                ApiError::Internal
            })?;
            assignments.push(("password_hash", SqlValue::String(hashed)));
        }

        Ok(assignments)
    }
}
