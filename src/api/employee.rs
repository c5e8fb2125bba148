use crate::{
    model::employee::Employee,
    resource::{Field, Resource, Schema},
    utils::db_utils::FieldKind,
};

pub struct Employees;

impl Resource for Employees {
    const SCHEMA: Schema = Schema {
        path: "employees",
        table: "employees",
        label: "Employee",
        tag: "Employee",
        columns: &[
            "id",
            "name",
            "email",
            "position",
            "joining_date",
            "salary",
            "created_at",
        ],
        fields: &[
            Field::new("name", FieldKind::Text),
            Field::new("email", FieldKind::Text),
            Field::new("position", FieldKind::Text),
            Field::new("joining_date", FieldKind::Date),
            Field::new("salary", FieldKind::Number),
        ],
        join: None,
    };

    type Row = Employee;
    type Detail = Employee;
}
