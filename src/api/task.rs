use crate::{
    model::task::{Task, TaskDetail},
    resource::{Field, Join, Resource, Schema},
    utils::db_utils::FieldKind,
};

pub struct Tasks;

impl Resource for Tasks {
    const SCHEMA: Schema = Schema {
        path: "tasks",
        table: "tasks",
        label: "Task",
        tag: "Task",
        columns: &[
            "id",
            "employee_id",
            "title",
            "description",
            "status",
            "due_date",
            "created_at",
        ],
        fields: &[
            Field::new("employee_id", FieldKind::Reference),
            Field::new("title", FieldKind::Text),
            Field::new("description", FieldKind::Text),
            Field::new("status", FieldKind::Text),
            Field::new("due_date", FieldKind::Date),
        ],
        join: Some(Join {
            table: "employees",
            foreign_key: "employee_id",
            column: "name",
            alias: "employee_name",
        }),
    };

    type Row = Task;
    type Detail = TaskDetail;
}
