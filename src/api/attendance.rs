use crate::{
    model::attendance::{Attendance, AttendanceDetail},
    resource::{Field, Join, Resource, Schema},
    utils::db_utils::FieldKind,
};

pub struct AttendanceRecords;

impl Resource for AttendanceRecords {
    const SCHEMA: Schema = Schema {
        path: "attendance",
        table: "attendance",
        label: "Attendance record",
        tag: "Attendance",
        columns: &["id", "employee_id", "date", "status", "created_at"],
        fields: &[
            Field::new("employee_id", FieldKind::Reference),
            Field::new("date", FieldKind::Date),
            Field::new("status", FieldKind::Text),
        ],
        join: Some(Join {
            table: "employees",
            foreign_key: "employee_id",
            column: "name",
            alias: "employee_name",
        }),
    };

    type Row = Attendance;
    type Detail = AttendanceDetail;
}
