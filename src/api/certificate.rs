use crate::{
    model::certificate::Certificate,
    resource::{Field, Resource, Schema},
    utils::db_utils::FieldKind,
};

pub struct Certificates;

impl Resource for Certificates {
    const SCHEMA: Schema = Schema {
        path: "certificates",
        table: "certificates",
        label: "Certificate",
        tag: "Certificate",
        columns: &["id", "name", "start_date", "end_date", "type", "created_at"],
        fields: &[
            Field::new("name", FieldKind::Text),
            Field::new("start_date", FieldKind::Date),
            Field::new("end_date", FieldKind::Date),
            Field::new("type", FieldKind::Text),
        ],
        join: None,
    };

    type Row = Certificate;
    type Detail = Certificate;
}
