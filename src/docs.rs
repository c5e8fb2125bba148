use crate::api::report::{
    AttendanceEntry, AttendanceTally, DirectoryEntry, ReportRequest, TaskEntry,
};
use crate::api::schemas;
use crate::model::{
    admin::Admin,
    attendance::{Attendance, AttendanceDetail},
    certificate::Certificate,
    employee::Employee,
    task::{Task, TaskDetail},
};
use crate::models::{LoginReqDto, LoginResponse};
use crate::resource::{Field, Schema, Write};
use utoipa::openapi::path::{
    OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemType,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme};
use utoipa::openapi::{Required, Response};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Admin API",
        version = "1.0.0",
        description = r#"
## HRM admin gateway

Authenticated CRUD over admins, employees, attendance, certificates and tasks,
plus a catalog of read-only reports.

### Security
Every endpoint except `/auth/login` requires `Authorization: Bearer <token>`.
Tokens are issued by `/auth/login` and expire after one hour.

### Response format
- JSON bodies; errors are `{ "error": "<message>" }`
- `DELETE` answers `204 No Content`
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::api::report::run_report,
    ),
    components(
        schemas(
            LoginReqDto,
            LoginResponse,
            ReportRequest,
            DirectoryEntry,
            AttendanceEntry,
            AttendanceTally,
            TaskEntry,
            Admin,
            Employee,
            Attendance,
            AttendanceDetail,
            Certificate,
            Task,
            TaskDetail
        )
    ),
    modifiers(&SecurityAddon, &ResourcePaths),
    tags(
        (name = "Auth", description = "Login"),
        (name = "Admin", description = "Admin accounts"),
        (name = "Employee", description = "Employee records"),
        (name = "Attendance", description = "Attendance records"),
        (name = "Certificate", description = "Certificates"),
        (name = "Task", description = "Employee tasks"),
        (name = "Report", description = "Predefined reports"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

/// The CRUD handlers are generic, so their paths are described from the
/// same descriptors that mount them.
struct ResourcePaths;

fn operation(schema: &Schema, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(schema.tag)
        .summary(Some(summary))
        .security(SecurityRequirement::new("bearer_auth", Vec::<String>::new()))
        .response("401", Response::new("Unauthorized"))
        .response("500", Response::new("Internal server error"))
}

fn describe<'a>(fields: impl Iterator<Item = &'a Field>) -> String {
    fields
        .map(|f| format!("`{}` ({})", f.name, f.kind.openapi_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn with_body(builder: OperationBuilder, schema: &Schema, write: Write) -> OperationBuilder {
    let mut description = format!("Required fields: {}", describe(schema.required_fields(write)));

    let optional = describe(schema.optional_fields(write));
    if !optional.is_empty() {
        description.push_str(&format!(". Optional fields: {optional}"));
    }

    builder
        .description(Some(description))
        .response("400", Response::new("Missing or invalid field"))
}

fn with_id(builder: OperationBuilder, schema: &Schema) -> OperationBuilder {
    builder
        .parameter(
            ParameterBuilder::new()
                .name("id")
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .description(Some(format!("{} id", schema.label))),
        )
        .response("404", Response::new(format!("{} not found", schema.label)))
}

impl Modify for ResourcePaths {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        for schema in schemas() {
            let label = schema.label;

            let mut collection = PathItem::new(
                PathItemType::Get,
                operation(&schema, format!("List {label} rows, newest first"))
                    .response("200", Response::new("All rows")),
            );
            collection.operations.insert(
                PathItemType::Post,
                with_body(operation(&schema, format!("Create {label}")), &schema, Write::Create)
                    .response("201", Response::new("Created row"))
                    .build(),
            );

            let mut item = PathItem::new(
                PathItemType::Get,
                with_id(operation(&schema, format!("Get {label}")), &schema)
                    .response("200", Response::new("Row")),
            );
            item.operations.insert(
                PathItemType::Put,
                with_id(
                    with_body(operation(&schema, format!("Replace {label}")), &schema, Write::Replace),
                    &schema,
                )
                .response("200", Response::new("Updated row"))
                .build(),
            );
            item.operations.insert(
                PathItemType::Delete,
                with_id(operation(&schema, format!("Delete {label}")), &schema)
                    .response("204", Response::new("Deleted"))
                    .build(),
            );

            openapi.paths.paths.insert(schema.collection_path(), collection);
            openapi.paths.paths.insert(schema.item_path(), item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource_path() {
        let doc = ApiDoc::openapi();

        for schema in schemas() {
            let item = doc
                .paths
                .paths
                .get(&schema.item_path())
                .unwrap_or_else(|| panic!("missing {}", schema.item_path()));
            assert_eq!(item.operations.len(), 3);
            assert!(doc.paths.paths.contains_key(&schema.collection_path()));
        }

        assert!(doc.paths.paths.contains_key("/auth/login"));
        assert!(doc.paths.paths.contains_key("/query"));
    }

    #[test]
    fn admin_password_is_optional_on_update() {
        let doc = ApiDoc::openapi();
        let description = |path: &str, method: PathItemType| {
            doc.paths.paths[path].operations[&method]
                .description
                .clone()
                .unwrap_or_default()
        };

        assert_eq!(
            description("/admins", PathItemType::Post),
            "Required fields: `email` (string), `password` (string)"
        );
        assert_eq!(
            description("/admins/{id}", PathItemType::Put),
            "Required fields: `email` (string). Optional fields: `password` (string)"
        );
    }
}
