pub mod admin;
pub mod attendance;
pub mod certificate;
pub mod employee;
pub mod report;
pub mod task;

use std::sync::Arc;

use actix_web::web;

use crate::{
    resource::{self, Resource, Schema},
    routes::Limiter,
};

pub use admin::Admins;
pub use attendance::AttendanceRecords;
pub use certificate::Certificates;
pub use employee::Employees;
pub use task::Tasks;

/// Mounts the CRUD endpoints of every table.
pub fn configure_resources(cfg: &mut web::ServiceConfig, limiter: &Arc<Limiter>) {
    resource::register::<Admins>(cfg, limiter);
    resource::register::<Employees>(cfg, limiter);
    resource::register::<AttendanceRecords>(cfg, limiter);
    resource::register::<Certificates>(cfg, limiter);
    resource::register::<Tasks>(cfg, limiter);
}

/// Descriptors of every mounted table, in registration order.
pub fn schemas() -> Vec<Schema> {
    vec![
        Admins::SCHEMA,
        Employees::SCHEMA,
        AttendanceRecords::SCHEMA,
        Certificates::SCHEMA,
        Tasks::SCHEMA,
    ]
}
