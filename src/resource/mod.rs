//! Generic CRUD over one table.
//!
//! A table is exposed by implementing [`Resource`] (a [`Schema`] plus the row
//! types) and calling [`register`]. Every resource gets the same two endpoint
//! shapes, the same auth gate, rate limit and error mapping.

pub mod handlers;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::from_fn, web};
use serde::Serialize;
use serde_json::Value;
use sqlx::{FromRow, mysql::MySqlRow};
use tracing::debug;

use crate::{
    auth::middleware::auth_middleware,
    cors::{self, CorsPolicy},
    error::ApiError,
    routes::Limiter,
    utils::db_utils::Assignment,
};

pub use schema::{Field, Join, Schema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    Create,
    Replace,
}

pub trait Resource: 'static {
    const SCHEMA: Schema;

    /// Row as returned by list, create and update.
    type Row: for<'r> FromRow<'r, MySqlRow> + Serialize + Send + Unpin;

    /// Row as returned by a single GET; includes joined columns.
    type Detail: for<'r> FromRow<'r, MySqlRow> + Serialize + Send + Unpin;

    /// Validated column/value pairs for an insert or full update.
    fn assignments(payload: &Value, write: Write) -> Result<Vec<Assignment>, ApiError> {
        Self::SCHEMA.assignments(payload, write)
    }
}

fn path_config(label: &'static str) -> web::PathConfig {
    web::PathConfig::default().error_handler(move |err, _req| {
        debug!(error = %err, "Rejected path parameter");
        ApiError::NotFound(label).into()
    })
}

/// Mounts `/{path}` and `/{path}/{id}` for `R`. Requests pass CORS first,
/// then the rate limiter, then the auth gate.
pub fn register<R: Resource>(cfg: &mut web::ServiceConfig, limiter: &Arc<Limiter>) {
    let schema = R::SCHEMA;

    cfg.service(
        web::resource(schema.collection_path())
            .route(web::get().to(handlers::list::<R>))
            .route(web::post().to(handlers::create::<R>))
            .default_service(web::to(handlers::method_not_allowed))
            .wrap(from_fn(auth_middleware))
            .wrap(limiter.clone())
            .wrap(from_fn(cors::layer(CorsPolicy::COLLECTION))),
    );

    cfg.service(
        web::resource(schema.item_path())
            .app_data(path_config(schema.label))
            .route(web::get().to(handlers::get::<R>))
            .route(web::put().to(handlers::replace::<R>))
            .route(web::delete().to(handlers::delete::<R>))
            .default_service(web::to(handlers::method_not_allowed))
            .wrap(from_fn(auth_middleware))
            .wrap(limiter.clone())
            .wrap(from_fn(cors::layer(CorsPolicy::ITEM))),
    );
}
