use actix_web::{HttpResponse, web};
use serde_json::Value;
use sqlx::MySqlPool;
use tracing::{debug, info};

use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    resource::{Resource, Write},
    utils::db_utils::{build_insert_sql, build_update_sql, execute},
};

pub async fn list<R: Resource>(pool: web::Data<MySqlPool>) -> Result<HttpResponse, ApiError> {
    let sql = R::SCHEMA.list_sql();
    debug!(sql = %sql, "Listing {}", R::SCHEMA.table);

    let rows = sqlx::query_as::<_, R::Row>(&sql)
        .fetch_all(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(rows))
}

pub async fn create<R: Resource>(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let schema = R::SCHEMA;
    let assignments = R::assignments(&payload, Write::Create)?;
    let insert = build_insert_sql(schema.table, assignments);

    let mut tx = pool.begin().await?;

    let id = execute(&mut *tx, &insert).await?.last_insert_id();

    let row = sqlx::query_as::<_, R::Row>(&schema.row_sql())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(admin_id = auth.admin_id, table = schema.table, id, "Record created");

    Ok(HttpResponse::Created().json(row))
}

pub async fn get<R: Resource>(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let row = sqlx::query_as::<_, R::Detail>(&R::SCHEMA.detail_sql())
        .bind(id)
        .fetch_optional(pool.get_ref())
        .await?;

    match row {
        Some(row) => Ok(HttpResponse::Ok().json(row)),
        None => Err(ApiError::NotFound(R::SCHEMA.label)),
    }
}

/// Full-row update. The read-back runs in the same transaction so an
/// unchanged row still counts as found.
pub async fn replace<R: Resource>(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, ApiError> {
    let schema = R::SCHEMA;
    let id = path.into_inner();

    let assignments = R::assignments(&payload, Write::Replace)?;
    let update = build_update_sql(schema.table, assignments, id);

    let mut tx = pool.begin().await?;

    execute(&mut *tx, &update).await?;

    let row = sqlx::query_as::<_, R::Row>(&schema.row_sql())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = row else {
        tx.rollback().await?;
        return Err(ApiError::NotFound(schema.label));
    };

    tx.commit().await?;

    info!(admin_id = auth.admin_id, table = schema.table, id, "Record updated");

    Ok(HttpResponse::Ok().json(row))
}

pub async fn delete<R: Resource>(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let schema = R::SCHEMA;
    let id = path.into_inner();

    let result = sqlx::query(&schema.delete_sql())
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound(schema.label));
    }

    info!(admin_id = auth.admin_id, table = schema.table, id, "Record deleted");

    Ok(HttpResponse::NoContent().finish())
}

pub async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}
