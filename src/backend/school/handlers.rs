//! Generic CRUD Handlers
//!
//! `list`, `get_one`, `create`, `update` and `delete` are instantiated once
//! per [`Resource`] when the routes are assembled:
//!
//! ```rust,ignore
//! .route("/api/classrooms", get(list::<Classrooms>).post(create::<Classrooms>))
//! ```
//!
//! Bodies are decoded into the resource shape and validated before they are
//! stored; the stored body is the normalized form. Updates merge the request
//! over the stored body and validate the result.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use super::resources::Resource;
use crate::backend::auth::users::{find_user_by_email, hash_password_field};
use crate::backend::error::{ApiResult, BackendError};
use crate::backend::store::{into_body, Filter, RecordStore};
use crate::shared::school::normalize;

/// Fields owned by the server, ignored in request bodies
const SERVER_FIELDS: [&str; 3] = ["id", "createdAt", "updatedAt"];

fn not_found<R: Resource>() -> BackendError {
    BackendError::not_found(format!("{} not found", R::LABEL))
}

/// Validate a candidate body against the resource shape
fn validated<R: Resource>(candidate: Map<String, Value>) -> ApiResult<Map<String, Value>> {
    let normalized = normalize::<R::Shape>(&Value::Object(candidate))?;
    Ok(into_body(normalized)?)
}

fn hash_password(body: &mut Map<String, Value>) -> ApiResult<()> {
    hash_password_field(body)
        .map_err(|e| BackendError::internal(format!("Failed to hash password: {}", e)))
}

/// Reject an email already used by another account
async fn ensure_email_free(
    records: &dyn RecordStore,
    body: &Map<String, Value>,
    own_id: Option<&str>,
) -> ApiResult<()> {
    let Some(email) = body.get("email").and_then(Value::as_str) else {
        return Ok(());
    };
    match find_user_by_email(records, email).await? {
        Some(existing) if Some(existing.record.id.as_str()) != own_id => {
            Err(BackendError::conflict("Email already registered"))
        }
        _ => Ok(()),
    }
}

/// `GET /api/<resource>`
pub async fn list<R: Resource>(
    State(records): State<Arc<dyn RecordStore>>,
) -> ApiResult<Json<Vec<Value>>> {
    let found = records
        .find(R::COLLECTION, Filter::All, R::list_order())
        .await?;
    Ok(Json(found.iter().map(|r| r.to_json()).collect()))
}

/// `GET /api/<resource>/{id}`
pub async fn get_one<R: Resource>(
    State(records): State<Arc<dyn RecordStore>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let record = records
        .get(R::COLLECTION, &id)
        .await?
        .ok_or_else(not_found::<R>)?;
    Ok(Json(record.to_json()))
}

/// `POST /api/<resource>`
pub async fn create<R: Resource>(
    State(records): State<Arc<dyn RecordStore>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) = body?;
    let mut candidate = into_body(body)?;
    for field in SERVER_FIELDS {
        candidate.remove(field);
    }

    let mut stored = validated::<R>(candidate)?;
    if R::IS_ACCOUNT {
        ensure_email_free(records.as_ref(), &stored, None).await?;
        hash_password(&mut stored)?;
    }

    let record = records.insert(R::COLLECTION, stored).await?;
    tracing::info!("Created {} {}", R::COLLECTION, record.id);
    Ok((StatusCode::CREATED, Json(record.to_json())))
}

/// `PUT /api/<resource>/{id}`
pub async fn update<R: Resource>(
    State(records): State<Arc<dyn RecordStore>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body?;
    let patch = into_body(body)?;
    let existing = records
        .get(R::COLLECTION, &id)
        .await?
        .ok_or_else(not_found::<R>)?;

    let new_password = patch.contains_key("password");
    let mut merged = existing.body;
    for (key, value) in patch {
        if !SERVER_FIELDS.contains(&key.as_str()) {
            merged.insert(key, value);
        }
    }

    let mut stored = validated::<R>(merged)?;
    if R::IS_ACCOUNT {
        ensure_email_free(records.as_ref(), &stored, Some(&id)).await?;
        if new_password {
            hash_password(&mut stored)?;
        }
    }

    let record = records
        .replace(R::COLLECTION, &id, stored)
        .await?
        .ok_or_else(not_found::<R>)?;
    tracing::debug!("Updated {} {}", R::COLLECTION, id);
    Ok(Json(record.to_json()))
}

/// `DELETE /api/<resource>/{id}`
pub async fn delete<R: Resource>(
    State(records): State<Arc<dyn RecordStore>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    if !records.delete(R::COLLECTION, &id).await? {
        return Err(not_found::<R>());
    }
    tracing::info!("Deleted {} {}", R::COLLECTION, id);
    Ok(Json(json!({ "message": format!("{} deleted successfully", R::LABEL) })))
}
