//! Axum handlers for `/api/*` routes.
//!
//! Each handler receives [`ApiState`] via [`axum::extract::State`], calls
//! one store operation and maps the result to JSON.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{ApiState, error::ApiError};
use crate::store::{
    CONTACT_FIELDS_REQUIRED, NewContact, NewTeamMember, TEAM_FIELDS_REQUIRED,
    model::{ContactList, Initiative, Program, Stats, TeamMember},
};

type ApiResult<T> = Result<T, ApiError>;

/// Decode a JSON body by field name.
///
/// Anything but an object (array, string, number, null) has no named fields
/// and fails with the same message as a body missing every required field.
fn object_body<T: DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
    required: &str,
) -> ApiResult<T> {
    let Json(value) = body?;
    if !value.is_object() {
        return Err(ApiError::Validation(required.to_string()));
    }
    serde_json::from_value(value).map_err(|e| ApiError::Validation(e.to_string()))
}

/// GET /api/health
pub(super) async fn health() -> Response {
    Json(json!({
        "status": "Backend is running!",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
    .into_response()
}

/// GET /api/team
pub(super) async fn list_team(State(state): State<ApiState>) -> ApiResult<Json<Vec<TeamMember>>> {
    Ok(Json(state.store.list_team()?))
}

/// GET /api/team/{id}
pub(super) async fn get_team(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<TeamMember>> {
    Ok(Json(state.store.get_team(&id)?))
}

/// POST /api/team
pub(super) async fn create_team(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let input: NewTeamMember = object_body(body, TEAM_FIELDS_REQUIRED)?;
    let member = state.store.create_team(input)?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// GET /api/programs
pub(super) async fn list_programs(State(state): State<ApiState>) -> ApiResult<Json<Vec<Program>>> {
    Ok(Json(state.store.list_programs()?))
}

/// GET /api/initiatives?category=
///
/// Never fails on the query shape. An empty or absent `category` is no
/// filter; a repeated `category` matches nothing.
pub(super) async fn list_initiatives(
    State(state): State<ApiState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<Json<Vec<Initiative>>> {
    let pairs = query.map(|Query(p)| p).unwrap_or_default();
    let mut categories = pairs
        .iter()
        .filter(|(key, _)| key == "category")
        .map(|(_, value)| value.as_str());

    match (categories.next(), categories.next()) {
        (Some(_), Some(_)) => Ok(Json(Vec::new())),
        (first, _) => {
            let category = first.filter(|c| !c.is_empty());
            Ok(Json(state.store.list_initiatives(category)?))
        }
    }
}

/// POST /api/contact
///
/// The log append is blocking file I/O, so the store call runs on the
/// blocking pool.
pub(super) async fn submit_contact(
    State(state): State<ApiState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let input: NewContact = object_body(body, CONTACT_FIELDS_REQUIRED)?;
    let store = state.store.clone();
    let contact = tokio::task::spawn_blocking(move || store.submit_contact(input))
        .await
        .map_err(|e| ApiError::Internal(format!("contact task failed: {e}")))??;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Contact form submitted successfully",
            "contactId": contact.id,
        })),
    ))
}

/// GET /api/admin/contacts
pub(super) async fn list_contacts(State(state): State<ApiState>) -> ApiResult<Json<ContactList>> {
    Ok(Json(state.store.list_contacts()?))
}

/// DELETE /api/admin/contacts/{id}
pub(super) async fn delete_contact(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let deleted = state.store.delete_contact(&id)?;
    Ok(Json(json!({ "success": true, "deleted": deleted })))
}

/// GET /api/stats
pub(super) async fn stats(State(state): State<ApiState>) -> ApiResult<Json<Stats>> {
    Ok(Json(state.store.stats()?))
}

/// Router fallback for unmatched paths.
pub(super) async fn not_found(uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "Endpoint not found", "path": uri.path() })),
    )
        .into_response()
}
