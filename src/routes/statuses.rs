use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_id, parse_number, to_iso};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::models::{ApplicationStatus, NewApplicationStatus};
use crate::pagination::{self, clamp_page, clamp_page_size, ListResponse};
use crate::schema::application_status;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStatusRequest {
    pub status: String,
    pub user_id: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: i64,
    pub application_id: i64,
    pub user_id: i64,
    pub status: String,
    pub created_at: String,
}

impl From<ApplicationStatus> for StatusResponse {
    fn from(status: ApplicationStatus) -> Self {
        Self {
            id: status.id,
            application_id: status.application_id,
            user_id: status.user_id,
            status: status.status,
            created_at: to_iso(status.created_at),
        }
    }
}

/// Appends a status row. The application id is not checked for existence.
pub async fn add_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<AddStatusRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let application_id = parse_id(&id);
    if payload.status.is_empty() {
        return Err(AppError::bad_request("status is required"));
    }
    if payload.user_id == 0 {
        return Err(AppError::bad_request("userId is required"));
    }

    let new_status = NewApplicationStatus {
        application_id,
        user_id: payload.user_id,
        status: payload.status,
    };

    let mut conn = state.db()?;
    diesel::insert_into(application_status::table)
        .values(&new_status)
        .execute(&mut conn)?;

    Ok((StatusCode::CREATED, Json(json!({ "message": "status added" }))))
}

pub async fn list_statuses(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<StatusListQuery>,
) -> AppResult<Json<ListResponse<StatusResponse>>> {
    let application_id = parse_id(&id);
    let page = clamp_page(parse_number(params.page.as_deref()));
    let page_size = clamp_page_size(parse_number(params.page_size.as_deref()));

    let mut conn = state.db()?;

    let total: i64 = application_status::table
        .filter(application_status::application_id.eq(application_id))
        .count()
        .get_result(&mut conn)?;

    let rows: Vec<ApplicationStatus> = application_status::table
        .filter(application_status::application_id.eq(application_id))
        .order(application_status::created_at.desc())
        .offset(pagination::offset(page, page_size))
        .limit(page_size)
        .load(&mut conn)?;

    let data = rows.into_iter().map(StatusResponse::from).collect();
    Ok(Json(ListResponse::new(data, page, page_size, total)))
}
