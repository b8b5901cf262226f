use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_id, to_iso};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::models::{ApplicationUploadedFileType, NewApplicationUploadedFileType};
use crate::schema::application_uploaded_file_type;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFileTypeRequest {
    pub file_type_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTypeResponse {
    pub id: i64,
    pub application_id: i64,
    pub file_type_name: String,
    pub created_at: String,
}

impl From<ApplicationUploadedFileType> for FileTypeResponse {
    fn from(file_type: ApplicationUploadedFileType) -> Self {
        Self {
            id: file_type.id,
            application_id: file_type.application_id,
            file_type_name: file_type.file_type_name,
            created_at: to_iso(file_type.created_at),
        }
    }
}

/// Appends a file-type row. The application id is not checked for existence.
pub async fn add_file_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<AddFileTypeRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let application_id = parse_id(&id);
    if payload.file_type_name.is_empty() {
        return Err(AppError::bad_request("fileTypeName is required"));
    }

    let new_file_type = NewApplicationUploadedFileType {
        application_id,
        file_type_name: payload.file_type_name,
    };

    let mut conn = state.db()?;
    diesel::insert_into(application_uploaded_file_type::table)
        .values(&new_file_type)
        .execute(&mut conn)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "file type added" })),
    ))
}

pub async fn list_file_types(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<FileTypeResponse>>> {
    let application_id = parse_id(&id);
    let mut conn = state.db()?;

    let rows: Vec<ApplicationUploadedFileType> = application_uploaded_file_type::table
        .filter(application_uploaded_file_type::application_id.eq(application_id))
        .load(&mut conn)?;

    Ok(Json(rows.into_iter().map(FileTypeResponse::from).collect()))
}

pub async fn delete_file_type(
    State(state): State<AppState>,
    Path((_application_id, file_type_id)): Path<(String, String)>,
) -> AppResult<Json<Value>> {
    let file_type_id = parse_id(&file_type_id);
    let mut conn = state.db()?;

    // Affected-row count is ignored: deleting an id that is already gone
    // is not an error.
    diesel::delete(application_uploaded_file_type::table.find(file_type_id))
        .execute(&mut conn)?;

    Ok(Json(json!({ "message": "deleted" })))
}
