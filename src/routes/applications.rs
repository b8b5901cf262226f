use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::pg::Pg;
use diesel::{prelude::*, result::DatabaseErrorKind, PgConnection};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::file_types::FileTypeResponse;
use super::statuses::StatusResponse;
use super::{parse_id, parse_number, to_iso};
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::models::{Application, ApplicationStatus, ApplicationUploadedFileType, NewApplication};
use crate::pagination::{self, clamp_page, clamp_page_size, ListResponse};
use crate::schema::{application_status, application_uploaded_file_type, applications};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationRequest {
    pub name: String,
    pub user_id: i64,
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial update payload. An empty string leaves the stored field
/// unchanged; the contract has no way to clear a field to empty.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateApplicationRequest {
    pub name: String,
    pub code: String,
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationListQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub q: Option<String>,
    pub user_id: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(AsChangeset, Default)]
#[diesel(table_name = applications)]
struct ApplicationChangeset<'a> {
    name: Option<&'a str>,
    code: Option<&'a str>,
    description: Option<&'a str>,
}

impl ApplicationChangeset<'_> {
    fn is_empty(&self) -> bool {
        self.name.is_none() && self.code.is_none() && self.description.is_none()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub code: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub statuses: Vec<StatusResponse>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub file_types: Vec<FileTypeResponse>,
}

struct ApplicationFilter {
    q: Option<String>,
    user_id: i64,
    from: Option<NaiveDateTime>,
    to: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortColumn {
    Name,
    Code,
    CreatedAt,
}

pub async fn create_application(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<CreateApplicationRequest>,
) -> AppResult<(StatusCode, Json<ApplicationResponse>)> {
    if payload.name.is_empty() || payload.code.is_empty() {
        return Err(AppError::bad_request("name and code are required"));
    }
    if payload.user_id == 0 {
        return Err(AppError::bad_request("userId is required"));
    }

    let new_application = NewApplication {
        user_id: payload.user_id,
        name: payload.name,
        description: payload.description.unwrap_or_default(),
        code: payload.code,
    };

    let mut conn = state.db()?;
    let created: Application = match diesel::insert_into(applications::table)
        .values(&new_application)
        .get_result(&mut conn)
    {
        Ok(application) => application,
        Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            return Err(AppError::bad_request("application code already exists"));
        }
        Err(err) => return Err(AppError::from(err)),
    };

    Ok((
        StatusCode::CREATED,
        Json(to_application_response(created, Vec::new(), Vec::new())),
    ))
}

pub async fn list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationListQuery>,
) -> AppResult<Json<ListResponse<ApplicationResponse>>> {
    let page = clamp_page(parse_number(params.page.as_deref()));
    let page_size = clamp_page_size(parse_number(params.page_size.as_deref()));
    let filter = ApplicationFilter {
        q: params.q,
        user_id: parse_number(params.user_id.as_deref()).unwrap_or(0),
        from: parse_date_bound(params.from.as_deref()),
        to: parse_date_bound(params.to.as_deref()),
    };
    let (column, ascending) = resolve_sort(params.sort.as_deref(), params.order.as_deref());

    let mut conn = state.db()?;

    // Total over the full filtered set; offset/limit apply to the page only.
    let total: i64 = filtered_applications(&filter).count().get_result(&mut conn)?;

    let page_query = apply_sort(filtered_applications(&filter), column, ascending);
    let rows: Vec<Application> = page_query
        .offset(pagination::offset(page, page_size))
        .limit(page_size)
        .load(&mut conn)?;

    let application_ids: Vec<i64> = rows.iter().map(|application| application.id).collect();
    let mut statuses = load_statuses_for_applications(&mut conn, &application_ids)?;
    let mut file_types = load_file_types_for_applications(&mut conn, &application_ids)?;

    let data = rows
        .into_iter()
        .map(|application| {
            let id = application.id;
            to_application_response(
                application,
                statuses.remove(&id).unwrap_or_default(),
                file_types.remove(&id).unwrap_or_default(),
            )
        })
        .collect();

    Ok(Json(ListResponse::new(data, page, page_size, total)))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApplicationResponse>> {
    let id = parse_id(&id);
    let mut conn = state.db()?;

    let application = find_live_application(&mut conn, id)?;
    let mut statuses = load_statuses_for_applications(&mut conn, &[id])?;
    let mut file_types = load_file_types_for_applications(&mut conn, &[id])?;

    Ok(Json(to_application_response(
        application,
        statuses.remove(&id).unwrap_or_default(),
        file_types.remove(&id).unwrap_or_default(),
    )))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateApplicationRequest>,
) -> AppResult<Json<ApplicationResponse>> {
    let id = parse_id(&id);
    if id == 0 {
        return Err(AppError::bad_request("invalid application id"));
    }

    let mut conn = state.db()?;
    let existing = find_live_application(&mut conn, id)?;

    let changeset = ApplicationChangeset {
        name: non_empty(&payload.name),
        code: non_empty(&payload.code),
        description: non_empty(&payload.description),
    };

    let application = if changeset.is_empty() {
        existing
    } else {
        let now = Utc::now().naive_utc();
        let update = diesel::update(applications::table.find(id))
            .set((&changeset, applications::updated_at.eq(now)));
        match update.execute(&mut conn) {
            Ok(_) => {}
            Err(diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                return Err(AppError::bad_request("application code already exists"));
            }
            Err(err) => return Err(AppError::from(err)),
        }
        applications::table.find(id).first(&mut conn)?
    };

    let mut statuses = load_statuses_for_applications(&mut conn, &[id])?;
    let mut file_types = load_file_types_for_applications(&mut conn, &[id])?;

    Ok(Json(to_application_response(
        application,
        statuses.remove(&id).unwrap_or_default(),
        file_types.remove(&id).unwrap_or_default(),
    )))
}

pub async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id);
    let mut conn = state.db()?;

    let now = Utc::now().naive_utc();
    diesel::update(
        applications::table
            .find(id)
            .filter(applications::deleted_at.is_null()),
    )
    .set((
        applications::deleted_at.eq(Some(now)),
        applications::updated_at.eq(now),
    ))
    .execute(&mut conn)?;

    Ok(Json(json!({ "message": "deleted" })))
}

fn find_live_application(conn: &mut PgConnection, id: i64) -> AppResult<Application> {
    applications::table
        .find(id)
        .filter(applications::deleted_at.is_null())
        .first(conn)
        .optional()?
        .ok_or_else(|| AppError::not_found("application not found"))
}

fn filtered_applications(filter: &ApplicationFilter) -> applications::BoxedQuery<'static, Pg> {
    let mut query = applications::table
        .filter(applications::deleted_at.is_null())
        .into_boxed();

    if let Some(q) = filter.q.as_deref().filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        query = query.filter(
            applications::name
                .ilike(pattern.clone())
                .or(applications::description.ilike(pattern.clone()))
                .or(applications::code.ilike(pattern)),
        );
    }
    if filter.user_id > 0 {
        query = query.filter(applications::user_id.eq(filter.user_id));
    }
    if let Some(from) = filter.from {
        query = query.filter(applications::created_at.ge(from));
    }
    if let Some(to) = filter.to {
        query = query.filter(applications::created_at.le(to));
    }

    query
}

fn apply_sort(
    query: applications::BoxedQuery<'static, Pg>,
    column: SortColumn,
    ascending: bool,
) -> applications::BoxedQuery<'static, Pg> {
    match (column, ascending) {
        (SortColumn::Name, true) => query.order(applications::name.asc()),
        (SortColumn::Name, false) => query.order(applications::name.desc()),
        (SortColumn::Code, true) => query.order(applications::code.asc()),
        (SortColumn::Code, false) => query.order(applications::code.desc()),
        (SortColumn::CreatedAt, true) => query.order(applications::created_at.asc()),
        (SortColumn::CreatedAt, false) => query.order(applications::created_at.desc()),
    }
}

/// Unrecognized sort columns fall back to creation time; any order other
/// than a case-insensitive "asc" means descending.
fn resolve_sort(sort: Option<&str>, order: Option<&str>) -> (SortColumn, bool) {
    let column = match sort {
        Some("name") => SortColumn::Name,
        Some("code") => SortColumn::Code,
        _ => SortColumn::CreatedAt,
    };
    let ascending = order
        .map(|order| order.eq_ignore_ascii_case("asc"))
        .unwrap_or(false);
    (column, ascending)
}

/// `YYYY-MM-DD` at midnight; anything unparseable is silently ignored.
fn parse_date_bound(raw: Option<&str>) -> Option<NaiveDateTime> {
    let raw = raw?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn non_empty(value: &str) -> Option<&str> {
    (!value.is_empty()).then_some(value)
}

pub(crate) fn load_statuses_for_applications(
    conn: &mut PgConnection,
    application_ids: &[i64],
) -> AppResult<HashMap<i64, Vec<ApplicationStatus>>> {
    if application_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<ApplicationStatus> = application_status::table
        .filter(application_status::application_id.eq_any(application_ids))
        .order(application_status::created_at.desc())
        .load(conn)?;

    let mut map: HashMap<i64, Vec<ApplicationStatus>> = HashMap::new();
    for row in rows {
        map.entry(row.application_id).or_default().push(row);
    }
    Ok(map)
}

pub(crate) fn load_file_types_for_applications(
    conn: &mut PgConnection,
    application_ids: &[i64],
) -> AppResult<HashMap<i64, Vec<ApplicationUploadedFileType>>> {
    if application_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<ApplicationUploadedFileType> = application_uploaded_file_type::table
        .filter(application_uploaded_file_type::application_id.eq_any(application_ids))
        .load(conn)?;

    let mut map: HashMap<i64, Vec<ApplicationUploadedFileType>> = HashMap::new();
    for row in rows {
        map.entry(row.application_id).or_default().push(row);
    }
    Ok(map)
}

fn to_application_response(
    application: Application,
    statuses: Vec<ApplicationStatus>,
    file_types: Vec<ApplicationUploadedFileType>,
) -> ApplicationResponse {
    ApplicationResponse {
        id: application.id,
        user_id: application.user_id,
        name: application.name,
        description: application.description,
        code: application.code,
        created_at: to_iso(application.created_at),
        updated_at: to_iso(application.updated_at),
        deleted_at: application.deleted_at.map(to_iso),
        statuses: statuses.into_iter().map(StatusResponse::from).collect(),
        file_types: file_types.into_iter().map(FileTypeResponse::from).collect(),
    }
}
