use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::*;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = applications)]
pub struct Application {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub code: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = applications)]
pub struct NewApplication {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub code: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = application_status)]
#[diesel(belongs_to(Application))]
pub struct ApplicationStatus {
    pub id: i64,
    pub application_id: i64,
    pub user_id: i64,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = application_status)]
pub struct NewApplicationStatus {
    pub application_id: i64,
    pub user_id: i64,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = application_uploaded_file_type)]
#[diesel(belongs_to(Application))]
pub struct ApplicationUploadedFileType {
    pub id: i64,
    pub application_id: i64,
    pub file_type_name: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = application_uploaded_file_type)]
pub struct NewApplicationUploadedFileType {
    pub application_id: i64,
    pub file_type_name: String,
}
