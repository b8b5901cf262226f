mod common;

use anyhow::Result;
use axum::http::StatusCode;
use common::{acquire_db_lock, body_to_vec, TestApp, TEST_API_KEY};
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileTypeInfo {
    id: i64,
    application_id: i64,
    file_type_name: String,
    created_at: String,
}

async fn create_application(app: &TestApp, name: &str, code: &str) -> Result<i64> {
    let response = app
        .post_json(
            "/api/v1/applications",
            &json!({ "name": name, "code": code, "userId": 1 }),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_vec(response.into_body()).await?;
    let created: serde_json::Value = serde_json::from_slice(&body)?;
    Ok(created["id"].as_i64().expect("created id"))
}

async fn add_file_type(app: &TestApp, application_id: i64, name: &str) -> Result<()> {
    let response = app
        .post_json(
            &format!("/api/v1/applications/{application_id}/file-types"),
            &json!({ "fileTypeName": name }),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_to_vec(response.into_body()).await?;
    let parsed: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(parsed["message"], "file type added");
    Ok(())
}

async fn list_file_types(app: &TestApp, application_id: i64) -> Result<Vec<FileTypeInfo>> {
    let response = app
        .get(
            &format!("/api/v1/applications/{application_id}/file-types"),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_vec(response.into_body()).await?;
    Ok(serde_json::from_slice(&body)?)
}

#[tokio::test]
async fn file_type_flow() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let application_id = create_application(&app, "uploads", "UPL1").await?;

    add_file_type(&app, application_id, "pdf").await?;
    add_file_type(&app, application_id, "csv").await?;

    let listed = list_file_types(&app, application_id).await?;
    assert_eq!(listed.len(), 2);
    assert!(listed
        .iter()
        .all(|entry| entry.application_id == application_id));
    assert!(listed.iter().all(|entry| entry.id > 0));
    assert!(listed.iter().all(|entry| !entry.created_at.is_empty()));
    let mut names: Vec<&str> = listed
        .iter()
        .map(|entry| entry.file_type_name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, vec!["csv", "pdf"]);

    let target = listed[0].id;
    let deleted = app
        .delete(
            &format!("/api/v1/applications/{application_id}/file-types/{target}"),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(deleted.status(), StatusCode::OK);
    let body = body_to_vec(deleted.into_body()).await?;
    let parsed: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(parsed["message"], "deleted");

    let remaining = list_file_types(&app, application_id).await?;
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].id, target);

    // Deleting an id that is already gone is still a success.
    let again = app
        .delete(
            &format!("/api/v1/applications/{application_id}/file-types/{target}"),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(again.status(), StatusCode::OK);

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn file_types_are_scoped_to_their_application() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let first = create_application(&app, "first", "FT1").await?;
    let second = create_application(&app, "second", "FT2").await?;

    add_file_type(&app, first, "pdf").await?;
    add_file_type(&app, second, "png").await?;

    let first_list = list_file_types(&app, first).await?;
    assert_eq!(first_list.len(), 1);
    assert_eq!(first_list[0].file_type_name, "pdf");

    let second_list = list_file_types(&app, second).await?;
    assert_eq!(second_list.len(), 1);
    assert_eq!(second_list[0].file_type_name, "png");

    app.cleanup().await?;
    Ok(())
}

#[tokio::test]
async fn file_type_name_is_required() -> Result<()> {
    let _lock = acquire_db_lock().await;
    let Some(app) = TestApp::new().await? else {
        return Ok(());
    };

    let application_id = create_application(&app, "strict", "REQ1").await?;

    let empty = app
        .post_json(
            &format!("/api/v1/applications/{application_id}/file-types"),
            &json!({ "fileTypeName": "" }),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let missing = app
        .post_json(
            &format!("/api/v1/applications/{application_id}/file-types"),
            &json!({}),
            Some(TEST_API_KEY),
        )
        .await?;
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);

    let listed = list_file_types(&app, application_id).await?;
    assert!(listed.is_empty());

    app.cleanup().await?;
    Ok(())
}
