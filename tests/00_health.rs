mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::spawn_app().await;

    let (status, body) = app.get("/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn root_is_public() -> Result<()> {
    let app = common::spawn_app().await;

    let (status, body) = app.get("/").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Selected Calendars API");
    assert!(body["endpoints"]["selected_calendars"].is_string());
    Ok(())
}
