//! Integration tests for folder listing

use super::*;
use wiremock::matchers::{header, query_param, query_param_is_missing};

#[tokio::test]
async fn test_list_files_queries_folder_children() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .and(header("authorization", "Bearer ya29.test-token"))
        .and(query_param("q", "'folder123' in parents and trashed=false"))
        .and(query_param("fields", "nextPageToken, files(id, name, mimeType)"))
        .and(query_param("pageSize", "1000"))
        .respond_with(success_response(json!({
            "files": [
                {
                    "id": "doc1",
                    "name": "Meeting notes",
                    "mimeType": "application/vnd.google-apps.document"
                },
                { "id": "pdf1", "name": "report.pdf", "mimeType": "application/pdf" }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "doc1", "name": "Meeting notes" },
            { "id": "pdf1", "name": "report.pdf" }
        ])
    );
}

#[tokio::test]
async fn test_list_files_follows_page_tokens() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .and(query_param_is_missing("pageToken"))
        .respond_with(success_response(json!({
            "nextPageToken": "page-2",
            "files": [{ "id": "a", "name": "first" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .and(query_param("pageToken", "page-2"))
        .respond_with(success_response(json!({
            "files": [{ "id": "b", "name": "second" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": "a", "name": "first" },
            { "id": "b", "name": "second" }
        ])
    );
}

#[tokio::test]
async fn test_empty_folder() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .respond_with(success_response(json!({ "files": [] })))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/files").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_provider_error_is_internal_error() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .respond_with(google_error(404, "notFound", "File not found: folder123."))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/files").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error listing files"));
    assert!(detail.contains("File not found: folder123."));
}

#[tokio::test]
async fn test_rejected_credentials_are_internal_error() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/files").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Authentication failed"));
    assert!(detail.contains("invalid_grant"));
}

#[tokio::test]
async fn test_token_is_reused_across_requests() {
    let mock_server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(success_response(json!({
            "access_token": ACCESS_TOKEN,
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files")))
        .respond_with(success_response(json!({ "files": [] })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    for _ in 0..3 {
        let (status, _) = get_json(app.clone(), "/files").await;
        assert_eq!(status, StatusCode::OK);
    }
}
