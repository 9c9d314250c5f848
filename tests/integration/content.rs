//! Integration tests for file content retrieval

use super::*;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use wiremock::matchers::query_param;

/// Builds a PDF whose pages each show one line of text.
fn pdf_with_pages(lines: &[&str]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for line in lines {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(*line)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

async fn mount_metadata(server: &MockServer, id: &str, name: &str, mime_type: &str) {
    Mock::given(method("GET"))
        .and(path(drive_path(&format!("/files/{}", id))))
        .and(query_param("fields", "id, name, mimeType"))
        .respond_with(success_response(json!({
            "id": id,
            "name": name,
            "mimeType": mime_type
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_document_is_exported_as_plain_text() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(
        &mock_server,
        "doc1",
        "Meeting notes",
        "application/vnd.google-apps.document",
    )
    .await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/doc1/export")))
        .and(query_param("mimeType", "text/plain"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("\u{feff}Agenda\r\n- ship it\r\n", "text/plain"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/doc1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "doc1",
            "name": "Meeting notes",
            "content": "\u{feff}Agenda\r\n- ship it\r\n"
        })
    );
}

#[tokio::test]
async fn test_spreadsheet_is_exported_as_csv() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(
        &mock_server,
        "sheet1",
        "Budget",
        "application/vnd.google-apps.spreadsheet",
    )
    .await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/sheet1/export")))
        .and(query_param("mimeType", "text/csv"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("item,cost\nrent,1200\n", "text/csv"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/sheet1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "item,cost\nrent,1200\n");
}

#[tokio::test]
async fn test_text_file_is_downloaded() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(&mock_server, "md1", "README.md", "text/markdown").await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/md1")))
        .and(query_param("alt", "media"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("# Heading\n\nnaïve café", "text/markdown"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/md1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "README.md");
    assert_eq!(body["content"], "# Heading\n\nnaïve café");
}

#[tokio::test]
async fn test_unsupported_type_is_bad_request() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(&mock_server, "zip1", "archive.zip", "application/zip").await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/zip1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "detail": "Unsupported file type: application/zip" })
    );

    let downloads = mock_server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.url.query().is_some_and(|q| q.contains("alt=media")))
        .count();
    assert_eq!(downloads, 0);
}

#[tokio::test]
async fn test_unknown_file_is_bad_request() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/missing")))
        .respond_with(google_error(404, "notFound", "File not found: missing."))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/missing").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error getting file content"));
    assert!(detail.contains("File not found: missing."));
}

#[tokio::test]
async fn test_export_size_limit_is_bad_request() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(
        &mock_server,
        "big1",
        "Enormous doc",
        "application/vnd.google-apps.document",
    )
    .await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/big1/export")))
        .respond_with(google_error(
            403,
            "exportSizeLimitExceeded",
            "This file is too large to be exported.",
        ))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/big1").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.contains("Export size exceeded"));
    assert!(detail.contains("This file is too large to be exported."));
}

#[tokio::test]
async fn test_invalid_utf8_is_internal_error() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(&mock_server, "latin1", "legacy.txt", "text/plain").await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/latin1")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x63, 0x61, 0x66, 0xe9]))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/latin1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("UTF-8"));
}

#[tokio::test]
async fn test_pdf_text_is_extracted_page_by_page() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(&mock_server, "pdf2", "minutes.pdf", "application/pdf").await;

    let pdf = pdf_with_pages(&["Board minutes", "Action items"]);
    Mock::given(method("GET"))
        .and(path(drive_path("/files/pdf2")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(pdf, "application/pdf"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/pdf2").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "id": "pdf2",
            "name": "minutes.pdf",
            "content": "Board minutes\n\nAction items"
        })
    );
}

#[tokio::test]
async fn test_dot_segment_file_id_is_rejected() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/%2E%2E").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Error getting file content"));
    assert!(detail.contains("Invalid file_id '..'"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_pdf_is_internal_error() {
    let mock_server = setup_mock_server().await;
    mount_token_endpoint(&mock_server).await;
    mount_metadata(&mock_server, "pdf1", "scan.pdf", "application/pdf").await;

    Mock::given(method("GET"))
        .and(path(drive_path("/files/pdf1")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"this is not a pdf".to_vec()))
        .mount(&mock_server)
        .await;

    let app = connector_app(&mock_server).await;
    let (status, body) = get_json(app, "/file/pdf1").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Failed to extract PDF text"));
}
