mod common;

use axum::http::{Method, StatusCode};
use base64::Engine;
use sea_orm::EntityTrait;
use serde_json::json;

use common::{body_json, seed_style, TestApp};

fn b64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[tokio::test]
async fn upload_attaches_url_to_style_and_po_line() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let style_id = seed_style(&app.state, "ST-100").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "po_number": "PO-IMG-1",
                "buyer_code": "ACME",
                "lines": [{"line_no": 1, "style_id": style_id, "ordered_qty": 10}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let po = body_json(response).await;
    let po_line_id = po["lines"][0]["po_line_id"].as_i64().unwrap();

    let response = app
        .request(
            Method::POST,
            "/api/v1/images",
            Some(json!({
                "style_id": style_id,
                "po_line_id": po_line_id,
                "filename": "front.png",
                "content": b64(b"fake-png-bytes")
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["style_updated"], true);
    assert_eq!(body["main_image_updated"], true);
    assert_eq!(body["po_line_updated"], true);
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:18080/files/styles/"));
    assert!(url.ends_with("front.png"));

    // The blob is really on disk under the storage root.
    let storage_path = body["storage_path"].as_str().unwrap();
    let on_disk = std::path::Path::new(&app.state.config.storage_root).join(storage_path);
    assert_eq!(std::fs::read(on_disk).unwrap(), b"fake-png-bytes");

    // The PO line carries the URL too.
    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-IMG-1",
            None,
            Some(&token),
        )
        .await;
    let po = body_json(response).await;
    let line_urls = po["lines"][0]["image_urls"].as_array().unwrap();
    assert_eq!(line_urls.len(), 1);
    assert_eq!(line_urls[0].as_str().unwrap(), url);
}

#[tokio::test]
async fn image_url_lists_are_capped_at_three_most_recent_first() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let style_id = seed_style(&app.state, "ST-101").await;

    let mut urls = Vec::new();
    for i in 0..4 {
        let response = app
            .request(
                Method::POST,
                "/api/v1/images",
                Some(json!({
                    "style_id": style_id,
                    "filename": format!("shot-{}.png", i),
                    "content": b64(format!("bytes-{}", i).as_bytes())
                })),
                Some(&token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["po_line_updated"], false);
        urls.push(body["url"].as_str().unwrap().to_string());
    }

    let model = tradedesk_api::entities::styles::Entity::find_by_id(style_id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    let stored = model.image_urls.clone().unwrap();
    let arr = stored.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    // Most recent first: uploads 3, 2, 1; the first upload fell off.
    assert_eq!(arr[0].as_str().unwrap(), urls[3]);
    assert_eq!(arr[1].as_str().unwrap(), urls[2]);
    assert_eq!(arr[2].as_str().unwrap(), urls[1]);
    assert_eq!(model.main_image_url.as_deref(), Some(urls[3].as_str()));
}

#[tokio::test]
async fn upload_for_unknown_style_is_not_found_and_stores_nothing() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/images",
            Some(json!({
                "style_id": 9999,
                "filename": "ghost.png",
                "content": b64(b"bytes")
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let styles_dir = std::path::Path::new(&app.state.config.storage_root).join("styles/9999");
    assert!(!styles_dir.exists());
}

#[tokio::test]
async fn invalid_base64_is_a_validation_error() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let style_id = seed_style(&app.state, "ST-102").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/images",
            Some(json!({
                "style_id": style_id,
                "filename": "bad.png",
                "content": "not@@base64!!"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_po_line_reports_false_without_failing_the_upload() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let style_id = seed_style(&app.state, "ST-103").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/images",
            Some(json!({
                "style_id": style_id,
                "po_line_id": 424242,
                "filename": "side.png",
                "content": b64(b"bytes")
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["style_updated"], true);
    assert_eq!(body["po_line_updated"], false);
}
