mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{body_json, TestApp};

async fn create_two_line_po(app: &TestApp, token: &str, po_number: &str) -> (i64, i64) {
    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "po_number": po_number,
                "buyer_code": "ACME",
                "lines": [
                    {"line_no": 1, "ordered_qty": 100, "unit_price": "4.20"},
                    {"line_no": 2, "ordered_qty": 50, "unit_price": "7.00"}
                ]
            })),
            Some(token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let lines = body["lines"].as_array().unwrap();
    (
        lines[0]["po_line_id"].as_i64().unwrap(),
        lines[1]["po_line_id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn ship_then_cancel_drives_header_to_partially_shipped() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, _line2) = create_two_line_po(&app, &token, "PO-1001").await;

    // Ship 60 of line 1.
    let response = app
        .request(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "shipment_no": "SHP-1",
                "lines": [{"po_line_id": line1, "shipped_qty": 60}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Cancel the remaining 40 of line 1.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1001/cancel-lines",
            Some(json!({
                "lines": [{"po_line_id": line1, "qty_cancelled": 40}],
                "cancel_reason": "buyer reduced volume"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["po_no"], "PO-1001");
    assert_eq!(body["status"], "PARTIALLY_SHIPPED");

    // Invariant on the read side: ordered == shipped + cancelled + remaining.
    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-1001",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "PARTIALLY_SHIPPED");
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines[0]["shipped_qty"], 60);
    assert_eq!(lines[0]["cancelled_qty"], 40);
    assert_eq!(lines[0]["remaining_qty"], 0);
    assert_eq!(lines[1]["shipped_qty"], 0);
    assert_eq!(lines[1]["remaining_qty"], 50);
}

#[tokio::test]
async fn over_cancel_rejects_whole_batch_with_breakdown() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, line2) = create_two_line_po(&app, &token, "PO-1002").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "shipment_no": "SHP-2",
                "lines": [{"po_line_id": line1, "shipped_qty": 60}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Line 2's cancel is valid, line 1's is not: nothing may change.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1002/cancel-lines",
            Some(json!({
                "lines": [
                    {"po_line_id": line2, "qty_cancelled": 10},
                    {"po_line_id": line1, "qty_cancelled": 50}
                ]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["details"]["ordered"], 100);
    assert_eq!(body["details"]["shipped"], 60);
    assert_eq!(body["details"]["max_cancel"], 40);
    assert_eq!(body["details"]["requested"], 50);

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-1002",
            None,
            Some(&token),
        )
        .await;
    let body = body_json(response).await;
    let lines = body["lines"].as_array().unwrap();
    assert_eq!(lines[0]["cancelled_qty"], 0);
    assert_eq!(lines[1]["cancelled_qty"], 0);
    assert_eq!(body["status"], "PARTIALLY_SHIPPED");
}

#[tokio::test]
async fn cancelling_everything_without_shipments_cancels_the_order() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, line2) = create_two_line_po(&app, &token, "PO-1003").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1003/cancel-lines",
            Some(json!({
                "lines": [
                    {"po_line_id": line1, "qty_cancelled": 100},
                    {"po_line_id": line2, "qty_cancelled": 50}
                ]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "CANCELLED");

    // Re-running the same request is idempotent: same quantities, same status.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1003/cancel-lines",
            Some(json!({
                "lines": [
                    {"po_line_id": line1, "qty_cancelled": 100},
                    {"po_line_id": line2, "qty_cancelled": 50}
                ]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "CANCELLED");
}

#[tokio::test]
async fn reducing_cancellations_keeps_the_settled_status() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, line2) = create_two_line_po(&app, &token, "PO-1007").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1007/cancel-lines",
            Some(json!({
                "lines": [
                    {"po_line_id": line1, "qty_cancelled": 100},
                    {"po_line_id": line2, "qty_cancelled": 50}
                ]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "CANCELLED");

    // Reopening part of a line yields no transition: nothing shipped, not
    // all settled. The header must not fall back to DRAFT.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1007/cancel-lines",
            Some(json!({
                "lines": [{"po_line_id": line1, "qty_cancelled": 40}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "CANCELLED");

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-1007",
            None,
            Some(&token),
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "CANCELLED");
    assert_eq!(body["lines"][0]["cancelled_qty"], 40);
}

#[tokio::test]
async fn later_batches_keep_the_earlier_cancel_context() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, line2) = create_two_line_po(&app, &token, "PO-1008").await;

    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1008/cancel-lines",
            Some(json!({
                "lines": [{"po_line_id": line1, "qty_cancelled": 100}],
                "cancel_reason": "buyer reduced volume",
                "cancel_note": "confirmed by email"
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    // A second batch without context fields leaves the recorded ones alone.
    let response = app
        .request(
            Method::PUT,
            "/api/v1/purchase-orders/PO-1008/cancel-lines",
            Some(json!({
                "lines": [{"po_line_id": line2, "qty_cancelled": 50}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-1008",
            None,
            Some(&token),
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["cancel_reason"], "buyer reduced volume");
    assert_eq!(body["cancel_note"], "confirmed by email");
    assert!(body["cancel_date"].is_string());
}

#[tokio::test]
async fn fully_shipping_every_open_line_marks_the_order_shipped() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, line2) = create_two_line_po(&app, &token, "PO-1004").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "shipment_no": "SHP-3",
                "lines": [
                    {"po_line_id": line1, "shipped_qty": 100},
                    {"po_line_id": line2, "shipped_qty": 50}
                ]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-1004",
            None,
            Some(&token),
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["status"], "SHIPPED");
}

#[tokio::test]
async fn overshipping_a_line_is_a_conflict() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    let (line1, _) = create_two_line_po(&app, &token, "PO-1005").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/shipments",
            Some(json!({
                "shipment_no": "SHP-4",
                "lines": [{"po_line_id": line1, "shipped_qty": 150}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["details"]["remaining"], 100);
    assert_eq!(body["details"]["requested"], 150);
}

#[tokio::test]
async fn duplicate_po_number_is_a_conflict() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;
    create_two_line_po(&app, &token, "PO-1006").await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "po_number": "PO-1006",
                "buyer_code": "ACME",
                "lines": [{"line_no": 1, "ordered_qty": 1}]
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_po_is_not_found() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;

    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders/PO-MISSING",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
