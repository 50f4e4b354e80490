mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use common::{body_json, seed_user, TestApp};
use tradedesk_api::entities::{permission_grants, permission_revokes};

async fn seed_legacy_grant(app: &TestApp, user_id: i64, key: &str) {
    permission_grants::ActiveModel {
        user_id: Set(user_id),
        perm_key: Set(key.to_string()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed legacy grant");
}

async fn seed_legacy_revoke(app: &TestApp, user_id: i64, key: &str) {
    permission_revokes::ActiveModel {
        user_id: Set(user_id),
        perm_key: Set(key.to_string()),
        ..Default::default()
    }
    .insert(&*app.state.db)
    .await
    .expect("seed legacy revoke");
}

#[tokio::test]
async fn viewer_gets_static_view_defaults() {
    let app = TestApp::new().await;
    let admin_token = app.login("admin").await;

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(seed_user(&app.state, "viewer2", "viewer", true).await)
        .await
        .unwrap();
    assert!(resolved.permissions.contains("po.view"));
    assert!(resolved.permissions.contains("invoice.view"));
    assert!(!resolved.permissions.contains("po.edit"));
    assert!(!resolved.permissions.contains("invoice.confirm"));

    // Same result over HTTP.
    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/permissions?user_id={}", resolved.user_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "viewer");
    assert!(body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "packing.view"));
}

#[tokio::test]
async fn unknown_role_falls_back_to_viewer_defaults() {
    let app = TestApp::new().await;
    let user_id = seed_user(&app.state, "mystery", "intern", true).await;

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(resolved.permissions.contains("po.view"));
    assert!(!resolved.permissions.contains("po.edit"));
}

#[tokio::test]
async fn legacy_revoke_beats_override_grant() {
    let app = TestApp::new().await;
    let admin_token = app.login("admin").await;
    let user_id = seed_user(&app.state, "edge", "staff", true).await;

    // Explicit override allows invoice.confirm, legacy revoke takes it away.
    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/permissions/overrides/{}", user_id),
            Some(json!({"perm_key": "invoice.confirm", "allowed": true})),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    seed_legacy_revoke(&app, user_id, "invoice.confirm").await;

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(!resolved.permissions.contains("invoice.confirm"));
    assert_eq!(resolved.sources["invoice.confirm"], "legacy-revoke");
}

#[tokio::test]
async fn legacy_grant_extends_role_defaults() {
    let app = TestApp::new().await;
    let user_id = seed_user(&app.state, "granted", "viewer", true).await;
    seed_legacy_grant(&app, user_id, "image.upload").await;

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(resolved.permissions.contains("image.upload"));
    assert_eq!(resolved.sources["image.upload"], "legacy-grant");
}

#[tokio::test]
async fn breakdown_reports_every_source_list() {
    let app = TestApp::new().await;
    let admin_token = app.login("admin").await;
    let user_id = seed_user(&app.state, "audited", "staff", true).await;

    // Deny a role-default key and grant one outside the role.
    for (key, allowed) in [("po.edit", false), ("po.cancel", true)] {
        let response = app
            .request(
                Method::PUT,
                &format!("/api/v1/permissions/overrides/{}", user_id),
                Some(json!({"perm_key": key, "allowed": allowed})),
                Some(&admin_token),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    seed_legacy_grant(&app, user_id, "permission.view").await;
    seed_legacy_revoke(&app, user_id, "invoice.create").await;

    let response = app
        .request(
            Method::GET,
            &format!("/api/v1/permissions?user_id={}", user_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    let has = |list: &str, key: &str| {
        body["breakdown"][list]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p == key)
    };
    // The base list is the role default actually used, even for denied keys.
    assert!(has("base", "po.edit"));
    assert!(has("base", "invoice.create"));
    assert!(has("override_denies", "po.edit"));
    assert!(has("override_grants", "po.cancel"));
    assert!(!has("override_grants", "po.edit"));
    assert!(has("legacy_grants", "permission.view"));
    assert!(has("legacy_revokes", "invoice.create"));

    // The effective set still reflects the merge.
    let effective: Vec<&str> = body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert!(!effective.contains(&"po.edit"));
    assert!(effective.contains(&"po.cancel"));
    assert!(effective.contains(&"permission.view"));
    assert!(!effective.contains(&"invoice.create"));
}

#[tokio::test]
async fn clearing_override_restores_role_default() {
    let app = TestApp::new().await;
    let admin_token = app.login("admin").await;
    let user_id = seed_user(&app.state, "temporarily_blocked", "manager", true).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/permissions/overrides/{}", user_id),
            Some(json!({"perm_key": "po.cancel", "allowed": false})),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(!resolved.permissions.contains("po.cancel"));

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/v1/permissions/overrides/{}/po.cancel", user_id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(resolved.permissions.contains("po.cancel"));
}

#[tokio::test]
async fn unknown_permission_keys_are_accepted_at_write_time() {
    let app = TestApp::new().await;
    let admin_token = app.login("admin").await;
    let user_id = seed_user(&app.state, "openvocab", "staff", true).await;

    let response = app
        .request(
            Method::PUT,
            &format!("/api/v1/permissions/overrides/{}", user_id),
            Some(json!({"perm_key": "reports.export", "allowed": true})),
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let resolved = app
        .state
        .services
        .permissions
        .resolve_for_user(user_id)
        .await
        .unwrap();
    assert!(resolved.permissions.contains("reports.export"));
}

#[tokio::test]
async fn permission_gates_reject_missing_capability() {
    let app = TestApp::new().await;
    let viewer_token = app.login("viewer").await;

    // Viewers can read POs but not create them.
    let response = app
        .request(
            Method::GET,
            "/api/v1/purchase-orders",
            None,
            Some(&viewer_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .request(
            Method::POST,
            "/api/v1/purchase-orders",
            Some(json!({
                "po_number": "PO-NOPE",
                "buyer_code": "ACME",
                "lines": [{"line_no": 1, "ordered_qty": 10}]
            })),
            Some(&viewer_token),
        )
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn requests_without_token_are_unauthorized() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/v1/purchase-orders", None, None)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_rejects_bad_password_and_inactive_users() {
    let app = TestApp::new().await;
    seed_user(&app.state, "dormant", "staff", false).await;

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"username": "staff", "password": "wrong"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({"username": "dormant", "password": "password123"})),
            None,
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_echoes_token_identity() {
    let app = TestApp::new().await;
    let token = app.login("manager").await;

    let response = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["username"], "manager");
    assert_eq!(body["role"], "manager");
    assert!(body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "po.cancel"));
}
