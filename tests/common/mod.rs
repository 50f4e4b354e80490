use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request},
    Router,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

use tradedesk_api::{
    auth::{hash_password, AuthConfig, AuthService},
    build_router,
    config::AppConfig,
    db,
    entities::{styles, users},
    events::{self, EventSender},
    handlers::AppServices,
    services::images::{FilesystemBackend, ImageService},
    services::invoicing::InvoicingService,
    services::orders::OrderService,
    services::packing::PackingService,
    services::permissions::PermissionResolver,
    AppState,
};

/// Test harness: a full application router backed by a temp-dir SQLite file,
/// with one seeded user per role (password `password123`).
pub struct TestApp {
    router: Router,
    pub state: AppState,
    auth_service: Arc<AuthService>,
    _dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let db_path = dir.path().join("test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            18_080,
        );
        cfg.storage_root = dir.path().join("storage").display().to_string();
        cfg.public_base_url = "http://localhost:18080/files".to_string();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("create test database");
        db::run_migrations(&pool)
            .await
            .expect("run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let resolver = Arc::new(PermissionResolver::new(db_arc.clone()));
        let auth_service = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: cfg.jwt_secret.clone(),
                token_expiration_secs: cfg.jwt_expiration,
            },
            db_arc.clone(),
            resolver.clone(),
        ));
        let storage = Arc::new(FilesystemBackend::new(
            cfg.storage_root.clone(),
            cfg.public_base_url.clone(),
        ));

        let services = AppServices {
            auth: auth_service.clone(),
            permissions: resolver,
            orders: Arc::new(OrderService::new(db_arc.clone(), event_sender.clone())),
            invoicing: Arc::new(InvoicingService::new(db_arc.clone(), event_sender.clone())),
            packing: Arc::new(PackingService::new(db_arc.clone(), event_sender.clone())),
            images: Arc::new(ImageService::new(
                db_arc.clone(),
                storage,
                event_sender.clone(),
            )),
        };

        let state = AppState {
            db: db_arc,
            config: cfg,
            event_sender,
            services,
        };

        for (username, role) in [
            ("admin", "admin"),
            ("manager", "manager"),
            ("staff", "staff"),
            ("viewer", "viewer"),
        ] {
            seed_user(&state, username, role, true).await;
        }

        let router = build_router(state.clone(), auth_service.clone());

        Self {
            router,
            state,
            auth_service,
            _dir: dir,
            _event_task: event_task,
        }
    }

    #[allow(dead_code)]
    pub fn auth_service(&self) -> Arc<AuthService> {
        self.auth_service.clone()
    }

    /// Log in as a seeded user and return the bearer token.
    pub async fn login(&self, username: &str) -> String {
        self.auth_service
            .login(username, "password123")
            .await
            .expect("login seeded user")
            .access_token
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}

/// Insert a user directly, returning its id.
pub async fn seed_user(state: &AppState, username: &str, role: &str, active: bool) -> i64 {
    let now = Utc::now();
    let user = users::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password("password123").expect("hash test password")),
        full_name: Set(Some(format!("Test {}", username))),
        role: Set(role.to_string()),
        is_active: Set(active),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&*state.db)
    .await
    .expect("seed user");
    user.id
}

/// Insert a style row directly, returning its id.
#[allow(dead_code)]
pub async fn seed_style(state: &AppState, style_no: &str) -> i64 {
    let now = Utc::now();
    let style = styles::ActiveModel {
        style_no: Set(style_no.to_string()),
        description: Set(Some("Seeded style".to_string())),
        image_urls: Set(None),
        main_image_url: Set(None),
        is_deleted: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&*state.db)
    .await
    .expect("seed style");
    style.style_id
}

/// Deserialize a response body as JSON.
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is json")
}
