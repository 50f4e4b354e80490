use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::info;

use tradedesk_api::auth::{AuthConfig, AuthService};
use tradedesk_api::config::{init_tracing, load_config};
use tradedesk_api::db::{establish_connection_from_app_config, run_migrations};
use tradedesk_api::events::{process_events, EventSender};
use tradedesk_api::handlers::AppServices;
use tradedesk_api::services::images::{FilesystemBackend, ImageService};
use tradedesk_api::services::invoicing::InvoicingService;
use tradedesk_api::services::orders::OrderService;
use tradedesk_api::services::packing::PackingService;
use tradedesk_api::services::permissions::PermissionResolver;
use tradedesk_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config().context("failed to load configuration")?;
    init_tracing(&cfg.log_level, cfg.log_json);

    let db = Arc::new(
        establish_connection_from_app_config(&cfg)
            .await
            .context("failed to connect to database")?,
    );
    if cfg.auto_migrate {
        run_migrations(&db).await.context("migrations failed")?;
        info!("database migrations applied");
    }

    let (tx, rx) = mpsc::channel(1024);
    let event_sender = EventSender::new(tx);
    tokio::spawn(process_events(rx));

    let resolver = Arc::new(PermissionResolver::new(db.clone()));
    let auth_service = Arc::new(AuthService::new(
        AuthConfig {
            jwt_secret: cfg.jwt_secret.clone(),
            token_expiration_secs: cfg.jwt_expiration,
        },
        db.clone(),
        resolver.clone(),
    ));
    let storage = Arc::new(FilesystemBackend::new(
        cfg.storage_root.clone(),
        cfg.public_base_url.clone(),
    ));

    let services = AppServices {
        auth: auth_service.clone(),
        permissions: resolver,
        orders: Arc::new(OrderService::new(db.clone(), event_sender.clone())),
        invoicing: Arc::new(InvoicingService::new(db.clone(), event_sender.clone())),
        packing: Arc::new(PackingService::new(db.clone(), event_sender.clone())),
        images: Arc::new(ImageService::new(db.clone(), storage, event_sender.clone())),
    };

    let state = AppState {
        db,
        config: cfg.clone(),
        event_sender,
        services,
    };

    let app = build_router(state, auth_service);

    let addr = format!("{}:{}", cfg.host, cfg.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("tradedesk-api listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    info!("shutdown signal received");
}
