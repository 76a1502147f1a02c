use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_api::config::ServerConfig;
use helpdesk_api::router::build_app_router;
use helpdesk_api::state::AppState;
use helpdesk_events::{
    EmailConfig, EventBus, NotificationDispatcher, SenderRegistry, SlaScanScheduler,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = helpdesk_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    helpdesk_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    helpdesk_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    tracing::info!("Event bus created");

    // Channel senders: email only when SMTP is configured.
    let senders = Arc::new(SenderRegistry::standard(EmailConfig::from_env()));

    // Spawn the notification dispatcher (consumes events, delivers, logs).
    let dispatcher = NotificationDispatcher::new(pool.clone(), Arc::clone(&senders));
    tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // Spawn the SLA / idle scan scheduler.
    let scan_cancel = tokio_util::sync::CancellationToken::new();
    let scheduler = SlaScanScheduler::new(
        pool.clone(),
        Arc::clone(&event_bus),
        config.site_url.clone(),
    );
    tokio::spawn(scheduler.run(scan_cancel.clone()));

    tracing::info!("Background services started (dispatcher, SLA scanner)");

    // --- App state / router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app_router(state, &config);

    // --- Serve ---
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    tracing::info!(%addr, "Helpdesk API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            scan_cancel.cancel();
        })
        .await
        .expect("Server error");
}
