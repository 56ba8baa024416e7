//! Biocoach service entry point.
//!
//! Wires configuration, the profile store, the cache, and both ingestion
//! surfaces (REST and WebSocket) into one axum server.

use std::sync::Arc;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use biocoach::adapters::cache::{ProfileCache, TtlCache};
use biocoach::adapters::events::ChannelSubscriber;
use biocoach::adapters::http::{api_router, with_request_ids, ApiState};
use biocoach::adapters::store::{
    InMemoryProfileStore, PgProfileStore, RetryConfig, RetryingStore,
};
use biocoach::adapters::websocket::{ws_ingest, WsState};
use biocoach::application::handlers::{
    GetInsightsHandler, GetProfileHandler, IngestUpdateHandler, InitializeProfileHandler,
    PersonalizeHandler, RecordFeedbackHandler,
};
use biocoach::application::locks::UserLocks;
use biocoach::config::{AppConfig, StoreKind};
use biocoach::ports::{BiometricSubscriber, ProfileStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);

    let store = build_store(&config).await?;
    let cache: Arc<ProfileCache> = Arc::new(TtlCache::new(config.cache.ttl()));
    let locks = Arc::new(UserLocks::new());

    // Downstream consumers get updates over a bounded channel; a full
    // channel drops rather than backpressuring ingestion.
    let (telemetry, mut telemetry_rx) =
        ChannelSubscriber::new("telemetry", config.ingest.channel_capacity);
    tokio::spawn(async move {
        while let Some(update) = telemetry_rx.recv().await {
            debug!(user_id = %update.user_id, kind = ?update.kind, "update observed");
        }
    });
    let subscribers: Vec<Arc<dyn BiometricSubscriber>> = vec![telemetry];

    let ingest_update = Arc::new(IngestUpdateHandler::new(
        store.clone(),
        cache.clone(),
        locks.clone(),
        subscribers,
    ));
    let api_state = ApiState {
        initialize_profile: Arc::new(InitializeProfileHandler::new(
            store.clone(),
            cache.clone(),
            locks.clone(),
        )),
        get_profile: Arc::new(GetProfileHandler::new(store.clone(), cache.clone())),
        ingest_update: ingest_update.clone(),
        personalize: Arc::new(PersonalizeHandler::new(
            store.clone(),
            cache.clone(),
            locks.clone(),
        )),
        record_feedback: Arc::new(RecordFeedbackHandler::new(
            store.clone(),
            cache.clone(),
            locks,
        )),
        get_insights: Arc::new(GetInsightsHandler::new(store, cache)),
    };
    let ws_state = WsState {
        ingest: ingest_update,
        heartbeat_interval: config.ingest.heartbeat_interval(),
    };

    let mut app = api_router()
        .with_state(api_state)
        .merge(
            axum::Router::new()
                .route("/ws/biometrics", axum::routing::get(ws_ingest))
                .with_state(ws_state),
        )
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    if !origins.is_empty() {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );
    }

    let app = with_request_ids(app);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "biocoach listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level));
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn ProfileStore>, sqlx::Error> {
    let retry = RetryConfig {
        call_timeout: config.store.call_timeout(),
        max_retries: config.store.max_retries,
        initial_backoff: config.store.initial_backoff(),
    };
    let inner: Arc<dyn ProfileStore> = match config.store.kind {
        StoreKind::Memory => {
            info!("profile store: in-memory");
            Arc::new(InMemoryProfileStore::new())
        }
        StoreKind::Postgres => {
            let pool = PgPoolOptions::new()
                .min_connections(config.store.min_connections)
                .max_connections(config.store.max_connections)
                .acquire_timeout(config.store.acquire_timeout())
                .connect(&config.store.database_url)
                .await?;
            info!("profile store: postgres");
            Arc::new(PgProfileStore::new(pool))
        }
    };
    Ok(Arc::new(RetryingStore::new(inner, retry)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        // Failure to install the handler means we can never observe it.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
