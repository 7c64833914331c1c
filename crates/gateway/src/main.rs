//! LeadSpark API Gateway
//!
//! The HTTP entry point for lead research. Handles:
//! - Lead listing from the lead sheet
//! - News lookup and conversation starter generation per lead
//! - Observability (logging, metrics, request ids)

mod handlers;
mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use leadspark_common::{
    config::{AppConfig, ObservabilityConfig},
    llm::OpenAIChatClient,
    metrics::{self as app_metrics, MODEL_LATENCY_BUCKETS, METRICS_PREFIX},
    news::GoogleNewsClient,
    sheets::GoogleSheetsClient,
    starters::GenerationOptions,
    LeadStore, NewsAggregator, OutreachService, StarterGenerator,
};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub outreach: OutreachService,
    pub metrics: Option<PrometheusHandle>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize tracing
    init_tracing(&config.observability);

    info!("Starting LeadSpark API Gateway v{}", leadspark_common::VERSION);

    // Initialize metrics
    let metrics = if config.observability.metrics_enabled {
        Some(install_metrics()?)
    } else {
        None
    };

    if !config.sheets.is_configured() {
        tracing::warn!("Sheet credentials are incomplete; lead requests will fail");
    }
    if config.llm.api_key.is_empty() {
        tracing::warn!("LLM api_key is not set; fallback starters will be served");
    }

    // Build collaborator clients once and share them across requests
    let sheets = Arc::new(GoogleSheetsClient::new(config.sheets.clone())?);
    let news = Arc::new(GoogleNewsClient::new(config.news.clone())?);
    let model = Arc::new(OpenAIChatClient::new(config.llm.clone())?);

    let outreach = OutreachService::new(
        LeadStore::new(sheets),
        NewsAggregator::new(news, &config.news),
        StarterGenerator::new(model, GenerationOptions::from(&config.llm)),
    );

    let state = AppState {
        outreach,
        metrics,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = config.bind_address();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn install_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(format!("{}_model_duration_seconds", METRICS_PREFIX)),
            MODEL_LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    app_metrics::register_metrics();
    Ok(handle)
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    // API routes
    let api_routes = Router::new()
        .route("/leads", get(handlers::leads::list_leads))
        .route("/generate", post(handlers::generate::generate))

        // Paths used by the original dashboard
        .route(
            "/api/generate",
            get(handlers::leads::list_leads).post(handlers::generate::generate),
        )
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_requests));

    // Compose the app
    Router::new()
        .merge(api_routes)
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
