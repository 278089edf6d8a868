use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidqa_api::config::ServerConfig;
use vidqa_api::router::build_app_router;
use vidqa_api::state::{AppState, SessionStore};
use vidqa_gemini::client::{GeminiClient, GenerationOptions};
use vidqa_gemini::poll::PollConfig;
use vidqa_gemini::service::GeminiAuditService;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidqa_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration (missing GEMINI_API_KEY is fatal here) ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Remote analysis service ---
    let client = GeminiClient::new(
        config.gemini_base_url.clone(),
        config.gemini_api_key.clone(),
    );
    let remote = GeminiAuditService::new(
        client,
        PollConfig {
            interval: config.poll_interval,
            max_wait: config.poll_max_wait,
        },
        GenerationOptions {
            temperature: 0.1,
            timeout: config.inference_timeout,
        },
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        remote: Arc::new(remote),
        sessions: Arc::new(SessionStore::new()),
    };

    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");

    tracing::info!(%addr, "Starting vidqa API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
