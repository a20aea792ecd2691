use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use broll_studio::planner_client::PlanningClient;
use broll_studio::renderer_client::RenderClient;
use broll_studio::workflow::WorkflowController;
use broll_studio::{handlers, middleware, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let planner_url =
        std::env::var("PLANNER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let renderer_url =
        std::env::var("RENDERER_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    tracing::info!("🎬 Planner service: {}", planner_url);
    tracing::info!("🎞️ Renderer service: {}", renderer_url);

    let controller = WorkflowController::new(
        PlanningClient::new(planner_url),
        RenderClient::new(renderer_url),
    );
    let shared_state = Arc::new(AppState { controller });

    // Build our application with all routes and shared state
    let app = Router::new()
        .merge(handlers::studio_routes())
        .layer(axum::middleware::from_fn(
            middleware::request_logging_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(Extension(shared_state));

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .unwrap();
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    // Get log level from environment or default to INFO for production
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,broll_studio=trace,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,broll_studio=info,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON logging for production (easier for log aggregation)
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        // Human-readable logging for development
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("🎬 Broll Studio starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        }
    );
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
