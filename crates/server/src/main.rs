//! Asamblea-rs server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use asamblea_api::{SseBroadcaster, router as api_router, state::AppState};
use asamblea_common::Config;
use asamblea_core::{AssemblyService, BallotService, QuestionService, ReportService};
use asamblea_db::repositories::{
    AssemblyRepository, CodeRepository, QuestionRepository, VoteRepository,
};
use axum::Router;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asamblea=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting asamblea-rs server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = asamblea_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    asamblea_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let assembly_repo = AssemblyRepository::new(Arc::clone(&db));
    let code_repo = CodeRepository::new(Arc::clone(&db));
    let question_repo = QuestionRepository::new(Arc::clone(&db));
    let vote_repo = VoteRepository::new(Arc::clone(&db));

    // Initialize services
    let assembly_service = AssemblyService::new(
        assembly_repo.clone(),
        code_repo.clone(),
        question_repo.clone(),
    );
    let question_service = QuestionService::new(question_repo.clone(), assembly_repo.clone());
    let ballot_service = BallotService::new(
        code_repo,
        vote_repo.clone(),
        question_repo.clone(),
        assembly_repo.clone(),
    );
    let report_service = ReportService::new(assembly_repo, question_repo, vote_repo);

    let state = AppState {
        assembly_service,
        question_service,
        ballot_service,
        report_service,
        sse_broadcaster: SseBroadcaster::new(),
    };

    // Build the application
    let app = Router::new()
        .nest("/api", api_router())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
