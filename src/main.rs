use axum::middleware::from_fn;
use axum::Router;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod config;
mod db;
mod middleware;
mod utils;

use crate::api::auth::AuthDoc;
use crate::config::Config;
use crate::db::queries::activity::ActivityDoc;
use crate::db::queries::balance::BalanceDoc;
use crate::db::queries::offset::OffsetDoc;
use crate::db::queries::overtime::OvertimeDoc;
use crate::db::queries::project::ProjectDoc;
use crate::middleware::auth::jwt_middleware;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    Config::init();

    std::fs::create_dir_all("logs")?;
    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .with_writer(non_blocking)
        .init();

    let pool = db::pool::get_db_pool().await?;

    sqlx::migrate!().run(&pool).await?;

    let merged_doc = AuthDoc::openapi()
        .merge_from(ActivityDoc::openapi())
        .merge_from(ProjectDoc::openapi())
        .merge_from(OvertimeDoc::openapi())
        .merge_from(OffsetDoc::openapi())
        .merge_from(BalanceDoc::openapi());

    // Public routes
    let public_routes = Router::new()
        .merge(api::health::health_routes())
        .merge(api::auth::auth_routes());

    // Private routes: everything behind the JWT gate
    let private_routes = Router::new()
        .merge(api::activity::activity_routes())
        .merge(api::project::project_routes())
        .merge(api::overtime::overtime_routes())
        .merge(api::offset::offset_routes())
        .merge(api::balance::balance_routes())
        .route_layer(from_fn(jwt_middleware));

    let app = Router::new()
        .merge(public_routes)
        .merge(private_routes)
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", merged_doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", merged_doc).path("/rapidoc"))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .with_state(pool.clone());

    let (shutdown_tx, _) = broadcast::channel::<()>(1);
    run_server(app, shutdown_tx, pool).await;

    tracing::info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal(mut shutdown_rx: broadcast::Receiver<()>, pool: PgPool) {
    tokio::select! {
        _ = signal::ctrl_c() => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = shutdown_rx.recv() => tracing::info!("Received shutdown signal."),
    }
    tracing::info!("🛠️ Closing database pool...");
    pool.close().await;
    tracing::info!("✅ Database pool closed. Server shutting down.");
}

async fn run_server(app: Router, shutdown_tx: broadcast::Sender<()>, pool: PgPool) {
    let addr = SocketAddr::from(([127, 0, 0, 1], Config::get().listen_port));
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listener");

    let shutdown = shutdown_signal(shutdown_tx.subscribe(), pool.clone());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .expect("Server encountered an error");
}
