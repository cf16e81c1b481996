//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use axum::{
    extract::Extension,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use mining::{HttpFetcher, PageStore, PatternStore, PostgresStore};

use crate::config::Config;
use crate::kernel::jobs::{analysis_queue, AnalysisQueue, AnalysisWorkerPool, WorkerConfig};
use crate::server::routes::{
    classify_handler, health_handler, list_pages_handler, list_patterns_handler,
    reclassify_handler, schedule_analysis_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub pages: Arc<dyn PageStore>,
    pub patterns: Arc<dyn PatternStore>,
    pub queue: AnalysisQueue,
}

/// Build the Axum application router.
///
/// Also spawns the analysis worker pool as a background task; the
/// returned router only ever enqueues work for it.
pub async fn build_app(pool: PgPool, config: &Config) -> Result<Router> {
    let store = Arc::new(
        PostgresStore::from_pool(pool.clone())
            .await
            .map_err(|e| anyhow!("failed to initialize store: {}", e))?,
    );

    let fetcher = Arc::new(HttpFetcher::with_timeout(Duration::from_secs(
        config.fetch_timeout_secs,
    )));

    let (queue, receiver) = analysis_queue();

    let worker_pool = AnalysisWorkerPool::with_config(
        receiver,
        fetcher,
        store.clone(),
        store.clone(),
        WorkerConfig {
            workers: config.analysis_workers,
            ..Default::default()
        },
    );
    tokio::spawn(worker_pool.run());

    let app_state = AppState {
        db_pool: pool,
        pages: store.clone(),
        patterns: store,
        queue,
    };

    // CORS configuration - the dashboard runs as a separate service
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let app = Router::new()
        .route("/projects/:project_id/analyze", post(schedule_analysis_handler))
        .route("/projects/:project_id/patterns", get(list_patterns_handler))
        .route("/projects/:project_id/pages", get(list_pages_handler))
        .route("/patterns/:pattern_id/classification", put(reclassify_handler))
        .route("/classify", post(classify_handler))
        .route("/health", get(health_handler))
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}
