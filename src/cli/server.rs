//! HTTP server mode serving both pagination endpoints

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{AppConfig, StoreConfig};
use crate::error::{Error, Result, ResultExt};
use crate::fetcher::{build_fetcher, parse_limit, BoundaryStrategy, PageFetcher, PageRequest};
use crate::store::{seed_books, DuckDbStore, MemoryStore, RecordStore};
use crate::types::BooksResponse;

/// Everything a request handler needs, built once at startup
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn RecordStore>,
    store_native: Arc<dyn PageFetcher>,
    lookahead: Arc<dyn PageFetcher>,
    default_limit: u32,
}

impl AppContext {
    /// Create a context over an existing store
    pub fn new(store: Arc<dyn RecordStore>, partition: &str, default_limit: u32) -> Self {
        Self {
            store_native: build_fetcher(BoundaryStrategy::StoreNative, store.clone(), partition),
            lookahead: build_fetcher(BoundaryStrategy::Lookahead, store.clone(), partition),
            store,
            default_limit: default_limit.max(1),
        }
    }

    /// Open the configured store, seed it, and build the context
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let store = open_store(config)?;
        if config.seed_count > 0 {
            seed_books(store.as_ref(), &config.partition, config.seed_count).await?;
        }
        Ok(Self::new(store, &config.partition, config.default_limit))
    }

    /// Fetcher for a strategy
    pub fn fetcher(&self, strategy: BoundaryStrategy) -> &Arc<dyn PageFetcher> {
        match strategy {
            BoundaryStrategy::StoreNative => &self.store_native,
            BoundaryStrategy::Lookahead => &self.lookahead,
        }
    }

    /// Backing store
    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }
}

/// Open the store named by the config
pub fn open_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match &config.store {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Duckdb { path: Some(path) } => {
            Arc::new(DuckDbStore::open(path, &config.table_name)?)
        }
        StoreConfig::Duckdb { path: None } => {
            Arc::new(DuckDbStore::open_in_memory(&config.table_name)?)
        }
    };
    info!(backend = store.backend(), table = %config.table_name, "store opened");
    Ok(store)
}

/// Query string of both pagination endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageParams {
    /// Page size; anything unparseable falls back to the default
    #[serde(default)]
    limit: Option<String>,
    /// Cursor from the previous page
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Error body
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Build the router
pub fn router(ctx: Arc<AppContext>) -> Router {
    // Any origin may read pages
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route(BoundaryStrategy::StoreNative.route(), get(default_pagination))
        .route(BoundaryStrategy::Lookahead.route(), get(better_pagination))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

/// Start the HTTP server
pub async fn serve(config: &AppConfig) -> Result<()> {
    let ctx = AppContext::from_config(config).await?;
    let app = router(Arc::new(ctx));

    let port = config.server.port;
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to port {port}"))?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Pagination trusting the store's continuation key
async fn default_pagination(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<PageParams>,
) -> Response {
    paginate(&ctx, BoundaryStrategy::StoreNative, params).await
}

/// Pagination with a lookahead sentinel
async fn better_pagination(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<PageParams>,
) -> Response {
    paginate(&ctx, BoundaryStrategy::Lookahead, params).await
}

async fn paginate(ctx: &AppContext, strategy: BoundaryStrategy, params: PageParams) -> Response {
    let limit = parse_limit(params.limit.as_deref(), ctx.default_limit);
    let request = PageRequest::after(limit, params.next_page_token);
    info!(
        %strategy,
        limit,
        has_token = request.cursor.is_some(),
        "page request"
    );

    match ctx.fetcher(strategy).fetch(&request).await {
        Ok(page) => (StatusCode::OK, Json(BooksResponse::from(page))).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(error: &Error) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        tracing::error!(error = %error, "page request failed");
    } else {
        warn!(error = %error, "rejected page request");
    }
    (
        status,
        Json(ErrorBody {
            error: error.to_string(),
        }),
    )
        .into_response()
}
