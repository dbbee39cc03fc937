use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use engine::persist::{load_snapshot, IndexPaths};
use engine::{execute, EnglishNormalizer, MatchedDocument, QueryKind, Snapshot};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub kind: QueryKind,
    pub took_s: f64,
    pub total_hits: usize,
    pub documents: Vec<MatchedDocument>,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: u32,
    pub file_name: String,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    /// Swapped wholesale on reload; handlers clone the inner Arc and
    /// evaluate without holding the lock.
    pub index: Arc<RwLock<Arc<Snapshot>>>,
    pub normalizer: Arc<EnglishNormalizer>,
    pub index_dir: PathBuf,
    pub admin_token: Option<String>,
}

impl AppState {
    fn snapshot(&self) -> Arc<Snapshot> {
        self.index.read().clone()
    }
}

pub fn build_app(index_dir: String) -> Result<Router> {
    let paths = IndexPaths::new(&index_dir);
    let (snapshot, meta) = load_snapshot(&paths)?;
    tracing::info!(
        num_docs = meta.num_docs,
        num_terms = meta.num_terms,
        created_at = %meta.created_at,
        "snapshot loaded"
    );
    let app_state = AppState {
        index: Arc::new(RwLock::new(Arc::new(snapshot))),
        normalizer: Arc::new(EnglishNormalizer::new()),
        index_dir: PathBuf::from(&index_dir),
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/reload", post(reload_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());
    Ok(app)
}

/// CORS_ALLOW_ORIGIN holds a comma-separated origin list; unset or
/// unparsable means any origin.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => val.split(',').filter_map(|s| s.trim().parse().ok()).collect(),
        Err(_) => Vec::new(),
    };
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let snapshot = state.snapshot();
    let outcome = execute(&params.q, &snapshot, state.normalizer.as_ref())
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let elapsed = start.elapsed();
    tracing::debug!(query = %params.q, kind = ?outcome.kind, hits = outcome.len(), "query served");
    Ok(Json(SearchResponse {
        query: params.q,
        kind: outcome.kind,
        took_s: elapsed.as_secs_f64(),
        total_hits: outcome.len(),
        documents: outcome.matches,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<u32>,
) -> Result<Json<DocResponse>, (StatusCode, String)> {
    let snapshot = state.snapshot();
    match snapshot.documents.get(doc_id) {
        Some(entry) => Ok(Json(DocResponse {
            doc_id,
            file_name: entry.file_name.clone(),
            title: entry.title.clone(),
        })),
        None => Err((StatusCode::NOT_FOUND, format!("no document {doc_id}"))),
    }
}

async fn reload_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let paths = IndexPaths::new(&state.index_dir);
    let (snapshot, meta) = load_snapshot(&paths)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    *state.index.write() = Arc::new(snapshot);
    tracing::info!(num_docs = meta.num_docs, num_terms = meta.num_terms, "snapshot reloaded");
    Ok(Json(serde_json::json!({
        "num_docs": meta.num_docs,
        "num_terms": meta.num_terms,
    })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match state.admin_token.as_deref() {
        Some(token) => token,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    match headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()) {
        Some(provided) if provided == required => Ok(()),
        _ => Err((StatusCode::UNAUTHORIZED, "invalid admin token".into())),
    }
}
