use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use multilingual::record::{InitializeRequest, LookupRequest};
use multilingual::store::MemoryStore;
use multilingual::{
    ClientType, ResolveReport, Resolver, ResolverConfig, SchemaDocument, SchemaRegistry,
    TranslationRecord, TranslationStore, load_records_from_file,
};

const BIND_ENV: &str = "MULTILINGUAL_BIND";
const FIXTURE_ENV: &str = "MULTILINGUAL_FIXTURE";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveRequest {
    pub client_type: ClientType,
    pub schemas: SchemaDocument,
    pub data: Value,
    /// JSON pointer to the records inside `data`
    #[serde(default)]
    pub pointer: String,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub data: Value,
    pub report: ResolveReport,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingQuery {
    pub client_type: ClientType,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub resolver: Arc<Resolver<Arc<MemoryStore>>>,
}

impl AppState {
    fn new(store: MemoryStore, config: ResolverConfig) -> Self {
        let store = Arc::new(store);
        let resolver = Resolver::new(Arc::clone(&store)).with_config(config);
        Self {
            store,
            resolver: Arc::new(resolver),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("info".parse()?),
        )
        .init();

    let store = match std::env::var(FIXTURE_ENV) {
        Ok(path) => {
            let records = load_records_from_file(Path::new(&path))?;
            info!("Seeding store with {} records from {}", records.len(), path);
            MemoryStore::from_records(records)
        }
        Err(_) => MemoryStore::new(),
    };
    let config = ResolverConfig::from_env()?;
    let state = AppState::new(store, config);

    info!("🌐 Starting multilingual translation service");

    let app = router(state);
    let bind = std::env::var(BIND_ENV).unwrap_or_else(|_| DEFAULT_BIND.to_string());
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("🚀 Server running at http://{}", bind);

    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/translations", put(upsert_translation))
        .route("/api/translations/list", post(list_translations))
        .route("/api/translations/add", post(add_translations))
        .route("/api/translations/pending", get(pending_translations))
        .route("/api/resolve", post(resolve))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn serve_index() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        include_str!("static/index.html"),
    )
}

async fn list_translations(
    State(state): State<AppState>,
    Json(request): Json<LookupRequest>,
) -> Result<Json<Vec<TranslationRecord>>, ApiError> {
    let records = state
        .store
        .list_translations(request.client_type, &request.conditions)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    info!(
        "Lookup for {}: {} conditions, {} records",
        request.client_type,
        request.conditions.len(),
        records.len()
    );
    Ok(Json(records))
}

async fn add_translations(
    State(state): State<AppState>,
    Json(request): Json<InitializeRequest>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .add_translations(request.client_type, &request.source_map)
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;

    info!(
        "Initialized {} word keys for {}",
        request.source_map.len(),
        request.client_type
    );
    Ok(StatusCode::NO_CONTENT)
}

async fn upsert_translation(
    State(state): State<AppState>,
    Json(record): Json<TranslationRecord>,
) -> Result<StatusCode, ApiError> {
    if record.word_key.is_empty() || record.word_source_value.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "wordKey and wordSourceValue must not be empty",
        ));
    }

    info!(
        "Upserting {} for {}",
        record.composite_key(),
        record.client_type
    );
    state
        .store
        .upsert(record)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn pending_translations(
    State(state): State<AppState>,
    Query(query): Query<PendingQuery>,
) -> Result<Json<Vec<TranslationRecord>>, ApiError> {
    state
        .store
        .untranslated(query.client_type)
        .map(Json)
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))
}

async fn resolve(
    State(state): State<AppState>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let registry = SchemaRegistry::from_document(request.schemas)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let mut data = request.data;
    let report = state
        .resolver
        .resolve_json(request.client_type, &registry, &mut data, &request.pointer)
        .await
        .map_err(|e| api_error(StatusCode::BAD_GATEWAY, e))?;

    info!(
        "Resolved for {}: {} translated, {} initialized",
        request.client_type, report.translated, report.initialized
    );
    Ok(Json(ResolveResponse { data, report }))
}
