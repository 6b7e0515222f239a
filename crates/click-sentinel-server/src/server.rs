// click-sentinel-server/src/server.rs
// ============================================================================
// Module: Click Sentinel HTTP Server
// Description: axum router, handlers, and server bootstrap.
// Purpose: Expose the service operations over HTTP.
// Dependencies: crate::{audit, error, payload, service}, axum, tokio
// ============================================================================

//! ## Overview
//! Handlers extract state and wire payloads, call one service function, and
//! map the result to a JSON response. The recent-click buffer is constructed
//! once at startup and shared by handle; nothing in this module holds
//! process-global state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::routing::post;
use click_sentinel_config::ClickSentinelConfig;
use click_sentinel_config::EventStoreType;
use click_sentinel_config::RetrievalConfig;
use click_sentinel_core::ActionSummary;
use click_sentinel_core::ActivityStats;
use click_sentinel_core::ClassificationStats;
use click_sentinel_core::ClickQueryFilter;
use click_sentinel_core::ClickStats;
use click_sentinel_core::ClickVerdict;
use click_sentinel_core::CorrelationConfig;
use click_sentinel_core::InMemoryEventStore;
use click_sentinel_core::PageClickRecord;
use click_sentinel_core::RecentClickBuffer;
use click_sentinel_core::SharedEventStore;
use click_sentinel_core::SubmissionCategory;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::SubmissionRecord;
use click_sentinel_core::WhitelistEntry;
use click_sentinel_core::WhitelistEntryId;
use click_sentinel_store_sqlite::SqliteEventStore;
use click_sentinel_store_sqlite::SqliteStoreConfig;
use thiserror::Error;

use crate::audit::AuditSink;
use crate::error::ApiError;
use crate::payload::ClickQueryParams;
use crate::payload::HealthResponse;
use crate::payload::PageClickPayload;
use crate::payload::PointerClickAck;
use crate::payload::PointerClickPayload;
use crate::payload::PurgeResponse;
use crate::payload::ServiceDescriptor;
use crate::payload::SubmissionCreatedResponse;
use crate::payload::SubmissionEventPayload;
use crate::payload::SubmissionQueryParams;
use crate::payload::WhitelistAddPayload;
use crate::payload::WhitelistCheckParams;
use crate::payload::WhitelistCheckResponse;
use crate::payload::WhitelistRemovedResponse;
use crate::service;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server bootstrap errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration is invalid for serving.
    #[error("server config error: {0}")]
    Config(String),
    /// Store initialization failed.
    #[error("server init error: {0}")]
    Init(String),
    /// Transport-level failure while serving.
    #[error("server transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared server state handed to every handler.
pub struct AppState {
    /// Storage collaborator.
    pub store: SharedEventStore,
    /// Recent pointer-click buffer.
    pub buffer: Arc<RecentClickBuffer>,
    /// Correlation engine configuration.
    pub correlation: CorrelationConfig,
    /// Retrieval pagination configuration.
    pub retrieval: RetrievalConfig,
    /// Audit sink for verdicts and ingestion events.
    pub audit: Arc<AuditSink>,
}

// ============================================================================
// SECTION: Bootstrap
// ============================================================================

/// Builds the event store from configuration.
fn build_event_store(config: &ClickSentinelConfig) -> Result<SharedEventStore, ServerError> {
    match config.store.store_type {
        EventStoreType::Memory => Ok(SharedEventStore::from_store(InMemoryEventStore::new())),
        EventStoreType::Sqlite => {
            let path = config
                .store
                .path
                .clone()
                .ok_or_else(|| ServerError::Config("sqlite store requires path".to_string()))?;
            let store_config = SqliteStoreConfig {
                path,
                busy_timeout_ms: config.store.busy_timeout_ms,
                journal_mode: config.store.journal_mode,
                sync_mode: config.store.sync_mode,
            };
            let store = SqliteEventStore::new(&store_config)
                .map_err(|err| ServerError::Init(err.to_string()))?;
            Ok(SharedEventStore::from_store(store))
        }
    }
}

/// Builds the application state from configuration.
fn build_state(config: &ClickSentinelConfig) -> Result<Arc<AppState>, ServerError> {
    let store = build_event_store(config)?;
    let buffer = Arc::new(RecentClickBuffer::with_capacity(config.detection.buffer_capacity));
    Ok(Arc::new(AppState {
        store,
        buffer,
        correlation: CorrelationConfig::new(config.detection.correlation_window_ms),
        retrieval: config.retrieval.clone(),
        audit: Arc::new(AuditSink::stdout()),
    }))
}

/// Builds the HTTP router over the given state.
#[must_use]
pub fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(describe_service))
        .route(
            "/api/submissions",
            post(create_submission).get(list_suspicious).delete(purge_submissions),
        )
        .route("/api/submissions/human", get(list_human))
        .route("/api/submissions/human/background", get(list_human_background))
        .route("/api/submissions/bot", get(list_bots))
        .route("/api/submissions/{id}", axum::routing::delete(delete_submission))
        .route("/api/stats", get(activity_statistics))
        .route("/api/stats/classification", get(classification_statistics))
        .route("/api/whitelist", post(add_whitelist).get(list_whitelist))
        .route("/api/whitelist/check", get(check_whitelist))
        .route("/api/whitelist/{id}", axum::routing::delete(remove_whitelist))
        .route("/api/clicks/health", get(click_health))
        .route("/api/clicks/stats", get(click_statistics))
        .route("/api/clicks/suspicious", get(suspicious_clicks))
        .route("/api/clicks/recent", get(recent_clicks))
        .route("/api/clicks/actions", get(click_actions))
        .route("/api/clicks/pointer", post(ingest_pointer_click))
        .route("/api/clicks/page", post(ingest_page_click))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Runs the HTTP server until the listener fails.
///
/// # Errors
///
/// Returns [`ServerError`] when configuration, store initialization, or the
/// transport fails.
pub async fn serve(config: ClickSentinelConfig) -> Result<(), ServerError> {
    config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
    let addr: SocketAddr =
        config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
    let max_body_bytes = config.server.max_body_bytes;
    let state = build_state(&config)?;
    let app = build_router(state, max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|_| ServerError::Transport("http bind failed".to_string()))?;
    axum::serve(listener, app)
        .await
        .map_err(|_| ServerError::Transport("http server failed".to_string()))
}

// ============================================================================
// SECTION: Root Handlers
// ============================================================================

/// Describes the service and its endpoint map.
async fn describe_service() -> Json<ServiceDescriptor> {
    let endpoints: BTreeMap<&'static str, &'static str> = [
        ("POST /api/submissions", "Store a submission event"),
        ("GET /api/submissions", "Suspicious submissions pending review"),
        ("GET /api/submissions/human", "Human submissions with user input"),
        ("GET /api/submissions/human/background", "Human background submissions"),
        ("GET /api/submissions/bot", "Bot-initiated submissions"),
        ("DELETE /api/submissions/{id}", "Delete one submission"),
        ("DELETE /api/submissions", "Purge all submissions"),
        ("GET /api/stats", "Submission activity statistics"),
        ("GET /api/stats/classification", "Human/bot classification statistics"),
        ("POST /api/whitelist", "Whitelist a URL"),
        ("GET /api/whitelist", "List whitelisted URLs"),
        ("GET /api/whitelist/check", "Check whether a URL is whitelisted"),
        ("DELETE /api/whitelist/{id}", "Remove a whitelist entry"),
        ("GET /api/clicks/health", "Click detection health"),
        ("GET /api/clicks/stats", "Click detection statistics"),
        ("GET /api/clicks/suspicious", "Suspicious clicks"),
        ("GET /api/clicks/recent", "Recent clicks"),
        ("GET /api/clicks/actions", "Per-action-type click breakdown"),
        ("POST /api/clicks/pointer", "Record a pointer click"),
        ("POST /api/clicks/page", "Record and correlate a page click"),
    ]
    .into_iter()
    .collect();
    Json(ServiceDescriptor {
        name: "click-sentinel",
        version: env!("CARGO_PKG_VERSION"),
        endpoints,
    })
}

// ============================================================================
// SECTION: Submission Handlers
// ============================================================================

/// Stores a submission event.
async fn create_submission(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmissionEventPayload>,
) -> Result<(StatusCode, Json<SubmissionCreatedResponse>), ApiError> {
    let id = service::record_submission(
        &state.store,
        &state.audit,
        payload,
        service::now_timestamp(),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(SubmissionCreatedResponse {
            id,
        }),
    ))
}

/// Returns the suspicious-for-review view.
async fn list_suspicious(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmissionQueryParams>,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError> {
    submissions_response(&state, SubmissionCategory::SuspiciousForReview, &params)
}

/// Returns the human-with-input view.
async fn list_human(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmissionQueryParams>,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError> {
    submissions_response(&state, SubmissionCategory::HumanWithInput, &params)
}

/// Returns the human-background view.
async fn list_human_background(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmissionQueryParams>,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError> {
    submissions_response(&state, SubmissionCategory::HumanBackground, &params)
}

/// Returns the bot view.
async fn list_bots(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SubmissionQueryParams>,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError> {
    submissions_response(&state, SubmissionCategory::Bot, &params)
}

/// Shared body for the four category views.
fn submissions_response(
    state: &AppState,
    category: SubmissionCategory,
    params: &SubmissionQueryParams,
) -> Result<Json<Vec<SubmissionRecord>>, ApiError> {
    let records = service::submissions_view(&state.store, category, params, &state.retrieval)?;
    Ok(Json(records))
}

/// Deletes one submission record.
async fn delete_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    service::delete_submission(&state.store, SubmissionId::new(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Purges every submission record.
async fn purge_submissions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PurgeResponse>, ApiError> {
    let deleted = service::purge_submissions(&state.store)?;
    Ok(Json(PurgeResponse {
        deleted,
    }))
}

/// Returns submission activity statistics.
async fn activity_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ActivityStats>, ApiError> {
    let stats = service::activity(&state.store, service::now_timestamp())?;
    Ok(Json(stats))
}

/// Returns human/bot classification statistics.
async fn classification_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClassificationStats>, ApiError> {
    let stats = service::classification(&state.store)?;
    Ok(Json(stats))
}

// ============================================================================
// SECTION: Whitelist Handlers
// ============================================================================

/// Whitelists a URL.
async fn add_whitelist(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WhitelistAddPayload>,
) -> Result<(StatusCode, Json<WhitelistEntry>), ApiError> {
    let entry =
        service::add_whitelist_entry(&state.store, payload, service::now_timestamp())?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Lists every whitelist entry.
async fn list_whitelist(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<WhitelistEntry>>, ApiError> {
    let entries = service::whitelist_entries(&state.store)?;
    Ok(Json(entries))
}

/// Checks whether a URL is whitelisted.
async fn check_whitelist(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WhitelistCheckParams>,
) -> Result<Json<WhitelistCheckResponse>, ApiError> {
    let result = service::check_whitelist(&state.store, &params.url)?;
    Ok(Json(result))
}

/// Removes one whitelist entry.
async fn remove_whitelist(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<WhitelistRemovedResponse>, ApiError> {
    let id = WhitelistEntryId::new(id);
    service::remove_whitelist_entry(&state.store, id)?;
    Ok(Json(WhitelistRemovedResponse {
        id,
    }))
}

// ============================================================================
// SECTION: Click Handlers
// ============================================================================

/// Reports click detection health.
async fn click_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Returns click detection statistics.
async fn click_statistics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClickStats>, ApiError> {
    let stats = service::click_statistics(&state.store, &state.buffer)?;
    Ok(Json(stats))
}

/// Returns suspicious clicks, newest first.
async fn suspicious_clicks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClickQueryParams>,
) -> Result<Json<Vec<PageClickRecord>>, ApiError> {
    let records = service::clicks(
        &state.store,
        ClickQueryFilter::SuspiciousOnly,
        params.limit,
        &state.retrieval,
    )?;
    Ok(Json(records))
}

/// Returns recent clicks, newest first.
async fn recent_clicks(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ClickQueryParams>,
) -> Result<Json<Vec<PageClickRecord>>, ApiError> {
    let records =
        service::clicks(&state.store, ClickQueryFilter::All, params.limit, &state.retrieval)?;
    Ok(Json(records))
}

/// Returns the per-action-type click breakdown.
async fn click_actions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActionSummary>>, ApiError> {
    let rows = service::action_breakdown(&state.store)?;
    Ok(Json(rows))
}

/// Appends a pointer click to the buffer.
async fn ingest_pointer_click(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PointerClickPayload>,
) -> Json<PointerClickAck> {
    service::record_pointer_click(&state.buffer, payload);
    Json(PointerClickAck {
        success: true,
    })
}

/// Correlates and persists a page click, returning the verdict.
async fn ingest_page_click(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PageClickPayload>,
) -> Result<Json<ClickVerdict>, ApiError> {
    let verdict = service::record_page_click(
        &state.store,
        &state.buffer,
        &state.audit,
        &state.correlation,
        payload,
        service::now_timestamp(),
    )?;
    Ok(Json(verdict))
}
