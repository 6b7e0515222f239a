// click-sentinel-server/src/service.rs
// ============================================================================
// Module: Click Sentinel Service Layer
// Description: Storage-facing operations behind the HTTP handlers.
// Purpose: Keep handlers thin and the operations reachable from tests.
// Dependencies: crate::{audit, error, hostname, payload}, click-sentinel-core
// ============================================================================

//! ## Overview
//! Each operation takes the shared store, the recent-click buffer, or both,
//! plus an explicit record timestamp. The core never reads the wall clock;
//! [`now_timestamp`] is the single place the server stamps one. Audit
//! emission is best-effort and never fails the request that produced it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use click_sentinel_config::RetrievalConfig;
use click_sentinel_core::ActionSummary;
use click_sentinel_core::ActivityStats;
use click_sentinel_core::ClassificationStats;
use click_sentinel_core::ClickQueryFilter;
use click_sentinel_core::ClickStats;
use click_sentinel_core::ClickStore;
use click_sentinel_core::ClickVerdict;
use click_sentinel_core::CorrelationConfig;
use click_sentinel_core::NewPageClickRecord;
use click_sentinel_core::NewWhitelistEntry;
use click_sentinel_core::PageClickRecord;
use click_sentinel_core::RecentClickBuffer;
use click_sentinel_core::SharedEventStore;
use click_sentinel_core::SubmissionCategory;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::SubmissionRecord;
use click_sentinel_core::SubmissionStore;
use click_sentinel_core::Timestamp;
use click_sentinel_core::WhitelistEntry;
use click_sentinel_core::WhitelistEntryId;
use click_sentinel_core::WhitelistStore;
use click_sentinel_core::activity_stats;
use click_sentinel_core::classification_stats;
use click_sentinel_core::click_stats;
use click_sentinel_core::correlate;
use click_sentinel_core::runtime::Pagination;
use click_sentinel_core::runtime::category_view;

use crate::audit::AuditSink;
use crate::error::ApiError;
use crate::hostname::derive_hostname;
use crate::payload::PageClickPayload;
use crate::payload::PointerClickPayload;
use crate::payload::SubmissionEventPayload;
use crate::payload::SubmissionQueryParams;
use crate::payload::WhitelistAddPayload;
use crate::payload::WhitelistCheckResponse;
use crate::payload::WhitelistMatchType;

// ============================================================================
// SECTION: Time
// ============================================================================

/// Returns the current wall-clock time as a record timestamp.
#[must_use]
pub fn now_timestamp() -> Timestamp {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    Timestamp::from_unix_millis(i64::try_from(now.as_millis()).unwrap_or(i64::MAX))
}

// ============================================================================
// SECTION: Submissions
// ============================================================================

/// Stores a submission event and audits the view it lands in.
///
/// # Errors
///
/// Returns [`ApiError`] when the store rejects the write.
pub fn record_submission(
    store: &SharedEventStore,
    audit: &AuditSink,
    payload: SubmissionEventPayload,
    recorded_at: Timestamp,
) -> Result<SubmissionId, ApiError> {
    let submission = payload.into_new_submission(recorded_at);
    let id = store.create_submission(&submission)?;
    let record = SubmissionRecord::from_new(id, submission);
    let category = [
        SubmissionCategory::SuspiciousForReview,
        SubmissionCategory::HumanWithInput,
        SubmissionCategory::HumanBackground,
        SubmissionCategory::Bot,
    ]
    .into_iter()
    .find(|category| category.matches(&record));
    let _ = audit.submission_recorded(id, &record.target_hostname, category);
    Ok(id)
}

/// Returns one category view over stored submissions, paginated after
/// filtering.
///
/// # Errors
///
/// Returns [`ApiError`] when the storage query fails.
pub fn submissions_view(
    store: &SharedEventStore,
    category: SubmissionCategory,
    params: &SubmissionQueryParams,
    retrieval: &RetrievalConfig,
) -> Result<Vec<SubmissionRecord>, ApiError> {
    let records = store.query_submissions(params.hostname.as_deref())?;
    let page = Pagination::new(
        params.skip.unwrap_or(0),
        effective_limit(params.limit, retrieval),
    );
    Ok(category_view(records, category, page))
}

/// Deletes one submission record.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the identifier is unknown.
pub fn delete_submission(store: &SharedEventStore, id: SubmissionId) -> Result<(), ApiError> {
    store.delete_submission(id).map_err(ApiError::from)
}

/// Deletes every submission record and returns the removed count.
///
/// # Errors
///
/// Returns [`ApiError`] when the purge fails.
pub fn purge_submissions(store: &SharedEventStore) -> Result<u64, ApiError> {
    store.delete_all_submissions().map_err(ApiError::from)
}

/// Assembles submission activity statistics relative to `now`.
///
/// # Errors
///
/// Returns [`ApiError`] when a storage query fails.
pub fn activity(store: &SharedEventStore, now: Timestamp) -> Result<ActivityStats, ApiError> {
    activity_stats(store, now).map_err(ApiError::from)
}

/// Assembles human/bot classification statistics.
///
/// # Errors
///
/// Returns [`ApiError`] when a storage query fails.
pub fn classification(store: &SharedEventStore) -> Result<ClassificationStats, ApiError> {
    classification_stats(store).map_err(ApiError::from)
}

// ============================================================================
// SECTION: Clicks
// ============================================================================

/// Appends a pointer click to the recent-click buffer.
pub fn record_pointer_click(buffer: &RecentClickBuffer, payload: PointerClickPayload) {
    buffer.append(payload.into());
}

/// Correlates a page click, persists the record, and returns the verdict.
///
/// # Errors
///
/// Returns [`ApiError`] when the store rejects the write.
pub fn record_page_click(
    store: &SharedEventStore,
    buffer: &RecentClickBuffer,
    audit: &AuditSink,
    config: &CorrelationConfig,
    payload: PageClickPayload,
    created_at: Timestamp,
) -> Result<ClickVerdict, ApiError> {
    let verdict = correlate(buffer, payload.timestamp, config);
    let record = NewPageClickRecord {
        observation: payload.into(),
        verdict: verdict.clone(),
        created_at,
    };
    store.create_click(&record)?;
    let _ = audit.click_verdict(
        record.observation.action_type.as_deref(),
        record.observation.page_title.as_deref(),
        &verdict,
    );
    Ok(verdict)
}

/// Returns stored clicks matching the filter, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] when the storage query fails.
pub fn clicks(
    store: &SharedEventStore,
    filter: ClickQueryFilter,
    limit: Option<usize>,
    retrieval: &RetrievalConfig,
) -> Result<Vec<PageClickRecord>, ApiError> {
    store.query_clicks(filter, effective_limit(limit, retrieval)).map_err(ApiError::from)
}

/// Assembles click statistics, including buffer occupancy.
///
/// # Errors
///
/// Returns [`ApiError`] when a storage query fails.
pub fn click_statistics(
    store: &SharedEventStore,
    buffer: &RecentClickBuffer,
) -> Result<ClickStats, ApiError> {
    click_stats(store, buffer).map_err(ApiError::from)
}

/// Returns the per-action-type click breakdown.
///
/// # Errors
///
/// Returns [`ApiError`] when the storage query fails.
pub fn action_breakdown(store: &SharedEventStore) -> Result<Vec<ActionSummary>, ApiError> {
    store.action_summaries().map_err(ApiError::from)
}

// ============================================================================
// SECTION: Whitelist
// ============================================================================

/// Adds a URL to the whitelist, deriving its hostname at insertion.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] when the URL is already whitelisted.
pub fn add_whitelist_entry(
    store: &SharedEventStore,
    payload: WhitelistAddPayload,
    added_at: Timestamp,
) -> Result<WhitelistEntry, ApiError> {
    let hostname = derive_hostname(&payload.url);
    let entry = NewWhitelistEntry {
        url: payload.url,
        hostname,
        added_at,
        notes: payload.notes,
    };
    store.add_entry(&entry).map_err(ApiError::from)
}

/// Returns every whitelist entry, newest first.
///
/// # Errors
///
/// Returns [`ApiError`] when the storage query fails.
pub fn whitelist_entries(store: &SharedEventStore) -> Result<Vec<WhitelistEntry>, ApiError> {
    store.list_entries().map_err(ApiError::from)
}

/// Checks whether a URL is whitelisted, exact match before hostname match.
///
/// # Errors
///
/// Returns [`ApiError`] when the storage query fails.
pub fn check_whitelist(
    store: &SharedEventStore,
    url: &str,
) -> Result<WhitelistCheckResponse, ApiError> {
    if store.find_by_url(url)?.is_some() {
        return Ok(WhitelistCheckResponse {
            whitelisted: true,
            match_type: Some(WhitelistMatchType::Exact),
        });
    }
    let hostname = derive_hostname(url);
    if store.find_by_hostname(&hostname)?.is_some() {
        return Ok(WhitelistCheckResponse {
            whitelisted: true,
            match_type: Some(WhitelistMatchType::Hostname),
        });
    }
    Ok(WhitelistCheckResponse {
        whitelisted: false,
        match_type: None,
    })
}

/// Removes one whitelist entry.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] when the identifier is unknown.
pub fn remove_whitelist_entry(
    store: &SharedEventStore,
    id: WhitelistEntryId,
) -> Result<(), ApiError> {
    store.delete_entry(id).map_err(ApiError::from)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Clamps a requested page limit to the configured ceiling.
fn effective_limit(requested: Option<usize>, retrieval: &RetrievalConfig) -> usize {
    requested.unwrap_or(retrieval.default_page_limit).min(retrieval.max_page_limit)
}
