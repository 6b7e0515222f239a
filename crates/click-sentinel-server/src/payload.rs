// click-sentinel-server/src/payload.rs
// ============================================================================
// Module: Click Sentinel Wire Payloads
// Description: Request and response bodies for the HTTP API.
// Purpose: Keep the wire contract explicit and separate from core types.
// Dependencies: click-sentinel-core, serde
// ============================================================================

//! ## Overview
//! Ingestion payloads mirror what the monitoring clients send today: the bot
//! verdict arrives as a nullable boolean, matched fields as an array, and
//! most click metadata is optional. Conversion into core types attaches the
//! record time supplied by the server; absent optional fields stay absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use click_sentinel_core::BotVerdict;
use click_sentinel_core::ClickPoint;
use click_sentinel_core::NewSubmission;
use click_sentinel_core::PageClick;
use click_sentinel_core::PointerClick;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::Timestamp;
use click_sentinel_core::WhitelistEntryId;
use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Service Descriptor
// ============================================================================

/// Service descriptor returned by the root endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDescriptor {
    /// Service name.
    pub name: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Endpoint map: method and path to description.
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

/// Health descriptor for the click-detection surface.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status label.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
}

// ============================================================================
// SECTION: Submission Payloads
// ============================================================================

/// Submission event posted by the monitoring client.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionEventPayload {
    /// Full URL the submission targeted.
    pub target_url: String,
    /// Hostname component of the target URL.
    pub target_hostname: String,
    /// URL of the page that produced the submission.
    pub source_url: String,
    /// Field names detected in the submission payload.
    #[serde(default)]
    pub matched_fields: BTreeSet<String>,
    /// Captured values keyed by field name.
    #[serde(default)]
    pub matched_values: BTreeMap<String, String>,
    /// HTTP method of the intercepted request.
    #[serde(default = "default_request_method")]
    pub request_method: String,
    /// Interception status label.
    #[serde(default = "default_status")]
    pub status: String,
    /// Upstream bot/human verdict as a nullable boolean.
    #[serde(default)]
    pub is_bot: BotVerdict,
    /// True iff upstream correlation found a temporally-close click.
    #[serde(default)]
    pub has_click_correlation: bool,
    /// Diagnostic: time between correlated click and request, milliseconds.
    #[serde(default)]
    pub click_time_diff_ms: Option<i64>,
    /// Diagnostic: coordinates of the correlated click.
    #[serde(default)]
    pub click_coordinates: Option<ClickPoint>,
}

impl SubmissionEventPayload {
    /// Converts the payload into a storage record stamped with `recorded_at`.
    #[must_use]
    pub fn into_new_submission(self, recorded_at: Timestamp) -> NewSubmission {
        NewSubmission {
            recorded_at,
            target_url: self.target_url,
            target_hostname: self.target_hostname,
            source_url: self.source_url,
            matched_fields: self.matched_fields,
            matched_values: self.matched_values,
            request_method: self.request_method,
            status: self.status,
            is_bot: self.is_bot,
            has_click_correlation: self.has_click_correlation,
            click_time_diff_ms: self.click_time_diff_ms,
            click_coordinates: self.click_coordinates,
        }
    }
}

/// Response for a stored submission event.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionCreatedResponse {
    /// Identifier assigned by the store.
    pub id: SubmissionId,
}

/// Response for a bulk purge.
#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    /// Number of deleted records.
    pub deleted: u64,
}

/// Query parameters for paginated submission views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionQueryParams {
    /// Optional exact hostname filter.
    #[serde(default)]
    pub hostname: Option<String>,
    /// Number of matching records to skip.
    #[serde(default)]
    pub skip: Option<usize>,
    /// Maximum number of matching records to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================================================
// SECTION: Click Payloads
// ============================================================================

/// Pointer (OS-level) click event.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PointerClickPayload {
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
    /// Observation time in seconds since an arbitrary epoch.
    pub timestamp: f64,
}

impl From<PointerClickPayload> for PointerClick {
    fn from(payload: PointerClickPayload) -> Self {
        Self {
            x: payload.x,
            y: payload.y,
            timestamp: payload.timestamp,
        }
    }
}

/// Page (DOM-level) click event with contextual metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct PageClickPayload {
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
    /// Observation time in seconds since an arbitrary epoch.
    pub timestamp: f64,
    /// Action classification; monitoring clients send "click" by default.
    #[serde(default = "default_action_type")]
    pub action_type: Option<String>,
    /// Opaque action detail payload.
    #[serde(default)]
    pub action_details: Option<String>,
    /// URL of the page hosting the click.
    #[serde(default)]
    pub page_url: Option<String>,
    /// Title of the page hosting the click.
    #[serde(default)]
    pub page_title: Option<String>,
    /// Tag name of the click target element.
    #[serde(default)]
    pub target_tag: Option<String>,
    /// Element identifier of the click target.
    #[serde(default)]
    pub target_id: Option<String>,
    /// Class attribute of the click target.
    #[serde(default)]
    pub target_class: Option<String>,
    /// Browser-reported trusted-event flag.
    #[serde(default = "default_is_trusted")]
    pub is_trusted: Option<bool>,
}

impl From<PageClickPayload> for PageClick {
    fn from(payload: PageClickPayload) -> Self {
        Self {
            x: payload.x,
            y: payload.y,
            timestamp: payload.timestamp,
            action_type: payload.action_type,
            action_details: payload.action_details,
            page_url: payload.page_url,
            page_title: payload.page_title,
            target_tag: payload.target_tag,
            target_id: payload.target_id,
            target_class: payload.target_class,
            is_trusted: payload.is_trusted,
        }
    }
}

/// Acknowledgement for an appended pointer click.
#[derive(Debug, Clone, Serialize)]
pub struct PointerClickAck {
    /// Always true; the buffer cannot reject an append.
    pub success: bool,
}

/// Query parameters for click retrieval.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClickQueryParams {
    /// Maximum number of records to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

// ============================================================================
// SECTION: Whitelist Payloads
// ============================================================================

/// Whitelist addition request.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistAddPayload {
    /// Exact URL to whitelist.
    pub url: String,
    /// Optional operator notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Whitelist membership check parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistCheckParams {
    /// URL to check.
    pub url: String,
}

/// Match source reported by a whitelist check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WhitelistMatchType {
    /// The exact URL is whitelisted.
    Exact,
    /// The URL's hostname is whitelisted.
    Hostname,
}

/// Whitelist membership check result.
#[derive(Debug, Clone, Serialize)]
pub struct WhitelistCheckResponse {
    /// True when the URL or its hostname is whitelisted.
    pub whitelisted: bool,
    /// Match source when whitelisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_type: Option<WhitelistMatchType>,
}

/// Response for a removed whitelist entry.
#[derive(Debug, Clone, Serialize)]
pub struct WhitelistRemovedResponse {
    /// Identifier of the removed entry.
    pub id: WhitelistEntryId,
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Returns the default request method for submission events.
fn default_request_method() -> String {
    "POST".to_string()
}

/// Returns the default interception status for submission events.
fn default_status() -> String {
    "detected".to_string()
}

/// Returns the default action type for page clicks.
fn default_action_type() -> Option<String> {
    Some("click".to_string())
}

/// Returns the default trusted-event flag for page clicks.
const fn default_is_trusted() -> Option<bool> {
    Some(true)
}
