// click-sentinel-core/src/core/click.rs
// ============================================================================
// Module: Click Sentinel Click Types
// Description: Pointer/page click observations, verdicts, and stored records.
// Purpose: Provide stable, serializable click structures for correlation.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Two independent click signals feed the correlation engine: pointer clicks
//! observed at the hardware/OS level and page clicks observed inside
//! monitored page content. Pointer clicks live only in the recent-click
//! buffer; page clicks are persisted together with the verdict attached at
//! creation time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ClickRecordId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Pointer Clicks
// ============================================================================

/// Hardware/OS-level click observation, independent of page content.
///
/// # Invariants
/// - `timestamp` is floating-point seconds since an arbitrary epoch with
///   sub-millisecond precision; arrival order is assumed monotonic in it.
/// - Never mutated; destroyed only by buffer eviction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerClick {
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
    /// Observation time in seconds since an arbitrary epoch.
    pub timestamp: f64,
}

// ============================================================================
// SECTION: Page Clicks
// ============================================================================

/// Page-level (DOM) click observation with contextual metadata.
///
/// # Invariants
/// - `x`, `y`, and `timestamp` share the coordinate space and epoch of
///   [`PointerClick`].
/// - Metadata fields are supplied by the caller and opaque to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageClick {
    /// Horizontal screen coordinate.
    pub x: f64,
    /// Vertical screen coordinate.
    pub y: f64,
    /// Observation time in seconds since an arbitrary epoch.
    pub timestamp: f64,
    /// Action classification supplied by the observer (for example "click").
    pub action_type: Option<String>,
    /// Opaque action detail payload supplied by the observer.
    pub action_details: Option<String>,
    /// URL of the page hosting the click.
    pub page_url: Option<String>,
    /// Title of the page hosting the click.
    pub page_title: Option<String>,
    /// Tag name of the click target element.
    pub target_tag: Option<String>,
    /// Element identifier of the click target.
    pub target_id: Option<String>,
    /// Class attribute of the click target.
    pub target_class: Option<String>,
    /// Browser-reported trusted-event flag.
    pub is_trusted: Option<bool>,
}

// ============================================================================
// SECTION: Correlation Verdict
// ============================================================================

/// Correlation verdict attached to a page click at record creation.
///
/// # Invariants
/// - `confidence` lies in `[0, 1]`.
/// - `reason` is present only when `is_suspicious` is true (by convention;
///   not enforced).
/// - Set once at creation and never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClickVerdict {
    /// True when no corroborating pointer click was found.
    pub is_suspicious: bool,
    /// Verdict confidence in `[0, 1]`.
    pub confidence: f64,
    /// Optional free-text explanation for suspicious verdicts.
    pub reason: Option<String>,
}

// ============================================================================
// SECTION: Stored Records
// ============================================================================

/// Page-click record payload handed to the storage collaborator.
///
/// # Invariants
/// - `created_at` is supplied by the caller; the core never reads the
///   wall clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPageClickRecord {
    /// Page click observation.
    #[serde(flatten)]
    pub observation: PageClick,
    /// Correlation verdict attached at creation.
    #[serde(flatten)]
    pub verdict: ClickVerdict,
    /// Record creation time.
    pub created_at: Timestamp,
}

/// Persisted page-click record.
///
/// # Invariants
/// - Immutable after creation; deleted only by bulk administrative purge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageClickRecord {
    /// Storage identifier.
    pub id: ClickRecordId,
    /// Page click observation.
    #[serde(flatten)]
    pub observation: PageClick,
    /// Correlation verdict attached at creation.
    #[serde(flatten)]
    pub verdict: ClickVerdict,
    /// Record creation time.
    pub created_at: Timestamp,
}
