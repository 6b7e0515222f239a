// click-sentinel-core/src/core/whitelist.rs
// ============================================================================
// Module: Click Sentinel Whitelist Types
// Description: Whitelist entry shapes for trusted submission targets.
// Purpose: Provide stable types for the whitelist storage collaborator.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Whitelisted URLs are exempt from review. Entries match either the exact
//! URL or the derived hostname; derivation happens at the API boundary, not
//! here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::WhitelistEntryId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Whitelist Entries
// ============================================================================

/// Whitelist payload handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWhitelistEntry {
    /// Exact URL being whitelisted.
    pub url: String,
    /// Hostname derived from the URL at insertion time.
    pub hostname: String,
    /// Entry creation time, supplied by the caller.
    pub added_at: Timestamp,
    /// Optional operator notes.
    pub notes: Option<String>,
}

/// Persisted whitelist entry.
///
/// # Invariants
/// - `url` is unique within the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitelistEntry {
    /// Storage identifier.
    pub id: WhitelistEntryId,
    /// Exact URL being whitelisted.
    pub url: String,
    /// Hostname derived from the URL at insertion time.
    pub hostname: String,
    /// Entry creation time.
    pub added_at: Timestamp,
    /// Optional operator notes.
    pub notes: Option<String>,
}
