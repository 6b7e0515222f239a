// click-sentinel-server/src/hostname.rs
// ============================================================================
// Module: Click Sentinel Hostname Derivation
// Description: Hostname extraction for whitelist entries.
// Purpose: Map a whitelisted URL to its matchable hostname.
// Dependencies: url
// ============================================================================

//! ## Overview
//! Whitelist checks match on the exact URL first and the hostname second.
//! Hostnames are derived once at insertion time: a parseable absolute URL
//! contributes its host; anything else (a bare host, a relative path) falls
//! back to the raw input so the entry still matches itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use url::Url;

// ============================================================================
// SECTION: Derivation
// ============================================================================

/// Derives the matchable hostname for a whitelist entry.
#[must_use]
pub fn derive_hostname(raw: &str) -> String {
    let trimmed = raw.trim();
    Url::parse(trimmed)
        .ok()
        .and_then(|url| url.host_str().map(ToString::to_string))
        .unwrap_or_else(|| trimmed.to_string())
}
