// click-sentinel-server/src/audit.rs
// ============================================================================
// Module: Click Sentinel Audit Sink
// Description: JSON-line audit records for verdicts and ingestion events.
// Purpose: Persist observable decisions without a logging framework dep.
// Dependencies: click-sentinel-core, serde_json, std
// ============================================================================

//! ## Overview
//! The audit sink writes one JSON record per observable event to a writer
//! guarded by a mutex. It is intentionally dependency-light so deployments
//! can redirect the stream without redesign. Audit failures never fail the
//! request that produced them; callers treat emission as best-effort.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use click_sentinel_core::ClickVerdict;
use click_sentinel_core::SubmissionCategory;
use click_sentinel_core::SubmissionId;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Audit sink errors.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Writing the audit record failed.
    #[error("audit write failed: {0}")]
    WriteFailed(String),
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// JSON-line audit sink.
pub struct AuditSink {
    /// Output writer for audit records.
    writer: Mutex<Box<dyn Write + Send>>,
}

impl AuditSink {
    /// Creates an audit sink over the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Creates an audit sink writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Records the verdict attached to a page click.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the record cannot be written.
    pub fn click_verdict(
        &self,
        action_type: Option<&str>,
        page_title: Option<&str>,
        verdict: &ClickVerdict,
    ) -> Result<(), AuditError> {
        self.emit(&json!({
            "event": "click_verdict",
            "action_type": action_type,
            "page_title": page_title,
            "is_suspicious": verdict.is_suspicious,
            "confidence": verdict.confidence,
            "reason": verdict.reason,
        }))
    }

    /// Records a stored submission and the first view it lands in.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError`] when the record cannot be written.
    pub fn submission_recorded(
        &self,
        id: SubmissionId,
        target_hostname: &str,
        category: Option<SubmissionCategory>,
    ) -> Result<(), AuditError> {
        self.emit(&json!({
            "event": "submission_recorded",
            "id": id,
            "target_hostname": target_hostname,
            "category": category,
        }))
    }

    /// Writes one JSON record followed by a newline.
    fn emit(&self, record: &serde_json::Value) -> Result<(), AuditError> {
        let mut guard = self
            .writer
            .lock()
            .map_err(|_| AuditError::WriteFailed("audit writer mutex poisoned".to_string()))?;
        serde_json::to_writer(&mut *guard, record)
            .map_err(|err| AuditError::WriteFailed(err.to_string()))?;
        guard.write_all(b"\n").map_err(|err| AuditError::WriteFailed(err.to_string()))?;
        guard.flush().map_err(|err| AuditError::WriteFailed(err.to_string()))
    }
}
