// click-sentinel-core/src/interfaces/mod.rs
// ============================================================================
// Module: Click Sentinel Interfaces
// Description: Backend-agnostic storage interfaces for events and whitelist.
// Purpose: Define the contract surfaces used by the Click Sentinel runtime.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how Click Sentinel integrates with its storage
//! collaborator without embedding backend-specific details. Implementations
//! must be deterministic: query results are ordered by descending record
//! time, with the storage identifier as the tie-breaker.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::ActionSummary;
use crate::core::ClickRecordId;
use crate::core::DailyCount;
use crate::core::HostnameCount;
use crate::core::NewPageClickRecord;
use crate::core::NewSubmission;
use crate::core::NewWhitelistEntry;
use crate::core::PageClickRecord;
use crate::core::SubmissionId;
use crate::core::SubmissionRecord;
use crate::core::Timestamp;
use crate::core::WhitelistEntry;
use crate::core::WhitelistEntryId;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Event store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error.
    #[error("event store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("event store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("event store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("event store invalid data: {0}")]
    Invalid(String),
    /// Identifier-based lookup found no matching record.
    #[error("event store record not found: {0}")]
    NotFound(String),
    /// Uniqueness constraint rejected the write.
    #[error("event store conflict: {0}")]
    Conflict(String),
    /// Store reported an error.
    #[error("event store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Filters
// ============================================================================

/// Count filter for submission records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionCountFilter {
    /// Count every stored submission.
    All,
    /// Count submissions recorded at or after the given time.
    Since(Timestamp),
    /// Count submissions with a `Human` verdict.
    Human,
    /// Count submissions with a `Bot` verdict.
    Bot,
    /// Count submissions without a click correlation.
    Uncorrelated,
}

/// Query filter for stored page clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickQueryFilter {
    /// Return every stored click.
    All,
    /// Return only clicks flagged suspicious.
    SuspiciousOnly,
}

/// Count filter for stored page clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickCountFilter {
    /// Count every stored click.
    All,
    /// Count clicks flagged suspicious.
    Suspicious,
    /// Count clicks with a legitimate verdict.
    Legitimate,
}

// ============================================================================
// SECTION: Submission Store
// ============================================================================

/// Storage collaborator for submission records.
pub trait SubmissionStore {
    /// Persists a submission record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError>;

    /// Returns stored submissions, newest first, optionally restricted to an
    /// exact (case-sensitive) target hostname.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn query_submissions(
        &self,
        hostname: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, StoreError>;

    /// Counts stored submissions matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn count_submissions(&self, filter: SubmissionCountFilter) -> Result<u64, StoreError>;

    /// Returns the most frequent target hostnames, descending by count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn top_hostnames(&self, limit: usize) -> Result<Vec<HostnameCount>, StoreError>;

    /// Returns per-UTC-day submission counts at or after `since`, ascending
    /// by date.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn daily_counts(&self, since: Timestamp) -> Result<Vec<DailyCount>, StoreError>;

    /// Deletes one submission record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the identifier is unknown, and
    /// [`StoreError`] for other failures.
    fn delete_submission(&self, id: SubmissionId) -> Result<(), StoreError>;

    /// Deletes every submission record and returns the removed count.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the purge fails.
    fn delete_all_submissions(&self) -> Result<u64, StoreError>;
}

// ============================================================================
// SECTION: Click Store
// ============================================================================

/// Storage collaborator for page-click records.
pub trait ClickStore {
    /// Persists a page-click record and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    fn create_click(&self, record: &NewPageClickRecord) -> Result<ClickRecordId, StoreError>;

    /// Returns stored clicks matching the filter, newest first, capped at
    /// `limit` rows.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn query_clicks(
        &self,
        filter: ClickQueryFilter,
        limit: usize,
    ) -> Result<Vec<PageClickRecord>, StoreError>;

    /// Counts stored clicks matching the filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn count_clicks(&self, filter: ClickCountFilter) -> Result<u64, StoreError>;

    /// Counts distinct non-null page URLs across stored clicks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn distinct_page_count(&self) -> Result<u64, StoreError>;

    /// Returns one row per distinct observed action type with total and
    /// suspicious counts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn action_summaries(&self) -> Result<Vec<ActionSummary>, StoreError>;
}

// ============================================================================
// SECTION: Whitelist Store
// ============================================================================

/// Storage collaborator for whitelist entries.
pub trait WhitelistStore {
    /// Adds a whitelist entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] when the URL is already whitelisted,
    /// and [`StoreError`] for other failures.
    fn add_entry(&self, entry: &NewWhitelistEntry) -> Result<WhitelistEntry, StoreError>;

    /// Returns every whitelist entry, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn list_entries(&self) -> Result<Vec<WhitelistEntry>, StoreError>;

    /// Finds an entry by exact URL match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_by_url(&self, url: &str) -> Result<Option<WhitelistEntry>, StoreError>;

    /// Finds an entry by exact hostname match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn find_by_hostname(&self, hostname: &str) -> Result<Option<WhitelistEntry>, StoreError>;

    /// Deletes one whitelist entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the identifier is unknown, and
    /// [`StoreError`] for other failures.
    fn delete_entry(&self, id: WhitelistEntryId) -> Result<(), StoreError>;
}

// ============================================================================
// SECTION: Combined Store
// ============================================================================

/// Combined storage collaborator covering every persisted entity.
pub trait EventStore: SubmissionStore + ClickStore + WhitelistStore {}

impl<T> EventStore for T where T: SubmissionStore + ClickStore + WhitelistStore {}

/// Shared event store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedEventStore {
    /// Inner store implementation.
    inner: Arc<dyn EventStore + Send + Sync>,
}

impl SharedEventStore {
    /// Wraps an event store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl EventStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn EventStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl SubmissionStore for SharedEventStore {
    fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError> {
        self.inner.create_submission(submission)
    }

    fn query_submissions(
        &self,
        hostname: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        self.inner.query_submissions(hostname)
    }

    fn count_submissions(&self, filter: SubmissionCountFilter) -> Result<u64, StoreError> {
        self.inner.count_submissions(filter)
    }

    fn top_hostnames(&self, limit: usize) -> Result<Vec<HostnameCount>, StoreError> {
        self.inner.top_hostnames(limit)
    }

    fn daily_counts(&self, since: Timestamp) -> Result<Vec<DailyCount>, StoreError> {
        self.inner.daily_counts(since)
    }

    fn delete_submission(&self, id: SubmissionId) -> Result<(), StoreError> {
        self.inner.delete_submission(id)
    }

    fn delete_all_submissions(&self) -> Result<u64, StoreError> {
        self.inner.delete_all_submissions()
    }
}

impl ClickStore for SharedEventStore {
    fn create_click(&self, record: &NewPageClickRecord) -> Result<ClickRecordId, StoreError> {
        self.inner.create_click(record)
    }

    fn query_clicks(
        &self,
        filter: ClickQueryFilter,
        limit: usize,
    ) -> Result<Vec<PageClickRecord>, StoreError> {
        self.inner.query_clicks(filter, limit)
    }

    fn count_clicks(&self, filter: ClickCountFilter) -> Result<u64, StoreError> {
        self.inner.count_clicks(filter)
    }

    fn distinct_page_count(&self) -> Result<u64, StoreError> {
        self.inner.distinct_page_count()
    }

    fn action_summaries(&self) -> Result<Vec<ActionSummary>, StoreError> {
        self.inner.action_summaries()
    }
}

impl WhitelistStore for SharedEventStore {
    fn add_entry(&self, entry: &NewWhitelistEntry) -> Result<WhitelistEntry, StoreError> {
        self.inner.add_entry(entry)
    }

    fn list_entries(&self) -> Result<Vec<WhitelistEntry>, StoreError> {
        self.inner.list_entries()
    }

    fn find_by_url(&self, url: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.inner.find_by_url(url)
    }

    fn find_by_hostname(&self, hostname: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.inner.find_by_hostname(hostname)
    }

    fn delete_entry(&self, id: WhitelistEntryId) -> Result<(), StoreError> {
        self.inner.delete_entry(id)
    }
}
