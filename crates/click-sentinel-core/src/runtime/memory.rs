// click-sentinel-core/src/runtime/memory.rs
// ============================================================================
// Module: Click Sentinel In-Memory Store
// Description: Simple in-memory event store for tests and demos.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of the storage
//! interfaces for tests and local demos. It is not intended for production
//! use; ordering and grouping semantics match the durable store so the two
//! are interchangeable behind [`crate::interfaces::SharedEventStore`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::Mutex;

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
use crate::interfaces::ClickCountFilter;
use crate::interfaces::ClickQueryFilter;
use crate::interfaces::ClickStore;
use crate::interfaces::StoreError;
use crate::interfaces::SubmissionCountFilter;
use crate::interfaces::SubmissionStore;
use crate::interfaces::WhitelistStore;

// ============================================================================
// SECTION: State
// ============================================================================

/// Mutable state behind the store mutex.
#[derive(Debug, Default)]
struct MemoryState {
    /// Next submission identifier.
    next_submission_id: i64,
    /// Next click-record identifier.
    next_click_id: i64,
    /// Next whitelist-entry identifier.
    next_whitelist_id: i64,
    /// Stored submissions in insertion order.
    submissions: Vec<SubmissionRecord>,
    /// Stored page clicks in insertion order.
    clicks: Vec<PageClickRecord>,
    /// Stored whitelist entries in insertion order.
    whitelist: Vec<WhitelistEntry>,
}

/// In-memory event store for tests and demos.
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventStore {
    /// Store state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryEventStore {
    /// Creates a new, empty in-memory event store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a closure against the locked state.
    fn with_state<R>(&self, f: impl FnOnce(&mut MemoryState) -> R) -> Result<R, StoreError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("event store mutex poisoned".to_string()))?;
        Ok(f(&mut guard))
    }
}

// ============================================================================
// SECTION: Submission Store
// ============================================================================

impl SubmissionStore for InMemoryEventStore {
    fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError> {
        self.with_state(|state| {
            state.next_submission_id += 1;
            let id = SubmissionId::new(state.next_submission_id);
            state.submissions.push(SubmissionRecord::from_new(id, submission.clone()));
            id
        })
    }

    fn query_submissions(
        &self,
        hostname: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        self.with_state(|state| {
            let mut records: Vec<SubmissionRecord> = state
                .submissions
                .iter()
                .filter(|record| {
                    hostname.is_none_or(|hostname| record.target_hostname == hostname)
                })
                .cloned()
                .collect();
            records.sort_by(|a, b| {
                b.recorded_at.cmp(&a.recorded_at).then_with(|| b.id.cmp(&a.id))
            });
            records
        })
    }

    fn count_submissions(&self, filter: SubmissionCountFilter) -> Result<u64, StoreError> {
        self.with_state(|state| {
            let count = state
                .submissions
                .iter()
                .filter(|record| match filter {
                    SubmissionCountFilter::All => true,
                    SubmissionCountFilter::Since(since) => record.recorded_at >= since,
                    SubmissionCountFilter::Human => record.is_bot.is_human(),
                    SubmissionCountFilter::Bot => record.is_bot.is_bot(),
                    SubmissionCountFilter::Uncorrelated => !record.has_click_correlation,
                })
                .count();
            u64::try_from(count).unwrap_or(u64::MAX)
        })
    }

    fn top_hostnames(&self, limit: usize) -> Result<Vec<HostnameCount>, StoreError> {
        self.with_state(|state| {
            let mut counts: BTreeMap<String, u64> = BTreeMap::new();
            for record in &state.submissions {
                *counts.entry(record.target_hostname.clone()).or_insert(0) += 1;
            }
            let mut rows: Vec<HostnameCount> = counts
                .into_iter()
                .map(|(hostname, count)| HostnameCount {
                    hostname,
                    count,
                })
                .collect();
            rows.sort_by(|a, b| {
                b.count.cmp(&a.count).then_with(|| a.hostname.cmp(&b.hostname))
            });
            rows.truncate(limit);
            rows
        })
    }

    fn daily_counts(&self, since: Timestamp) -> Result<Vec<DailyCount>, StoreError> {
        self.with_state(|state| {
            let mut buckets: BTreeMap<String, u64> = BTreeMap::new();
            for record in &state.submissions {
                if record.recorded_at < since {
                    continue;
                }
                if let Some(day) = record.recorded_at.utc_day_key() {
                    *buckets.entry(day).or_insert(0) += 1;
                }
            }
            buckets
                .into_iter()
                .map(|(date, count)| DailyCount {
                    date,
                    count,
                })
                .collect()
        })
    }

    fn delete_submission(&self, id: SubmissionId) -> Result<(), StoreError> {
        self.with_state(|state| {
            state.submissions.iter().position(|record| record.id == id).map_or_else(
                || Err(StoreError::NotFound(format!("submission {id}"))),
                |index| {
                    state.submissions.remove(index);
                    Ok(())
                },
            )
        })?
    }

    fn delete_all_submissions(&self) -> Result<u64, StoreError> {
        self.with_state(|state| {
            let removed = u64::try_from(state.submissions.len()).unwrap_or(u64::MAX);
            state.submissions.clear();
            removed
        })
    }
}

// ============================================================================
// SECTION: Click Store
// ============================================================================

impl ClickStore for InMemoryEventStore {
    fn create_click(&self, record: &NewPageClickRecord) -> Result<ClickRecordId, StoreError> {
        self.with_state(|state| {
            state.next_click_id += 1;
            let id = ClickRecordId::new(state.next_click_id);
            state.clicks.push(PageClickRecord {
                id,
                observation: record.observation.clone(),
                verdict: record.verdict.clone(),
                created_at: record.created_at,
            });
            id
        })
    }

    fn query_clicks(
        &self,
        filter: ClickQueryFilter,
        limit: usize,
    ) -> Result<Vec<PageClickRecord>, StoreError> {
        self.with_state(|state| {
            let mut records: Vec<PageClickRecord> = state
                .clicks
                .iter()
                .filter(|record| match filter {
                    ClickQueryFilter::All => true,
                    ClickQueryFilter::SuspiciousOnly => record.verdict.is_suspicious,
                })
                .cloned()
                .collect();
            records.sort_by(|a, b| {
                b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
            });
            records.truncate(limit);
            records
        })
    }

    fn count_clicks(&self, filter: ClickCountFilter) -> Result<u64, StoreError> {
        self.with_state(|state| {
            let count = state
                .clicks
                .iter()
                .filter(|record| match filter {
                    ClickCountFilter::All => true,
                    ClickCountFilter::Suspicious => record.verdict.is_suspicious,
                    ClickCountFilter::Legitimate => !record.verdict.is_suspicious,
                })
                .count();
            u64::try_from(count).unwrap_or(u64::MAX)
        })
    }

    fn distinct_page_count(&self) -> Result<u64, StoreError> {
        self.with_state(|state| {
            let pages: BTreeSet<&String> = state
                .clicks
                .iter()
                .filter_map(|record| record.observation.page_url.as_ref())
                .collect();
            u64::try_from(pages.len()).unwrap_or(u64::MAX)
        })
    }

    fn action_summaries(&self) -> Result<Vec<ActionSummary>, StoreError> {
        self.with_state(|state| {
            let mut rows: BTreeMap<Option<String>, (u64, u64)> = BTreeMap::new();
            for record in &state.clicks {
                let entry = rows.entry(record.observation.action_type.clone()).or_insert((0, 0));
                entry.0 += 1;
                if record.verdict.is_suspicious {
                    entry.1 += 1;
                }
            }
            rows.into_iter()
                .map(|(action_type, (count, suspicious_count))| ActionSummary {
                    action_type,
                    count,
                    suspicious_count,
                })
                .collect()
        })
    }
}

// ============================================================================
// SECTION: Whitelist Store
// ============================================================================

impl WhitelistStore for InMemoryEventStore {
    fn add_entry(&self, entry: &NewWhitelistEntry) -> Result<WhitelistEntry, StoreError> {
        self.with_state(|state| {
            if state.whitelist.iter().any(|existing| existing.url == entry.url) {
                return Err(StoreError::Conflict(format!("url already whitelisted: {}", entry.url)));
            }
            state.next_whitelist_id += 1;
            let stored = WhitelistEntry {
                id: WhitelistEntryId::new(state.next_whitelist_id),
                url: entry.url.clone(),
                hostname: entry.hostname.clone(),
                added_at: entry.added_at,
                notes: entry.notes.clone(),
            };
            state.whitelist.push(stored.clone());
            Ok(stored)
        })?
    }

    fn list_entries(&self) -> Result<Vec<WhitelistEntry>, StoreError> {
        self.with_state(|state| {
            let mut entries = state.whitelist.clone();
            entries.sort_by(|a, b| b.added_at.cmp(&a.added_at).then_with(|| b.id.cmp(&a.id)));
            entries
        })
    }

    fn find_by_url(&self, url: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.with_state(|state| {
            state.whitelist.iter().find(|entry| entry.url == url).cloned()
        })
    }

    fn find_by_hostname(&self, hostname: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.with_state(|state| {
            state.whitelist.iter().find(|entry| entry.hostname == hostname).cloned()
        })
    }

    fn delete_entry(&self, id: WhitelistEntryId) -> Result<(), StoreError> {
        self.with_state(|state| {
            state.whitelist.iter().position(|entry| entry.id == id).map_or_else(
                || Err(StoreError::NotFound(format!("whitelist entry {id}"))),
                |index| {
                    state.whitelist.remove(index);
                    Ok(())
                },
            )
        })?
    }
}
