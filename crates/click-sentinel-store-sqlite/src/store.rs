// click-sentinel-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Event Store
// Description: Durable event store backed by SQLite WAL.
// Purpose: Persist submissions, page clicks, and whitelist entries.
// Dependencies: click-sentinel-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements the storage interfaces over `SQLite`. Matched
//! fields and values are stored as JSON text columns; the tri-state bot
//! verdict maps to a nullable integer column. Schema initialization fails
//! closed on an unsupported version, and every query reproduces the ordering
//! the interfaces require (descending record time, identifier tie-break).

// ============================================================================//
// SECTION: Imports
// ============================================================================//

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use click_sentinel_core::ActionSummary;
use click_sentinel_core::BotVerdict;
use click_sentinel_core::ClickPoint;
use click_sentinel_core::ClickRecordId;
use click_sentinel_core::ClickVerdict;
use click_sentinel_core::DailyCount;
use click_sentinel_core::HostnameCount;
use click_sentinel_core::NewPageClickRecord;
use click_sentinel_core::NewSubmission;
use click_sentinel_core::NewWhitelistEntry;
use click_sentinel_core::PageClick;
use click_sentinel_core::PageClickRecord;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::SubmissionRecord;
use click_sentinel_core::Timestamp;
use click_sentinel_core::WhitelistEntry;
use click_sentinel_core::WhitelistEntryId;
use click_sentinel_core::interfaces::ClickCountFilter;
use click_sentinel_core::interfaces::ClickQueryFilter;
use click_sentinel_core::interfaces::ClickStore;
use click_sentinel_core::interfaces::StoreError;
use click_sentinel_core::interfaces::SubmissionCountFilter;
use click_sentinel_core::interfaces::SubmissionStore;
use click_sentinel_core::interfaces::WhitelistStore;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::types::Type;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================//
// SECTION: Constants
// ============================================================================//

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================//
// SECTION: Config
// ============================================================================//

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` event store.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default tuning for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================//
// SECTION: Errors
// ============================================================================//

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or impossible row state.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Identifier-based lookup found no matching row.
    #[error("sqlite store row not found: {0}")]
    NotFound(String),
    /// Uniqueness constraint rejected the write.
    #[error("sqlite store conflict: {0}")]
    Conflict(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::NotFound(message) => Self::NotFound(message),
            SqliteStoreError::Conflict(message) => Self::Conflict(message),
        }
    }
}

// ============================================================================//
// SECTION: Store
// ============================================================================//

/// `SQLite`-backed event store with WAL support.
#[derive(Clone, Debug)]
pub struct SqliteEventStore {
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteEventStore {
    /// Opens an `SQLite`-backed event store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs a closure against the locked connection.
    fn with_connection<R>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<R, SqliteStoreError>,
    ) -> Result<R, SqliteStoreError> {
        let mut guard = self
            .connection
            .lock()
            .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        f(&mut guard)
    }
}

// ============================================================================//
// SECTION: Submission Store
// ============================================================================//

impl SubmissionStore for SqliteEventStore {
    fn create_submission(&self, submission: &NewSubmission) -> Result<SubmissionId, StoreError> {
        self.with_connection(|connection| {
            let matched_fields = encode_json(&submission.matched_fields)?;
            let matched_values = encode_json(&submission.matched_values)?;
            let click_coordinates = submission
                .click_coordinates
                .as_ref()
                .map(encode_json)
                .transpose()?;
            connection
                .execute(
                    "INSERT INTO submissions (recorded_at, target_url, target_hostname, \
                     source_url, matched_fields, matched_values, request_method, status, is_bot, \
                     has_click_correlation, click_time_diff_ms, click_coordinates) VALUES (?1, \
                     ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    params![
                        submission.recorded_at.as_unix_millis(),
                        submission.target_url,
                        submission.target_hostname,
                        submission.source_url,
                        matched_fields,
                        matched_values,
                        submission.request_method,
                        submission.status,
                        Option::<bool>::from(submission.is_bot),
                        submission.has_click_correlation,
                        submission.click_time_diff_ms,
                        click_coordinates,
                    ],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            Ok(SubmissionId::new(connection.last_insert_rowid()))
        })
        .map_err(StoreError::from)
    }

    fn query_submissions(
        &self,
        hostname: Option<&str>,
    ) -> Result<Vec<SubmissionRecord>, StoreError> {
        self.with_connection(|connection| {
            let base = "SELECT id, recorded_at, target_url, target_hostname, source_url, \
                        matched_fields, matched_values, request_method, status, is_bot, \
                        has_click_correlation, click_time_diff_ms, click_coordinates FROM \
                        submissions";
            let order = " ORDER BY recorded_at DESC, id DESC";
            let records = if let Some(hostname) = hostname {
                let sql = format!("{base} WHERE target_hostname = ?1{order}");
                let mut statement = connection
                    .prepare(&sql)
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                let rows = statement
                    .query_map(params![hostname], submission_from_row)
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                collect_rows(rows)?
            } else {
                let sql = format!("{base}{order}");
                let mut statement = connection
                    .prepare(&sql)
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                let rows = statement
                    .query_map(params![], submission_from_row)
                    .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
                collect_rows(rows)?
            };
            Ok(records)
        })
        .map_err(StoreError::from)
    }

    fn count_submissions(&self, filter: SubmissionCountFilter) -> Result<u64, StoreError> {
        self.with_connection(|connection| {
            let (sql, since) = match filter {
                SubmissionCountFilter::All => ("SELECT COUNT(*) FROM submissions", None),
                SubmissionCountFilter::Since(since) => (
                    "SELECT COUNT(*) FROM submissions WHERE recorded_at >= ?1",
                    Some(since.as_unix_millis()),
                ),
                SubmissionCountFilter::Human => {
                    ("SELECT COUNT(*) FROM submissions WHERE is_bot = 0", None)
                }
                SubmissionCountFilter::Bot => {
                    ("SELECT COUNT(*) FROM submissions WHERE is_bot = 1", None)
                }
                SubmissionCountFilter::Uncorrelated => {
                    ("SELECT COUNT(*) FROM submissions WHERE has_click_correlation = 0", None)
                }
            };
            let count: i64 = match since {
                Some(since) => connection.query_row(sql, params![since], |row| row.get(0)),
                None => connection.query_row(sql, params![], |row| row.get(0)),
            }
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            u64::try_from(count)
                .map_err(|_| SqliteStoreError::Corrupt("negative row count".to_string()))
        })
        .map_err(StoreError::from)
    }

    fn top_hostnames(&self, limit: usize) -> Result<Vec<HostnameCount>, StoreError> {
        self.with_connection(|connection| {
            let limit = i64::try_from(limit)
                .map_err(|_| SqliteStoreError::Invalid("hostname limit too large".to_string()))?;
            let mut statement = connection
                .prepare(
                    "SELECT target_hostname, COUNT(*) AS submission_count FROM submissions GROUP \
                     BY target_hostname ORDER BY submission_count DESC, target_hostname ASC \
                     LIMIT ?1",
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![limit], |row| {
                    let hostname: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    Ok((hostname, count))
                })
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let pairs = collect_rows(rows)?;
            pairs
                .into_iter()
                .map(|(hostname, count)| {
                    let count = u64::try_from(count).map_err(|_| {
                        SqliteStoreError::Corrupt("negative group count".to_string())
                    })?;
                    Ok(HostnameCount {
                        hostname,
                        count,
                    })
                })
                .collect()
        })
        .map_err(StoreError::from)
    }

    fn daily_counts(&self, since: Timestamp) -> Result<Vec<DailyCount>, StoreError> {
        self.with_connection(|connection| {
            let mut statement = connection
                .prepare(
                    "SELECT date(recorded_at / 1000, 'unixepoch') AS day, COUNT(*) FROM \
                     submissions WHERE recorded_at >= ?1 GROUP BY day ORDER BY day ASC",
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![since.as_unix_millis()], |row| {
                    let date: String = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    Ok((date, count))
                })
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let pairs = collect_rows(rows)?;
            pairs
                .into_iter()
                .map(|(date, count)| {
                    let count = u64::try_from(count).map_err(|_| {
                        SqliteStoreError::Corrupt("negative group count".to_string())
                    })?;
                    Ok(DailyCount {
                        date,
                        count,
                    })
                })
                .collect()
        })
        .map_err(StoreError::from)
    }

    fn delete_submission(&self, id: SubmissionId) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM submissions WHERE id = ?1", params![id.get()])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            if removed == 0 {
                return Err(SqliteStoreError::NotFound(format!("submission {id}")));
            }
            Ok(())
        })
        .map_err(StoreError::from)
    }

    fn delete_all_submissions(&self) -> Result<u64, StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM submissions", params![])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            Ok(u64::try_from(removed).unwrap_or(u64::MAX))
        })
        .map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Click Store
// ============================================================================//

impl ClickStore for SqliteEventStore {
    fn create_click(&self, record: &NewPageClickRecord) -> Result<ClickRecordId, StoreError> {
        self.with_connection(|connection| {
            connection
                .execute(
                    "INSERT INTO click_events (event_time, x, y, is_suspicious, confidence, \
                     reason, action_type, action_details, page_url, page_title, target_tag, \
                     target_id, target_class, is_trusted, created_at) VALUES (?1, ?2, ?3, ?4, \
                     ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                    params![
                        record.observation.timestamp,
                        record.observation.x,
                        record.observation.y,
                        record.verdict.is_suspicious,
                        record.verdict.confidence,
                        record.verdict.reason,
                        record.observation.action_type,
                        record.observation.action_details,
                        record.observation.page_url,
                        record.observation.page_title,
                        record.observation.target_tag,
                        record.observation.target_id,
                        record.observation.target_class,
                        record.observation.is_trusted,
                        record.created_at.as_unix_millis(),
                    ],
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            Ok(ClickRecordId::new(connection.last_insert_rowid()))
        })
        .map_err(StoreError::from)
    }

    fn query_clicks(
        &self,
        filter: ClickQueryFilter,
        limit: usize,
    ) -> Result<Vec<PageClickRecord>, StoreError> {
        self.with_connection(|connection| {
            let limit = i64::try_from(limit)
                .map_err(|_| SqliteStoreError::Invalid("click limit too large".to_string()))?;
            let base = "SELECT id, event_time, x, y, is_suspicious, confidence, reason, \
                        action_type, action_details, page_url, page_title, target_tag, \
                        target_id, target_class, is_trusted, created_at FROM click_events";
            let sql = match filter {
                ClickQueryFilter::All => {
                    format!("{base} ORDER BY created_at DESC, id DESC LIMIT ?1")
                }
                ClickQueryFilter::SuspiciousOnly => format!(
                    "{base} WHERE is_suspicious = 1 ORDER BY created_at DESC, id DESC LIMIT ?1"
                ),
            };
            let mut statement = connection
                .prepare(&sql)
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![limit], click_from_row)
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            collect_rows(rows)
        })
        .map_err(StoreError::from)
    }

    fn count_clicks(&self, filter: ClickCountFilter) -> Result<u64, StoreError> {
        self.with_connection(|connection| {
            let sql = match filter {
                ClickCountFilter::All => "SELECT COUNT(*) FROM click_events",
                ClickCountFilter::Suspicious => {
                    "SELECT COUNT(*) FROM click_events WHERE is_suspicious = 1"
                }
                ClickCountFilter::Legitimate => {
                    "SELECT COUNT(*) FROM click_events WHERE is_suspicious = 0"
                }
            };
            let count: i64 = connection
                .query_row(sql, params![], |row| row.get(0))
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            u64::try_from(count)
                .map_err(|_| SqliteStoreError::Corrupt("negative row count".to_string()))
        })
        .map_err(StoreError::from)
    }

    fn distinct_page_count(&self) -> Result<u64, StoreError> {
        self.with_connection(|connection| {
            let count: i64 = connection
                .query_row(
                    "SELECT COUNT(DISTINCT page_url) FROM click_events WHERE page_url IS NOT \
                     NULL",
                    params![],
                    |row| row.get(0),
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            u64::try_from(count)
                .map_err(|_| SqliteStoreError::Corrupt("negative row count".to_string()))
        })
        .map_err(StoreError::from)
    }

    fn action_summaries(&self) -> Result<Vec<ActionSummary>, StoreError> {
        self.with_connection(|connection| {
            let mut statement = connection
                .prepare(
                    "SELECT action_type, COUNT(*), SUM(CASE WHEN is_suspicious = 1 THEN 1 ELSE \
                     0 END) FROM click_events GROUP BY action_type ORDER BY action_type ASC",
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], |row| {
                    let action_type: Option<String> = row.get(0)?;
                    let count: i64 = row.get(1)?;
                    let suspicious_count: i64 = row.get(2)?;
                    Ok((action_type, count, suspicious_count))
                })
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let triples = collect_rows(rows)?;
            triples
                .into_iter()
                .map(|(action_type, count, suspicious_count)| {
                    let count = u64::try_from(count).map_err(|_| {
                        SqliteStoreError::Corrupt("negative group count".to_string())
                    })?;
                    let suspicious_count = u64::try_from(suspicious_count).map_err(|_| {
                        SqliteStoreError::Corrupt("negative group count".to_string())
                    })?;
                    Ok(ActionSummary {
                        action_type,
                        count,
                        suspicious_count,
                    })
                })
                .collect()
        })
        .map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Whitelist Store
// ============================================================================//

impl WhitelistStore for SqliteEventStore {
    fn add_entry(&self, entry: &NewWhitelistEntry) -> Result<WhitelistEntry, StoreError> {
        self.with_connection(|connection| {
            let tx = connection
                .transaction()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let existing: Option<i64> = tx
                .query_row("SELECT id FROM whitelist WHERE url = ?1", params![entry.url], |row| {
                    row.get(0)
                })
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            if existing.is_some() {
                return Err(SqliteStoreError::Conflict(format!(
                    "url already whitelisted: {}",
                    entry.url
                )));
            }
            tx.execute(
                "INSERT INTO whitelist (url, hostname, added_at, notes) VALUES (?1, ?2, ?3, ?4)",
                params![entry.url, entry.hostname, entry.added_at.as_unix_millis(), entry.notes],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let id = tx.last_insert_rowid();
            tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            Ok(WhitelistEntry {
                id: WhitelistEntryId::new(id),
                url: entry.url.clone(),
                hostname: entry.hostname.clone(),
                added_at: entry.added_at,
                notes: entry.notes.clone(),
            })
        })
        .map_err(StoreError::from)
    }

    fn list_entries(&self) -> Result<Vec<WhitelistEntry>, StoreError> {
        self.with_connection(|connection| {
            let mut statement = connection
                .prepare(
                    "SELECT id, url, hostname, added_at, notes FROM whitelist ORDER BY added_at \
                     DESC, id DESC",
                )
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            let rows = statement
                .query_map(params![], whitelist_from_row)
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            collect_rows(rows)
        })
        .map_err(StoreError::from)
    }

    fn find_by_url(&self, url: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT id, url, hostname, added_at, notes FROM whitelist WHERE url = ?1 \
                     LIMIT 1",
                    params![url],
                    whitelist_from_row,
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })
        .map_err(StoreError::from)
    }

    fn find_by_hostname(&self, hostname: &str) -> Result<Option<WhitelistEntry>, StoreError> {
        self.with_connection(|connection| {
            connection
                .query_row(
                    "SELECT id, url, hostname, added_at, notes FROM whitelist WHERE hostname = \
                     ?1 LIMIT 1",
                    params![hostname],
                    whitelist_from_row,
                )
                .optional()
                .map_err(|err| SqliteStoreError::Db(err.to_string()))
        })
        .map_err(StoreError::from)
    }

    fn delete_entry(&self, id: WhitelistEntryId) -> Result<(), StoreError> {
        self.with_connection(|connection| {
            let removed = connection
                .execute("DELETE FROM whitelist WHERE id = ?1", params![id.get()])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            if removed == 0 {
                return Err(SqliteStoreError::NotFound(format!("whitelist entry {id}")));
            }
            Ok(())
        })
        .map_err(StoreError::from)
    }
}

// ============================================================================//
// SECTION: Row Mapping
// ============================================================================//

/// Maps one submissions row to a record.
fn submission_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubmissionRecord> {
    let matched_fields: BTreeSet<String> = decode_json_column(row, 5)?;
    let matched_values: BTreeMap<String, String> = decode_json_column(row, 6)?;
    let click_coordinates: Option<ClickPoint> = {
        let raw: Option<String> = row.get(12)?;
        match raw {
            None => None,
            Some(raw) => Some(serde_json::from_str(&raw).map_err(|err| {
                rusqlite::Error::FromSqlConversionFailure(12, Type::Text, Box::new(err))
            })?),
        }
    };
    Ok(SubmissionRecord {
        id: SubmissionId::new(row.get(0)?),
        recorded_at: Timestamp::from_unix_millis(row.get(1)?),
        target_url: row.get(2)?,
        target_hostname: row.get(3)?,
        source_url: row.get(4)?,
        matched_fields,
        matched_values,
        request_method: row.get(7)?,
        status: row.get(8)?,
        is_bot: BotVerdict::from(row.get::<_, Option<bool>>(9)?),
        has_click_correlation: row.get(10)?,
        click_time_diff_ms: row.get(11)?,
        click_coordinates,
    })
}

/// Maps one `click_events` row to a record.
fn click_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageClickRecord> {
    Ok(PageClickRecord {
        id: ClickRecordId::new(row.get(0)?),
        observation: PageClick {
            timestamp: row.get(1)?,
            x: row.get(2)?,
            y: row.get(3)?,
            action_type: row.get(7)?,
            action_details: row.get(8)?,
            page_url: row.get(9)?,
            page_title: row.get(10)?,
            target_tag: row.get(11)?,
            target_id: row.get(12)?,
            target_class: row.get(13)?,
            is_trusted: row.get(14)?,
        },
        verdict: ClickVerdict {
            is_suspicious: row.get(4)?,
            confidence: row.get(5)?,
            reason: row.get(6)?,
        },
        created_at: Timestamp::from_unix_millis(row.get(15)?),
    })
}

/// Maps one whitelist row to an entry.
fn whitelist_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<WhitelistEntry> {
    Ok(WhitelistEntry {
        id: WhitelistEntryId::new(row.get(0)?),
        url: row.get(1)?,
        hostname: row.get(2)?,
        added_at: Timestamp::from_unix_millis(row.get(3)?),
        notes: row.get(4)?,
    })
}

/// Decodes a JSON text column into the target collection.
fn decode_json_column<T: serde::de::DeserializeOwned>(
    row: &rusqlite::Row<'_>,
    index: usize,
) -> rusqlite::Result<T> {
    let raw: String = row.get(index)?;
    serde_json::from_str(&raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

/// Encodes a value into a JSON text column.
fn encode_json<T: serde::Serialize>(value: &T) -> Result<String, SqliteStoreError> {
    serde_json::to_string(value).map_err(|err| SqliteStoreError::Invalid(err.to_string()))
}

/// Drains a mapped-row iterator, converting row errors.
fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> Result<Vec<T>, SqliteStoreError> {
    rows.map(|row| row.map_err(|err| SqliteStoreError::Db(err.to_string()))).collect()
}

// ============================================================================//
// SECTION: Helpers
// ============================================================================//

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS submissions (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    recorded_at INTEGER NOT NULL,
                    target_url TEXT NOT NULL,
                    target_hostname TEXT NOT NULL,
                    source_url TEXT NOT NULL,
                    matched_fields TEXT NOT NULL,
                    matched_values TEXT NOT NULL,
                    request_method TEXT NOT NULL,
                    status TEXT NOT NULL,
                    is_bot INTEGER,
                    has_click_correlation INTEGER NOT NULL DEFAULT 0,
                    click_time_diff_ms INTEGER,
                    click_coordinates TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_submissions_recorded_at
                    ON submissions (recorded_at);
                CREATE INDEX IF NOT EXISTS idx_submissions_hostname
                    ON submissions (target_hostname);
                CREATE INDEX IF NOT EXISTS idx_submissions_is_bot
                    ON submissions (is_bot);
                CREATE INDEX IF NOT EXISTS idx_submissions_correlation
                    ON submissions (has_click_correlation);
                CREATE TABLE IF NOT EXISTS click_events (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    event_time REAL NOT NULL,
                    x REAL NOT NULL,
                    y REAL NOT NULL,
                    is_suspicious INTEGER NOT NULL,
                    confidence REAL,
                    reason TEXT,
                    action_type TEXT,
                    action_details TEXT,
                    page_url TEXT,
                    page_title TEXT,
                    target_tag TEXT,
                    target_id TEXT,
                    target_class TEXT,
                    is_trusted INTEGER,
                    created_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_click_events_created_at
                    ON click_events (created_at);
                CREATE INDEX IF NOT EXISTS idx_click_events_suspicious
                    ON click_events (is_suspicious);
                CREATE TABLE IF NOT EXISTS whitelist (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    url TEXT NOT NULL UNIQUE,
                    hostname TEXT NOT NULL,
                    added_at INTEGER NOT NULL,
                    notes TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_whitelist_hostname
                    ON whitelist (hostname);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
