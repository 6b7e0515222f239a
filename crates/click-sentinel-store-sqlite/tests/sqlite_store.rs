// click-sentinel-store-sqlite/tests/sqlite_store.rs
// ============================================================================
// Module: SQLite Event Store Tests
// Description: Tests for the durable event store implementation.
// Purpose: Validate round-trips, ordering, grouping, and schema guards.
// Dependencies: click-sentinel-core, click-sentinel-store-sqlite, rusqlite, tempfile
// ============================================================================
//! ## Overview
//! Exercises the `SQLite` store against the storage interface contracts and
//! verifies it fails closed on an unsupported schema version.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::Path;

use click_sentinel_core::BotVerdict;
use click_sentinel_core::ClickCountFilter;
use click_sentinel_core::ClickPoint;
use click_sentinel_core::ClickQueryFilter;
use click_sentinel_core::ClickStore;
use click_sentinel_core::ClickVerdict;
use click_sentinel_core::NewPageClickRecord;
use click_sentinel_core::NewSubmission;
use click_sentinel_core::NewWhitelistEntry;
use click_sentinel_core::PageClick;
use click_sentinel_core::StoreError;
use click_sentinel_core::SubmissionCountFilter;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::SubmissionStore;
use click_sentinel_core::Timestamp;
use click_sentinel_core::WhitelistStore;
use click_sentinel_store_sqlite::SqliteEventStore;
use click_sentinel_store_sqlite::SqliteStoreConfig;
use click_sentinel_store_sqlite::SqliteStoreError;

/// 2026-08-07T12:00:00Z in unix milliseconds.
const NOW_MILLIS: i64 = 1_786_104_000_000;
/// Milliseconds per day.
const DAY_MILLIS: i64 = 86_400_000;

/// Opens a store in the given directory.
fn open_store(dir: &Path) -> SqliteEventStore {
    SqliteEventStore::new(&SqliteStoreConfig::new(dir.join("events.db"))).unwrap()
}

/// Builds a fully populated submission payload.
fn submission(recorded_at: i64, hostname: &str, verdict: BotVerdict) -> NewSubmission {
    NewSubmission {
        recorded_at: Timestamp::from_unix_millis(recorded_at),
        target_url: format!("https://{hostname}/submit"),
        target_hostname: hostname.to_string(),
        source_url: "https://app.example/form".to_string(),
        matched_fields: ["email", "name"].iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
        matched_values: [("email", "user@example.com")]
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<BTreeMap<_, _>>(),
        request_method: "POST".to_string(),
        status: "detected".to_string(),
        is_bot: verdict,
        has_click_correlation: verdict.is_human(),
        click_time_diff_ms: Some(42),
        click_coordinates: Some(ClickPoint {
            x: 100.5,
            y: 200.25,
        }),
    }
}

/// Builds a page-click record payload.
fn page_click(created_at: i64, action_type: &str, suspicious: bool) -> NewPageClickRecord {
    NewPageClickRecord {
        observation: PageClick {
            x: 10.0,
            y: 20.0,
            timestamp: 12.345,
            action_type: Some(action_type.to_string()),
            action_details: Some("{}".to_string()),
            page_url: Some("https://app.example/form".to_string()),
            page_title: Some("Form".to_string()),
            target_tag: Some("button".to_string()),
            target_id: Some("submit".to_string()),
            target_class: None,
            is_trusted: Some(true),
        },
        verdict: ClickVerdict {
            is_suspicious: suspicious,
            confidence: if suspicious { 0.9 } else { 1.0 },
            reason: suspicious.then(|| "no pointer click within 250ms".to_string()),
        },
        created_at: Timestamp::from_unix_millis(created_at),
    }
}

/// Verifies a submission round-trips with every field intact.
#[test]
fn submission_roundtrip_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    let payload = submission(NOW_MILLIS, "collector.example", BotVerdict::Human);
    let id = store.create_submission(&payload).unwrap();

    let records = store.query_submissions(None).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, id);
    assert_eq!(record.recorded_at.as_unix_millis(), NOW_MILLIS);
    assert_eq!(record.target_hostname, "collector.example");
    assert_eq!(record.matched_fields.len(), 2);
    assert_eq!(record.matched_values.get("email").map(String::as_str), Some("user@example.com"));
    assert_eq!(record.is_bot, BotVerdict::Human);
    assert!(record.has_click_correlation);
    assert_eq!(record.click_time_diff_ms, Some(42));
    assert_eq!(
        record.click_coordinates,
        Some(ClickPoint {
            x: 100.5,
            y: 200.25,
        })
    );
}

/// Verifies the tri-state verdict maps through the nullable column.
#[test]
fn submission_verdict_maps_nullable_column() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store.create_submission(&submission(1_000, "a.example", BotVerdict::Bot)).unwrap();
    store.create_submission(&submission(2_000, "a.example", BotVerdict::Human)).unwrap();
    store.create_submission(&submission(3_000, "a.example", BotVerdict::Unknown)).unwrap();

    let records = store.query_submissions(None).unwrap();
    let verdicts: Vec<BotVerdict> = records.iter().map(|record| record.is_bot).collect();
    assert_eq!(verdicts, vec![BotVerdict::Unknown, BotVerdict::Human, BotVerdict::Bot]);

    assert_eq!(store.count_submissions(SubmissionCountFilter::Human).unwrap(), 1);
    assert_eq!(store.count_submissions(SubmissionCountFilter::Bot).unwrap(), 1);
    assert_eq!(store.count_submissions(SubmissionCountFilter::All).unwrap(), 3);
}

/// Verifies ordering and exact hostname filtering.
#[test]
fn submission_query_orders_and_filters() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store.create_submission(&submission(1_000, "a.example", BotVerdict::Unknown)).unwrap();
    store.create_submission(&submission(3_000, "b.example", BotVerdict::Unknown)).unwrap();
    store.create_submission(&submission(2_000, "a.example", BotVerdict::Unknown)).unwrap();

    let all = store.query_submissions(None).unwrap();
    let times: Vec<i64> = all.iter().map(|r| r.recorded_at.as_unix_millis()).collect();
    assert_eq!(times, vec![3_000, 2_000, 1_000]);

    let filtered = store.query_submissions(Some("a.example")).unwrap();
    assert_eq!(filtered.len(), 2);
    assert!(store.query_submissions(Some("A.example")).unwrap().is_empty());
}

/// Verifies grouped statistics: hostnames, days, and the since filter.
#[test]
fn submission_grouping_matches_contracts() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store.create_submission(&submission(NOW_MILLIS, "a.example", BotVerdict::Unknown)).unwrap();
    store
        .create_submission(&submission(NOW_MILLIS - 3_600_000, "a.example", BotVerdict::Unknown))
        .unwrap();
    store
        .create_submission(&submission(
            NOW_MILLIS - 2 * DAY_MILLIS,
            "b.example",
            BotVerdict::Unknown,
        ))
        .unwrap();

    let top = store.top_hostnames(10).unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].hostname, "a.example");
    assert_eq!(top[0].count, 2);

    let days = store.daily_counts(Timestamp::from_unix_millis(NOW_MILLIS - 7 * DAY_MILLIS)).unwrap();
    let dates: Vec<&str> = days.iter().map(|row| row.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-08-05", "2026-08-07"]);
    assert_eq!(days[1].count, 2);

    let since = store
        .count_submissions(SubmissionCountFilter::Since(Timestamp::from_unix_millis(
            NOW_MILLIS - DAY_MILLIS,
        )))
        .unwrap();
    assert_eq!(since, 2);
}

/// Verifies deletes report distinct not-found failures and purge counts.
#[test]
fn submission_deletes_report_outcomes() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    let id = store.create_submission(&submission(1_000, "a.example", BotVerdict::Unknown)).unwrap();
    store.create_submission(&submission(2_000, "a.example", BotVerdict::Unknown)).unwrap();

    store.delete_submission(id).unwrap();
    let missing = store.delete_submission(SubmissionId::new(9_999)).unwrap_err();
    assert!(matches!(missing, StoreError::NotFound(_)));

    assert_eq!(store.delete_all_submissions().unwrap(), 1);
    assert_eq!(store.count_submissions(SubmissionCountFilter::All).unwrap(), 0);
}

/// Verifies click records round-trip with filters, limits, and summaries.
#[test]
fn click_records_roundtrip_and_aggregate() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    store.create_click(&page_click(1_000, "click", true)).unwrap();
    store.create_click(&page_click(2_000, "click", false)).unwrap();
    store.create_click(&page_click(3_000, "submit", true)).unwrap();

    let recent = store.query_clicks(ClickQueryFilter::All, 2).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].created_at.as_unix_millis(), 3_000);
    assert_eq!(recent[0].observation.action_type.as_deref(), Some("submit"));
    assert_eq!(recent[0].verdict.reason.as_deref(), Some("no pointer click within 250ms"));

    let suspicious = store.query_clicks(ClickQueryFilter::SuspiciousOnly, 10).unwrap();
    assert_eq!(suspicious.len(), 2);

    assert_eq!(store.count_clicks(ClickCountFilter::All).unwrap(), 3);
    assert_eq!(store.count_clicks(ClickCountFilter::Suspicious).unwrap(), 2);
    assert_eq!(store.count_clicks(ClickCountFilter::Legitimate).unwrap(), 1);
    assert_eq!(store.distinct_page_count().unwrap(), 1);

    let summaries = store.action_summaries().unwrap();
    assert_eq!(summaries.len(), 2);
    let clicks = summaries.iter().find(|r| r.action_type.as_deref() == Some("click")).unwrap();
    assert_eq!(clicks.count, 2);
    assert_eq!(clicks.suspicious_count, 1);
}

/// Verifies whitelist uniqueness and lookups.
#[test]
fn whitelist_enforces_unique_urls() {
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(dir.path());

    let entry = NewWhitelistEntry {
        url: "https://trusted.example/form".to_string(),
        hostname: "trusted.example".to_string(),
        added_at: Timestamp::from_unix_millis(1_000),
        notes: Some("internal tool".to_string()),
    };
    let stored = store.add_entry(&entry).unwrap();
    assert_eq!(stored.url, entry.url);

    let conflict = store.add_entry(&entry).unwrap_err();
    assert!(matches!(conflict, StoreError::Conflict(_)));

    assert!(store.find_by_url("https://trusted.example/form").unwrap().is_some());
    assert!(store.find_by_hostname("trusted.example").unwrap().is_some());
    assert!(store.find_by_hostname("other.example").unwrap().is_none());

    store.delete_entry(stored.id).unwrap();
    let missing = store.delete_entry(stored.id).unwrap_err();
    assert!(matches!(missing, StoreError::NotFound(_)));
}

/// Verifies records survive reopening the database file.
#[test]
fn store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = open_store(dir.path());
        store.create_submission(&submission(1_000, "a.example", BotVerdict::Human)).unwrap();
    }

    let reopened = open_store(dir.path());
    assert_eq!(reopened.count_submissions(SubmissionCountFilter::All).unwrap(), 1);
}

/// Verifies an unsupported schema version fails closed.
#[test]
fn store_rejects_unsupported_schema_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.db");
    {
        let store = SqliteEventStore::new(&SqliteStoreConfig::new(&path)).unwrap();
        drop(store);
    }
    {
        let connection = rusqlite::Connection::open(&path).unwrap();
        connection.execute("UPDATE store_meta SET version = 99", rusqlite::params![]).unwrap();
    }

    let err = SqliteEventStore::new(&SqliteStoreConfig::new(&path)).unwrap_err();
    assert!(matches!(err, SqliteStoreError::VersionMismatch(_)));
}
