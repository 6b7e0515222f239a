// click-sentinel-core/tests/classifier.rs
// ============================================================================
// Module: Submission Classifier Tests
// Description: Tests for the four category predicates and pagination.
// Purpose: Validate the predicate table exactly as written.
// Dependencies: click-sentinel-core
// ============================================================================
//! ## Overview
//! Exercises category membership for definite, unknown, and inconsistent
//! records, and verifies pagination slices the filtered sequence rather than
//! the raw one. The predicates are deliberately not a clean partition; the
//! overlap cases are asserted as deployed, not "fixed".

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

use click_sentinel_core::BotVerdict;
use click_sentinel_core::SubmissionCategory;
use click_sentinel_core::SubmissionId;
use click_sentinel_core::SubmissionRecord;
use click_sentinel_core::Timestamp;
use click_sentinel_core::runtime::Pagination;
use click_sentinel_core::runtime::category_view;

/// Builds a submission record with the given classification signals.
fn record(
    id: i64,
    recorded_at: i64,
    verdict: BotVerdict,
    correlated: bool,
    fields: &[&str],
    values: &[(&str, &str)],
) -> SubmissionRecord {
    SubmissionRecord {
        id: SubmissionId::new(id),
        recorded_at: Timestamp::from_unix_millis(recorded_at),
        target_url: "https://collector.example/submit".to_string(),
        target_hostname: "collector.example".to_string(),
        source_url: "https://app.example/form".to_string(),
        matched_fields: fields.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
        matched_values: values
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect::<BTreeMap<_, _>>(),
        request_method: "POST".to_string(),
        status: "detected".to_string(),
        is_bot: verdict,
        has_click_correlation: correlated,
        click_time_diff_ms: None,
        click_coordinates: None,
    }
}

/// Returns the categories the record belongs to.
fn categories_of(record: &SubmissionRecord) -> Vec<SubmissionCategory> {
    [
        SubmissionCategory::SuspiciousForReview,
        SubmissionCategory::HumanWithInput,
        SubmissionCategory::HumanBackground,
        SubmissionCategory::Bot,
    ]
    .into_iter()
    .filter(|category| category.matches(record))
    .collect()
}

/// Verifies a correlated human submission with input is human-with-input
/// only.
#[test]
fn correlated_human_with_input_is_not_suspicious() {
    let record = record(1, 1_000, BotVerdict::Human, true, &["email"], &[("email", "x")]);

    assert_eq!(categories_of(&record), vec![SubmissionCategory::HumanWithInput]);
}

/// Verifies a human submission without input is background only.
#[test]
fn human_without_input_is_background() {
    let record = record(2, 1_000, BotVerdict::Human, false, &[], &[]);

    assert_eq!(categories_of(&record), vec![SubmissionCategory::HumanBackground]);
}

/// Verifies an unknown verdict with input lands only in the review queue.
#[test]
fn unknown_with_input_is_suspicious_only() {
    let record = record(3, 1_000, BotVerdict::Unknown, false, &["card"], &[("card", "4111")]);

    assert_eq!(categories_of(&record), vec![SubmissionCategory::SuspiciousForReview]);
}

/// Verifies an uncorrelated human submission with input still needs review.
#[test]
fn uncorrelated_human_with_input_needs_review() {
    let record = record(4, 1_000, BotVerdict::Human, false, &["email"], &[("email", "x")]);

    assert_eq!(categories_of(&record), vec![SubmissionCategory::SuspiciousForReview]);
}

/// Verifies a bot submission with input matches both the bot view and the
/// review queue, per the table as written.
#[test]
fn bot_with_input_matches_bot_and_review() {
    let record = record(5, 1_000, BotVerdict::Bot, true, &["email"], &[("email", "x")]);

    assert_eq!(
        categories_of(&record),
        vec![SubmissionCategory::SuspiciousForReview, SubmissionCategory::Bot]
    );
}

/// Verifies the two matched collections are checked independently: values
/// without fields do not count as input.
#[test]
fn values_without_fields_is_not_input() {
    let record = record(6, 1_000, BotVerdict::Human, false, &[], &[("email", "x")]);

    assert_eq!(categories_of(&record), vec![SubmissionCategory::HumanBackground]);
}

/// Verifies an unknown verdict without input matches no view at all.
#[test]
fn unknown_without_input_matches_nothing() {
    let record = record(7, 1_000, BotVerdict::Unknown, true, &[], &[]);

    assert!(categories_of(&record).is_empty());
}

/// Verifies pagination applies after category filtering, not before.
#[test]
fn pagination_slices_the_filtered_sequence() {
    // Newest first, with non-matching records interleaved.
    let records = vec![
        record(14, 14_000, BotVerdict::Unknown, false, &["a"], &[("a", "1")]),
        record(13, 13_000, BotVerdict::Human, true, &["a"], &[("a", "1")]),
        record(12, 12_000, BotVerdict::Unknown, false, &["b"], &[("b", "2")]),
        record(11, 11_000, BotVerdict::Human, true, &["b"], &[("b", "2")]),
        record(10, 10_000, BotVerdict::Unknown, false, &["c"], &[("c", "3")]),
    ];

    let page = category_view(
        records,
        SubmissionCategory::SuspiciousForReview,
        Pagination::new(1, 1),
    );

    // Three records match; skip one, take one: the second newest match.
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, SubmissionId::new(12));
}
