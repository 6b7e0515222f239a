// click-sentinel-core/src/runtime/classifier.rs
// ============================================================================
// Module: Click Sentinel Submission Classifier
// Description: Query-time category predicates over submission records.
// Purpose: Partition stored submissions into the four retrieval views.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Categories are filter predicates, not stored fields: membership is
//! computed at query time from the record's verdict, correlation flag, and
//! matched-field collections. The predicates are evaluated exactly as
//! written in the table below; they are intentionally not re-derived into a
//! "cleaner" partition, because the deployed behavior is the target, not a
//! provably disjoint one. `Unknown` verdicts fail both the human and the
//! bot equality tests.
//!
//! | Category            | Predicate                                            |
//! |---------------------|------------------------------------------------------|
//! | SuspiciousForReview | `has_input && !(human && correlated)`                |
//! | HumanWithInput      | `human && correlated && has_input`                   |
//! | HumanBackground     | `human && !has_input`                                |
//! | Bot                 | `bot`                                                |

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::SubmissionRecord;

// ============================================================================
// SECTION: Categories
// ============================================================================

/// Retrieval view for stored submissions.
///
/// # Invariants
/// - Variants are stable for serialization and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionCategory {
    /// Submissions with input that lack a corroborated human origin.
    SuspiciousForReview,
    /// Human submissions carrying user input and a correlated click.
    HumanWithInput,
    /// Human submissions without user input (background traffic).
    HumanBackground,
    /// Bot-classified submissions.
    Bot,
}

impl SubmissionCategory {
    /// Returns true when the record belongs to this view.
    #[must_use]
    pub fn matches(self, record: &SubmissionRecord) -> bool {
        match self {
            Self::SuspiciousForReview => {
                record.has_input()
                    && !(record.is_bot.is_human() && record.has_click_correlation)
            }
            Self::HumanWithInput => {
                record.is_bot.is_human() && record.has_click_correlation && record.has_input()
            }
            Self::HumanBackground => record.is_bot.is_human() && !record.has_input(),
            Self::Bot => record.is_bot.is_bot(),
        }
    }
}

// ============================================================================
// SECTION: Pagination
// ============================================================================

/// Offset/limit window applied after category filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Number of matching records to skip.
    pub skip: usize,
    /// Maximum number of matching records to return.
    pub limit: usize,
}

impl Pagination {
    /// Creates a pagination window.
    #[must_use]
    pub const fn new(skip: usize, limit: usize) -> Self {
        Self {
            skip,
            limit,
        }
    }
}

// ============================================================================
// SECTION: Views
// ============================================================================

/// Filters records down to one category, then applies pagination.
///
/// The input sequence is expected in its final order (newest first); the
/// window slices the filtered sequence, never the raw one.
#[must_use]
pub fn category_view(
    records: Vec<SubmissionRecord>,
    category: SubmissionCategory,
    page: Pagination,
) -> Vec<SubmissionRecord> {
    records
        .into_iter()
        .filter(|record| category.matches(record))
        .skip(page.skip)
        .take(page.limit)
        .collect()
}
