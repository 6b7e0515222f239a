// click-sentinel-core/src/core/time.rs
// ============================================================================
// Module: Click Sentinel Time Model
// Description: Canonical record timestamps and UTC day arithmetic.
// Purpose: Provide deterministic time values for records and aggregation.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Record times are unix-epoch milliseconds supplied explicitly by callers;
//! the core never reads wall-clock time. Pointer/page click observation times
//! are separate floating-point seconds carried on the click types themselves
//! (sub-millisecond precision matters for correlation, not for records).

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::OffsetDateTime;
use time::PrimitiveDateTime;
use time::Time;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Milliseconds per day, used for trailing-window arithmetic.
const MILLIS_PER_DAY: i64 = 86_400_000;
/// Milliseconds per second.
const MILLIS_PER_SECOND: i64 = 1_000;

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Record timestamp in unix-epoch milliseconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads the
///   wall clock.
/// - No validation is performed; monotonicity is a caller responsibility.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix-epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix-epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns the start of the UTC calendar day containing this timestamp.
    ///
    /// Returns `None` when the value falls outside the representable
    /// calendar range.
    #[must_use]
    pub fn start_of_utc_day(self) -> Option<Self> {
        let date = self.utc_date()?;
        let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc();
        midnight.unix_timestamp().checked_mul(MILLIS_PER_SECOND).map(Self)
    }

    /// Returns the UTC calendar day as a `YYYY-MM-DD` bucket key.
    ///
    /// Returns `None` when the value falls outside the representable
    /// calendar range.
    #[must_use]
    pub fn utc_day_key(self) -> Option<String> {
        self.utc_date().map(|date| {
            format!("{:04}-{:02}-{:02}", date.year(), u8::from(date.month()), date.day())
        })
    }

    /// Returns the timestamp shifted back by the given number of days,
    /// saturating at the representable bounds.
    #[must_use]
    pub const fn minus_days(self, days: i64) -> Self {
        Self(self.0.saturating_sub(days.saturating_mul(MILLIS_PER_DAY)))
    }

    /// Converts the timestamp into a UTC calendar date.
    fn utc_date(self) -> Option<Date> {
        let seconds = self.0.div_euclid(MILLIS_PER_SECOND);
        OffsetDateTime::from_unix_timestamp(seconds).ok().map(|moment| moment.date())
    }
}
