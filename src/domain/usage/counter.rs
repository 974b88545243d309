//! Per-key per-day usage counters

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Usage counter row for one key on one calendar date.
///
/// At most one row exists per (key, date); a missing row means zero calls.
/// The count only increases within a date; a new date implicitly starts
/// from an absent row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounter {
    key: String,
    date: NaiveDate,
    count: i64,
}

impl UsageCounter {
    pub fn new(key: impl Into<String>, date: NaiveDate, count: i64) -> Self {
        Self {
            key: key.into(),
            date,
            count,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn count(&self) -> i64 {
        self.count
    }
}
