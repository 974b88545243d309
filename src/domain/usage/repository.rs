//! Usage ledger repository trait

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt::Debug;

use super::counter::UsageCounter;
use crate::domain::DomainError;

/// Repository trait for usage counter storage
#[async_trait]
pub trait UsageRepository: Send + Sync + Debug {
    /// Get the counter row for (key, date); None when no call was made yet
    async fn get(&self, key: &str, date: NaiveDate) -> Result<Option<UsageCounter>, DomainError>;

    /// Record one call for (key, date) and return the updated row.
    ///
    /// Implementations MUST perform a single atomic upsert-or-increment;
    /// two concurrent increments for the same (key, date) must both be
    /// durably reflected.
    async fn increment(&self, key: &str, date: NaiveDate) -> Result<UsageCounter, DomainError>;
}
