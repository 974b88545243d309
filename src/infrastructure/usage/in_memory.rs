//! In-memory usage ledger repository

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::usage::{UsageCounter, UsageRepository};
use crate::domain::DomainError;

/// In-memory implementation of UsageRepository.
///
/// Counters do not survive a restart; intended for development and tests.
/// The increment holds the write lock for the whole read-modify-write, so
/// concurrent calls for the same (key, date) never lose updates.
#[derive(Debug, Default)]
pub struct InMemoryUsageRepository {
    counters: Arc<RwLock<HashMap<(String, NaiveDate), i64>>>,
}

impl InMemoryUsageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageRepository for InMemoryUsageRepository {
    async fn get(&self, key: &str, date: NaiveDate) -> Result<Option<UsageCounter>, DomainError> {
        let counters = self.counters.read().await;
        Ok(counters
            .get(&(key.to_string(), date))
            .map(|count| UsageCounter::new(key, date, *count)))
    }

    async fn increment(&self, key: &str, date: NaiveDate) -> Result<UsageCounter, DomainError> {
        let mut counters = self.counters.write().await;
        let count = counters.entry((key.to_string(), date)).or_insert(0);
        *count += 1;
        Ok(UsageCounter::new(key, date, *count))
    }
}
