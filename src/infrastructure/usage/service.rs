//! Usage ledger service

use std::sync::Arc;

use chrono::{Local, NaiveDate};

use crate::domain::usage::UsageRepository;
use crate::domain::DomainError;

/// Service tracking per-key daily call counts.
///
/// "Today" is always the gateway's local calendar date, never anything
/// caller-supplied.
#[derive(Debug, Clone)]
pub struct UsageService {
    repository: Arc<dyn UsageRepository>,
}

impl UsageService {
    pub fn new(repository: Arc<dyn UsageRepository>) -> Self {
        Self { repository }
    }

    /// Calls made by a key today; zero when no counter row exists
    pub async fn calls_today(&self, key: &str) -> Result<i64, DomainError> {
        let counter = self.repository.get(key, today()).await?;
        Ok(counter.map(|c| c.count()).unwrap_or(0))
    }

    /// Record one admitted call for today and return the updated count.
    ///
    /// The underlying increment is a single atomic upsert, safe under
    /// concurrent calls for the same key.
    pub async fn record_call(&self, key: &str) -> Result<i64, DomainError> {
        let counter = self.repository.increment(key, today()).await?;
        Ok(counter.count())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
