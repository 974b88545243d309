//! Usage counters and the ledger contract

pub mod counter;
pub mod repository;

pub use counter::UsageCounter;
pub use repository::UsageRepository;
