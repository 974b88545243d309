//! Usage ledger storage and service

pub mod in_memory;
pub mod service;
pub mod sqlite_repository;

pub use in_memory::InMemoryUsageRepository;
pub use service::UsageService;
pub use sqlite_repository::SqliteUsageRepository;
