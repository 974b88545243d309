//! Key registry storage and service

pub mod in_memory;
pub mod service;
pub mod sqlite_repository;

pub use in_memory::InMemoryCredentialRepository;
pub use service::CredentialService;
pub use sqlite_repository::SqliteCredentialRepository;
