//! Domain layer - Core business logic and entities

pub mod credential;
pub mod error;
pub mod usage;

pub use credential::{Credential, CredentialRepository, Tier};
pub use error::DomainError;
pub use usage::{UsageCounter, UsageRepository};
