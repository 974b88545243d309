//! Credential records and the key registry contract

pub mod entity;
pub mod repository;

pub use entity::{Credential, Tier};
pub use repository::CredentialRepository;
