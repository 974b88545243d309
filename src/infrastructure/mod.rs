//! Infrastructure layer - storage, services, and external integrations

pub mod admission;
pub mod credential;
pub mod logging;
pub mod storage;
pub mod upstream;
pub mod usage;
