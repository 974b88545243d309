//! Request admission pipeline

pub mod service;

pub use service::{Admission, AdmissionService};
