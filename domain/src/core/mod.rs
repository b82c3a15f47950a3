//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - chat models the workflow can run on
//! - [`review::Review`] - validated customer review text
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod review;
