//! Application use cases

pub mod process_review;
