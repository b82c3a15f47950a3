//! Review workflow state machine.
//!
//! ```text
//! Start -> SentimentCheck -+-> PositiveResponse ------------> End
//!                          +-> Diagnosis -> NegativeResponse -> End
//! ```
//!
//! [`ReviewState`] is the per-request record the steps fill in,
//! [`Branch`] is the pure decision after the sentiment check, and
//! [`WorkflowStep`] is the transition function tying them together.

pub mod branch;
pub mod state;
pub mod step;
