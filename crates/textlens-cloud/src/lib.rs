//! textlens-cloud
//!
//! Word-frequency aggregation for the word cloud, plus the debounced
//! scheduler that keeps repeated inputs from being recomputed.

pub mod aggregate;
pub mod filter;
pub mod fingerprint;
pub mod gatekeeper;
pub mod scheduler;

pub use aggregate::{rank, AggregateOutcome, FrequencyAggregator};
pub use filter::TermFilter;
pub use fingerprint::fingerprint;
pub use gatekeeper::{Admission, Gatekeeper};
pub use scheduler::CloudScheduler;
