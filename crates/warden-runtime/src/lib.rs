//! Runtime crate for the assignment-warden enforcement engine.
//!
//! Owns all tracker network I/O: the GitHub API client, event aggregation,
//! linked-work resolution, action execution, and the sequential run loop.

pub mod enforcement_runtime;

pub use enforcement_runtime::{
    DecisionRecord, EnforcementRuntime, EnforcementRuntimeConfig, RunSummary,
};
