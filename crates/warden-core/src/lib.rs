//! Network-free logic for the assignment-warden enforcement engine.
//!
//! This crate provides timestamp normalization, timeline event collection,
//! linked-work candidate extraction, the staleness classifier, and
//! enforcement comment rendering consumed by the runtime crate.

pub mod enforcement_comment;
pub mod linked_work;
pub mod run_config;
pub mod staleness;
pub mod timeline;
pub mod timestamp;
pub mod tracker_view;

pub use run_config::{RepoRef, RunConfig, RunMode, DEFAULT_THRESHOLD_DAYS};
pub use staleness::{classify_assignee, EnforcementDecision};
pub use timestamp::{age_days, current_unix_timestamp, parse_tracker_timestamp};
