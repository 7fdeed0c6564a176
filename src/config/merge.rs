//! Merge rules between namespace-derived snapshots and local overrides.

pub mod merge_policy;
