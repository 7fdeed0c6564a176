//! Property-based tests for resolution and flattening invariants
