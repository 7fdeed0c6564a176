//! fiction-writer: layered settings resolution and front-matter metadata trees.
//!
//! - [`config`] reads grouped settings namespaces, derives the dialogue fields, overlays
//!   workspace-local overrides and publishes immutable [`config::Config`] snapshots.
//! - [`metadata`] flattens a document's front-matter into a navigable tree of
//!   [`metadata::MetadataNode`]s, decorated from the current snapshot.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod observer;
