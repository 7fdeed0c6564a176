//! Settings file sources, lowest precedence first: global user file, then workspace file.

pub mod global_file;
pub mod workspace_file;
