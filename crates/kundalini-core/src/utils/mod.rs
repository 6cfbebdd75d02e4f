//! Utility functions for HTTP, paths, and JSON path lookup.

pub mod http;
pub mod json_path;
pub mod paths;
