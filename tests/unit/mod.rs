//! Unit tests for gatekeeper modules
//!
//! These tests exercise the public API without touching the host beyond
//! temporary config files.

mod test_config;
mod test_paths;
