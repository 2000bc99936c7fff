//! Cross-module tests
//!
//! Shared fixtures live in `fixtures`; `engine_flow` drives the engine
//! end to end and `props` holds the property tests.

pub(crate) mod fixtures;
