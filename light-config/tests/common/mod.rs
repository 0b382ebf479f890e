//! Shared fixtures and entity models for the integration tests

pub mod fixtures;
pub mod models;
