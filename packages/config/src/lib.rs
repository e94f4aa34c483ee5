// ABOUTME: Configuration and environment variable management for Runlet
// ABOUTME: Exposes env var name constants and typed parsing helpers

pub mod constants;
pub mod env;
