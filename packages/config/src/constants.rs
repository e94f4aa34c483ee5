// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Runlet

// Sandbox Service Configuration
pub const RUNLET_SANDBOX_TEMPLATE: &str = "RUNLET_SANDBOX_TEMPLATE";
pub const RUNLET_SANDBOX_DOMAIN: &str = "RUNLET_SANDBOX_DOMAIN";
pub const RUNLET_SANDBOX_TIMEOUT_SECS: &str = "RUNLET_SANDBOX_TIMEOUT_SECS";

// Credentials (singleton mode only; multi-tenant callers supply their own)
pub const RUNLET_SANDBOX_API_KEY: &str = "RUNLET_SANDBOX_API_KEY";

// HTTP Client Configuration
pub const RUNLET_HTTP_REQUEST_TIMEOUT_SECS: &str = "RUNLET_HTTP_REQUEST_TIMEOUT_SECS";
