//! Utility modules.

/// Log sanitization helpers: body truncation and key masking.
pub mod log_sanitizer;
