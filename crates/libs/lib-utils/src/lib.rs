//! # Utilities Library
//!
//! Shared helpers for base64 transport encoding, environment variables and input validation.

pub mod b64;
pub mod envs;
pub mod validation;

// Re-export commonly used functions
pub use b64::{b64_encode, b64_decode};
pub use envs::{get_env_opt, get_env_or};
pub use validation::{validate_not_empty, validate_max_length};
