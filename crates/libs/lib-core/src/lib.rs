//! # Core Library
//!
//! Error taxonomy and environment configuration shared by the governance crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::{Cluster, Config};
pub use error::{AppError, Result};
