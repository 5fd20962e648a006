//! # Centralized Error Handling
//!
//! This module defines the error type [`AppError`] returned to callers of the
//! proposal-creation pipeline. It follows the `thiserror` pattern for ergonomic
//! error handling.
//!
//! ## Error Categories
//!
//! 1. **Rejections** - the request cannot proceed for the given voter or input
//!    - [`NoVotingPower`](AppError::NoVotingPower)
//!    - [`InvalidInput`](AppError::InvalidInput)
//!    - [`Serialization`](AppError::Serialization)
//!
//! 2. **Ledger failures** - required on-chain data could not be obtained
//!    - [`Precondition`](AppError::Precondition)
//!    - [`Rpc`](AppError::Rpc) / [`Decoding`](AppError::Decoding)
//!
//! 3. **Delegated failures**
//!    - [`Submission`](AppError::Submission)
//!
//! 4. **Setup / unexpected**
//!    - [`Config`](AppError::Config) / [`Internal`](AppError::Internal)
//!
//! Plugin degradation (unknown plugin client, unreadable registrar) is not an
//! error at this level: the pipeline logs it and continues without the plugin.
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{AppError, Result};
//!
//! fn require_title(title: &str) -> Result<()> {
//!     if title.trim().is_empty() {
//!         return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Caller-facing error for the governance crates.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration error during startup or environment loading.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Solana RPC transport error (network, rate limit, node issues).
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Account data could not be decoded into the expected layout.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Invalid caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A required account (governance, realm, realm config) could not be fetched.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// The voter holds no token owner record for any mint considered.
    #[error("You do not have any voting power in this org")]
    NoVotingPower,

    /// An instruction could not be serialized; nothing was written.
    #[error("Instruction serialization failed: {0}")]
    Serialization(String),

    /// The submission primitive rejected or failed the proposal.
    #[error("Proposal submission failed: {0}")]
    Submission(String),

    /// Internal error (unexpected failures).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable identifier for the error variant.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Config",
            AppError::Rpc(_) => "Rpc",
            AppError::Decoding(_) => "Decoding",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::Precondition(_) => "Precondition",
            AppError::NoVotingPower => "NoVotingPower",
            AppError::Serialization(_) => "Serialization",
            AppError::Submission(_) => "Submission",
            AppError::Internal(_) => "Internal",
        }
    }

    /// Get a user-friendly error message.
    ///
    /// Transport and internal failures return a generic message to avoid exposing
    /// endpoint URLs or implementation details.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::Serialization(msg) => msg.clone(),
            AppError::Submission(msg) => msg.clone(),
            AppError::Precondition(msg) => msg.clone(),
            AppError::NoVotingPower => self.to_string(),
            AppError::Rpc(_) => "Service temporarily unavailable".to_string(),
            AppError::Config(_) | AppError::Internal(_) | AppError::Decoding(_) => {
                "An internal error occurred".to_string()
            }
        }
    }

    /// Whether the error is a rejection of this request rather than an outage.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::NoVotingPower | AppError::InvalidInput(_) | AppError::Serialization(_)
        )
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
