//! Error types for Moov onboarding.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Mapping Errors** ([`OnboardError::MissingEntityType`],
//!   [`OnboardError::MissingProfileField`]): the profile cannot be mapped; raised before any
//!   network call
//! - **Response Errors** ([`OnboardError::DeserializationError`]): a response body is not the
//!   JSON document that was expected
//! - **Remote Errors** ([`OnboardError::HttpError`], [`OnboardError::ApiError`]): the call
//!   itself failed; propagated unchanged
//! - **Setup Errors** ([`OnboardError::ConfigError`], [`OnboardError::InvalidInput`])
//!
//! # Examples
//!
//! ```
//! use moov_onboard::error::{OnboardError, Result};
//!
//! fn require_name(name: Option<&str>) -> Result<&str> {
//!     name.ok_or_else(|| OnboardError::MissingProfileField("entity_name".to_owned()))
//! }
//!
//! assert!(require_name(None).is_err());
//! ```

use thiserror::Error;

/// Result type alias for onboarding operations.
pub type Result<T> = std::result::Result<T, OnboardError>;

/// Errors that can occur while onboarding a profile onto Moov.
///
/// # Partial Success
///
/// A business onboarding performs several dependent calls. When a call after account creation
/// fails, the account created by the first call is left in place and the error is returned as
/// is.
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum OnboardError {
    /// A business profile has no entity type record.
    #[error("Entity type not found while creating business account")]
    MissingEntityType,

    /// A field required to build a request document is absent or blank.
    #[error("missing required profile field: {0}")]
    MissingProfileField(String),

    /// A response body could not be parsed as the expected JSON document.
    #[error("failed to deserialize Moov response: {0}")]
    DeserializationError(String),

    /// A request document could not be encoded as JSON.
    #[error("failed to serialize Moov request: {0}")]
    SerializationError(String),

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS and TLS failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Moov answered with a non-success status.
    #[error("Moov returned status {status}: {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body text, as returned.
        body: String,
    },

    /// Configuration is invalid or credentials are unavailable.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Input validation failed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl OnboardError {
    /// Returns true if the error was raised before any request left the process.
    ///
    /// # Examples
    ///
    /// ```
    /// use moov_onboard::OnboardError;
    ///
    /// assert!(OnboardError::MissingEntityType.is_pre_flight());
    /// assert!(!OnboardError::ApiError { status: 500, body: String::new() }.is_pre_flight());
    /// ```
    #[must_use]
    pub const fn is_pre_flight(&self) -> bool {
        matches!(
            self,
            Self::MissingEntityType
                | Self::MissingProfileField(_)
                | Self::SerializationError(_)
                | Self::ConfigError(_)
                | Self::InvalidInput(_)
        )
    }
}

impl From<serde_json::Error> for OnboardError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializationError(err.to_string())
    }
}
