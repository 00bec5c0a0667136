//! Moov API client abstraction.
//!
//! [`MoovApi`] is the narrow interface the onboarding flow talks to. Each method performs one
//! unary call and returns the raw [`ApiResponse`]; parsing is left to the caller through
//! [`crate::response::clean_response`].
//!
//! [`HttpMoovClient`] is the production implementation. Tests substitute their own.
//!
//! # Examples
//!
//! ```rust,no_run
//! use moov_onboard::{
//!     client::{HttpMoovClient, MoovApi},
//!     config::MoovConfig,
//!     response::{TermsOfServiceToken, clean_response},
//! };
//!
//! # async fn example() -> moov_onboard::Result<()> {
//! let client = HttpMoovClient::with_config(&MoovConfig::default())?;
//! let response = client.get_terms_of_service_token().await?;
//! let tos: TermsOfServiceToken = clean_response(&response)?;
//! println!("token: {}", tos.token);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::{
    error::Result,
    request::{
        CapabilitiesRequest, CreateAccountRequest, PatchAccountRequest, RepresentativeRequest,
    },
    response::ApiResponse,
};

pub mod http;

pub use http::HttpMoovClient;

/// Remote operations consumed by onboarding.
///
/// Implementations return `Err` for transport failures and non-success statuses. A returned
/// `Ok` response may still carry a body that fails to parse.
pub trait MoovApi: Send + Sync {
    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn create_account<'a>(
        &'a self,
        request: &'a CreateAccountRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// Obtains a terms-of-service acceptance token.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn get_terms_of_service_token(&self) -> impl Future<Output = Result<ApiResponse>> + Send + '_;

    /// Obtains an access token limited to `scopes`, a comma-joined scope list.
    ///
    /// Later calls on that account through the same client are authorized with the new token.
    /// The raw token response is returned for the caller to parse.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn refresh_access_token<'a>(
        &'a self,
        scopes: &'a str,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// Requests capabilities for an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn request_capabilities<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a CapabilitiesRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// Registers a representative of a business account.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn add_representative<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a RepresentativeRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;

    /// Updates an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request cannot be sent or Moov rejects it.
    fn patch_account<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a PatchAccountRequest,
    ) -> impl Future<Output = Result<ApiResponse>> + Send + 'a;
}
