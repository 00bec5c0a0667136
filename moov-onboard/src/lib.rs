//! Moov onboarding: create payment-platform accounts from application profiles.
//!
//! This crate maps an internal user/business profile into the documents the Moov API expects
//! and drives the calls needed to open an account:
//!
//! - **Individuals** get an individual account (SSN, home address, date of birth).
//! - **Businesses** get a business account (EIN, legal address, business type), after which
//!   the profile's owner is registered as the sole controlling representative and the account
//!   is patched with `ownersProvided`.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  mapping (pure)   ┌────────────────────┐
//! │ UserProfile  │──────────────────►│ request documents  │
//! └──────────────┘                   └─────────┬──────────┘
//!                                              │
//!                          ┌───────────────────▼───────────────────┐
//!                          │ AccountOnboarding<C: MoovApi>         │
//!                          │ tos-token → create → owners → patch   │
//!                          └───────────────────┬───────────────────┘
//!                                              │ MoovApi
//!                               ┌──────────────▼──────────────┐
//!                               │ HttpMoovClient (reqwest)    │
//!                               └─────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use moov_onboard::{AccountOnboarding, HttpMoovClient, MoovConfig, profile::UserProfile};
//!
//! # async fn example(profile: UserProfile) -> moov_onboard::Result<()> {
//! let config = MoovConfig::from_file("moov.toml")?;
//! let client = HttpMoovClient::with_config(&config)?;
//! let onboarding = AccountOnboarding::with_settings(client, config.onboarding);
//!
//! let account = onboarding.create_account(&profile).await?;
//! println!("created {}", account.account_id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod client;
pub mod config;
pub mod error;
pub mod mapping;
pub mod onboarding;
pub mod profile;
pub mod request;
pub mod response;

pub use client::{HttpMoovClient, MoovApi};
pub use config::{MoovConfig, OnboardingSettings};
pub use error::{OnboardError, Result};
pub use onboarding::AccountOnboarding;
pub use response::{Account, ApiResponse};
