//! Onboarding configuration types.
//!
//! This module defines TOML-deserializable configuration for the Moov client and the
//! constants that flow into request documents.
//!
//! # Examples
//!
//! ```toml
//! base_url = "https://api.moov.io"
//!
//! [credentials]
//! public_key_env = "MOOV_PUBLIC_KEY"
//! secret_key_env = "MOOV_SECRET_KEY"
//!
//! [http]
//! timeout_secs = 30
//!
//! [onboarding]
//! capabilities = ["transfers", "send-funds", "wallet"]
//! ```

use std::{path::Path, time::Duration};

use serde::Deserialize;
use url::{Host, Url};

use crate::error::{OnboardError, Result};

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MoovConfig {
    /// Base URL of the Moov API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where to find the API key pair.
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// HTTP client tuning.
    #[serde(default)]
    pub http: HttpConfig,

    /// Values written into request documents.
    #[serde(default)]
    pub onboarding: OnboardingSettings,
}

impl Default for MoovConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            credentials: CredentialsConfig::default(),
            http: HttpConfig::default(),
            onboarding: OnboardingSettings::default(),
        }
    }
}

impl MoovConfig {
    /// Parses and validates configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::ConfigError`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use moov_onboard::config::MoovConfig;
    ///
    /// let config = MoovConfig::from_toml("base_url = \"https://api.moov.io\"").unwrap();
    /// assert_eq!(config.onboarding.mcc, "8999");
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| OnboardError::ConfigError(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates configuration from a file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or its content is invalid.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| OnboardError::InvalidInput(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates the configuration.
    ///
    /// This method checks for:
    /// - Base URL must be HTTPS and must not be a loopback address
    /// - Credential environment variable names must be well-formed
    /// - Timeouts must be within bounds
    /// - At least one capability must be configured
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::ConfigError`] if any validation fails.
    pub fn validate(&self) -> Result<()> {
        validate_base_url(&self.base_url)?;
        self.credentials.validate()?;
        self.http.validate()?;
        self.onboarding.validate()
    }
}

fn validate_base_url(base_url: &str) -> Result<()> {
    let invalid =
        |reason: &str| OnboardError::ConfigError(format!("base_url '{base_url}' {reason}"));

    let url = Url::parse(base_url).map_err(|e| invalid(&format!("is not a URL: {e}")))?;
    if url.scheme() != "https" {
        return Err(invalid("must use https"));
    }

    let local = match url.host() {
        Some(Host::Domain(domain)) => {
            domain.eq_ignore_ascii_case("localhost") || domain.ends_with(".localhost")
        }
        Some(Host::Ipv4(ip)) => ip.is_loopback() || ip.is_unspecified(),
        Some(Host::Ipv6(ip)) => ip.is_loopback() || ip.is_unspecified(),
        None => return Err(invalid("has no host")),
    };
    if local {
        return Err(invalid("points at the local machine"));
    }

    Ok(())
}

/// Names of the environment variables that hold the Moov API key pair.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsConfig {
    /// Variable holding the public key.
    #[serde(default = "default_public_key_env")]
    pub public_key_env: String,
    /// Variable holding the secret key.
    #[serde(default = "default_secret_key_env")]
    pub secret_key_env: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self { public_key_env: default_public_key_env(), secret_key_env: default_secret_key_env() }
    }
}

impl CredentialsConfig {
    fn validate(&self) -> Result<()> {
        validate_env_var_name(&self.public_key_env)?;
        validate_env_var_name(&self.secret_key_env)
    }

    /// Reads the key pair from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::ConfigError`] if either variable is unset or empty.
    pub fn load(&self) -> Result<Credentials> {
        Ok(Credentials {
            public_key: read_env(&self.public_key_env)?,
            secret_key: read_env(&self.secret_key_env)?,
        })
    }
}

fn read_env(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(OnboardError::ConfigError(format!("environment variable {name} is not set"))),
    }
}

fn validate_env_var_name(name: &str) -> Result<()> {
    let Some(first_char) = name.chars().next() else {
        return Err(OnboardError::ConfigError(
            "environment variable name cannot be empty".to_owned(),
        ));
    };

    if !first_char.is_ascii_alphabetic() && first_char != '_' {
        return Err(OnboardError::ConfigError(format!(
            "environment variable name must start with letter or underscore: {name}"
        )));
    }

    if let Some(ch) = name.chars().find(|ch| !ch.is_ascii_alphanumeric() && *ch != '_') {
        return Err(OnboardError::ConfigError(format!(
            "environment variable name contains invalid character '{ch}': {name}"
        )));
    }

    Ok(())
}

/// Moov API key pair.
#[derive(Clone)]
pub struct Credentials {
    /// Public key, used as the Basic auth username.
    pub public_key: String,
    /// Secret key, used as the Basic auth password.
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Maximum idle connections per host.
    #[serde(default = "default_pool_max_idle")]
    pub pool_max_idle_per_host: usize,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl HttpConfig {
    /// Validates timeout bounds.
    ///
    /// # Errors
    ///
    /// Returns error if timeout values are outside valid ranges:
    /// - `timeout_secs`: must be 1-300 seconds
    /// - `connect_timeout_secs`: must be 1-60 seconds
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(OnboardError::ConfigError(
                "timeout_secs must be between 1 and 300".to_owned(),
            ));
        }
        if self.connect_timeout_secs == 0 || self.connect_timeout_secs > 60 {
            return Err(OnboardError::ConfigError(
                "connect_timeout_secs must be between 1 and 60".to_owned(),
            ));
        }
        Ok(())
    }

    /// Returns timeout as Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns connect timeout as Duration.
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Constants written into request documents.
#[derive(Debug, Clone, Deserialize)]
pub struct OnboardingSettings {
    /// Country calling code attached to every phone number.
    #[serde(default = "default_phone_country_code")]
    pub phone_country_code: String,

    /// ISO 3166-1 alpha-2 country used for personal addresses.
    #[serde(default = "default_country")]
    pub default_country: String,

    /// Merchant category code declared for business accounts.
    #[serde(default = "default_mcc")]
    pub mcc: String,

    /// Job title used when the profile has none.
    #[serde(default = "default_job_title")]
    pub default_job_title: String,

    /// Capabilities requested for an onboarded account.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<String>,
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            phone_country_code: default_phone_country_code(),
            default_country: default_country(),
            mcc: default_mcc(),
            default_job_title: default_job_title(),
            capabilities: default_capabilities(),
        }
    }
}

impl OnboardingSettings {
    fn validate(&self) -> Result<()> {
        if self.capabilities.is_empty() {
            return Err(OnboardError::ConfigError(
                "onboarding.capabilities must not be empty".to_owned(),
            ));
        }
        if self.default_country.len() != 2 {
            return Err(OnboardError::ConfigError(format!(
                "onboarding.default_country must be an ISO alpha-2 code: {}",
                self.default_country
            )));
        }
        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.moov.io".to_owned()
}

fn default_public_key_env() -> String {
    "MOOV_PUBLIC_KEY".to_owned()
}

fn default_secret_key_env() -> String {
    "MOOV_SECRET_KEY".to_owned()
}

fn default_pool_max_idle() -> usize {
    10
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_phone_country_code() -> String {
    "1".to_owned()
}

fn default_country() -> String {
    "US".to_owned()
}

fn default_mcc() -> String {
    "8999".to_owned()
}

fn default_job_title() -> String {
    "Owner".to_owned()
}

fn default_capabilities() -> Vec<String> {
    ["transfers", "send-funds", "wallet"].into_iter().map(str::to_owned).collect()
}
