//! HTTP implementation of [`MoovApi`] using reqwest.

use std::{
    fmt,
    sync::{PoisonError, RwLock},
};

use reqwest::{Client, Method, RequestBuilder, header};
use serde::Serialize;
use tracing::{debug, instrument};
use url::Url;

use crate::{
    client::MoovApi,
    config::{Credentials, HttpConfig, MoovConfig},
    error::{OnboardError, Result},
    request::{
        CapabilitiesRequest, CreateAccountRequest, PatchAccountRequest, RepresentativeRequest,
    },
    response::{AccessToken, ApiResponse, clean_response},
};

const ACCOUNTS_PATH: &str = "/accounts";
const TOS_TOKEN_PATH: &str = "/tos-token";
const OAUTH_TOKEN_PATH: &str = "/oauth2/token";

/// Validates an account ID before it is placed into a request path.
fn validate_account_id(account_id: &str) -> Result<&str> {
    if account_id.is_empty() {
        return Err(OnboardError::InvalidInput("account ID cannot be empty".to_owned()));
    }
    if account_id.contains("..")
        || account_id.chars().any(|ch| matches!(ch, '/' | '\\' | '?' | '#' | '%') || ch.is_control())
    {
        return Err(OnboardError::InvalidInput(format!(
            "account ID contains forbidden characters: {account_id:?}"
        )));
    }
    Ok(account_id)
}

fn account_path(account_id: &str, suffix: &str) -> Result<String> {
    let account_id = validate_account_id(account_id)?;
    Ok(format!("{ACCOUNTS_PATH}/{account_id}{suffix}"))
}

fn encode<T: Serialize>(body: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| OnboardError::SerializationError(e.to_string()))
}

/// How a request is authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// HTTP Basic with the API key pair.
    KeyPair,
    /// The last token from [`MoovApi::refresh_access_token`], or the key pair if none was issued.
    AccountScoped,
}

/// Moov client over HTTPS.
///
/// Calls that do not target an existing account (terms-of-service token, account creation,
/// token refresh) always use HTTP Basic auth with the API key pair. Calls under
/// `/accounts/{id}/...` use the bearer token issued by the last
/// [`MoovApi::refresh_access_token`]. That token is scoped to one account, so the client can be
/// reused across onboardings.
///
/// The base URL is taken as given. Use [`MoovConfig::validate`] (called by
/// [`MoovConfig::from_toml`]) to enforce HTTPS.
pub struct HttpMoovClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    access_token: RwLock<Option<String>>,
}

impl fmt::Debug for HttpMoovClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMoovClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl HttpMoovClient {
    /// Creates a client from configuration, reading the API key pair from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::ConfigError`] if a credential variable is unset or the base URL
    /// is invalid, and [`OnboardError::HttpError`] if the HTTP client cannot be built.
    pub fn with_config(config: &MoovConfig) -> Result<Self> {
        let credentials = config.credentials.load()?;
        Self::with_credentials(&config.base_url, &config.http, credentials)
    }

    /// Creates a client with explicit credentials.
    ///
    /// # Errors
    ///
    /// Returns [`OnboardError::ConfigError`] if the base URL is invalid, and
    /// [`OnboardError::HttpError`] if the HTTP client cannot be built.
    pub fn with_credentials(
        base_url: &str,
        http: &HttpConfig,
        credentials: Credentials,
    ) -> Result<Self> {
        let parsed = Url::parse(base_url)
            .map_err(|e| OnboardError::ConfigError(format!("invalid base_url '{base_url}': {e}")))?;
        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(OnboardError::ConfigError(format!("base_url missing host: {base_url}")));
        }

        let client = Client::builder()
            .pool_max_idle_per_host(http.pool_max_idle_per_host)
            .timeout(http.timeout())
            .connect_timeout(http.connect_timeout())
            .build()
            .map_err(OnboardError::HttpError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            credentials,
            access_token: RwLock::new(None),
        })
    }

    /// Returns the base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns true once a bearer token has been issued.
    #[must_use]
    pub fn has_access_token(&self) -> bool {
        self.access_token.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    fn authorize(&self, request: RequestBuilder, auth: Auth) -> RequestBuilder {
        let token = match auth {
            Auth::KeyPair => None,
            Auth::AccountScoped => {
                self.access_token.read().unwrap_or_else(PoisonError::into_inner).clone()
            }
        };
        match token {
            Some(token) => request.bearer_auth(token),
            None => request
                .basic_auth(&self.credentials.public_key, Some(&self.credentials.secret_key)),
        }
    }

    #[instrument(skip(self, body))]
    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        body: Option<Vec<u8>>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self
            .authorize(self.client.request(method, &url), auth)
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.header(header::CONTENT_TYPE, "application/json").body(body);
        }

        let response = request.send().await?;
        read_response(response).await
    }
}

async fn read_response(response: reqwest::Response) -> Result<ApiResponse> {
    let status = response.status();
    let body = response.bytes().await.map_err(OnboardError::HttpError)?.to_vec();

    debug!(status = status.as_u16(), bytes = body.len(), "moov response received");

    if !status.is_success() {
        return Err(OnboardError::ApiError {
            status: status.as_u16(),
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    Ok(ApiResponse { status: status.as_u16(), body })
}

impl MoovApi for HttpMoovClient {
    async fn create_account<'a>(&'a self, request: &'a CreateAccountRequest) -> Result<ApiResponse> {
        self.execute(Method::POST, ACCOUNTS_PATH, Auth::KeyPair, Some(encode(request)?)).await
    }

    async fn get_terms_of_service_token(&self) -> Result<ApiResponse> {
        self.execute(Method::GET, TOS_TOKEN_PATH, Auth::KeyPair, None).await
    }

    #[instrument(skip(self))]
    async fn refresh_access_token<'a>(&'a self, scopes: &'a str) -> Result<ApiResponse> {
        let url = format!("{}{OAUTH_TOKEN_PATH}", self.base_url);

        let response = self
            .authorize(self.client.post(&url), Auth::KeyPair)
            .header(header::ACCEPT, "application/json")
            .form(&[("grant_type", "client_credentials"), ("scope", scopes)])
            .send()
            .await?;
        let response = read_response(response).await?;

        let token: AccessToken = clean_response(&response)?;
        *self.access_token.write().unwrap_or_else(PoisonError::into_inner) =
            Some(token.access_token);

        Ok(response)
    }

    async fn request_capabilities<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a CapabilitiesRequest,
    ) -> Result<ApiResponse> {
        let path = account_path(account_id, "/capabilities")?;
        self.execute(Method::POST, &path, Auth::AccountScoped, Some(encode(request)?)).await
    }

    async fn add_representative<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a RepresentativeRequest,
    ) -> Result<ApiResponse> {
        let path = account_path(account_id, "/representatives")?;
        self.execute(Method::POST, &path, Auth::AccountScoped, Some(encode(request)?)).await
    }

    async fn patch_account<'a>(
        &'a self,
        account_id: &'a str,
        request: &'a PatchAccountRequest,
    ) -> Result<ApiResponse> {
        let path = account_path(account_id, "")?;
        self.execute(Method::PATCH, &path, Auth::AccountScoped, Some(encode(request)?)).await
    }
}
