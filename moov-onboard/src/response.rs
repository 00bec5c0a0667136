//! Responses returned by Moov and their cleaning.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::error::{OnboardError, Result};

/// Raw response of a remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from a status and body.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }
}

/// Parses a response body as JSON.
///
/// # Errors
///
/// Returns [`OnboardError::DeserializationError`] if the body is not valid JSON for `T`.
///
/// # Examples
///
/// ```
/// use moov_onboard::response::{ApiResponse, TermsOfServiceToken, clean_response};
///
/// let response = ApiResponse::new(200, r#"{"token":"tos-123"}"#);
/// let tos: TermsOfServiceToken = clean_response(&response).unwrap();
/// assert_eq!(tos.token, "tos-123");
/// ```
pub fn clean_response<T: DeserializeOwned>(response: &ApiResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| {
        OnboardError::DeserializationError(format!("status {}: {e}", response.status))
    })
}

/// Account returned by `POST /accounts`.
///
/// Only the ID is typed; every other field is kept as returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Moov account ID.
    #[serde(rename = "accountID")]
    pub account_id: String,
    /// Remaining response fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Response of `GET /tos-token`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TermsOfServiceToken {
    /// Opaque acceptance token.
    pub token: String,
}

/// Response of `POST /oauth2/token`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    /// Bearer token.
    pub access_token: String,
    /// Token type, normally `Bearer`.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Granted scopes.
    #[serde(default)]
    pub scope: Option<String>,
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_account_keeps_extra_fields() {
        let body = json!({
            "accountID": "acc-123",
            "accountType": "business",
            "displayName": "Acme",
            "capabilities": []
        });
        let response = ApiResponse::new(200, serde_json::to_vec(&body).unwrap());

        let account: Account = clean_response(&response).unwrap();
        assert_eq!(account.account_id, "acc-123");
        assert_eq!(account.fields["displayName"], "Acme");
        assert_eq!(serde_json::to_value(&account).unwrap(), body);
    }

    #[test]
    fn test_malformed_body_is_deserialization_error() {
        let response = ApiResponse::new(200, "<html>bad gateway</html>");
        let result: Result<Value> = clean_response(&response);
        assert!(matches!(result, Err(OnboardError::DeserializationError(_))));
    }

    #[test]
    fn test_account_without_id_is_deserialization_error() {
        let response = ApiResponse::new(200, r#"{"accountType":"individual"}"#);
        let result: Result<Account> = clean_response(&response);
        assert!(matches!(result, Err(OnboardError::DeserializationError(_))));
    }

    #[test]
    fn test_empty_body_is_deserialization_error() {
        let response = ApiResponse::new(204, Vec::new());
        let result: Result<Value> = clean_response(&response);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("status 204"));
    }

    #[test]
    fn test_access_token_debug_redacted() {
        let response = ApiResponse::new(
            200,
            r#"{"access_token":"secret-token","token_type":"Bearer","expires_in":3600}"#,
        );
        let token: AccessToken = clean_response(&response).unwrap();
        assert_eq!(token.expires_in, Some(3600));
        assert!(token.scope.is_none());
        assert!(!format!("{token:?}").contains("secret-token"));
    }
}
