//! Account onboarding flow.
//!
//! [`AccountOnboarding`] turns a [`UserProfile`] into a Moov account:
//!
//! ```text
//! individual:  map profile ─► tos-token ─► create account
//! business:    map profile ─► tos-token ─► create account
//!                          ─► refresh scopes ─► add representative ─► patch ownersProvided
//! ```
//!
//! Mapping failures are raised before the first remote call. Remote failures propagate as is;
//! nothing already created is rolled back.

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    client::MoovApi,
    config::OnboardingSettings,
    error::{OnboardError, Result},
    mapping,
    profile::UserProfile,
    request::{
        CapabilitiesRequest, CreateAccountRequest, PatchAccountRequest, RepresentativeRequest,
    },
    response::{AccessToken, Account, TermsOfServiceToken, clean_response},
};

/// Permissions needed to register beneficial owners.
pub const REPRESENTATIVE_PERMISSIONS: &[&str] =
    &["profile.read", "profile.write", "representatives.read", "representatives.write"];

/// Permissions needed to request capabilities.
pub const CAPABILITY_PERMISSIONS: &[&str] =
    &["profile.read", "profile.write", "capabilities.read", "capabilities.write"];

/// Builds the comma-joined scope list for permissions on one account.
///
/// # Examples
///
/// ```
/// use moov_onboard::onboarding::account_scopes;
///
/// assert_eq!(
///     account_scopes("acc-1", &["profile.read", "profile.write"]),
///     "/accounts/acc-1/profile.read,/accounts/acc-1/profile.write"
/// );
/// ```
#[must_use]
pub fn account_scopes(account_id: &str, permissions: &[&str]) -> String {
    permissions
        .iter()
        .map(|permission| format!("/accounts/{account_id}/{permission}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Onboards profiles through a [`MoovApi`] client.
#[derive(Debug)]
pub struct AccountOnboarding<C> {
    client: C,
    settings: OnboardingSettings,
}

impl<C: MoovApi> AccountOnboarding<C> {
    /// Creates an onboarding flow with default settings.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_settings(client, OnboardingSettings::default())
    }

    /// Creates an onboarding flow with the given settings.
    #[must_use]
    pub const fn with_settings(client: C, settings: OnboardingSettings) -> Self {
        Self { client, settings }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Returns the settings.
    #[must_use]
    pub const fn settings(&self) -> &OnboardingSettings {
        &self.settings
    }

    /// Creates the Moov account for a profile.
    ///
    /// Individuals get an individual account. Every other profile gets a business account,
    /// followed by registration of the profile's owner as the sole controlling representative
    /// and a patch declaring that all owners were provided.
    ///
    /// Returns the cleaned create-account response in both cases.
    ///
    /// # Errors
    ///
    /// - [`OnboardError::MissingEntityType`] / [`OnboardError::MissingProfileField`] before any
    ///   call if the profile cannot be mapped
    /// - [`OnboardError::DeserializationError`] if a response body is malformed
    /// - Any error returned by the client, unchanged
    #[instrument(
        skip(self, profile),
        fields(individual = profile.is_individual(), account_id = tracing::field::Empty)
    )]
    pub async fn create_account(&self, profile: &UserProfile) -> Result<Account> {
        if profile.is_individual() {
            self.create_individual_account(profile).await
        } else {
            self.create_business_account(profile).await
        }
    }

    async fn create_individual_account(&self, profile: &UserProfile) -> Result<Account> {
        let individual = mapping::individual_profile(profile, &self.settings)?;
        let request = CreateAccountRequest::individual(individual, self.tos_token().await?);
        debug!(?request, "moov individual account request");

        self.submit_account(&request).await
    }

    async fn create_business_account(&self, profile: &UserProfile) -> Result<Account> {
        let business = mapping::business_profile(profile, &self.settings)?;
        let representative = mapping::representative(profile, &self.settings)?;

        let request = CreateAccountRequest::business(business, self.tos_token().await?);
        debug!(?request, "moov business account request");

        let account = self.submit_account(&request).await?;

        self.add_beneficial_owner(&account.account_id, &representative).await?;

        Ok(account)
    }

    async fn submit_account(&self, request: &CreateAccountRequest) -> Result<Account> {
        let response = self.client.create_account(request).await?;
        let account: Account = clean_response(&response)?;

        tracing::Span::current().record("account_id", account.account_id.as_str());
        info!(account_type = ?request.account_type, "moov account created");
        debug!(?account, "moov create account response");

        Ok(account)
    }

    async fn add_beneficial_owner(
        &self,
        account_id: &str,
        representative: &RepresentativeRequest,
    ) -> Result<()> {
        self.authorize_account(account_id, REPRESENTATIVE_PERMISSIONS).await?;

        let response = self.client.add_representative(account_id, representative).await?;
        let cleaned: Value = clean_response(&response)?;
        debug!(response = %cleaned, "moov add representative response");

        let patch = PatchAccountRequest::owners_provided();
        let response = self.client.patch_account(account_id, &patch).await?;
        let cleaned: Value = clean_response(&response)?;
        debug!(response = %cleaned, "moov patch account response");

        info!("beneficial owner registered");
        Ok(())
    }

    /// Requests the configured capabilities for the profile's existing Moov account.
    ///
    /// Returns the cleaned capabilities response.
    ///
    /// # Errors
    ///
    /// - [`OnboardError::MissingProfileField`] if the profile has no `moov_account_id`
    /// - [`OnboardError::DeserializationError`] if a response body is malformed
    /// - Any error returned by the client, unchanged
    #[instrument(skip(self, profile))]
    pub async fn request_capabilities(&self, profile: &UserProfile) -> Result<Value> {
        let account_id = profile
            .moov_account_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| OnboardError::MissingProfileField("moov_account_id".to_owned()))?;

        self.authorize_account(account_id, CAPABILITY_PERMISSIONS).await?;

        let request = CapabilitiesRequest { capabilities: self.settings.capabilities.clone() };
        let response = self.client.request_capabilities(account_id, &request).await?;
        let cleaned: Value = clean_response(&response)?;
        debug!(response = %cleaned, "moov request capabilities response");

        info!(account_id, capabilities = ?request.capabilities, "moov capabilities requested");
        Ok(cleaned)
    }

    /// Exchanges the key pair for a token scoped to `permissions` on one account.
    async fn authorize_account(&self, account_id: &str, permissions: &[&str]) -> Result<()> {
        let scopes = account_scopes(account_id, permissions);
        let response = self.client.refresh_access_token(&scopes).await?;
        let token: AccessToken = clean_response(&response)?;
        debug!(?token, "moov access token refreshed");
        Ok(())
    }

    async fn tos_token(&self) -> Result<String> {
        let response = self.client.get_terms_of_service_token().await?;
        let tos: TermsOfServiceToken = clean_response(&response)?;
        Ok(tos.token)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::{
        profile::{BusinessType, Country, EntityType, LegalAddress, State, User},
        response::ApiResponse,
    };

    /// Records every call and answers with canned bodies.
    #[derive(Default)]
    struct FakeClient {
        calls: Mutex<Vec<String>>,
        fail_representative: bool,
        malformed_token: bool,
    }

    impl FakeClient {
        fn record(&self, call: impl Into<String>) {
            self.calls.lock().unwrap().push(call.into());
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl MoovApi for FakeClient {
        async fn create_account<'a>(
            &'a self,
            request: &'a CreateAccountRequest,
        ) -> Result<ApiResponse> {
            let body = serde_json::to_value(request).unwrap();
            self.record(format!("create_account:{}", body["accountType"].as_str().unwrap()));
            Ok(ApiResponse::new(
                200,
                r#"{"accountID":"acc-42","accountType":"business","mode":"sandbox"}"#,
            ))
        }

        async fn get_terms_of_service_token(&self) -> Result<ApiResponse> {
            self.record("tos_token");
            Ok(ApiResponse::new(200, r#"{"token":"tos-1"}"#))
        }

        async fn refresh_access_token<'a>(&'a self, scopes: &'a str) -> Result<ApiResponse> {
            self.record(format!("refresh:{scopes}"));
            if self.malformed_token {
                return Ok(ApiResponse::new(200, r#"{"token_type":"Bearer"}"#));
            }
            Ok(ApiResponse::new(200, r#"{"access_token":"t"}"#))
        }

        async fn request_capabilities<'a>(
            &'a self,
            account_id: &'a str,
            request: &'a CapabilitiesRequest,
        ) -> Result<ApiResponse> {
            self.record(format!("capabilities:{account_id}:{}", request.capabilities.join("|")));
            Ok(ApiResponse::new(200, r#"[{"capability":"transfers","status":"pending"}]"#))
        }

        async fn add_representative<'a>(
            &'a self,
            account_id: &'a str,
            _request: &'a RepresentativeRequest,
        ) -> Result<ApiResponse> {
            self.record(format!("add_representative:{account_id}"));
            if self.fail_representative {
                return Err(OnboardError::ApiError { status: 400, body: "bad rep".to_owned() });
            }
            Ok(ApiResponse::new(200, r#"{"representativeID":"rep-1"}"#))
        }

        async fn patch_account<'a>(
            &'a self,
            account_id: &'a str,
            _request: &'a PatchAccountRequest,
        ) -> Result<ApiResponse> {
            self.record(format!("patch_account:{account_id}"));
            Ok(ApiResponse::new(200, r#"{"accountID":"acc-42"}"#))
        }
    }

    fn individual() -> UserProfile {
        UserProfile {
            entity_profile_type_id: 1,
            first_name: "Ada".to_owned(),
            middle_name: None,
            last_name: "Lovelace".to_owned(),
            title: None,
            phone: "5555550100".to_owned(),
            user: User { email: "ada@example.com".to_owned() },
            address1: "1 Main St".to_owned(),
            address2: None,
            city: "Springfield".to_owned(),
            state: State { state_code: "IL".to_owned(), name: "Illinois".to_owned() },
            zipcode: "62701".to_owned(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 12, 10).unwrap(),
            tax_id_cr: "123-45-6789".to_owned(),
            entity_tax_id_cr: None,
            entity_name: None,
            entity_type: None,
            entity_legal_address: None,
            moov_account_id: None,
        }
    }

    fn business() -> UserProfile {
        UserProfile {
            entity_profile_type_id: 2,
            entity_name: Some("Lovelace LLC".to_owned()),
            entity_tax_id_cr: Some("12-3456789".to_owned()),
            entity_type: Some(EntityType {
                id: None,
                name: None,
                moov_business_type: BusinessType::Llc,
            }),
            entity_legal_address: Some(LegalAddress {
                address1: "100 Corporate Way".to_owned(),
                address2: None,
                city: "Wilmington".to_owned(),
                state: State { state_code: "DE".to_owned(), name: "Delaware".to_owned() },
                zipcode: "19801".to_owned(),
                country: Country { iso2: "US".to_owned() },
            }),
            ..individual()
        }
    }

    #[test]
    fn test_account_scopes() {
        assert_eq!(
            account_scopes("acc-1", REPRESENTATIVE_PERMISSIONS),
            "/accounts/acc-1/profile.read,/accounts/acc-1/profile.write,\
             /accounts/acc-1/representatives.read,/accounts/acc-1/representatives.write"
        );
        assert_eq!(account_scopes("acc-1", &[]), "");
    }

    #[tokio::test]
    async fn test_individual_flow() {
        let onboarding = AccountOnboarding::new(FakeClient::default());
        let account = onboarding.create_account(&individual()).await.unwrap();

        assert_eq!(account.account_id, "acc-42");
        assert_eq!(onboarding.client().calls(), vec!["tos_token", "create_account:individual"]);
    }

    #[tokio::test]
    async fn test_business_flow_order() {
        let onboarding = AccountOnboarding::new(FakeClient::default());
        let account = onboarding.create_account(&business()).await.unwrap();

        assert_eq!(account.account_id, "acc-42");
        assert_eq!(account.fields["mode"], json!("sandbox"));
        assert_eq!(
            onboarding.client().calls(),
            vec![
                "tos_token".to_owned(),
                "create_account:business".to_owned(),
                format!("refresh:{}", account_scopes("acc-42", REPRESENTATIVE_PERMISSIONS)),
                "add_representative:acc-42".to_owned(),
                "patch_account:acc-42".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn test_business_missing_entity_type_makes_no_calls() {
        let onboarding = AccountOnboarding::new(FakeClient::default());
        let profile = UserProfile { entity_type: None, ..business() };

        let result = onboarding.create_account(&profile).await;
        assert!(matches!(result, Err(OnboardError::MissingEntityType)));
        assert!(onboarding.client().calls().is_empty());
    }

    #[tokio::test]
    async fn test_representative_failure_leaves_account() {
        let client = FakeClient { fail_representative: true, ..FakeClient::default() };
        let onboarding = AccountOnboarding::new(client);

        let result = onboarding.create_account(&business()).await;
        assert!(matches!(result, Err(OnboardError::ApiError { status: 400, .. })));

        let calls = onboarding.client().calls();
        assert!(calls.contains(&"create_account:business".to_owned()));
        assert_eq!(calls.last().unwrap(), "add_representative:acc-42");
    }

    #[tokio::test]
    async fn test_malformed_access_token_stops_flow() {
        let client = FakeClient { malformed_token: true, ..FakeClient::default() };
        let onboarding = AccountOnboarding::new(client);

        let result = onboarding.create_account(&business()).await;
        assert!(matches!(result, Err(OnboardError::DeserializationError(_))));

        let calls = onboarding.client().calls();
        assert!(calls.last().unwrap().starts_with("refresh:"));
        assert!(!calls.iter().any(|call| call.starts_with("add_representative")));

        let profile = UserProfile { moov_account_id: Some("acc-7".to_owned()), ..individual() };
        let result = onboarding.request_capabilities(&profile).await;
        assert!(matches!(result, Err(OnboardError::DeserializationError(_))));
    }

    #[tokio::test]
    async fn test_request_capabilities() {
        let onboarding = AccountOnboarding::new(FakeClient::default());
        let profile = UserProfile { moov_account_id: Some("acc-7".to_owned()), ..individual() };

        let response = onboarding.request_capabilities(&profile).await.unwrap();
        assert_eq!(response[0]["capability"], "transfers");
        assert_eq!(
            onboarding.client().calls(),
            vec![
                format!("refresh:{}", account_scopes("acc-7", CAPABILITY_PERMISSIONS)),
                "capabilities:acc-7:transfers|send-funds|wallet".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn test_request_capabilities_requires_account_id() {
        let onboarding = AccountOnboarding::new(FakeClient::default());

        let result = onboarding.request_capabilities(&individual()).await;
        assert!(
            matches!(result, Err(OnboardError::MissingProfileField(f)) if f == "moov_account_id")
        );
        assert!(onboarding.client().calls().is_empty());
    }
}
