//! Request documents sent to Moov.
//!
//! Field names follow the Moov wire format (camelCase, with `governmentID` and `taxID` spelled
//! as the API expects). Optional fields are omitted rather than sent as `null`.

use std::fmt;

use serde::Serialize;

use crate::profile::BusinessType;

/// Kind of Moov account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Natural person.
    Individual,
    /// Legal entity.
    Business,
}

/// Body of `POST /accounts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Account kind; always agrees with the populated profile branch.
    pub account_type: AccountType,
    /// Profile document.
    pub profile: AccountProfile,
    /// Terms-of-service acceptance.
    pub terms_of_service: TermsOfService,
}

impl CreateAccountRequest {
    /// Wraps an individual profile.
    #[must_use]
    pub fn individual(individual: IndividualProfile, tos_token: String) -> Self {
        Self {
            account_type: AccountType::Individual,
            profile: AccountProfile::Individual(individual),
            terms_of_service: TermsOfService { token: tos_token },
        }
    }

    /// Wraps a business profile.
    #[must_use]
    pub fn business(business: BusinessProfile, tos_token: String) -> Self {
        Self {
            account_type: AccountType::Business,
            profile: AccountProfile::Business(business),
            terms_of_service: TermsOfService { token: tos_token },
        }
    }
}

/// Profile branch of an account; serializes as `{"individual": ...}` or `{"business": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountProfile {
    /// Individual profile.
    Individual(IndividualProfile),
    /// Business profile.
    Business(BusinessProfile),
}

/// Terms-of-service acceptance token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsOfService {
    /// Token obtained from `GET /tos-token`.
    pub token: String,
}

/// Individual profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndividualProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Phone.
    pub phone: Phone,
    /// Email.
    pub email: String,
    /// Home address.
    pub address: Address,
    /// Date of birth.
    pub birth_date: BirthDate,
    /// SSN.
    #[serde(rename = "governmentID")]
    pub government_id: GovernmentId,
}

/// Business profile document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    /// Registered legal name.
    pub legal_business_name: String,
    /// Business type.
    pub business_type: BusinessType,
    /// Phone.
    pub phone: Phone,
    /// Email.
    pub email: String,
    /// Free-text description.
    pub description: String,
    /// Registered address.
    pub address: Address,
    /// Industry classification.
    pub industry_codes: IndustryCodes,
    /// EIN, when the entity has one.
    #[serde(rename = "taxID", skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<BusinessTaxId>,
}

/// Phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Phone {
    /// National number.
    pub number: String,
    /// Calling code without `+`.
    pub country_code: String,
}

/// Postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// First line.
    pub address_line1: String,
    /// Second line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    /// City.
    pub city: String,
    /// State code or name.
    pub state_or_province: String,
    /// Postal code.
    pub postal_code: String,
    /// ISO alpha-2 country.
    pub country: String,
}

/// Calendar date split into components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthDate {
    /// Day of month, 1-31.
    pub day: u32,
    /// Month, 1-12.
    pub month: u32,
    /// Four-digit year.
    pub year: i32,
}

/// Government identifier of a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernmentId {
    /// Social security number.
    pub ssn: Ssn,
}

/// Social security number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ssn {
    /// All nine digits.
    pub full: TaxId,
    /// Last four digits; only sent for representatives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_four: Option<String>,
}

/// Tax identifier of a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessTaxId {
    /// Employer identification number.
    pub ein: Ein,
}

/// Employer identification number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ein {
    /// All nine digits.
    pub number: TaxId,
}

/// Normalized tax identifier.
///
/// Serializes as the plain string. `Debug` prints only the last two characters so request
/// documents can be logged.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TaxId(String);

impl TaxId {
    /// Wraps an already normalized identifier.
    #[must_use]
    pub const fn new(normalized: String) -> Self {
        Self(normalized)
    }

    /// Returns the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visible = self.0.char_indices().rev().nth(1).map_or("", |(idx, _)| &self.0[idx..]);
        write!(f, "TaxId(***{visible})")
    }
}

/// Industry classification codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryCodes {
    /// Merchant category code.
    pub mcc: String,
}

/// Body of `POST /accounts/{id}/representatives`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeRequest {
    /// Name.
    pub name: RepresentativeName,
    /// Phone.
    pub phone: Phone,
    /// Email.
    pub email: String,
    /// Home address.
    pub address: Address,
    /// Date of birth.
    pub birth_date: BirthDate,
    /// SSN with last four.
    #[serde(rename = "governmentID")]
    pub government_id: GovernmentId,
    /// Role within the business.
    pub responsibilities: Responsibilities,
}

/// Representative name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepresentativeName {
    /// Given name.
    pub first_name: String,
    /// Middle name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
}

/// Ownership and control of a representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Responsibilities {
    /// Has significant management responsibility.
    pub is_controller: bool,
    /// Owns at least 25% of the business.
    pub is_owner: bool,
    /// Ownership share, 0-100.
    pub ownership_percentage: u8,
    /// Job title.
    pub job_title: String,
}

impl Responsibilities {
    /// Sole controlling owner holding the whole business.
    #[must_use]
    pub const fn sole_owner(job_title: String) -> Self {
        Self { is_controller: true, is_owner: true, ownership_percentage: 100, job_title }
    }
}

/// Body of `POST /accounts/{id}/capabilities`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilitiesRequest {
    /// Capability names, e.g. `transfers`.
    pub capabilities: Vec<String>,
}

/// Body of `PATCH /accounts/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchAccountRequest {
    /// Profile fields to change.
    pub profile: PatchProfile,
}

impl PatchAccountRequest {
    /// Declares that every beneficial owner has been registered.
    #[must_use]
    pub const fn owners_provided() -> Self {
        Self { profile: PatchProfile { business: PatchBusiness { owners_provided: true } } }
    }
}

/// Profile section of an account patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchProfile {
    /// Business fields.
    pub business: PatchBusiness,
}

/// Business fields of an account patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchBusiness {
    /// All owners have been provided.
    pub owners_provided: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn address() -> Address {
        Address {
            address_line1: "1 Main St".to_owned(),
            address_line2: None,
            city: "Springfield".to_owned(),
            state_or_province: "IL".to_owned(),
            postal_code: "62701".to_owned(),
            country: "US".to_owned(),
        }
    }

    #[test]
    fn test_individual_request_wire_format() {
        let individual = IndividualProfile {
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            phone: Phone { number: "5555550100".to_owned(), country_code: "1".to_owned() },
            email: "ada@example.com".to_owned(),
            address: address(),
            birth_date: BirthDate { day: 10, month: 12, year: 1990 },
            government_id: GovernmentId {
                ssn: Ssn { full: TaxId::new("123456789".to_owned()), last_four: None },
            },
        };
        let request = CreateAccountRequest::individual(individual, "tos-abc".to_owned());

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "accountType": "individual",
                "profile": {
                    "individual": {
                        "firstName": "Ada",
                        "lastName": "Lovelace",
                        "phone": { "number": "5555550100", "countryCode": "1" },
                        "email": "ada@example.com",
                        "address": {
                            "addressLine1": "1 Main St",
                            "city": "Springfield",
                            "stateOrProvince": "IL",
                            "postalCode": "62701",
                            "country": "US"
                        },
                        "birthDate": { "day": 10, "month": 12, "year": 1990 },
                        "governmentID": { "ssn": { "full": "123456789" } }
                    }
                },
                "termsOfService": { "token": "tos-abc" }
            })
        );
    }

    #[test]
    fn test_business_tax_id_omitted_when_absent() {
        let business = BusinessProfile {
            legal_business_name: "Acme Trust".to_owned(),
            business_type: BusinessType::Trust,
            phone: Phone { number: "5555550100".to_owned(), country_code: "1".to_owned() },
            email: "trust@example.com".to_owned(),
            description: "Family Trust".to_owned(),
            address: address(),
            industry_codes: IndustryCodes { mcc: "8999".to_owned() },
            tax_id: None,
        };
        let value = serde_json::to_value(CreateAccountRequest::business(business, "t".to_owned()))
            .unwrap();

        assert_eq!(value["accountType"], "business");
        assert_eq!(value["profile"]["business"]["businessType"], "trust");
        assert_eq!(value["profile"]["business"]["industryCodes"]["mcc"], "8999");
        assert!(value["profile"]["business"].get("taxID").is_none());
    }

    #[test]
    fn test_owners_provided_patch() {
        let value = serde_json::to_value(PatchAccountRequest::owners_provided()).unwrap();
        assert_eq!(value, json!({ "profile": { "business": { "ownersProvided": true } } }));
    }

    #[test]
    fn test_sole_owner_responsibilities() {
        let value = serde_json::to_value(Responsibilities::sole_owner("CEO".to_owned())).unwrap();
        assert_eq!(
            value,
            json!({
                "isController": true,
                "isOwner": true,
                "ownershipPercentage": 100,
                "jobTitle": "CEO"
            })
        );
    }

    #[test]
    fn test_tax_id_debug_is_redacted() {
        let tax_id = TaxId::new("123456789".to_owned());
        let debug_str = format!("{tax_id:?}");
        assert_eq!(debug_str, "TaxId(***89)");
        assert_eq!(serde_json::to_string(&tax_id).unwrap(), "\"123456789\"");
    }

    #[test]
    fn test_tax_id_debug_short_values() {
        assert_eq!(format!("{:?}", TaxId::new(String::new())), "TaxId(***)");
        assert_eq!(format!("{:?}", TaxId::new("7".to_owned())), "TaxId(***)");
    }
}
