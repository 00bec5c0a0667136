//! Internal user/business profile record.
//!
//! These types mirror the application's profile data as it is exported to JSON. They carry no
//! Moov-specific shape; [`crate::mapping`] turns them into request documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Profile type identifier that marks a natural person.
pub const INDIVIDUAL_PROFILE_TYPE_ID: i64 = 1;

/// A user profile, optionally linked to a legal entity.
///
/// # Examples
///
/// ```
/// use moov_onboard::profile::UserProfile;
///
/// let profile: UserProfile = serde_json::from_str(r#"{
///     "entity_profile_type_id": 1,
///     "first_name": "Ada",
///     "last_name": "Lovelace",
///     "phone": "5555550100",
///     "user": { "email": "ada@example.com" },
///     "address1": "1 Main St",
///     "city": "Springfield",
///     "state": { "state_code": "IL", "name": "Illinois" },
///     "zipcode": "62701",
///     "date_of_birth": "1990-12-10",
///     "tax_id_cr": "123-45-6789"
/// }"#).unwrap();
///
/// assert!(profile.is_individual());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// `1` for an individual, anything else for a business.
    pub entity_profile_type_id: i64,
    /// Given name.
    pub first_name: String,
    /// Middle name.
    #[serde(default)]
    pub middle_name: Option<String>,
    /// Family name.
    pub last_name: String,
    /// Job title within the entity.
    #[serde(default)]
    pub title: Option<String>,
    /// Phone number without country code.
    pub phone: String,
    /// Owning login account.
    pub user: User,
    /// Personal address, first line.
    pub address1: String,
    /// Personal address, second line.
    #[serde(default)]
    pub address2: Option<String>,
    /// Personal address city.
    pub city: String,
    /// Personal address state.
    pub state: State,
    /// Personal address postal code.
    pub zipcode: String,
    /// Date of birth.
    pub date_of_birth: NaiveDate,
    /// Social security number, possibly formatted.
    pub tax_id_cr: String,
    /// Employer identification number of the linked entity.
    #[serde(default)]
    pub entity_tax_id_cr: Option<String>,
    /// Legal name of the linked entity.
    #[serde(default)]
    pub entity_name: Option<String>,
    /// Entity type record of the linked entity.
    #[serde(default)]
    pub entity_type: Option<EntityType>,
    /// Registered address of the linked entity.
    #[serde(default)]
    pub entity_legal_address: Option<LegalAddress>,
    /// Moov account already created for this profile.
    #[serde(default)]
    pub moov_account_id: Option<String>,
}

impl UserProfile {
    /// Returns true if the profile represents a natural person.
    #[must_use]
    pub const fn is_individual(&self) -> bool {
        self.entity_profile_type_id == INDIVIDUAL_PROFILE_TYPE_ID
    }
}

/// Login account that owns a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Contact email.
    pub email: String,
}

/// US state (or other first-level subdivision).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Postal abbreviation, e.g. `IL`.
    pub state_code: String,
    /// Full name, e.g. `Illinois`.
    pub name: String,
}

/// Country record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub iso2: String,
}

/// Registered address of a legal entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAddress {
    /// First line.
    pub address1: String,
    /// Second line.
    #[serde(default)]
    pub address2: Option<String>,
    /// City.
    pub city: String,
    /// State.
    pub state: State,
    /// Postal code.
    pub zipcode: String,
    /// Country.
    pub country: Country,
}

/// Entity type record, e.g. "Family Trust" or "LLC".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityType {
    /// Internal identifier.
    #[serde(default)]
    pub id: Option<i64>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Moov business type this entity type maps to.
    pub moov_business_type: BusinessType,
}

/// Business types accepted by Moov.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BusinessType {
    /// Sole proprietorship.
    SoleProprietorship,
    /// Unincorporated association.
    UnincorporatedAssociation,
    /// Trust.
    Trust,
    /// Publicly traded corporation.
    PublicCorporation,
    /// Privately held corporation.
    PrivateCorporation,
    /// Limited liability company.
    Llc,
    /// Partnership.
    Partnership,
    /// Unincorporated non-profit.
    UnincorporatedNonProfit,
    /// Incorporated non-profit.
    IncorporatedNonProfit,
    /// Government entity.
    GovernmentEntity,
}
