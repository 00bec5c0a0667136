//! Profile to request-document mapping.
//!
//! Every function here is pure: it reads a [`UserProfile`] and the [`OnboardingSettings`] and
//! returns a document, or fails before anything is sent.

use chrono::{Datelike, NaiveDate};

use crate::{
    config::OnboardingSettings,
    error::{OnboardError, Result},
    profile::UserProfile,
    request::{
        Address, BirthDate, BusinessProfile, BusinessTaxId, Ein, GovernmentId, IndividualProfile,
        IndustryCodes, Phone, RepresentativeName, RepresentativeRequest, Responsibilities, Ssn,
        TaxId,
    },
};

/// Description used for entities that have an EIN.
pub const INVESTMENT_ENTITY_DESCRIPTION: &str = "Investment Entity";

/// Description used for entities without an EIN.
pub const FAMILY_TRUST_DESCRIPTION: &str = "Family Trust";

/// Strips spaces and hyphens from a tax identifier.
///
/// # Examples
///
/// ```
/// use moov_onboard::mapping::normalize_tax_id;
///
/// assert_eq!(normalize_tax_id("123-45-6789"), "123456789");
/// assert_eq!(normalize_tax_id(" 12 3456789 "), "123456789");
/// ```
#[must_use]
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(|ch| *ch != ' ' && *ch != '-').collect()
}

/// Builds the individual profile document.
///
/// # Errors
///
/// Returns [`OnboardError::MissingProfileField`] if the SSN is blank.
pub fn individual_profile(
    profile: &UserProfile,
    settings: &OnboardingSettings,
) -> Result<IndividualProfile> {
    Ok(IndividualProfile {
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        phone: phone(profile, settings),
        email: profile.user.email.clone(),
        address: personal_address(profile, settings),
        birth_date: birth_date(profile.date_of_birth),
        government_id: GovernmentId { ssn: Ssn { full: ssn(profile)?, last_four: None } },
    })
}

/// Builds the business profile document.
///
/// # Errors
///
/// Returns [`OnboardError::MissingEntityType`] if the profile has no entity type, or
/// [`OnboardError::MissingProfileField`] if the entity name or legal address is absent.
pub fn business_profile(
    profile: &UserProfile,
    settings: &OnboardingSettings,
) -> Result<BusinessProfile> {
    let entity_type = profile.entity_type.as_ref().ok_or(OnboardError::MissingEntityType)?;

    let legal_business_name = profile
        .entity_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| OnboardError::MissingProfileField("entity_name".to_owned()))?;

    let legal_address = profile
        .entity_legal_address
        .as_ref()
        .ok_or_else(|| OnboardError::MissingProfileField("entity_legal_address".to_owned()))?;

    let ein = ein(profile);
    let description =
        if ein.is_some() { INVESTMENT_ENTITY_DESCRIPTION } else { FAMILY_TRUST_DESCRIPTION };

    Ok(BusinessProfile {
        legal_business_name: legal_business_name.to_owned(),
        business_type: entity_type.moov_business_type,
        phone: phone(profile, settings),
        email: profile.user.email.clone(),
        description: description.to_owned(),
        address: Address {
            address_line1: legal_address.address1.clone(),
            address_line2: non_blank(legal_address.address2.as_deref()),
            city: legal_address.city.clone(),
            state_or_province: legal_address.state.name.clone(),
            postal_code: legal_address.zipcode.clone(),
            country: legal_address.country.iso2.clone(),
        },
        industry_codes: IndustryCodes { mcc: settings.mcc.clone() },
        tax_id: ein.map(|number| BusinessTaxId { ein: Ein { number } }),
    })
}

/// Builds the beneficial-owner document for a business account.
///
/// The representative is always the sole controlling owner.
///
/// # Errors
///
/// Returns [`OnboardError::MissingProfileField`] if the SSN is blank.
pub fn representative(
    profile: &UserProfile,
    settings: &OnboardingSettings,
) -> Result<RepresentativeRequest> {
    let full = ssn(profile)?;
    let last_four = last_four(full.as_str());
    let job_title = non_blank(profile.title.as_deref())
        .unwrap_or_else(|| settings.default_job_title.clone());

    Ok(RepresentativeRequest {
        name: RepresentativeName {
            first_name: profile.first_name.clone(),
            middle_name: non_blank(profile.middle_name.as_deref()),
            last_name: profile.last_name.clone(),
        },
        phone: phone(profile, settings),
        email: profile.user.email.clone(),
        address: personal_address(profile, settings),
        birth_date: birth_date(profile.date_of_birth),
        government_id: GovernmentId { ssn: Ssn { full, last_four: Some(last_four) } },
        responsibilities: Responsibilities::sole_owner(job_title),
    })
}

fn ssn(profile: &UserProfile) -> Result<TaxId> {
    let normalized = normalize_tax_id(profile.tax_id_cr.trim());
    if normalized.is_empty() {
        return Err(OnboardError::MissingProfileField("tax_id_cr".to_owned()));
    }
    Ok(TaxId::new(normalized))
}

/// An EIN counts as present only if something is left after normalization.
fn ein(profile: &UserProfile) -> Option<TaxId> {
    let normalized = normalize_tax_id(profile.entity_tax_id_cr.as_deref()?);
    (!normalized.is_empty()).then(|| TaxId::new(normalized))
}

fn last_four(normalized: &str) -> String {
    let skip = normalized.chars().count().saturating_sub(4);
    normalized.chars().skip(skip).collect()
}

fn phone(profile: &UserProfile, settings: &OnboardingSettings) -> Phone {
    Phone { number: profile.phone.clone(), country_code: settings.phone_country_code.clone() }
}

fn personal_address(profile: &UserProfile, settings: &OnboardingSettings) -> Address {
    Address {
        address_line1: profile.address1.clone(),
        address_line2: non_blank(profile.address2.as_deref()),
        city: profile.city.clone(),
        state_or_province: profile.state.state_code.clone(),
        postal_code: profile.zipcode.clone(),
        country: settings.default_country.clone(),
    }
}

fn birth_date(date: NaiveDate) -> BirthDate {
    BirthDate { day: date.day(), month: date.month(), year: date.year() }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}
