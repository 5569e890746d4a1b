//! Delivery form validation.
//!
//! The raw form is what the UI binds its inputs to; [`DeliveryForm::validate`]
//! parses it into a [`DeliveryInfo`] that checkout can trust. Validation
//! failures are reported per field so the UI can highlight inputs inline,
//! and they always block submission before any network call.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The delivery areas the restaurant serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryLocation {
    Ardales,
    Carratraca,
}

impl DeliveryLocation {
    /// Human-readable town name, identical in both languages.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Ardales => "Ardales",
            Self::Carratraca => "Carratraca",
        }
    }
}

impl std::str::FromStr for DeliveryLocation {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ardales" => Ok(Self::Ardales),
            "carratraca" => Ok(Self::Carratraca),
            other => Err(UnknownLocation(other.to_string())),
        }
    }
}

/// Error for a location string outside the service area.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown delivery location: {0}")]
pub struct UnknownLocation(pub String);

/// A delivery field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeliveryField {
    Street,
    HouseNumber,
    Location,
    Phone,
}

impl DeliveryField {
    /// The field's wire name, matching the order payload keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Street => "delivery_street",
            Self::HouseNumber => "delivery_house_number",
            Self::Location => "delivery_location",
            Self::Phone => "phone",
        }
    }
}

/// Per-field validation failure; every listed field is required and empty.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("required delivery fields missing")]
pub struct ValidationErrors {
    missing: Vec<DeliveryField>,
}

impl ValidationErrors {
    /// The fields that failed, in form order.
    #[must_use]
    pub fn missing(&self) -> &[DeliveryField] {
        &self.missing
    }

    /// Whether a specific field failed.
    #[must_use]
    pub fn is_missing(&self, field: DeliveryField) -> bool {
        self.missing.contains(&field)
    }
}

/// Unvalidated delivery form state, as bound to the UI inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryForm {
    pub street: String,
    pub house_number: String,
    pub location: Option<DeliveryLocation>,
    pub phone: String,
    pub notes: String,
}

impl DeliveryForm {
    /// Parse the form into trusted delivery info.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every required field that is
    /// missing or blank.
    pub fn validate(&self) -> Result<DeliveryInfo, ValidationErrors> {
        let mut missing = Vec::new();

        let street = self.street.trim();
        if street.is_empty() {
            missing.push(DeliveryField::Street);
        }
        let house_number = self.house_number.trim();
        if house_number.is_empty() {
            missing.push(DeliveryField::HouseNumber);
        }
        if self.location.is_none() {
            missing.push(DeliveryField::Location);
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            missing.push(DeliveryField::Phone);
        }

        if !missing.is_empty() {
            return Err(ValidationErrors { missing });
        }

        Ok(DeliveryInfo {
            street: street.to_string(),
            house_number: house_number.to_string(),
            // checked above
            location: self.location.unwrap_or(DeliveryLocation::Ardales),
            phone: phone.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

/// Validated delivery information, required before checkout proceeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryInfo {
    pub street: String,
    pub house_number: String,
    pub location: DeliveryLocation,
    pub phone: String,
    /// Optional free-text notes, empty when none were given.
    #[serde(default)]
    pub notes: String,
}
