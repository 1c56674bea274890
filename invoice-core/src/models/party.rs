use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::InvoiceError;

/// Contact block used for both the issuing company and the billed client.
///
/// All fields are free text and may be empty; no format validation is
/// applied to phone numbers or email addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Party {
    /// Company or client name
    pub name: String,

    /// Postal address, may span several lines
    pub address: String,

    /// Phone number
    pub phone: String,

    /// Email address
    pub email: String,
}

/// Editable fields of a [`Party`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyField {
    Name,
    Address,
    Phone,
    Email,
}

impl fmt::Display for PartyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartyField::Name => write!(f, "name"),
            PartyField::Address => write!(f, "address"),
            PartyField::Phone => write!(f, "phone"),
            PartyField::Email => write!(f, "email"),
        }
    }
}

impl FromStr for PartyField {
    type Err = InvoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(PartyField::Name),
            "address" => Ok(PartyField::Address),
            "phone" => Ok(PartyField::Phone),
            "email" => Ok(PartyField::Email),
            other => Err(InvoiceError::UnknownPartyField(other.to_string())),
        }
    }
}

impl Party {
    /// Returns the current value of one field.
    pub fn get(&self, field: PartyField) -> &str {
        match field {
            PartyField::Name => &self.name,
            PartyField::Address => &self.address,
            PartyField::Phone => &self.phone,
            PartyField::Email => &self.email,
        }
    }

    /// Replaces one field, returning the updated party.
    pub fn with(&self, field: PartyField, value: impl Into<String>) -> Self {
        let mut next = self.clone();
        let value = value.into();
        match field {
            PartyField::Name => next.name = value,
            PartyField::Address => next.address = value,
            PartyField::Phone => next.phone = value,
            PartyField::Email => next.email = value,
        }
        next
    }

    /// Address split into display lines.
    pub fn address_lines(&self) -> impl Iterator<Item = &str> {
        self.address.lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_replaces_only_one_field() {
        let party = Party {
            name: "Acme".into(),
            email: "billing@acme.test".into(),
            ..Party::default()
        };

        let updated = party.with(PartyField::Phone, "+60 12-345 6789");

        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.email, "billing@acme.test");
        assert_eq!(updated.get(PartyField::Phone), "+60 12-345 6789");
        assert_eq!(party.phone, "");
    }

    #[test]
    fn test_field_names_round_trip_through_display() {
        for field in [
            PartyField::Name,
            PartyField::Address,
            PartyField::Phone,
            PartyField::Email,
        ] {
            assert_eq!(field.to_string().parse::<PartyField>().ok(), Some(field));
        }
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let result = "fax".parse::<PartyField>();
        assert!(matches!(result, Err(InvoiceError::UnknownPartyField(f)) if f == "fax"));
    }

    #[test]
    fn test_address_lines() {
        let party = Party {
            address: "1 Jalan Ampang\nKuala Lumpur".into(),
            ..Party::default()
        };
        let lines: Vec<&str> = party.address_lines().collect();
        assert_eq!(lines, vec!["1 Jalan Ampang", "Kuala Lumpur"]);
    }
}
