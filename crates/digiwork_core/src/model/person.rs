//! Person (directory entity) model.
//!
//! # Responsibility
//! - Define the canonical person shape shared by import and listing flows.
//! - Validate required text fields before persistence.
//!
//! # Invariants
//! - `national_id` is unique across the directory (enforced by the store).
//! - Text fields are required and non-blank; no format checks are applied.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-generated identifier, stable for the record lifetime.
pub type PersonId = i64;

/// Insert payload for one directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age: i64,
    /// Unique national identity document number.
    pub national_id: String,
}

/// Person row as persisted in the `persons` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub age: i64,
    pub national_id: String,
}

/// Field-level validation failure for person payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// A required text field is empty or whitespace-only.
    EmptyField(&'static str),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "required field `{field}` is empty"),
        }
    }
}

impl Error for PersonValidationError {}

impl NewPerson {
    /// Checks that every required text field carries a value.
    pub fn validate(&self) -> Result<(), PersonValidationError> {
        let fields = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("phone", &self.phone),
            ("email", &self.email),
            ("nationalId", &self.national_id),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(PersonValidationError::EmptyField(name));
            }
        }
        Ok(())
    }

    /// Attaches the store-generated id.
    pub fn into_record(self, id: PersonId) -> PersonRecord {
        PersonRecord {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            email: self.email,
            age: self.age,
            national_id: self.national_id,
        }
    }
}

impl PersonRecord {
    /// Display name used by the listing view.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{NewPerson, PersonValidationError};

    fn sample() -> NewPerson {
        NewPerson {
            first_name: "Ana".to_string(),
            last_name: "Rojas".to_string(),
            phone: "555-0101".to_string(),
            email: "ana@example.com".to_string(),
            age: 31,
            national_id: "V-1001".to_string(),
        }
    }

    #[test]
    fn validate_accepts_complete_payload() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn validate_rejects_blank_national_id() {
        let mut person = sample();
        person.national_id = "   ".to_string();
        assert_eq!(
            person.validate(),
            Err(PersonValidationError::EmptyField("nationalId"))
        );
    }

    #[test]
    fn into_record_keeps_fields() {
        let record = sample().into_record(7);
        assert_eq!(record.id, 7);
        assert_eq!(record.full_name(), "Ana Rojas");
        assert_eq!(record.national_id, "V-1001");
    }
}
