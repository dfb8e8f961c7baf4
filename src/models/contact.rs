//! Contact form submissions

use serde::{Deserialize, Serialize};

use super::validation::{Validate, ValidationErrors};

/// Collection holding contact submissions
pub const CONTACTS: &str = "contacts";

/// Stored contact document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub description: String,
    #[serde(default)]
    pub is_acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateContactDto {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

impl CreateContactDto {
    /// Split `name` at the first whitespace into first and last name
    pub fn into_contact(self) -> Contact {
        let name = self.name.trim();
        let (first_name, last_name) = match name.split_once(char::is_whitespace) {
            Some((first, rest)) => (first.to_string(), rest.trim().to_string()),
            None => (name.to_string(), String::new()),
        };

        Contact {
            id: String::new(),
            first_name,
            last_name,
            email: self.email,
            phone_number: Some(self.phone),
            description: self.message,
            is_acknowledged: false,
        }
    }
}

impl Validate for CreateContactDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_blank("name", &self.name);
        errors.length("name", &self.name, 2, 50);
        errors.email("email", &self.email);
        errors.phone("phone", &self.phone);
        errors.length("message", &self.message, 10, 1000);
        errors.into_result()
    }
}
