//! Client companies

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::validation::{Validate, ValidationErrors};

/// Collection holding clients
pub const CLIENTS: &str = "clients";

/// Stored client document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: BTreeMap<String, String>,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

/// `{ key, value }` pair as sent by callers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomField {
    pub key: String,
    pub value: String,
}

fn custom_field_map(fields: &[CustomField]) -> BTreeMap<String, String> {
    fields
        .iter()
        .map(|f| (f.key.clone(), f.value.clone()))
        .collect()
}

fn check_custom_fields(errors: &mut ValidationErrors, fields: &[CustomField]) {
    for (i, field) in fields.iter().enumerate() {
        if field.key.trim().is_empty() {
            errors.add(format!("customFields[{}].key", i), "key should not be empty");
        }
        if field.value.trim().is_empty() {
            errors.add(
                format!("customFields[{}].value", i),
                "value should not be empty",
            );
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateClientDto {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: Vec<CustomField>,
}

impl CreateClientDto {
    pub fn into_client(self) -> Client {
        Client {
            id: String::new(),
            custom_fields: custom_field_map(&self.custom_fields),
            company_name: self.company_name,
            contact_person: self.contact_person,
            email: self.email,
            phone_number: self.phone_number,
            address: self.address,
            industry: self.industry,
            notes: self.notes,
            is_active: true,
        }
    }
}

impl Validate for CreateClientDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.not_blank("companyName", &self.company_name);
        errors.not_blank("contactPerson", &self.contact_person);
        errors.email("email", &self.email);
        check_custom_fields(&mut errors, &self.custom_fields);
        errors.into_result()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateClientDto {
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub custom_fields: Option<Vec<CustomField>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UpdateClientDto {
    /// Fields to overwrite on the stored document
    pub fn into_changes(self) -> Map<String, Value> {
        let mut changes = Map::new();
        let text_fields = [
            ("companyName", self.company_name),
            ("contactPerson", self.contact_person),
            ("email", self.email),
            ("phoneNumber", self.phone_number),
            ("address", self.address),
            ("industry", self.industry),
            ("notes", self.notes),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value {
                changes.insert(name.to_string(), Value::String(value));
            }
        }
        if let Some(fields) = self.custom_fields {
            let map = custom_field_map(&fields)
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect();
            changes.insert("customFields".to_string(), Value::Object(map));
        }
        if let Some(is_active) = self.is_active {
            changes.insert("isActive".to_string(), Value::Bool(is_active));
        }
        changes
    }
}

impl Validate for UpdateClientDto {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.company_name {
            errors.not_blank("companyName", name);
        }
        if let Some(person) = &self.contact_person {
            errors.not_blank("contactPerson", person);
        }
        if let Some(email) = &self.email {
            errors.email("email", email);
        }
        if let Some(fields) = &self.custom_fields {
            check_custom_fields(&mut errors, fields);
        }
        errors.into_result()
    }
}
