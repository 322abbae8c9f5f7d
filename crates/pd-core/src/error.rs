//! Core error types for the project dashboard

use std::collections::BTreeMap;
use thiserror::Error;

/// Domain rule failures raised by models and loaders
#[derive(Error, Debug)]
pub enum PdError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },
}

impl PdError {
    pub fn not_found(entity: &'static str, value: impl ToString) -> Self {
        PdError::NotFound {
            entity,
            field: "id",
            value: value.to_string(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PdError::Conflict { message: message.into() }
    }
}

/// Validation errors collection, keyed by field name
#[derive(Error, Debug, Default, Clone, PartialEq)]
#[error("{}", self.full_messages().join(", "))]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> messages
    pub errors: BTreeMap<String, Vec<String>>,
    /// Errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        for (field, field_messages) in &self.errors {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages_are_ordered_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "can't be blank");
        errors.add("date", "is invalid");
        errors.add_base("Project is archived");

        assert_eq!(
            errors.full_messages(),
            vec![
                "Project is archived".to_string(),
                "date is invalid".to_string(),
                "title can't be blank".to_string(),
            ]
        );
    }

    #[test]
    fn test_messages_accumulate_per_field() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "is too long");
        errors.add("title", "can't be blank");

        assert_eq!(errors.errors["title"].len(), 2);
        assert_eq!(errors.to_string(), "title is too long, title can't be blank");
    }

    #[test]
    fn test_not_found_names_the_lookup() {
        let err = PdError::not_found("Project", 7);
        assert_eq!(err.to_string(), "Not found: Project with id=7");
        assert!(matches!(PdError::conflict("busy"), PdError::Conflict { message } if message == "busy"));
    }
}
