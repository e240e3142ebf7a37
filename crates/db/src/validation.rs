use std::collections::BTreeMap;

use sea_orm::DbErr;
use serde::Serialize;
use thiserror::Error;

/// Field name to the messages collected for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    pub fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }

    pub fn missing_pk(&mut self, field: &str, id: i64) {
        self.add(field, format!("Invalid pk \"{id}\" - object does not exist."));
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

/// Failure of a create/update that checks its payload against the store.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("Invalid payload: {0}")]
    Invalid(FieldErrors),
}

impl From<FieldErrors> for WriteError {
    fn from(errors: FieldErrors) -> Self {
        WriteError::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_messages_per_field() {
        let mut errors = FieldErrors::new();
        errors.require("title", "   ");
        errors.max_len("priority", &"x".repeat(31), 30);
        errors.missing_pk("team", 42);

        assert_eq!(
            errors.get("title"),
            Some(&["This field may not be blank.".to_string()][..])
        );
        assert_eq!(
            errors.get("team"),
            Some(&["Invalid pk \"42\" - object does not exist.".to_string()][..])
        );
        assert!(errors.get("priority").is_some());
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn serializes_as_a_plain_map() {
        let errors = FieldErrors::single("email", "Enter a valid email address.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({ "email": ["Enter a valid email address."] })
        );
        assert_eq!(errors.to_string(), "email: Enter a valid email address.");
    }
}
