//! Field-level validation errors.
//!
//! Rules are declared with `validator` derives on the input types; this module
//! turns a `validator` report into the messages shown next to each field.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::ValidationErrors;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

/// Errors keyed by field name, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Translate a `validator` report.
    ///
    /// `value_of` returns the checked input of a field. An empty value always
    /// reads as "required", whichever rule tripped on it.
    pub fn from_report<'a>(report: &ValidationErrors, value_of: impl Fn(&str) -> &'a str) -> Self {
        let mut errors = Self::default();
        for (field, failures) in report.field_errors() {
            let field: &str = &field;
            let value = value_of(field);
            if value.is_empty() {
                errors.required(field);
                continue;
            }
            for failure in failures {
                let message = match failure.code.as_ref() {
                    "email" => INVALID_EMAIL_MESSAGE.to_string(),
                    "length" => match failure.params.get("max").and_then(|max| max.as_u64()) {
                        Some(max) => max_chars_message(max, value.chars().count()),
                        None => format!("Invalid length ({}).", value.chars().count()),
                    },
                    code => failure
                        .message
                        .as_ref()
                        .map(|message| message.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({code}).")),
                };
                errors.add(field, message);
            }
        }
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn required(&mut self, field: &str) {
        self.add(field, REQUIRED_MESSAGE);
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

fn max_chars_message(max: u64, count: usize) -> String {
    format!("Ensure this value has at most {max} characters (it has {count}).")
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 1, max = 5))]
        handle: String,
        #[validate(email)]
        contact: String,
    }

    impl Signup {
        fn report(&self) -> FieldErrors {
            let report = self.validate().unwrap_err();
            FieldErrors::from_report(&report, |field| match field {
                "handle" => self.handle.as_str(),
                "contact" => self.contact.as_str(),
                _ => "",
            })
        }
    }

    #[test]
    fn test_empty_values_read_as_required() {
        let errors = Signup {
            handle: String::new(),
            contact: String::new(),
        }
        .report();

        assert_eq!(errors.get("handle").unwrap(), [REQUIRED_MESSAGE]);
        assert_eq!(errors.get("contact").unwrap(), [REQUIRED_MESSAGE]);
    }

    #[test]
    fn test_length_and_email_messages() {
        let errors = Signup {
            handle: "\u{e9}".repeat(6),
            contact: "not-an-address".to_string(),
        }
        .report();

        assert_eq!(
            errors.get("handle").unwrap(),
            ["Ensure this value has at most 5 characters (it has 6)."]
        );
        assert_eq!(errors.get("contact").unwrap(), [INVALID_EMAIL_MESSAGE]);
    }

    #[test]
    fn test_display_joins_messages() {
        let mut errors = FieldErrors::default();
        errors.required("to");
        errors.add("email", INVALID_EMAIL_MESSAGE);
        assert_eq!(
            errors.to_string(),
            "email: Enter a valid email address.; to: This field is required."
        );
    }
}
