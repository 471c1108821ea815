//! The "share this post by email" form.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::FieldErrors;

pub const NAME_MAX_CHARS: u64 = 50;

/// Raw share-form input, as submitted. Missing fields bind as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ShareForm {
    #[validate(length(min = 1, max = NAME_MAX_CHARS))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(email)]
    pub to: String,
    pub comments: String,
}

/// A share form that passed validation, with surrounding whitespace stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidShare {
    pub name: String,
    pub email: String,
    pub to: String,
    pub comments: String,
}

impl ShareForm {
    /// Strip surrounding whitespace, then check every field and collect all
    /// violations at once.
    pub fn clean(&self) -> Result<ValidShare, FieldErrors> {
        let cleaned = ShareForm {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            to: self.to.trim().to_string(),
            comments: self.comments.trim().to_string(),
        };

        if let Err(report) = cleaned.validate() {
            return Err(FieldErrors::from_report(&report, |field| match field {
                "name" => cleaned.name.as_str(),
                "email" => cleaned.email.as_str(),
                "to" => cleaned.to.as_str(),
                _ => cleaned.comments.as_str(),
            }));
        }

        Ok(ValidShare {
            name: cleaned.name,
            email: cleaned.email,
            to: cleaned.to,
            comments: cleaned.comments,
        })
    }
}

/// Where a share request ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShareState {
    /// Form shown (fresh or with errors); nothing was sent.
    Unsubmitted,
    /// Form accepted and handed to the mailer.
    Submitted,
}
