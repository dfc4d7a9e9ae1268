//! Form validation for school registration and the help queue

use crate::types::{AnswerRequest, HelpAnswer, HelpTicket, NewHelpTicket, NewSchool};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;
use validator::Validate;

#[allow(clippy::expect_used)]
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

#[allow(clippy::expect_used)]
static ZIP_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{3}$").expect("valid zip code pattern"));

/// Whether `email` looks like a deliverable address
#[must_use]
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Whether a postal code is a complete CEP (`NNNNN-NNN`)
///
/// The registration form only looks up the street address once this holds.
#[must_use]
pub fn is_complete_zip_code(zip_code: &str) -> bool {
    ZIP_CODE_RE.is_match(zip_code)
}

/// Run the derived length checks and report the first offending field
fn check_lengths<T: Validate>(form: &T) -> Result<()> {
    form.validate().map_err(|errors| {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(ToString::to_string)
            .collect();
        fields.sort();
        Error::validation(
            fields.into_iter().next().unwrap_or_else(|| "form".to_string()),
            "value is too long",
        )
    })
}

/// Names of the fields whose value is blank
fn blank_fields(fields: &[(&str, &str)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| (*name).to_string())
        .collect()
}

impl NewSchool {
    /// Validate the registration form
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteFields`] if any required field is blank,
    /// or [`Error::Validation`] for a malformed email, postal code or an
    /// over-long value.
    pub fn check(&self) -> Result<()> {
        let mut missing = blank_fields(&[
            ("name", self.name.as_str()),
            ("state", self.state.as_str()),
            ("city", self.city.as_str()),
            ("zip_code", self.zip_code.as_str()),
            ("address", self.address.as_str()),
            ("inep_code", self.inep_code.as_str()),
            ("email", self.email.as_str()),
            ("administrator", self.administrator.as_str()),
        ]);
        if self.number == 0 {
            missing.push("number".to_string());
        }
        if !missing.is_empty() {
            return Err(Error::IncompleteFields { fields: missing });
        }

        if !validate_email(self.email.trim()) {
            return Err(Error::validation("email", "invalid email address"));
        }
        if !is_complete_zip_code(self.zip_code.trim()) {
            return Err(Error::validation("zip_code", "expected format NNNNN-NNN"));
        }
        check_lengths(self)
    }

    /// Street address as stored: `"<street>, <number>"`
    #[must_use]
    pub fn full_address(&self) -> String {
        format!("{}, {}", self.address.trim(), self.number)
    }
}

impl NewHelpTicket {
    /// Validate the help form
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteFields`] if any field is blank, or
    /// [`Error::Validation`] for a malformed email or an over-long value.
    pub fn check(&self) -> Result<()> {
        let missing = blank_fields(&[
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("cnpj", self.cnpj.as_str()),
            ("subject", self.subject.as_str()),
            ("message", self.message.as_str()),
        ]);
        if !missing.is_empty() {
            return Err(Error::IncompleteFields { fields: missing });
        }
        if !validate_email(self.email.trim()) {
            return Err(Error::validation("email", "invalid email address"));
        }
        check_lengths(self)
    }
}

impl AnswerRequest {
    /// Turn the request into an answer addressed to the ticket's requester
    ///
    /// A missing subject defaults to `Re: <ticket subject>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteFields`] if the subject or message is
    /// blank, or [`Error::Validation`] for an over-long value.
    pub fn into_answer(self, ticket: &HelpTicket, answered_at: DateTime<Utc>) -> Result<HelpAnswer> {
        check_lengths(&self)?;
        let Self { subject, message } = self;
        let subject = subject.unwrap_or_else(|| ticket.reply_subject());

        let missing = blank_fields(&[("subject", subject.as_str()), ("message", message.as_str())]);
        if !missing.is_empty() {
            return Err(Error::IncompleteFields { fields: missing });
        }

        Ok(HelpAnswer {
            subject: subject.trim().to_string(),
            message: message.trim().to_string(),
            to: ticket.email.clone(),
            answered_at,
        })
    }
}
