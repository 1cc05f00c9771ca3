//! Input validation utilities.
//!
//! This module validates caller input before it reaches the triage engine.

use crate::constants::{MAX_AGE_YEARS, MAX_GENDER_LEN};
use crate::{TriageError, TriageResult};
use triage_types::NonEmptyText;

/// A validated triage request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageRequest {
    symptoms: NonEmptyText,
    age: Option<u8>,
    gender: Option<String>,
}

impl TriageRequest {
    /// Validate raw request fields.
    ///
    /// `age` and `gender` are optional; blank values are treated as absent.
    ///
    /// # Errors
    ///
    /// - [`TriageError::MissingSymptoms`] if `symptoms` is absent or blank
    /// - [`TriageError::InvalidAge`] if `age` is not a whole number of years within range
    /// - [`TriageError::InvalidGender`] if `gender` is too long
    pub fn new(
        symptoms: Option<String>,
        age: Option<String>,
        gender: Option<String>,
    ) -> TriageResult<Self> {
        let symptoms = symptoms
            .and_then(|s| NonEmptyText::new(s).ok())
            .ok_or(TriageError::MissingSymptoms)?;

        Ok(Self {
            symptoms,
            age: validate_age(age)?,
            gender: validate_gender(gender)?,
        })
    }

    pub fn symptoms(&self) -> &str {
        self.symptoms.as_str()
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }
}

fn validate_age(age: Option<String>) -> TriageResult<Option<u8>> {
    let Some(raw) = age.map(|a| a.trim().to_string()).filter(|a| !a.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<u8>() {
        Ok(years) if years <= MAX_AGE_YEARS => Ok(Some(years)),
        _ => Err(TriageError::InvalidAge(format!(
            "'{raw}' is not a whole number of years between 0 and {MAX_AGE_YEARS}"
        ))),
    }
}

fn validate_gender(gender: Option<String>) -> TriageResult<Option<String>> {
    let Some(raw) = gender
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
    else {
        return Ok(None);
    };
    if raw.chars().count() > MAX_GENDER_LEN {
        return Err(TriageError::InvalidGender(format!(
            "must be at most {MAX_GENDER_LEN} characters"
        )));
    }
    if raw.chars().any(char::is_control) {
        return Err(TriageError::InvalidGender(
            "must not contain control characters".into(),
        ));
    }
    Ok(Some(raw))
}
