//! Lenient read results.
//!
//! Reads never fail because of a single bad row. Instead of hiding what was
//! dropped, a [`ReadReport`] carries the loaded value together with one
//! [`SkippedRow`] per row or section that could not be read.

use std::fmt;

use serde::Serialize;

/// A value read from the store plus everything skipped while reading it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadReport<T> {
    pub value: T,
    pub skipped: Vec<SkippedRow>,
}

impl<T> ReadReport<T> {
    pub fn new(value: T, skipped: Vec<SkippedRow>) -> Self {
        Self { value, skipped }
    }

    /// A report with nothing skipped.
    pub fn clean(value: T) -> Self {
        Self::new(value, Vec::new())
    }

    /// True when every row was read.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReadReport<U> {
        ReadReport {
            value: f(self.value),
            skipped: self.skipped,
        }
    }
}

/// Why part of a read was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkippedRow {
    /// An option whose stored key does not decode.
    OptionKey {
        option_id: i64,
        raw: String,
        reason: String,
    },
    /// The option list could not be read; no options were loaded.
    OptionList { reason: String },
    /// The response list could not be read; no responses were loaded.
    ResponseList { reason: String },
    /// One response's choices could not be read; the response was dropped.
    ResponseChoices { response_id: i64, reason: String },
    /// A stored choice value that is not yes, maybe, or no.
    ChoiceValue {
        response_id: i64,
        option_key: String,
        raw: String,
    },
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OptionKey {
                option_id,
                raw,
                reason,
            } => write!(f, "skipped option {option_id} ({raw:?}): {reason}"),
            Self::OptionList { reason } => write!(f, "could not read options: {reason}"),
            Self::ResponseList { reason } => write!(f, "could not read responses: {reason}"),
            Self::ResponseChoices {
                response_id,
                reason,
            } => write!(f, "skipped response {response_id}: {reason}"),
            Self::ChoiceValue {
                response_id,
                option_key,
                raw,
            } => write!(
                f,
                "skipped choice {raw:?} of response {response_id} for option {option_key}"
            ),
        }
    }
}
