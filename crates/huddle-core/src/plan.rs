//! Domain types: a plan as submitted by an organizer, and a plan as loaded
//! back with its options and responses.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

use huddle_db::models::Choice;
use huddle_db::time_key::{self, TimeKeyError};

/// Input checks performed before a plan reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanValidationError {
    #[error("plan id must not be empty")]
    EmptyId,

    #[error("plan name must not be empty")]
    EmptyName,

    #[error("plan must have at least one date/time option")]
    NoOptions,

    #[error("option {0:?} is listed more than once")]
    DuplicateOption(String),

    #[error(transparent)]
    InvalidOption(#[from] TimeKeyError),
}

/// A plan to be created. The id is generated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlan {
    pub id: String,
    pub name: String,
    /// Candidate times in display order.
    pub options: Vec<NaiveDateTime>,
}

impl NewPlan {
    pub fn new(id: impl Into<String>, name: impl Into<String>, options: Vec<NaiveDateTime>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            options,
        }
    }

    /// Check the preconditions the store relies on its callers for: a
    /// non-empty id and name, at least one option, and options that encode
    /// to distinct keys.
    pub fn validate(&self) -> Result<(), PlanValidationError> {
        if self.id.trim().is_empty() {
            return Err(PlanValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(PlanValidationError::EmptyName);
        }
        if self.options.is_empty() {
            return Err(PlanValidationError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for option in &self.options {
            let key = time_key::encode(option)?;
            if !seen.insert(key.clone()) {
                return Err(PlanValidationError::DuplicateOption(key));
            }
        }
        Ok(())
    }
}

/// One candidate time of a loaded plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOption {
    /// Stored key, `YYYY-MM-DDTHH:MM`.
    pub key: String,
    pub time: NaiveDateTime,
}

/// One participant's submitted answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantResponse {
    pub id: i64,
    pub name: String,
    /// Option key to choice. Options without an entry have no answer.
    pub choices: BTreeMap<String, Choice>,
}

impl ParticipantResponse {
    /// The participant's choice for an option, if they gave one.
    pub fn choice_for(&self, option_key: &str) -> Option<Choice> {
        self.choices.get(option_key).copied()
    }
}

/// A plan as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    /// In creation order.
    pub options: Vec<PlanOption>,
    /// In submission order.
    pub responses: Vec<ParticipantResponse>,
}

impl Plan {
    /// Option times in creation order.
    pub fn option_times(&self) -> Vec<NaiveDateTime> {
        self.options.iter().map(|o| o.time).collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Timelike};

    use super::*;

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn valid_plan_passes() {
        let plan = NewPlan::new("abc", "Retro", vec![at(1, 10), at(2, 10)]);
        assert_eq!(plan.validate(), Ok(()));
    }

    #[test]
    fn blank_name_rejected() {
        let plan = NewPlan::new("abc", "   ", vec![at(1, 10)]);
        assert_eq!(plan.validate(), Err(PlanValidationError::EmptyName));
    }

    #[test]
    fn blank_id_rejected() {
        let plan = NewPlan::new("", "Retro", vec![at(1, 10)]);
        assert_eq!(plan.validate(), Err(PlanValidationError::EmptyId));
    }

    #[test]
    fn no_options_rejected() {
        let plan = NewPlan::new("abc", "Retro", vec![]);
        assert_eq!(plan.validate(), Err(PlanValidationError::NoOptions));
    }

    #[test]
    fn options_equal_to_the_minute_are_duplicates() {
        let with_seconds = at(1, 10).with_second(42).unwrap();
        let plan = NewPlan::new("abc", "Retro", vec![at(1, 10), with_seconds]);
        assert_eq!(
            plan.validate(),
            Err(PlanValidationError::DuplicateOption(
                "2025-09-01T10:00".to_owned()
            ))
        );
    }

    #[test]
    fn choice_for_missing_option_is_none() {
        let response = ParticipantResponse {
            id: 1,
            name: "Kim".into(),
            choices: BTreeMap::from([("2025-09-01T10:00".to_owned(), Choice::Maybe)]),
        };
        assert_eq!(response.choice_for("2025-09-01T10:00"), Some(Choice::Maybe));
        assert_eq!(response.choice_for("2025-09-02T10:00"), None);
    }
}
