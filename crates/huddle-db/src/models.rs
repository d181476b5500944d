use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// A participant's stance on one option.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Yes,
    Maybe,
    No,
}

impl Choice {
    /// Every variant, in display order.
    pub const ALL: [Choice; 3] = [Choice::Yes, Choice::Maybe, Choice::No];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::Maybe => "maybe",
            Self::No => "no",
        }
    }

    /// CSS class used by the availability grid.
    pub fn css_class(&self) -> &'static str {
        self.as_str()
    }

    /// Single-glyph marker for compact rendering.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Yes => "\u{2705}",
            Self::Maybe => "\u{1F7E7}",
            Self::No => "\u{274C}",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = ChoiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "maybe" => Ok(Self::Maybe),
            "no" => Ok(Self::No),
            other => Err(ChoiceParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`Choice`] string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceParseError(pub String);

impl fmt::Display for ChoiceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid choice: {:?} (expected yes, maybe, or no)", self.0)
    }
}

impl std::error::Error for ChoiceParseError {}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// A row of the `plans` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanRow {
    pub id: String,
    pub name: String,
}

/// A row of the `options` table. `option_time` is the raw stored key and is
/// not guaranteed to decode.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OptionRow {
    pub id: i64,
    pub plan_id: String,
    pub option_time: String,
}

/// A row of the `responses` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResponseRow {
    pub id: i64,
    pub plan_id: String,
    pub name: String,
}

/// One recorded choice joined to its option's key.
///
/// `choice` stays raw text so a row holding an unexpected value can be
/// skipped by the reader instead of failing the whole query.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChoiceRow {
    pub option_time: String,
    pub choice: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_display_roundtrip() {
        for v in &Choice::ALL {
            let s = v.to_string();
            let parsed: Choice = s.parse().expect("should parse");
            assert_eq!(*v, parsed);
        }
    }

    #[test]
    fn choice_invalid() {
        let err = "YES".parse::<Choice>().unwrap_err();
        assert_eq!(err, ChoiceParseError("YES".to_owned()));
        assert!(err.to_string().contains("expected yes, maybe, or no"));
    }
}
