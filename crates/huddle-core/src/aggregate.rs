//! Availability view derived from a loaded plan.
//!
//! Nothing here touches storage; the table is rebuilt on every read.

use serde::Serialize;

use huddle_db::models::Choice;
use huddle_db::time_key;

use crate::plan::{ParticipantResponse, Plan};

/// Number of responses answering `yes` for the option.
pub fn count_yes(responses: &[ParticipantResponse], option_key: &str) -> usize {
    count_choice(responses, option_key, Choice::Yes)
}

/// Number of responses giving `choice` for the option.
pub fn count_choice(responses: &[ParticipantResponse], option_key: &str, choice: Choice) -> usize {
    responses
        .iter()
        .filter(|r| r.choice_for(option_key) == Some(choice))
        .count()
}

/// One option of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityColumn {
    pub key: String,
    /// Human-readable label, e.g. `Mon Jun 2, 15:04`.
    pub label: String,
    pub yes: usize,
    pub maybe: usize,
}

/// One participant of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityRow {
    pub name: String,
    /// One cell per column. `None` means no answer and renders blank.
    pub cells: Vec<Option<Choice>>,
}

/// Participants (rows) by options (columns).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityTable {
    pub columns: Vec<AvailabilityColumn>,
    pub rows: Vec<AvailabilityRow>,
}

impl AvailabilityTable {
    pub fn build(plan: &Plan) -> Self {
        let columns = plan
            .options
            .iter()
            .map(|option| AvailabilityColumn {
                key: option.key.clone(),
                label: time_key::display(&option.time),
                yes: count_yes(&plan.responses, &option.key),
                maybe: count_choice(&plan.responses, &option.key, Choice::Maybe),
            })
            .collect();

        let rows = plan
            .responses
            .iter()
            .map(|response| AvailabilityRow {
                name: response.name.clone(),
                cells: plan
                    .options
                    .iter()
                    .map(|option| response.choice_for(&option.key))
                    .collect(),
            })
            .collect();

        Self { columns, rows }
    }

    /// Columns sharing the highest yes count, in column order. Empty when no
    /// one has said yes to anything.
    pub fn best_columns(&self) -> Vec<&AvailabilityColumn> {
        let Some(max) = self.columns.iter().map(|c| c.yes).max() else {
            return Vec::new();
        };
        if max == 0 {
            return Vec::new();
        }
        self.columns.iter().filter(|c| c.yes == max).collect()
    }
}
