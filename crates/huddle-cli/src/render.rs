//! Plain-text rendering of a plan's availability table.

use std::fmt::{self, Write};

use huddle_core::{AvailabilityTable, Choice, Plan, SkippedRow};

/// Terminal columns an emoji cell occupies.
const EMOJI_WIDTH: usize = 2;

fn cell_text(cell: Option<Choice>) -> (&'static str, usize) {
    match cell {
        Some(choice) => (choice.emoji(), EMOJI_WIDTH),
        None => ("", 0),
    }
}

/// Pad `text` that occupies `used` terminal columns out to `width`.
fn pad(out: &mut String, text: &str, used: usize, width: usize) {
    out.push_str(text);
    for _ in used..width {
        out.push(' ');
    }
}

/// Render the plan header, the participant-by-option table, the yes counts,
/// and any rows skipped while loading.
pub fn render_plan(
    plan: &Plan,
    table: &AvailabilityTable,
    skipped: &[SkippedRow],
) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "{}", plan.name)?;
    writeln!(out, "  Plan ID:   {}", plan.id)?;
    writeln!(out, "  Options:   {}", table.columns.len())?;
    writeln!(out, "  Responses: {}", table.rows.len())?;
    out.push('\n');

    if table.columns.is_empty() {
        out.push_str("No options.\n");
    } else {
        let name_w = table
            .rows
            .iter()
            .map(|r| r.name.chars().count())
            .chain(std::iter::once("Yes".len()))
            .max()
            .unwrap_or(0);
        let col_w: Vec<usize> = table
            .columns
            .iter()
            .map(|c| c.label.chars().count().max(EMOJI_WIDTH))
            .collect();

        // Header
        pad(&mut out, "", 0, name_w);
        for (column, w) in table.columns.iter().zip(&col_w) {
            out.push_str(" | ");
            pad(&mut out, &column.label, column.label.chars().count(), *w);
        }
        out.push('\n');

        out.push_str(&"-".repeat(name_w));
        for w in &col_w {
            out.push_str("-+-");
            out.push_str(&"-".repeat(*w));
        }
        out.push('\n');

        for row in &table.rows {
            pad(&mut out, &row.name, row.name.chars().count(), name_w);
            for (cell, w) in row.cells.iter().zip(&col_w) {
                out.push_str(" | ");
                let (text, used) = cell_text(*cell);
                pad(&mut out, text, used, *w);
            }
            out.push('\n');
        }

        pad(&mut out, "Yes", "Yes".len(), name_w);
        for (column, w) in table.columns.iter().zip(&col_w) {
            out.push_str(" | ");
            let count = column.yes.to_string();
            pad(&mut out, &count, count.len(), *w);
        }
        out.push('\n');

        let best = table.best_columns();
        if !best.is_empty() {
            let labels: Vec<&str> = best.iter().map(|c| c.label.as_str()).collect();
            out.push('\n');
            writeln!(out, "Most yes ({}): {}", best[0].yes, labels.join("; "))?;
        }
    }

    if !skipped.is_empty() {
        out.push('\n');
        out.push_str("Warnings:\n");
        for row in skipped {
            writeln!(out, "  - {row}")?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use huddle_core::{ParticipantResponse, PlanOption};
    use huddle_db::time_key;

    use super::*;

    fn plan() -> Plan {
        let option = |key: &str| PlanOption {
            key: key.to_owned(),
            time: time_key::decode(key).unwrap(),
        };
        let mut ana = BTreeMap::new();
        ana.insert("2025-06-02T15:00".to_owned(), Choice::Yes);
        ana.insert("2025-06-03T15:00".to_owned(), Choice::No);
        let mut ben = BTreeMap::new();
        ben.insert("2025-06-02T15:00".to_owned(), Choice::Yes);

        Plan {
            id: "0a1b2c3d4e5f6071".into(),
            name: "Offsite".into(),
            options: vec![option("2025-06-02T15:00"), option("2025-06-03T15:00")],
            responses: vec![
                ParticipantResponse {
                    id: 1,
                    name: "Ana".into(),
                    choices: ana,
                },
                ParticipantResponse {
                    id: 2,
                    name: "Benedict".into(),
                    choices: ben,
                },
            ],
        }
    }

    #[test]
    fn renders_rows_in_submission_order_with_counts() {
        let plan = plan();
        let table = AvailabilityTable::build(&plan);
        let text = render_plan(&plan, &table, &[]).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        let header = lines.iter().position(|l| l.contains("Mon Jun 2, 15:00")).unwrap();
        assert!(lines[header].contains("Tue Jun 3, 15:00"));
        assert!(lines[header + 2].starts_with("Ana      | ✅"));
        assert!(lines[header + 2].contains("❌"));
        assert!(lines[header + 3].starts_with("Benedict | ✅"));
        assert!(lines[header + 4].starts_with("Yes      | 2"));
        assert!(text.contains("Most yes (2): Mon Jun 2, 15:00"));
        assert!(!text.contains("Warnings:"));
    }

    #[test]
    fn unanswered_cell_is_blank() {
        let plan = plan();
        let table = AvailabilityTable::build(&plan);
        let text = render_plan(&plan, &table, &[]).unwrap();

        let ben = text.lines().find(|l| l.starts_with("Benedict")).unwrap();
        assert_eq!(ben.matches('✅').count(), 1);
        assert!(!ben.contains('❌'));
        assert!(!ben.contains('🟧'));
    }

    #[test]
    fn lists_skipped_rows() {
        let plan = plan();
        let table = AvailabilityTable::build(&plan);
        let skipped = [SkippedRow::ChoiceValue {
            response_id: 2,
            option_key: "2025-06-03T15:00".into(),
            raw: "perhaps".into(),
        }];
        let text = render_plan(&plan, &table, &skipped).unwrap();

        assert!(text.contains("Warnings:"));
        assert!(text.contains("perhaps"));
    }

    #[test]
    fn plan_without_options() {
        let mut plan = plan();
        plan.options.clear();
        plan.responses.clear();
        let table = AvailabilityTable::build(&plan);
        let text = render_plan(&plan, &table, &[]).unwrap();
        assert!(text.contains("No options."));
    }
}
