//! CLI handlers for `huddle plan` subcommands.
//!
//! Implements:
//! - `huddle plan create --name N --option KEY...`   -- create a plan
//! - `huddle plan show <plan-id> [--json]`           -- show the availability table
//! - `huddle plan respond <plan-id> --name N --choice KEY=CHOICE...` -- record answers

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use huddle_core::{
    AvailabilityTable, Choice, NewPlan, Plan, PlanRepository, PlanStore, SkippedRow,
};
use huddle_db::time_key;

use crate::PlanCommands;
use crate::config::HuddleConfig;
use crate::id::generate_plan_id;
use crate::render::render_plan;

// -----------------------------------------------------------------------
// Public entry point
// -----------------------------------------------------------------------

/// Dispatch a `PlanCommands` variant to the appropriate handler.
pub async fn run_plan_command(
    command: PlanCommands,
    repo: &PlanRepository,
    config: &HuddleConfig,
) -> Result<()> {
    match command {
        PlanCommands::Create { name, options } => cmd_create(repo, config, &name, &options).await,
        PlanCommands::Show { plan_id, json } => cmd_show(repo, &plan_id, json).await,
        PlanCommands::Respond {
            plan_id,
            name,
            choices,
        } => cmd_respond(repo, &plan_id, &name, &choices).await,
    }
}

// -----------------------------------------------------------------------
// huddle plan create
// -----------------------------------------------------------------------

/// Parse the option keys, validate, store the plan under a fresh id, and
/// print the id and share link.
async fn cmd_create(
    repo: &PlanRepository,
    config: &HuddleConfig,
    name: &str,
    option_keys: &[String],
) -> Result<()> {
    let options = option_keys
        .iter()
        .map(|key| {
            time_key::decode(key.trim()).with_context(|| format!("invalid option {key:?}"))
        })
        .collect::<Result<Vec<NaiveDateTime>>>()?;

    let plan = NewPlan::new(generate_plan_id(), name.trim(), options);
    plan.validate().context("invalid plan")?;

    repo.create_plan(&plan).await?;

    println!("Plan created successfully.");
    println!();
    println!("  Plan ID:    {}", plan.id);
    println!("  Name:       {}", plan.name);
    println!("  Options:    {}", plan.options.len());
    println!("  Share link: {}", config.share_link(&plan.id));

    Ok(())
}

// -----------------------------------------------------------------------
// huddle plan show <plan-id>
// -----------------------------------------------------------------------

#[derive(Serialize)]
struct ShowOutput<'a> {
    plan: &'a Plan,
    table: &'a AvailabilityTable,
    skipped: &'a [SkippedRow],
}

async fn cmd_show(repo: &PlanRepository, plan_id: &str, json: bool) -> Result<()> {
    let Some(report) = repo.get_plan(plan_id).await? else {
        anyhow::bail!("plan not found: {plan_id}");
    };
    let table = AvailabilityTable::build(&report.value);

    if json {
        let output = ShowOutput {
            plan: &report.value,
            table: &table,
            skipped: &report.skipped,
        };
        let text = serde_json::to_string_pretty(&output).context("failed to serialize plan")?;
        println!("{text}");
    } else {
        let text = render_plan(&report.value, &table, &report.skipped)
            .context("failed to render plan")?;
        print!("{text}");
    }

    Ok(())
}

// -----------------------------------------------------------------------
// huddle plan respond <plan-id>
// -----------------------------------------------------------------------

/// Split `KEY=CHOICE` on the last `=`. Keys never contain `=`, but a stray
/// one in the key just fails the known-key check later.
fn split_choice_arg(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.rsplit_once('=')?;
    Some((key.trim(), value.trim()))
}

/// Keep only answers for options the plan has and with a recognised choice.
///
/// Anything else is dropped without an error, the same as a submitted form
/// with extra or blank fields.
fn filter_choices(args: &[String], known_keys: &[String]) -> BTreeMap<String, Choice> {
    let mut choices = BTreeMap::new();
    for arg in args {
        let Some((key, value)) = split_choice_arg(arg) else {
            debug!(arg = %arg, "ignoring choice without '='");
            continue;
        };
        if !known_keys.iter().any(|k| k == key) {
            debug!(option = %key, "ignoring choice for unknown option");
            continue;
        }
        match value.parse::<Choice>() {
            Ok(choice) => {
                choices.insert(key.to_owned(), choice);
            }
            Err(err) => debug!(option = %key, "ignoring choice: {err}"),
        }
    }
    choices
}

async fn cmd_respond(
    repo: &PlanRepository,
    plan_id: &str,
    name: &str,
    args: &[String],
) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("participant name must not be empty");
    }

    let options = repo.get_plan_options(plan_id).await;
    for row in &options.skipped {
        eprintln!("warning: {row}");
    }
    if options.value.is_empty() {
        anyhow::bail!("plan not found or has no options: {plan_id}");
    }

    let known_keys = options
        .value
        .iter()
        .map(time_key::encode)
        .collect::<Result<Vec<_>, _>>()
        .context("stored option is not a valid time key")?;

    let choices = filter_choices(args, &known_keys);
    let response_id = repo.add_response(plan_id, name, &choices).await?;

    println!("Response recorded.");
    println!();
    println!("  Response ID: {response_id}");
    println!("  Name:        {name}");
    println!("  Answers:     {} of {}", choices.len(), known_keys.len());

    Ok(())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
