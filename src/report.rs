use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;
use uuid::Uuid;

use crate::app::Outcome;
use crate::domain::result::{ReconciliationResult, ReviewAction};

pub fn outputs(action: ReviewAction, result: &ReconciliationResult) -> Vec<(String, String)> {
    let pass = action.pass_name();
    let reviewers =
        serde_json::to_string(result.reviewers()).unwrap_or_else(|_| "[]".to_string());
    vec![
        (format!("{pass}_status"), result.status().as_str().to_string()),
        (format!("{pass}_message"), result.message(action)),
        (format!("{pass}_url"), result.url().unwrap_or_default().to_string()),
        (format!("{pass}_reviewers"), reviewers),
    ]
}

// The heredoc delimiter must not occur inside the value.
fn delimiter_for(value: &str) -> String {
    loop {
        let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
        if !value.contains(&delimiter) {
            return delimiter;
        }
    }
}

fn render(name: &str, value: &str) -> String {
    if value.contains('\n') {
        let delimiter = delimiter_for(value);
        format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
    } else {
        format!("{name}={value}\n")
    }
}

pub fn write_outputs(
    output_file: Option<&Path>,
    action: ReviewAction,
    result: &ReconciliationResult,
) -> Result<()> {
    let rendered: String = outputs(action, result)
        .iter()
        .map(|(name, value)| {
            debug!(%name, %value, "output");
            render(name, value)
        })
        .collect();

    match output_file {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open output file {}", path.display()))?;
            file.write_all(rendered.as_bytes())
                .with_context(|| format!("failed to write outputs to {}", path.display()))?;
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

/// Returns `Ok(false)` when a pass failed; the caller exits non-zero.
pub fn report_outcome(output_file: Option<&Path>, outcome: &Outcome) -> Result<bool> {
    let mut ok = true;
    if let Some(unassigned) = &outcome.unassigned {
        write_outputs(output_file, ReviewAction::Unassign, unassigned)?;
        if unassigned.is_failure() {
            println!("::error::{}", unassigned.message(ReviewAction::Unassign));
            ok = false;
        }
    }
    write_outputs(output_file, ReviewAction::Assign, &outcome.assigned)?;
    if outcome.assigned.is_failure() {
        println!("::error::{}", outcome.assigned.message(ReviewAction::Assign));
        ok = false;
    }
    Ok(ok)
}
