//! Plain-text rendering for command output.

use std::fmt::Write as _;

use crate::calculator::CalculationResult;
use crate::factors::{Category, EmissionFactors};
use crate::record::UserRecord;
use crate::service::{Assessment, Persistence};

/// Render a per-category breakdown with percentage shares.
#[must_use]
pub fn breakdown(result: &CalculationResult) -> String {
    let mut out = String::new();
    for (category, tonnes) in result.per_category() {
        let _ = writeln!(
            out,
            "  {:<15} {:>9.3} t  {:>5.1}%",
            category.to_string(),
            tonnes,
            result.share(category)
        );
    }
    let _ = writeln!(out, "  {:<15} {:>9.3} t", "Total", result.total);
    out
}

/// Render an assessment: summary line, breakdown and log outcome.
#[must_use]
pub fn assessment(assessment: &Assessment) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", assessment.result.summary());
    out.push('\n');
    out.push_str(&breakdown(&assessment.result));
    out.push('\n');
    match &assessment.persistence {
        Persistence::Stored(id) => {
            let _ = writeln!(out, "Saved as record #{id}");
        }
        Persistence::Disabled => {
            let _ = writeln!(out, "Not saved");
        }
        Persistence::Failed(reason) => {
            let _ = writeln!(out, "Warning: result was not saved: {reason}");
        }
    }
    out
}

/// Render a single stored record in full.
#[must_use]
pub fn record(record: &UserRecord) -> String {
    let mut out = String::new();
    let id = record
        .id
        .map_or_else(|| "unsaved".to_string(), |id| format!("#{id}"));
    let created = record
        .created_at
        .map_or_else(|| "time unknown".to_string(), |at| at.to_rfc3339());
    let _ = writeln!(out, "Record {id} ({created})");
    let _ = writeln!(
        out,
        "  {} ({}, {}), {}",
        display_name(&record.identity.name),
        record.identity.age,
        record.identity.gender,
        record.input.country
    );
    out.push('\n');
    for category in Category::ALL {
        let _ = writeln!(
            out,
            "  {:<15} {:>9} {}",
            category.to_string(),
            record.input.raw(category),
            category.input_unit()
        );
    }
    out.push('\n');
    out.push_str(&breakdown(&record.result));
    out
}

/// Render one line per record for history listings.
#[must_use]
pub fn history_line(record: &UserRecord) -> String {
    let id = record.id.map_or(0, |id| id.get());
    let created = record.created_at.map_or_else(
        || "----------------".to_string(),
        |at| at.format("%Y-%m-%d %H:%M").to_string(),
    );
    format!(
        "#{:<6} {}  {:<20} {:<15} {:>8.2} t/yr",
        id,
        created,
        display_name(&record.identity.name),
        record.input.country,
        record.result.total
    )
}

/// Render the emission factor table.
#[must_use]
pub fn countries(factors: &EmissionFactors) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:<16}", "Country");
    for category in Category::ALL {
        let _ = write!(out, " {:>14}", category.to_string());
    }
    out.push('\n');
    for (name, coefficients) in factors.iter() {
        let _ = write!(out, "{name:<16}");
        for category in Category::ALL {
            let _ = write!(out, " {:>14}", coefficients.get(category));
        }
        out.push('\n');
    }
    out
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "(anonymous)"
    } else {
        name
    }
}
