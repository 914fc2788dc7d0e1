//! CSV export of reserves and tasks, plus a reader for the same dialect.
//!
//! Every field is wrapped in double quotes with embedded quotes doubled,
//! fields are comma separated and rows end with `\n`. Output is UTF-8
//! without a byte-order mark.

use crate::error::CoreError;
use crate::lookup;
use crate::models::{Apartment, Block, Project, Reserve, Task};
use crate::types::{format_date_fr, Date};

pub const RESERVE_HEADERS: [&str; 7] = [
    "Titre",
    "Projet",
    "Bloc",
    "Appartement",
    "Description",
    "Priorité",
    "Date de création",
];

pub const TASK_HEADERS: [&str; 9] = [
    "Titre",
    "Description",
    "Projet",
    "Assigné à",
    "Date début",
    "Date fin",
    "Statut",
    "Priorité",
    "Progrès",
];

/// Download name of the reserve export.
pub const RESERVES_EXPORT_FILENAME: &str = "reserves_export.csv";

/// Download name of the planning export for `date`.
pub fn planning_export_filename(date: Date) -> String {
    format!("planning_{}.csv", date.format("%Y-%m-%d"))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

fn csv_escape(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| csv_escape(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Export reserves, resolving references to display names.
pub fn reserves_csv(
    reserves: &[&Reserve],
    projects: &[Project],
    blocks: &[Block],
    apartments: &[Apartment],
) -> String {
    let mut lines = Vec::with_capacity(reserves.len() + 1);
    lines.push(csv_row(&RESERVE_HEADERS));
    for r in reserves {
        let created = format_date_fr(r.created_at.date_naive());
        lines.push(csv_row(&[
            r.title.as_str(),
            lookup::project_name(projects, &r.project_id),
            lookup::optional_block_name(blocks, r.block_id.as_deref()),
            lookup::optional_apartment_number(apartments, r.apartment_id.as_deref()),
            r.description.as_str(),
            r.priority.label(),
            created.as_str(),
        ]));
    }
    lines.join("\n")
}

/// Export tasks in the order given.
pub fn tasks_csv(tasks: &[&Task], projects: &[Project]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(csv_row(&TASK_HEADERS));
    for t in tasks {
        lines.push(csv_row(&[
            t.title.clone(),
            t.description.clone(),
            lookup::project_name(projects, &t.project_id).to_string(),
            t.assigned_to.clone(),
            t.start_date.format("%Y-%m-%d").to_string(),
            t.end_date.format("%Y-%m-%d").to_string(),
            t.status.label().to_string(),
            t.priority.label().to_string(),
            format!("{}%", t.progress),
        ]));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Parse CSV text into rows of fields, header row included.
///
/// Quoted fields may contain commas, doubled quotes and newlines. A
/// trailing newline does not produce an empty row.
pub fn parse_csv(text: &str) -> Result<Vec<Vec<String>>, CoreError> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut row_has_content = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(ch);
            }
            continue;
        }
        match ch {
            '"' => {
                in_quotes = true;
                row_has_content = true;
            }
            ',' => {
                row.push(std::mem::take(&mut field));
                row_has_content = true;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
                row_has_content = false;
            }
            _ => {
                field.push(ch);
                row_has_content = true;
            }
        }
    }

    if in_quotes {
        return Err(CoreError::Validation(
            "CSV ends inside a quoted field".to_string(),
        ));
    }
    if row_has_content || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }
    Ok(rows)
}
