//! Help text rendering.
//!
//! The layout is part of the behavior of a program: rows are sorted,
//! columns are aligned, and no line ends in whitespace.

use crate::schema::{CommandSchema, FieldSchema, HELP_TEXT};

/// Synopsis of every command set.
pub const SET_USAGE: &str = "[command] [-h] [--help] ...";

/// Renders the description of a command: its long description, if any,
/// followed by the options table.
pub fn command_description(description: &str, schema: &CommandSchema) -> String {
    let mut out = String::new();
    if !description.is_empty() {
        for line in description.split('\n') {
            out.push_str(&format!("  {}\n", line));
        }
        out.push('\n');
    }
    out.push_str("Options:\n");
    out.push_str(&options_table(schema));
    out
}

/// Renders the listing of a command set from `(name, summary)` pairs.
pub fn set_description<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let rows: Vec<Row> = entries
        .into_iter()
        .map(|(name, summary)| Row {
            lead: format!("  {}", name),
            rest: (!summary.is_empty()).then(|| format!("  {}", summary)),
        })
        .collect();

    let mut out = String::from("Commands:\n");
    out.push_str(&align(&rows));
    out.push_str("\nOptions:\n");
    out.push_str(&format!("  -h, --help  {}\n", HELP_TEXT));
    out
}

/// Renders the options table of a schema, one line per visible field.
pub fn options_table(schema: &CommandSchema) -> String {
    let visible: Vec<&FieldSchema> = schema.fields().filter(|f| !f.hidden).collect();

    let short_len = visible
        .iter()
        .map(|f| f.short_flags().map(|s| s.chars().count() + 2).sum::<usize>())
        .max()
        .unwrap_or(0);

    let rows: Vec<Row> = visible
        .into_iter()
        .map(|field| option_row(field, short_len))
        .collect();
    align(&rows)
}

fn option_row(field: &FieldSchema, short_len: usize) -> Row {
    let count = field.flags.len();
    let mut lead = String::from("  ");

    let mut written = 0;
    for (i, flag) in field.flags.iter().enumerate() {
        if !flag.starts_with("--") {
            written += write_flag(&mut lead, flag, i, count);
        }
    }
    while written < short_len {
        lead.push(' ');
        written += 1;
    }
    for (i, flag) in field.flags.iter().enumerate() {
        if flag.starts_with("--") {
            write_flag(&mut lead, flag, i, count);
        }
    }
    if !field.placeholder.is_empty() {
        lead.push(' ');
        lead.push_str(&field.placeholder);
    }

    let mut rest = String::new();
    if !field.help.is_empty() {
        rest.push_str("  ");
        rest.push_str(&field.help);
    }
    if field.has_default() {
        rest.push_str(&format!(" (default: {})", field.default));
    }

    Row {
        lead,
        rest: Some(rest),
    }
}

/// Writes one flag, followed by a comma unless it is the last one.
/// Returns the width the flag takes in the short-flag column.
fn write_flag(out: &mut String, flag: &str, index: usize, count: usize) -> usize {
    out.push_str(flag);
    if index + 1 < count {
        out.push_str(", ");
    }
    flag.chars().count() + 2
}

struct Row {
    lead: String,
    rest: Option<String>,
}

/// Aligns the second column of consecutive rows that have one.
///
/// A row without a second column ends the current run, and the next run
/// is measured on its own.
fn align(rows: &[Row]) -> String {
    let mut out = String::new();
    let mut start = 0;

    while start < rows.len() {
        if rows[start].rest.is_none() {
            out.push_str(rows[start].lead.trim_end());
            out.push('\n');
            start += 1;
            continue;
        }

        let end = rows[start..]
            .iter()
            .position(|r| r.rest.is_none())
            .map_or(rows.len(), |n| start + n);
        let width = rows[start..end]
            .iter()
            .map(|r| r.lead.chars().count())
            .max()
            .unwrap_or(0);

        for row in &rows[start..end] {
            let rest = row.rest.as_deref().unwrap_or_default();
            let pad = width - row.lead.chars().count();
            let line = format!("{}{}{}", row.lead, " ".repeat(pad), rest);
            out.push_str(line.trim_end());
            out.push('\n');
        }
        start = end;
    }
    out
}
