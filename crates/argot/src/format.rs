//! Output printers for command bodies.
//!
//! A command that produces records picks a [`Printer`] by format name,
//! usually from one of its options, prints values through it and flushes
//! it before returning:
//!
//! ```rust
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row {
//!     id: u32,
//!     name: &'static str,
//! }
//!
//! let mut out = Vec::new();
//! let mut printer = argot::format("text", &mut out)?;
//! printer.write(&Row { id: 1, name: "a" })?;
//! printer.write(&Row { id: 22, name: "b" })?;
//! printer.flush()?;
//! drop(printer);
//!
//! assert_eq!(String::from_utf8(out)?, "ID  NAME\n1   a\n22  b\n");
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Printers buffer: nothing is guaranteed to reach the writer before
//! [`Printer::flush`].

use std::io::Write;

use heck::ToShoutySnakeCase;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::outcome::UsageError;

/// Errors that can occur while printing.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("writing output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A high-level output format.
pub trait Printer {
    /// Prints one value.
    fn print(&mut self, value: &Value) -> Result<(), FormatError>;

    /// Writes out anything buffered.
    fn flush(&mut self) -> Result<(), FormatError>;
}

impl dyn Printer + '_ {
    /// Prints any serializable value.
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), FormatError> {
        let value = serde_json::to_value(value)?;
        self.print(&value)
    }
}

/// Returns a printer for the format `name`, one of `json`, `yaml` or
/// `text`, writing each value as it is printed.
pub fn format<'a, W: Write + 'a>(
    name: &str,
    writer: W,
) -> Result<Box<dyn Printer + 'a>, UsageError> {
    match name {
        "json" => Ok(Box::new(Json { writer })),
        "yaml" => Ok(Box::new(Yaml {
            writer,
            documents: 0,
        })),
        "text" => Ok(Box::new(Text::new(writer))),
        _ => Err(unsupported(name)),
    }
}

/// Returns a printer for the format `name` that collects the printed
/// values into a single list, written on flush.
pub fn format_list<'a, W: Write + 'a>(
    name: &str,
    writer: W,
) -> Result<Box<dyn Printer + 'a>, UsageError> {
    match name {
        "json" => Ok(Box::new(List {
            writer,
            values: Vec::new(),
            encode: encode_json,
        })),
        "yaml" => Ok(Box::new(List {
            writer,
            values: Vec::new(),
            encode: encode_yaml,
        })),
        "text" => Ok(Box::new(Text::new(writer))),
        _ => Err(unsupported(name)),
    }
}

fn unsupported(name: &str) -> UsageError {
    tracing::debug!(format = name, "unsupported output format");
    UsageError::new(format!("unsupported output format: {:?}", name))
}

fn encode_json(writer: &mut dyn Write, value: &Value) -> Result<(), FormatError> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writer.write_all(b"\n")?;
    Ok(())
}

fn encode_yaml(writer: &mut dyn Write, value: &Value) -> Result<(), FormatError> {
    writer.write_all(serde_yaml::to_string(value)?.as_bytes())?;
    Ok(())
}

struct Json<W> {
    writer: W,
}

impl<W: Write> Printer for Json<W> {
    fn print(&mut self, value: &Value) -> Result<(), FormatError> {
        encode_json(&mut self.writer, value)
    }

    fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes a YAML stream, one document per value.
struct Yaml<W> {
    writer: W,
    documents: usize,
}

impl<W: Write> Printer for Yaml<W> {
    fn print(&mut self, value: &Value) -> Result<(), FormatError> {
        if self.documents > 0 {
            self.writer.write_all(b"---\n")?;
        }
        self.documents += 1;
        encode_yaml(&mut self.writer, value)
    }

    fn flush(&mut self) -> Result<(), FormatError> {
        self.writer.flush()?;
        Ok(())
    }
}

struct List<W> {
    writer: W,
    values: Vec<Value>,
    encode: fn(&mut dyn Write, &Value) -> Result<(), FormatError>,
}

impl<W: Write> Printer for List<W> {
    fn print(&mut self, value: &Value) -> Result<(), FormatError> {
        self.values.push(value.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FormatError> {
        let list = Value::Array(std::mem::take(&mut self.values));
        (self.encode)(&mut self.writer, &list)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Gap between text columns.
const PADDING: usize = 2;

/// Prints objects as a table under a header of their keys, and any other
/// value on a line of its own.
///
/// Columns follow the field order of the serialized value. Consecutive
/// objects with the same keys share one table; different keys start a new
/// one.
struct Text<W> {
    writer: W,
    keys: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl<W: Write> Text<W> {
    fn new(writer: W) -> Self {
        Text {
            writer,
            keys: None,
            rows: Vec::new(),
        }
    }

    fn write_table(&mut self) -> Result<(), FormatError> {
        if self.keys.take().is_none() {
            return Ok(());
        }
        let rows = std::mem::take(&mut self.rows);
        let columns = rows.first().map_or(0, Vec::len);

        let widths: Vec<usize> = (0..columns)
            .map(|i| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        for row in &rows {
            let mut line = String::new();
            for (i, cell) in row.iter().enumerate() {
                line.push_str(cell);
                if i + 1 < columns {
                    let pad = widths[i] + PADDING - cell.chars().count();
                    line.push_str(&" ".repeat(pad));
                }
            }
            writeln!(self.writer, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

impl<W: Write> Printer for Text<W> {
    fn print(&mut self, value: &Value) -> Result<(), FormatError> {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.print(item)?;
                }
            }
            Value::Object(map) => {
                let keys: Vec<String> = map.keys().cloned().collect();
                if self.keys.as_ref() != Some(&keys) {
                    self.write_table()?;
                    let header = keys.iter().map(String::as_str).map(column_name).collect();
                    self.rows.push(header);
                    self.keys = Some(keys);
                }
                self.rows.push(map.values().map(cell).collect());
            }
            other => {
                self.write_table()?;
                writeln!(self.writer, "{}", cell(other))?;
            }
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), FormatError> {
        self.write_table()?;
        self.writer.flush()?;
        Ok(())
    }
}

/// `created_at` and `createdAt` both become `CREATED AT`.
fn column_name(key: &str) -> String {
    key.to_shouty_snake_case().replace('_', " ")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
