//! Argument tokenizer and parser.
//!
//! A single left-to-right scan splits an argument vector into option
//! values (keyed by canonical flag name), positional values and the
//! trailing command after `--`.

use thiserror::Error;

use crate::bind::OptionValues;
use crate::schema::{CommandSchema, HELP_FLAG};

/// The separator that ends option parsing.
pub const SEPARATOR: &str = "--";

/// The argument vector did not match the option table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognized option: {0:?}")]
    UnrecognizedOption(String),

    #[error("unexpected boolean value: {0:?}")]
    UnexpectedBoolean(String),

    #[error("missing option value: {0:?}")]
    MissingValue(String),
}

/// Result of parsing one argument vector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    pub options: OptionValues,
    pub positionals: Vec<String>,
    /// Everything after the first `--`, verbatim.
    pub command: Vec<String>,
}

impl ParsedArguments {
    /// True when the help switch was given as true at least once.
    pub fn wants_help(&self) -> bool {
        self.options
            .get(HELP_FLAG)
            .map_or(false, |values| values.iter().any(|v| v == "true"))
    }
}

/// Returns true for tokens parsed as options.
pub fn is_option(arg: &str) -> bool {
    arg.len() > 1 && arg.starts_with('-')
}

/// Parses `args` against the options of `schema`.
pub fn parse<S: AsRef<str>>(
    schema: &CommandSchema,
    args: &[S],
) -> Result<ParsedArguments, ParseError> {
    let mut parsed = ParsedArguments::default();
    let mut rest = args.iter().map(|a| a.as_ref());

    while let Some(arg) = rest.next() {
        if arg == SEPARATOR {
            parsed.command.extend(rest.by_ref().map(str::to_string));
            break;
        }
        if !is_option(arg) {
            parsed.positionals.push(arg.to_string());
            continue;
        }

        let (name, inline) = match arg.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (arg, None),
        };
        let field = schema
            .resolve(name)
            .ok_or_else(|| ParseError::UnrecognizedOption(arg.to_string()))?;

        let value = if field.is_boolean() {
            match inline {
                None => "true",
                Some(v @ ("true" | "false")) => v,
                Some(v) => return Err(ParseError::UnexpectedBoolean(v.to_string())),
            }
        } else {
            match inline {
                Some(v) => v,
                None => match rest.next() {
                    Some(next) if !is_option(next) => next,
                    _ => return Err(ParseError::MissingValue(arg.to_string())),
                },
            }
        };
        parsed.options.push(field.canonical(), value);
    }

    tracing::debug!(
        options = parsed.options.iter().count(),
        positionals = parsed.positionals.len(),
        command = parsed.command.len(),
        "parsed arguments"
    );
    Ok(parsed)
}
