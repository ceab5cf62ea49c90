//! Options records and value binding.
//!
//! An options record is a struct deriving [`Options`]. The derive produces
//! two things: the list of [`FieldSpec`]s the schema is built from, and a
//! `bind` function that decodes every field out of [`OptionValues`].
//!
//! ```rust
//! use argot::{OptionValues, Options};
//!
//! #[derive(Options)]
//! struct Greet {
//!     #[opt(flag = "-n,--name", default = "Luke")]
//!     name: String,
//! }
//!
//! let mut values = OptionValues::new();
//! values.push("--name", "Han");
//! let greet = Greet::bind(&values).unwrap();
//! assert_eq!(greet.name, "Han");
//! ```

use std::collections::BTreeMap;

use thiserror::Error;

use crate::value::{DecodeError, Value, ValueKind};

/// A typed record whose fields are bound from command-line options.
///
/// Usually derived with `#[derive(Options)]`.
pub trait Options: Sized {
    /// Describes every option field, flattened fields included.
    fn fields() -> Vec<FieldSpec>;

    /// One-line summary of the command using this record.
    fn about() -> Option<&'static str> {
        None
    }

    /// Builds a fresh record from the merged option values.
    fn bind(values: &OptionValues) -> Result<Self, BindError>;
}

impl Options for () {
    fn fields() -> Vec<FieldSpec> {
        Vec::new()
    }

    fn bind(_values: &OptionValues) -> Result<Self, BindError> {
        Ok(())
    }
}

/// Declaration of one option field, as written in its annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Member names leading to the field, outermost first.
    pub path: Vec<&'static str>,
    /// Comma-separated flag list; the last flag is canonical.
    pub flags: &'static str,
    pub help: String,
    /// Default value text; `"-"` marks the field optional.
    pub default: String,
    /// Environment variable name; `"-"` disables env lookup.
    pub env: Option<String>,
    pub hidden: bool,
    pub kind: ValueKind,
    pub placeholder: String,
}

impl FieldSpec {
    /// Declares a field of type `T` answering to `flags`.
    pub fn of<T: Value>(name: &'static str, flags: &'static str) -> Self {
        FieldSpec {
            path: vec![name],
            flags,
            help: String::new(),
            default: String::new(),
            env: None,
            hidden: false,
            kind: T::KIND,
            placeholder: T::placeholder(),
        }
    }

    pub fn help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn default_value(mut self, default: &str) -> Self {
        self.default = default.to_string();
        self
    }

    pub fn env(mut self, env: &str) -> Self {
        self.env = Some(env.to_string());
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Places the field under a flattened member of an enclosing record.
    pub fn nested(mut self, parent: &'static str) -> Self {
        self.path.insert(0, parent);
        self
    }
}

/// Option values collected for one call, keyed by canonical flag name.
///
/// Values keep their command-line order; a name is present only when at
/// least one value was given, found in the environment or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: BTreeMap<String, Vec<String>>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `name`.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Sets `name` to a single value unless it already has one.
    ///
    /// Returns true when the value was stored.
    pub fn fill(&mut self, name: &str, value: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.values.insert(name.to_string(), vec![value.to_string()]);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.values.get(name).map(Vec::as_slice)
    }

    /// Returns the last value given for `name`.
    pub fn last(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.last()).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Decodes the values stored under `name`.
    ///
    /// A name without values decodes to [`Value::zero`].
    pub fn decode<T: Value>(&self, name: &str) -> Result<T, BindError> {
        match self.values.get(name) {
            None => Ok(T::zero()),
            Some(values) => T::decode(values).map_err(|source| BindError {
                option: name.to_string(),
                source,
            }),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = OptionValues::new();
        for (k, v) in iter {
            values.push(k, v);
        }
        values
    }
}

/// A field failed to decode.
#[derive(Debug, Error)]
#[error("decoding {option:?}")]
pub struct BindError {
    /// Canonical flag name of the field.
    pub option: String,
    #[source]
    pub source: DecodeError,
}
