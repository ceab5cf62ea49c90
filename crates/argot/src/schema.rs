//! Schema derivation.
//!
//! Turns the [`FieldSpec`]s of an options record into a [`CommandSchema`]:
//! the table of canonical flag names, aliases and environment candidates
//! the parser and the invoker work from.

use std::collections::BTreeMap;

use heck::ToShoutySnakeCase;
use thiserror::Error;

use crate::bind::{FieldSpec, Options};
use crate::value::ValueKind;

/// Canonical name of the synthesized help switch.
pub const HELP_FLAG: &str = "--help";

/// Help text of the synthesized help switch.
pub const HELP_TEXT: &str = "Show this help message";

/// Sentinel default that marks a field optional; as an env name it turns
/// env lookup off.
pub const NONE: &str = "-";

/// A command definition is malformed.
///
/// These are defects in the program, not in its invocation, and are
/// reported by [`Node::configure`](crate::Node::configure).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("duplicate flag: {0:?}")]
    DuplicateFlag(String),

    #[error("empty flag name in field {0:?}")]
    EmptyFlag(String),

    #[error("invalid flag name {0:?}: flags start with '-'")]
    InvalidFlag(String),

    #[error("list positional argument must be the last one")]
    ListPositionalNotLast,
}

/// A resolved option field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    /// Member path within the options record, outermost first.
    pub path: Vec<&'static str>,
    /// Flag names in declaration order; the last one is canonical.
    pub flags: Vec<String>,
    /// Environment variables consulted, in order.
    pub env: Vec<String>,
    pub help: String,
    pub default: String,
    pub hidden: bool,
    pub kind: ValueKind,
    pub placeholder: String,
}

impl FieldSchema {
    fn from_spec(spec: FieldSpec) -> Result<Self, ConfigError> {
        let mut flags = Vec::new();
        for flag in spec.flags.split(',') {
            let flag = flag.trim();
            if flag.is_empty() {
                return Err(ConfigError::EmptyFlag(spec.path.join(".")));
            }
            if !flag.starts_with('-') {
                return Err(ConfigError::InvalidFlag(flag.to_string()));
            }
            flags.push(flag.to_string());
        }

        let env = match spec.env.as_deref() {
            Some(NONE) => Vec::new(),
            Some(name) => vec![name.to_string()],
            None => flags
                .iter()
                .filter_map(|f| f.strip_prefix("--"))
                .map(|f| f.to_shouty_snake_case())
                .collect(),
        };

        Ok(FieldSchema {
            path: spec.path,
            flags,
            env,
            help: spec.help,
            default: spec.default,
            hidden: spec.hidden,
            kind: spec.kind,
            placeholder: spec.placeholder,
        })
    }

    fn help_switch() -> Self {
        FieldSchema {
            path: Vec::new(),
            flags: vec!["-h".into(), HELP_FLAG.into()],
            env: Vec::new(),
            help: HELP_TEXT.into(),
            default: String::new(),
            hidden: false,
            kind: ValueKind::Flag,
            placeholder: String::new(),
        }
    }

    /// The name values are collected under.
    pub fn canonical(&self) -> &str {
        self.flags.last().map(String::as_str).unwrap_or_default()
    }

    pub fn is_boolean(&self) -> bool {
        self.kind == ValueKind::Flag
    }

    /// True when the field has a default that is applied when unset.
    pub fn has_default(&self) -> bool {
        !self.default.is_empty() && self.default != NONE
    }

    /// True when the call fails if the field stays unset.
    pub fn is_required(&self) -> bool {
        self.default.is_empty() && !self.kind.is_implicit()
    }

    /// Single-dash flags, in declaration order.
    pub fn short_flags(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .map(String::as_str)
            .filter(|f| !f.starts_with("--"))
    }

    /// Double-dash flags, in declaration order.
    pub fn long_flags(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .map(String::as_str)
            .filter(|f| f.starts_with("--"))
    }
}

/// The option table of one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandSchema {
    fields: BTreeMap<String, FieldSchema>,
    aliases: BTreeMap<String, String>,
    about: Option<String>,
}

impl CommandSchema {
    /// Derives the schema of an options record.
    pub fn derive<O: Options>() -> Result<Self, ConfigError> {
        Self::from_specs(O::fields(), O::about())
    }

    /// Builds a schema from field declarations.
    ///
    /// The help switch (`-h`, `--help`) is added to every schema, so a
    /// field claiming either name is a duplicate.
    pub fn from_specs(specs: Vec<FieldSpec>, about: Option<&str>) -> Result<Self, ConfigError> {
        let mut schema = CommandSchema {
            about: about.map(str::to_string),
            ..CommandSchema::default()
        };
        schema.insert(FieldSchema::help_switch())?;
        for spec in specs {
            schema.insert(FieldSchema::from_spec(spec)?)?;
        }

        tracing::debug!(
            fields = schema.fields.len(),
            aliases = schema.aliases.len(),
            "derived command schema"
        );
        Ok(schema)
    }

    fn insert(&mut self, field: FieldSchema) -> Result<(), ConfigError> {
        let canonical = field.canonical().to_string();
        for flag in &field.flags {
            if self.aliases.contains_key(flag) {
                return Err(ConfigError::DuplicateFlag(flag.clone()));
            }
            self.aliases.insert(flag.clone(), canonical.clone());
        }
        self.fields.insert(canonical, field);
        Ok(())
    }

    /// Resolves any flag name, alias or canonical, to its field.
    pub fn resolve(&self, flag: &str) -> Option<&FieldSchema> {
        self.aliases.get(flag).and_then(|c| self.fields.get(c))
    }

    /// Looks a field up by canonical name.
    pub fn get(&self, canonical: &str) -> Option<&FieldSchema> {
        self.fields.get(canonical)
    }

    /// Fields sorted by canonical name, the help switch included.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.values()
    }

    /// Record-level summary, from `#[opt(help = "...")]` on the struct.
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(specs: Vec<FieldSpec>) -> Result<CommandSchema, ConfigError> {
        CommandSchema::from_specs(specs, None)
    }

    #[test]
    fn test_canonical_is_last_flag() {
        let s = schema(vec![FieldSpec::of::<String>("name", "-n, --name")]).unwrap();
        let field = s.resolve("-n").unwrap();
        assert_eq!(field.canonical(), "--name");
        assert_eq!(s.resolve("--name").unwrap().canonical(), "--name");
        assert!(s.get("-n").is_none());
    }

    #[test]
    fn test_help_switch_is_synthesized() {
        let s = schema(Vec::new()).unwrap();
        let help = s.resolve("-h").unwrap();
        assert_eq!(help.canonical(), HELP_FLAG);
        assert!(help.is_boolean());
        assert!(help.env.is_empty());
    }

    #[test]
    fn test_duplicate_flag() {
        let err = schema(vec![
            FieldSpec::of::<String>("a", "-a,--alpha"),
            FieldSpec::of::<String>("b", "-a,--beta"),
        ])
        .unwrap_err();
        assert_eq!(err, ConfigError::DuplicateFlag("-a".into()));
    }

    #[test]
    fn test_help_flag_is_reserved() {
        let err = schema(vec![FieldSpec::of::<bool>("host", "-h,--host")]).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateFlag("-h".into()));
    }

    #[test]
    fn test_empty_flag() {
        let err = schema(vec![FieldSpec::of::<bool>("x", "-x,").nested("inner")]).unwrap_err();
        assert_eq!(err, ConfigError::EmptyFlag("inner.x".into()));
    }

    #[test]
    fn test_invalid_flag() {
        let err = schema(vec![FieldSpec::of::<bool>("x", "x")]).unwrap_err();
        assert_eq!(err, ConfigError::InvalidFlag("x".into()));
    }

    #[test]
    fn test_env_from_long_flags() {
        let s = schema(vec![FieldSpec::of::<bool>("dry", "-d,--dry-run,--noop")]).unwrap();
        assert_eq!(s.get("--noop").unwrap().env, vec!["DRY_RUN", "NOOP"]);
    }

    #[test]
    fn test_env_explicit_and_disabled() {
        let s = schema(vec![
            FieldSpec::of::<String>("token", "--token").env("API_TOKEN"),
            FieldSpec::of::<String>("secret", "--secret").env("-"),
            FieldSpec::of::<String>("n", "-n"),
        ])
        .unwrap();
        assert_eq!(s.get("--token").unwrap().env, vec!["API_TOKEN"]);
        assert!(s.get("--secret").unwrap().env.is_empty());
        assert!(s.get("-n").unwrap().env.is_empty());
    }

    #[test]
    fn test_required_fields() {
        let s = schema(vec![
            FieldSpec::of::<String>("path", "--path"),
            FieldSpec::of::<String>("name", "--name").default_value("Luke"),
            FieldSpec::of::<String>("opt", "--opt").default_value("-"),
            FieldSpec::of::<bool>("flag", "--flag"),
            FieldSpec::of::<Vec<String>>("tags", "--tag"),
            FieldSpec::of::<Option<u32>>("level", "--level"),
        ])
        .unwrap();

        let required: Vec<&str> = s
            .fields()
            .filter(|f| f.is_required())
            .map(|f| f.canonical())
            .collect();
        assert_eq!(required, vec!["--path"]);
        assert!(s.get("--name").unwrap().has_default());
        assert!(!s.get("--opt").unwrap().has_default());
    }

    #[test]
    fn test_fields_sorted_by_canonical() {
        let s = schema(vec![
            FieldSpec::of::<String>("path", "--path"),
            FieldSpec::of::<bool>("debug", "-d,--debug"),
        ])
        .unwrap();
        let names: Vec<&str> = s.fields().map(|f| f.canonical()).collect();
        assert_eq!(names, vec!["--debug", "--help", "--path"]);
    }

    #[test]
    fn test_short_and_long_flags() {
        let s = schema(vec![FieldSpec::of::<bool>("v", "-v,--verbose,-V")]).unwrap();
        let field = s.get("-V").unwrap();
        assert_eq!(field.short_flags().collect::<Vec<_>>(), vec!["-v", "-V"]);
        assert_eq!(field.long_flags().collect::<Vec<_>>(), vec!["--verbose"]);
    }
}
