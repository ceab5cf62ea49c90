//! Leaf commands.
//!
//! A [`Command`] wraps a command body: a closure taking an options record,
//! optionally the call [`Context`], positional parameters and the trailing
//! command after `--`. Each constructor fixes one of those signatures:
//!
//! | Constructor | Body |
//! |-------------|------|
//! | [`Command::new`] | `Fn(O) -> R` |
//! | [`Command::with_args`] | `Fn(O, P) -> R` |
//! | [`Command::with_context`] | `Fn(&Context, O, P) -> R` |
//! | [`Command::variadic`] | `Fn(O, P, Vec<String>) -> R` |
//! | [`Command::variadic_with_context`] | `Fn(&Context, O, P, Vec<String>) -> R` |
//!
//! `O` implements [`Options`], `P` implements [`Positionals`] and `R`
//! implements [`IntoExit`].
//!
//! # Example
//!
//! ```rust
//! use argot::{Command, Context, Env, Node, Options};
//!
//! #[derive(Options)]
//! struct Greet {
//!     #[opt(flag = "-n,--name", default = "Luke")]
//!     name: String,
//! }
//!
//! let cmd = Command::new(|opts: Greet| {
//!     assert_eq!(opts.name, "Han");
//! })
//! .help("Say hello");
//!
//! let args = vec!["--name".to_string(), "Han".to_string()];
//! let outcome = cmd.call(&mut Context::new(), args, &Env::new());
//! assert_eq!(outcome.code(), 0);
//! ```

use std::collections::BTreeSet;
use std::fmt;

use anyhow::anyhow;
use once_cell::unsync::OnceCell;

use crate::bind::{OptionValues, Options};
use crate::env::Env;
use crate::handler::{Context, Exit, IntoExit};
use crate::help;
use crate::node::Node;
use crate::outcome::{Help, Outcome, Usage};
use crate::parse::parse;
use crate::positional::Positionals;
use crate::schema::{CommandSchema, ConfigError};

type Body =
    Box<dyn Fn(&Context, &OptionValues, Vec<String>, Vec<String>) -> anyhow::Result<Exit>>;

/// A leaf of the command tree.
pub struct Command {
    help: String,
    description: String,
    usage: Option<String>,
    ignore_env: BTreeSet<String>,
    variadic: bool,
    derive: fn() -> Result<CommandSchema, ConfigError>,
    synopsis: fn() -> String,
    body: Body,
    schema: OnceCell<Result<CommandSchema, ConfigError>>,
}

fn derive<O: Options, P: Positionals>() -> Result<CommandSchema, ConfigError> {
    P::check()?;
    CommandSchema::derive::<O>()
}

impl Command {
    fn build<O, P, F>(variadic: bool, invoke: F) -> Self
    where
        O: Options + 'static,
        P: Positionals + 'static,
        F: Fn(&Context, O, P, Vec<String>) -> Exit + 'static,
    {
        let body = move |ctx: &Context,
                         values: &OptionValues,
                         positionals: Vec<String>,
                         command: Vec<String>|
              -> anyhow::Result<Exit> {
            let options = O::bind(values)?;
            let params = P::bind(positionals)?;

            if variadic && command.is_empty() {
                return Err(anyhow!("missing command after \"--\" separator"));
            }
            if !variadic && !command.is_empty() {
                return Err(anyhow!("unsupported command after \"--\" separator"));
            }
            Ok(invoke(ctx, options, params, command))
        };

        Command {
            help: String::new(),
            description: String::new(),
            usage: None,
            ignore_env: BTreeSet::new(),
            variadic,
            derive: derive::<O, P>,
            synopsis: P::synopsis,
            body: Box::new(body),
            schema: OnceCell::new(),
        }
    }

    /// A command taking an options record.
    pub fn new<O, R, F>(f: F) -> Self
    where
        O: Options + 'static,
        R: IntoExit,
        F: Fn(O) -> R + 'static,
    {
        Self::build(false, move |_: &Context, options: O, (): (), _| {
            f(options).into_exit()
        })
    }

    /// A command taking an options record and positional parameters.
    pub fn with_args<O, P, R, F>(f: F) -> Self
    where
        O: Options + 'static,
        P: Positionals + 'static,
        R: IntoExit,
        F: Fn(O, P) -> R + 'static,
    {
        Self::build(false, move |_: &Context, options: O, params: P, _| {
            f(options, params).into_exit()
        })
    }

    /// Like [`with_args`](Self::with_args), with the call context first.
    pub fn with_context<O, P, R, F>(f: F) -> Self
    where
        O: Options + 'static,
        P: Positionals + 'static,
        R: IntoExit,
        F: Fn(&Context, O, P) -> R + 'static,
    {
        Self::build(false, move |ctx: &Context, options: O, params: P, _| {
            f(ctx, options, params).into_exit()
        })
    }

    /// A command that requires a trailing command after `--`.
    pub fn variadic<O, P, R, F>(f: F) -> Self
    where
        O: Options + 'static,
        P: Positionals + 'static,
        R: IntoExit,
        F: Fn(O, P, Vec<String>) -> R + 'static,
    {
        Self::build(true, move |_: &Context, options: O, params: P, command| {
            f(options, params, command).into_exit()
        })
    }

    /// Like [`variadic`](Self::variadic), with the call context first.
    pub fn variadic_with_context<O, P, R, F>(f: F) -> Self
    where
        O: Options + 'static,
        P: Positionals + 'static,
        R: IntoExit,
        F: Fn(&Context, O, P, Vec<String>) -> R + 'static,
    {
        Self::build(true, move |ctx: &Context, options: O, params: P, command| {
            f(ctx, options, params, command).into_exit()
        })
    }

    /// Short help shown next to the command in a listing.
    ///
    /// A `#[opt(help = "...")]` on the options record takes precedence.
    pub fn help(mut self, text: impl Into<String>) -> Self {
        self.help = text.into();
        self
    }

    /// Long description printed above the options table.
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Replaces the generated synopsis.
    pub fn synopsis(mut self, text: impl Into<String>) -> Self {
        self.usage = Some(text.into());
        self
    }

    /// Never reads the option with canonical name `flag` from the
    /// environment.
    pub fn ignore_env(mut self, flag: impl Into<String>) -> Self {
        self.ignore_env.insert(flag.into());
        self
    }

    /// The derived schema, computed on first use.
    pub fn schema(&self) -> Result<&CommandSchema, ConfigError> {
        self.schema
            .get_or_init(|| (self.derive)())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn merge_env(
        &self,
        ctx: &Context,
        schema: &CommandSchema,
        values: &mut OptionValues,
        env: &Env,
    ) {
        for field in schema.fields() {
            let name = field.canonical();
            if values.contains(name)
                || self.ignore_env.contains(name)
                || ctx.ignore_env.contains(name)
            {
                continue;
            }
            if let Some((var, value)) = field
                .env
                .iter()
                .find_map(|var| env.lookup(var).map(|value| (var, value)))
            {
                tracing::trace!(option = name, env = %var, "option set from environment");
                values.fill(name, value);
            }
        }
    }

    fn merge_defaults(schema: &CommandSchema, values: &mut OptionValues) {
        for field in schema.fields().filter(|f| f.has_default()) {
            if values.fill(field.canonical(), &field.default) {
                tracing::trace!(
                    option = field.canonical(),
                    default = %field.default,
                    "option defaulted"
                );
            }
        }
    }
}

impl Node for Command {
    fn configure(&self) -> Result<(), ConfigError> {
        self.schema().map(|_| ())
    }

    fn call(&self, ctx: &mut Context, args: Vec<String>, env: &Env) -> Outcome {
        let schema = match self.schema() {
            Ok(schema) => schema,
            Err(e) => return Outcome::Failed(1, e.into()),
        };

        let parsed = match parse(schema, &args) {
            Ok(parsed) => parsed,
            Err(e) => return Outcome::Usage(Usage::new(e)),
        };
        if parsed.wants_help() {
            return Outcome::Help(Help::new());
        }

        let mut values = parsed.options;
        self.merge_env(ctx, schema, &mut values, env);
        Self::merge_defaults(schema, &mut values);

        if let Some(missing) = schema
            .fields()
            .find(|f| f.is_required() && !values.contains(f.canonical()))
        {
            return Outcome::Usage(Usage::new(anyhow!(
                "missing required flag: {:?}",
                missing.canonical()
            )));
        }

        tracing::debug!(
            command = %ctx.command_path.join(" "),
            positionals = parsed.positionals.len(),
            "invoking command"
        );
        match (self.body)(ctx, &values, parsed.positionals, parsed.command) {
            Ok(exit) => Outcome::from_exit(exit),
            Err(e) => Outcome::Usage(Usage::new(e)),
        }
    }

    fn usage(&self) -> String {
        if let Some(usage) = &self.usage {
            return usage.clone();
        }
        let mut out = format!("[options]{}", (self.synopsis)());
        if self.variadic {
            out.push_str(" -- [command]");
        }
        out
    }

    fn description(&self) -> String {
        match self.schema() {
            Ok(schema) => help::command_description(&self.description, schema),
            Err(e) => format!("{}\n", e),
        }
    }

    fn summary(&self) -> String {
        self.schema()
            .ok()
            .and_then(CommandSchema::about)
            .map(str::to_string)
            .unwrap_or_else(|| self.help.clone())
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("help", &self.help)
            .field("usage", &Node::usage(self))
            .field("variadic", &self.variadic)
            .field("ignore_env", &self.ignore_env)
            .finish_non_exhaustive()
    }
}
