//! Declarative command-line construction.
//!
//! `argot` builds a command-line program out of plain functions. A command
//! body takes a typed options record, and the record's annotations are the
//! whole definition of the command's flags:
//!
//! ```rust
//! use argot::{Command, CommandSet, Env, Options, Program};
//!
//! #[derive(Options)]
//! #[opt(help = "Say hello")]
//! struct Greet {
//!     #[opt(flag = "-n,--name", help = "Someone's name", default = "Luke")]
//!     name: String,
//!
//!     #[opt(flag = "-v,--verbose", help = "Enable verbose mode")]
//!     verbose: bool,
//! }
//!
//! let program = Program::new(
//!     "tool",
//!     CommandSet::new().command(
//!         "greet",
//!         Command::new(|opts: Greet| {
//!             if opts.verbose {
//!                 println!("about to greet");
//!             }
//!             println!("hello {}", opts.name);
//!         }),
//!     ),
//! );
//!
//! let mut out = Vec::new();
//! let args = vec!["greet".to_string(), "--name=Han".to_string()];
//! assert_eq!(program.call(args, &Env::new(), &mut out), 0);
//! ```
//!
//! # Pieces
//!
//! - **Options records**: `#[derive(Options)]` turns struct fields into
//!   flags ([`Options`], [`FieldSpec`]). Field types implement [`Value`],
//!   usually through [`Scalar`].
//! - **Schema**: [`CommandSchema`] is derived once per command and cached;
//!   definition mistakes surface as [`ConfigError`].
//! - **Parsing**: [`parse`] splits arguments into option values,
//!   positionals and the command after `--`.
//! - **Commands**: [`Command`] runs a body with its bound options,
//!   positional parameters ([`Positionals`]) and optionally the call
//!   [`Context`].
//! - **Routing**: [`CommandSet`] dispatches on the first argument and
//!   suggests close names for typos.
//! - **Outcomes**: every call ends in an [`Outcome`]; help and usage are
//!   signals carrying the node to render.
//! - **Program**: [`Program`] names the tree, prints help and errors, and
//!   produces the exit status.
//! - **Printers**: [`format`] and [`format_list`] give command bodies
//!   json, yaml and text output.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events and never installs a subscriber.

extern crate self as argot;

mod bind;
mod command;
mod env;
mod format;
mod handler;
mod help;
mod node;
mod outcome;
mod parse;
mod positional;
mod program;
mod schema;
mod set;
mod value;

pub use argot_macros::Options;

pub use bind::{BindError, FieldSpec, OptionValues, Options};

pub use command::Command;

pub use env::Env;

pub use format::{format, format_list, FormatError, Printer};

pub use handler::{Context, Exit, Extensions, IntoExit};

pub use help::{command_description, options_table, set_description, SET_USAGE};

pub use node::Node;

pub use outcome::{Help, HelpRequested, Outcome, Usage, UsageError};

pub use parse::{is_option, parse, ParseError, ParsedArguments, SEPARATOR};

pub use positional::{PositionalError, Positionals};

pub use program::{exec, Program};

pub use schema::{CommandSchema, ConfigError, FieldSchema, HELP_FLAG, HELP_TEXT, NONE};

pub use set::{CommandSet, SuggestionPolicy, UnknownCommand, SELF_ENTRY};

pub use value::{
    parse_bool, parse_duration, parse_signed, parse_time, parse_unsigned, BoxError, DecodeError,
    Scalar, SyntaxError, Value, ValueKind,
};
