//! Command sets: routing by sub-command name.
//!
//! A [`CommandSet`] maps names to child nodes. The first argument that is
//! not an option names the child to call; options may come before or after
//! it, so `tool sub -f=x` and `tool -f=x sub` reach `sub` with the same
//! arguments.
//!
//! ```rust
//! use argot::{Command, CommandSet, Context, Env, Node};
//!
//! let tool = CommandSet::new()
//!     .command("build", Command::new(|_: ()| {}).help("Build things"))
//!     .command("test", Command::new(|_: ()| 2).help("Run the tests"));
//!
//! let outcome = tool.call(&mut Context::new(), vec!["test".into()], &Env::new());
//! assert_eq!(outcome.code(), 2);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use anyhow::anyhow;
use thiserror::Error;

use crate::env::Env;
use crate::handler::Context;
use crate::help;
use crate::node::Node;
use crate::outcome::{Help, Outcome, Usage};
use crate::parse::{is_option, SEPARATOR};
use crate::schema::ConfigError;

/// Reserved entry name: describes the set itself and is never called.
pub const SELF_ENTRY: &str = "_";

/// An unknown command name close enough to a known one to suggest it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown command: {name:?}. Did you mean {suggestion:?}? Use --help to see all commands")]
pub struct UnknownCommand {
    pub name: String,
    pub suggestion: String,
}

/// Thresholds deciding when an unknown name gets a suggestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionPolicy {
    /// Names this short or shorter never get a suggestion.
    pub min_len: usize,
    /// Names this short or shorter must be within `short_distance` edits.
    pub short_len: usize,
    pub short_distance: usize,
    /// Longer names must differ by at most this share of the candidate.
    pub max_ratio: f64,
}

impl Default for SuggestionPolicy {
    fn default() -> Self {
        SuggestionPolicy {
            min_len: 1,
            short_len: 3,
            short_distance: 1,
            max_ratio: 0.3,
        }
    }
}

impl SuggestionPolicy {
    /// Never suggests anything.
    pub fn disabled() -> Self {
        SuggestionPolicy {
            min_len: usize::MAX,
            ..Self::default()
        }
    }

    /// Returns true when `input` is `distance` edits from `candidate` and
    /// that is close enough to suggest it.
    pub fn similar(&self, input: &str, candidate: &str, distance: usize) -> bool {
        let (a, b) = (input.chars().count(), candidate.chars().count());
        if a <= self.min_len || b <= self.min_len {
            return false;
        }
        if a <= self.short_len || b <= self.short_len {
            return distance <= self.short_distance;
        }
        distance as f64 / b as f64 <= self.max_ratio
    }
}

/// A router over named child nodes.
#[derive(Default, Clone)]
pub struct CommandSet {
    commands: BTreeMap<String, Rc<dyn Node>>,
    about: Option<String>,
    policy: SuggestionPolicy,
}

impl CommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `node` under `name`.
    ///
    /// The name `_` is reserved: a node registered there is never called,
    /// it only provides the summary of the set.
    pub fn command(self, name: impl Into<String>, node: impl Node + 'static) -> Self {
        self.shared(name, Rc::new(node))
    }

    /// Registers an already shared node under `name`.
    pub fn shared(mut self, name: impl Into<String>, node: Rc<dyn Node>) -> Self {
        let name = name.into();
        if name == SELF_ENTRY {
            self.about = Some(node.summary());
        }
        self.commands.insert(name, node);
        self
    }

    /// Sets the one-line summary of the set.
    pub fn about(mut self, text: impl Into<String>) -> Self {
        self.about = Some(text.into());
        self
    }

    pub fn suggestions(mut self, policy: SuggestionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn Node>> {
        self.commands.get(name).filter(|_| name != SELF_ENTRY)
    }

    /// Callable names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands
            .keys()
            .map(String::as_str)
            .filter(|name| *name != SELF_ENTRY)
    }

    fn closest(&self, name: &str) -> Option<(&str, usize)> {
        let mut best: Option<(&str, usize)> = None;
        for candidate in self.names() {
            let distance = strsim::levenshtein(name, candidate);
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((candidate, distance));
            }
        }
        best
    }

    fn unknown(&self, name: String) -> Outcome {
        if let Some((candidate, distance)) = self.closest(&name) {
            if self.policy.similar(&name, candidate, distance) {
                tracing::debug!(name = %name, suggestion = candidate, "unknown command");
                let err = UnknownCommand {
                    suggestion: candidate.to_string(),
                    name,
                };
                return Outcome::Failed(1, err.into());
            }
        }
        tracing::debug!(name = %name, "unknown command");
        Outcome::Usage(Usage::new(anyhow!("unknown command: {:?}", name)))
    }
}

/// Splits a leading help switch off `args`.
///
/// `--help=false` is removed without asking for help.
fn take_help(args: &mut Vec<String>) -> bool {
    let Some(first) = args.first() else {
        return false;
    };
    let (name, value) = match first.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (first.as_str(), None),
    };
    if name != "-h" && name != "--help" {
        return false;
    }
    let wants = value.map_or(true, |v| v == "true");
    args.remove(0);
    wants
}

/// Removes and returns the first argument naming a command.
fn take_name(args: &mut Vec<String>) -> Option<String> {
    let index = args
        .iter()
        .take_while(|arg| *arg != SEPARATOR)
        .position(|arg| !is_option(arg))?;
    Some(args.remove(index))
}

impl Node for CommandSet {
    fn configure(&self) -> Result<(), ConfigError> {
        for (name, node) in &self.commands {
            if name != SELF_ENTRY {
                node.configure()?;
            }
        }
        Ok(())
    }

    fn call(&self, ctx: &mut Context, mut args: Vec<String>, env: &Env) -> Outcome {
        if let Err(e) = self.configure() {
            return Outcome::Failed(1, e.into());
        }
        if take_help(&mut args) {
            return Outcome::Help(Help::new());
        }

        let Some(name) = take_name(&mut args) else {
            return Outcome::Usage(Usage::new(anyhow!("missing command")));
        };
        let Some(node) = self.get(&name).cloned() else {
            return self.unknown(name);
        };

        tracing::debug!(command = %name, "routing to command");
        ctx.command_path.push(name.clone());
        let outcome = node.call(ctx, args, env);
        ctx.command_path.pop();
        outcome.annotate(&node, Some(name.as_str()))
    }

    fn usage(&self) -> String {
        help::SET_USAGE.to_string()
    }

    fn description(&self) -> String {
        help::set_description(self.names().map(|name| {
            let summary = self
                .commands
                .get(name)
                .map(|node| node.summary())
                .unwrap_or_default();
            (name, summary)
        }))
    }

    fn summary(&self) -> String {
        self.about.clone().unwrap_or_default()
    }
}

impl fmt::Debug for CommandSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSet")
            .field("commands", &self.names().collect::<Vec<_>>())
            .field("about", &self.about)
            .field("policy", &self.policy)
            .finish()
    }
}
