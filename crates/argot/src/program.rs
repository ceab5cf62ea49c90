//! Program entry point.
//!
//! [`Program`] names the root of a command tree, runs it against the
//! process arguments and environment, prints help, usage and errors, and
//! turns the outcome into an exit status.
//!
//! ```rust,no_run
//! use argot::{Command, Program};
//!
//! fn main() {
//!     Program::new("hello", Command::new(|_: ()| println!("hello"))).exec()
//! }
//! ```

use std::io::{self, Write};
use std::rc::Rc;

use heck::ToShoutySnakeCase;

use crate::env::Env;
use crate::handler::Context;
use crate::node::Node;
use crate::outcome::Outcome;

/// A named command tree.
#[derive(Clone)]
pub struct Program {
    name: String,
    root: Rc<dyn Node>,
}

impl Program {
    pub fn new(name: impl Into<String>, root: impl Node + 'static) -> Self {
        Self::shared(name, Rc::new(root))
    }

    pub fn shared(name: impl Into<String>, root: Rc<dyn Node>) -> Self {
        Program {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Rc<dyn Node> {
        &self.root
    }

    /// Prefix of the environment variables read by the program, e.g.
    /// `MY_TOOL_` for a program named `my-tool`.
    ///
    /// Empty when the name has no letters or digits, so nothing is
    /// filtered out.
    pub fn env_prefix(&self) -> String {
        let name = self.name.to_shouty_snake_case();
        if name.is_empty() {
            return name;
        }
        format!("{}_", name)
    }

    /// Captures the process environment variables carrying the program's
    /// prefix, with the prefix removed.
    pub fn environ(&self) -> Env {
        Env::from_process().capture(&self.env_prefix())
    }

    /// Runs the tree and annotates signals with the program name.
    pub fn run(&self, ctx: &mut Context, args: Vec<String>, env: &Env) -> Outcome {
        self.root
            .call(ctx, args, env)
            .annotate(&self.root, Some(self.name.as_str()))
    }

    /// Runs the tree, reports the outcome to `sink` and returns the exit
    /// status.
    ///
    /// A failure always exits with 1, even when the body paired its error
    /// with another code.
    pub fn call(&self, args: Vec<String>, env: &Env, sink: &mut dyn Write) -> i32 {
        let outcome = self.run(&mut Context::new(), args, env);

        let (code, written) = match &outcome {
            Outcome::Done(code) => (*code, Ok(())),
            Outcome::Help(help) => (help.code(), writeln!(sink, "{}", help)),
            Outcome::Usage(usage) => (usage.code(), writeln!(sink, "{}", usage)),
            Outcome::Failed(code, err) => {
                tracing::error!(
                    program = %self.name,
                    code,
                    error = %format!("{:#}", err),
                    "command failed"
                );
                (1, writeln!(sink, "error: {:#}", err))
            }
        };
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write command output");
        }
        code
    }

    /// Runs the tree with the process arguments and environment, reports to
    /// standard error and exits.
    pub fn exec(&self) -> ! {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let env = self.environ();
        let code = self.call(args, &env, &mut io::stderr());
        std::process::exit(code)
    }
}

/// Runs `root` as a program named after the executable.
pub fn exec(root: impl Node + 'static) -> ! {
    let name = std::env::args()
        .next()
        .as_deref()
        .map(program_name)
        .unwrap_or_default();
    Program::new(name, root).exec()
}

/// Base name of an executable path.
fn program_name(path: &str) -> String {
    std::path::Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}
