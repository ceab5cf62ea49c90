//! Call outcomes and the help/usage signals.
//!
//! Asking for help and misusing a command are ordinary results of a call,
//! not errors: [`Outcome::Help`] and [`Outcome::Usage`] carry the node they
//! came from and the command names leading to it, so the caller can render
//! the matching help text.

use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::handler::Exit;
use crate::node::Node;

/// Error a command body returns to report misuse.
///
/// The call ends in [`Outcome::Usage`] instead of [`Outcome::Failed`].
#[derive(Debug, Error)]
#[error("{0}")]
pub struct UsageError(pub String);

impl UsageError {
    pub fn new(message: impl Into<String>) -> Self {
        UsageError(message.into())
    }
}

/// Error a command body returns to show its help text.
#[derive(Debug, Default, Error)]
#[error("help requested")]
pub struct HelpRequested;

/// The result of calling a node.
pub enum Outcome {
    /// The command ran; carries its exit code.
    Done(i32),
    /// The command ran and failed, or could not be set up.
    Failed(i32, anyhow::Error),
    /// Help was requested.
    Help(Help),
    /// The arguments did not fit the command.
    Usage(Usage),
}

impl Outcome {
    /// Maps the value returned by a command body to an outcome.
    pub fn from_exit(exit: Exit) -> Self {
        match exit.error {
            None => Outcome::Done(exit.code),
            Some(e) if e.downcast_ref::<HelpRequested>().is_some() => {
                Outcome::Help(Help::new().with_code(exit.code))
            }
            Some(e) if e.downcast_ref::<UsageError>().is_some() => {
                Outcome::Usage(Usage::new(e).with_code(exit.code))
            }
            Some(e) => Outcome::Failed(exit.code, e),
        }
    }

    /// Process exit status for this outcome.
    pub fn code(&self) -> i32 {
        match self {
            Outcome::Done(code) | Outcome::Failed(code, _) => *code,
            Outcome::Help(help) => help.code(),
            Outcome::Usage(usage) => usage.code(),
        }
    }

    /// Attaches `node` to a help or usage signal that has none yet, and
    /// prepends `name` to its command path.
    pub fn annotate(mut self, node: &Rc<dyn Node>, name: Option<&str>) -> Self {
        match &mut self {
            Outcome::Help(help) => help.annotate(node, name),
            Outcome::Usage(usage) => usage.annotate(node, name),
            Outcome::Done(_) | Outcome::Failed(..) => {}
        }
        self
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }

    pub fn is_help(&self) -> bool {
        matches!(self, Outcome::Help(_))
    }

    pub fn is_usage(&self) -> bool {
        matches!(self, Outcome::Usage(_))
    }

    /// The error carried by a failure or a usage signal.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Outcome::Failed(_, e) => Some(e),
            Outcome::Usage(usage) => Some(usage.error()),
            Outcome::Done(_) | Outcome::Help(_) => None,
        }
    }
}

impl fmt::Debug for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Done(code) => f.debug_tuple("Done").field(code).finish(),
            Outcome::Failed(code, e) => f.debug_tuple("Failed").field(code).field(e).finish(),
            Outcome::Help(help) => fmt::Debug::fmt(help, f),
            Outcome::Usage(usage) => fmt::Debug::fmt(usage, f),
        }
    }
}

/// Help was requested for a node.
#[derive(Clone, Default)]
pub struct Help {
    node: Option<Rc<dyn Node>>,
    path: Vec<String>,
    code: i32,
}

impl Help {
    /// Help with exit code 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn node(&self) -> Option<&Rc<dyn Node>> {
        self.node.as_ref()
    }

    /// Command names leading to the node, outermost first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    fn annotate(&mut self, node: &Rc<dyn Node>, name: Option<&str>) {
        annotate(&mut self.node, &mut self.path, node, name);
    }
}

impl fmt::Debug for Help {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Help")
            .field("path", &self.path)
            .field("code", &self.code)
            .field("annotated", &self.node.is_some())
            .finish()
    }
}

impl fmt::Display for Help {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_help(f, self.node.as_ref(), &self.path)
    }
}

/// A node was called with arguments it does not accept.
pub struct Usage {
    node: Option<Rc<dyn Node>>,
    path: Vec<String>,
    code: i32,
    error: anyhow::Error,
}

impl Usage {
    /// A usage signal with exit code 1.
    pub fn new(error: impl Into<anyhow::Error>) -> Self {
        Usage {
            node: None,
            path: Vec::new(),
            code: 1,
            error: error.into(),
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn node(&self) -> Option<&Rc<dyn Node>> {
        self.node.as_ref()
    }

    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn error(&self) -> &anyhow::Error {
        &self.error
    }

    fn annotate(&mut self, node: &Rc<dyn Node>, name: Option<&str>) {
        annotate(&mut self.node, &mut self.path, node, name);
    }
}

impl fmt::Debug for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Usage")
            .field("path", &self.path)
            .field("code", &self.code)
            .field("annotated", &self.node.is_some())
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_help(f, self.node.as_ref(), &self.path)?;
        write!(f, "\nError:\n  {:#}\n\n", self.error)
    }
}

fn annotate(
    slot: &mut Option<Rc<dyn Node>>,
    path: &mut Vec<String>,
    node: &Rc<dyn Node>,
    name: Option<&str>,
) {
    if slot.is_none() {
        *slot = Some(Rc::clone(node));
    }
    if let Some(name) = name {
        path.insert(0, name.to_string());
    }
}

fn write_help(
    f: &mut fmt::Formatter<'_>,
    node: Option<&Rc<dyn Node>>,
    path: &[String],
) -> fmt::Result {
    let Some(node) = node else {
        return Ok(());
    };
    write!(f, "\nUsage:\n  ")?;
    for name in path {
        write!(f, "{} ", name)?;
    }
    write!(f, "{}\n\n{}", node.usage(), node.description())
}
