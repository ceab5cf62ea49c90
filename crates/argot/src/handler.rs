//! Handler-facing types.
//!
//! - [`Context`]: per-call information handed to commands that ask for it
//! - [`Extensions`]: type-keyed container for state injected by the caller
//! - [`IntoExit`]: what a command body may return
//!
//! # State Injection
//!
//! The caller of [`Node::call`](crate::Node::call) owns the context and can
//! put anything into its extensions. Commands built with
//! [`Command::with_context`](crate::Command::with_context) read it back:
//!
//! ```rust
//! use argot::{Command, Context, Env, Node};
//!
//! struct Database { url: String }
//!
//! let cmd = Command::with_context(|ctx: &Context, _: (), _: ()| {
//!     let db = ctx.extensions.get_required::<Database>()?;
//!     assert_eq!(db.url, "sqlite://memory");
//!     Ok::<(), anyhow::Error>(())
//! });
//!
//! let mut ctx = Context::default();
//! ctx.extensions.insert(Database { url: "sqlite://memory".into() });
//! let outcome = cmd.call(&mut ctx, Vec::new(), &Env::default());
//! assert_eq!(outcome.code(), 0);
//! ```

use std::any::{Any, TypeId};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Type-safe container for state injected into command bodies.
///
/// Cloning an `Extensions` yields an empty container, since the stored
/// values are not `Clone`. Share state through `Rc` when it must survive.
#[derive(Default)]
pub struct Extensions {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the one it replaced.
    pub fn insert<T: 'static>(&mut self, val: T) -> Option<T> {
        self.map
            .insert(TypeId::of::<T>(), Box::new(val))
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.map
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.map
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }

    /// Like [`get`](Self::get), but a missing value is an error.
    pub fn get_required<T: 'static>(&self) -> Result<&T, anyhow::Error> {
        self.get::<T>().ok_or_else(|| {
            anyhow::anyhow!(
                "extension missing: type {} not found in context",
                std::any::type_name::<T>()
            )
        })
    }

    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        self.map
            .remove(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast().ok().map(|b| *b))
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.map.len())
            .finish_non_exhaustive()
    }
}

impl Clone for Extensions {
    fn clone(&self) -> Self {
        Self::new()
    }
}

/// Per-call context.
///
/// Routers push the name of every command they pass through onto
/// `command_path` before calling it, and pop it afterwards.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Names of the commands entered so far, outermost first.
    pub command_path: Vec<String>,

    /// Canonical flag names whose environment fallback is off for this
    /// call, in addition to the ones the command itself ignores.
    pub ignore_env: BTreeSet<String>,

    pub extensions: Extensions,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns environment fallback off for `flag` during this call.
    pub fn ignore_env(mut self, flag: impl Into<String>) -> Self {
        self.ignore_env.insert(flag.into());
        self
    }
}

/// Exit status and error of a finished command body.
#[derive(Debug)]
pub struct Exit {
    pub code: i32,
    pub error: Option<anyhow::Error>,
}

impl Exit {
    pub fn success() -> Self {
        Exit {
            code: 0,
            error: None,
        }
    }

    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Exit {
            code: 1,
            error: Some(error.into()),
        }
    }
}

/// Return types accepted from command bodies.
///
/// | Return | Exit |
/// |--------|------|
/// | `()` | 0 |
/// | `i32` | the code |
/// | `Result<(), E>` | 0, or 1 with the error |
/// | `Result<i32, E>` | the code, or 1 with the error |
/// | `(i32, Option<E>)` | the code as given, with the error if any |
pub trait IntoExit {
    fn into_exit(self) -> Exit;
}

impl IntoExit for () {
    fn into_exit(self) -> Exit {
        Exit::success()
    }
}

impl IntoExit for i32 {
    fn into_exit(self) -> Exit {
        Exit {
            code: self,
            error: None,
        }
    }
}

impl IntoExit for Exit {
    fn into_exit(self) -> Exit {
        self
    }
}

impl<E: Into<anyhow::Error>> IntoExit for Result<(), E> {
    fn into_exit(self) -> Exit {
        match self {
            Ok(()) => Exit::success(),
            Err(e) => Exit::failure(e),
        }
    }
}

impl<E: Into<anyhow::Error>> IntoExit for Result<i32, E> {
    fn into_exit(self) -> Exit {
        match self {
            Ok(code) => code.into_exit(),
            Err(e) => Exit::failure(e),
        }
    }
}

impl<E: Into<anyhow::Error>> IntoExit for (i32, Option<E>) {
    fn into_exit(self) -> Exit {
        Exit {
            code: self.0,
            error: self.1.map(Into::into),
        }
    }
}
