//! The command tree.

use crate::env::Env;
use crate::handler::Context;
use crate::outcome::Outcome;
use crate::schema::ConfigError;

/// A node of the command tree: a [`Command`](crate::Command) leaf or a
/// [`CommandSet`](crate::CommandSet) router.
///
/// Nodes are shared through `Rc<dyn Node>`; the node holding that `Rc`
/// annotates [`Outcome::Help`] and [`Outcome::Usage`] signals with it.
pub trait Node {
    /// Derives and checks everything the node needs to run.
    ///
    /// Runs at most once per node; later calls return the cached result.
    /// [`call`](Node::call) configures on demand, so calling this directly
    /// only surfaces definition errors early, typically from a test.
    fn configure(&self) -> Result<(), ConfigError>;

    /// Runs the node with the arguments following its name.
    fn call(&self, ctx: &mut Context, args: Vec<String>, env: &Env) -> Outcome;

    /// The synopsis shown after the command names, e.g. `[options] [path]`.
    fn usage(&self) -> String;

    /// The body of the help text: options table or command listing.
    fn description(&self) -> String;

    /// One-line summary shown next to the node's name in a listing.
    fn summary(&self) -> String;
}
