//! End-to-end tests for command sets.

use std::cell::RefCell;
use std::rc::Rc;

use argot::{Command, CommandSet, Context, Env, Node, Options, Outcome, Program, SuggestionPolicy};

fn run(program: &Program, args: &[&str]) -> (i32, String) {
    let mut out = Vec::new();
    let argv = args.iter().map(|s| s.to_string()).collect();
    let code = program.call(argv, &Env::new(), &mut out);
    (code, String::from_utf8(out).unwrap())
}

fn recorder() -> (Rc<RefCell<Vec<String>>>, impl Fn(&'static str) -> Command) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let make = move |name: &'static str| {
        let s = Rc::clone(&s);
        Command::new(move |_: ()| s.borrow_mut().push(name.to_string()))
    };
    (seen, make)
}

#[test]
fn test_nested_routing() {
    let (seen, cmd) = recorder();
    let program = Program::new(
        "prog",
        CommandSet::new().command("help", cmd("help")).command(
            "do",
            CommandSet::new()
                .command("this", cmd("this"))
                .command("that", cmd("that")),
        ),
    );

    for args in [&["help"][..], &["do", "this"][..], &["do", "that"][..]] {
        assert_eq!(run(&program, args), (0, String::new()));
    }
    assert_eq!(*seen.borrow(), ["help", "this", "that"]);
}

#[derive(Options)]
struct Flag {
    #[opt(flag = "-f,--flag", default = "-")]
    value: String,
}

#[test]
fn test_option_before_and_after_command() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let program = Program::new(
        "prog",
        CommandSet::new().command(
            "sub",
            Command::new(move |c: Flag| s.borrow_mut().push(c.value)),
        ),
    );

    assert_eq!(run(&program, &["-f=hello", "sub"]).0, 0);
    assert_eq!(run(&program, &["sub", "-f=hello"]).0, 0);
    assert_eq!(*seen.borrow(), ["hello", "hello"]);
}

fn go_tool() -> CommandSet {
    let (_, cmd) = recorder();
    CommandSet::new().command("help", cmd("help")).command(
        "tool",
        CommandSet::new()
            .command("_", Command::new(|_: ()| {}).help("run specified go tool"))
            .command("cover", cmd("cover"))
            .command("doc", cmd("doc")),
    )
}

#[test]
fn test_set_help_lists_commands() {
    let program = Program::new("go", go_tool());
    assert_eq!(
        run(&program, &["--help"]),
        (
            0,
            "\nUsage:\n  go [command] [-h] [--help] ...\n\n\
             Commands:\n\
             \x20 help\n\
             \x20 tool  run specified go tool\n\
             \n\
             Options:\n\
             \x20 -h, --help  Show this help message\n\n"
                .to_string()
        )
    );
}

#[test]
fn test_missing_sub_command() {
    let program = Program::new("go", go_tool());
    assert_eq!(
        run(&program, &["tool"]),
        (
            1,
            "\nUsage:\n  go tool [command] [-h] [--help] ...\n\n\
             Commands:\n\
             \x20 cover\n\
             \x20 doc\n\
             \n\
             Options:\n\
             \x20 -h, --help  Show this help message\n\
             \nError:\n  missing command\n\n\n"
                .to_string()
        )
    );
}

#[test]
fn test_unknown_command_with_suggestion() {
    let program = Program::new("go", go_tool());
    let (code, out) = run(&program, &["tool", "dox"]);
    assert_eq!(code, 1);
    assert_eq!(
        out,
        "error: unknown command: \"dox\". Did you mean \"doc\"? Use --help to see all commands\n"
    );
}

#[test]
fn test_unknown_command_without_suggestion() {
    let program = Program::new("go", go_tool());
    let (code, out) = run(&program, &["tool", "generate"]);
    assert_eq!(code, 1);
    assert!(out.starts_with("\nUsage:\n  go tool [command]"));
    assert!(out.ends_with("Error:\n  unknown command: \"generate\"\n\n\n"));
}

#[test]
fn test_suggestions_can_be_disabled() {
    let set = CommandSet::new()
        .command("build", Command::new(|_: ()| {}))
        .suggestions(SuggestionPolicy::disabled());
    let outcome = set.call(&mut Context::new(), vec!["biuld".into()], &Env::new());
    assert!(outcome.is_usage());
}

#[test]
fn test_self_entry_is_not_a_command() {
    let program = Program::new("go", go_tool());
    let (code, out) = run(&program, &["tool", "_"]);
    assert_eq!(code, 1);
    assert!(out.ends_with("Error:\n  unknown command: \"_\"\n\n\n"));
}

#[derive(Options)]
#[opt(help = "Call this command")]
struct ThisConfig {
    #[opt(flag = "-p,--path", help = "Path to some file", default = "file", env = "-")]
    path: String,

    #[opt(flag = "-d,--debug", help = "Enable debug mode")]
    debug: bool,
}

#[derive(Options)]
#[opt(help = "Call that command")]
struct ThatConfig {
    #[opt(flag = "-n", help = "Number of things", default = "1")]
    count: i32,

    #[opt(flag = "-d,--debug", help = "Enable debug mode")]
    debug: bool,
}

fn this_and_that() -> CommandSet {
    CommandSet::new().command(
        "do",
        CommandSet::new()
            .command("this", Command::new(|_: ThisConfig| {}))
            .command("that", Command::new(|_: ThatConfig| {})),
    )
}

#[test]
fn test_nested_set_help_uses_record_summaries() {
    let outcome = this_and_that().call(
        &mut Context::new(),
        vec!["do".into(), "--help".into()],
        &Env::new(),
    );
    let Outcome::Help(help) = outcome else {
        panic!("expected help");
    };
    assert_eq!(help.path(), ["do"]);
    assert_eq!(
        help.to_string(),
        "\nUsage:\n  do [command] [-h] [--help] ...\n\n\
         Commands:\n\
         \x20 that  Call that command\n\
         \x20 this  Call this command\n\
         \n\
         Options:\n\
         \x20 -h, --help  Show this help message\n"
    );
}

#[test]
fn test_leaf_help_inside_nested_set() {
    let outcome = this_and_that().call(
        &mut Context::new(),
        vec!["do".into(), "this".into(), "-h".into()],
        &Env::new(),
    );
    assert!(outcome.is_help());
    assert_eq!(
        outcome.to_string_lossy(),
        "\nUsage:\n  do this [options]\n\n\
         Options:\n\
         \x20 -d, --debug        Enable debug mode\n\
         \x20 -h, --help         Show this help message\n\
         \x20 -p, --path string  Path to some file (default: file)\n"
    );
}

#[test]
fn test_context_path_during_call() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let leaf = Command::with_context(move |ctx: &Context, _: (), (): ()| {
        s.borrow_mut().push(ctx.command_path.join(" "));
    });
    let set = CommandSet::new().command("a", CommandSet::new().command("b", leaf));

    let mut ctx = Context::new();
    let outcome = set.call(&mut ctx, vec!["a".into(), "b".into()], &Env::new());
    assert!(outcome.is_done());
    assert_eq!(*seen.borrow(), ["a b"]);
    assert!(ctx.command_path.is_empty());
}

#[test]
fn test_shared_node() {
    let (seen, cmd) = recorder();
    let shared: Rc<dyn Node> = Rc::new(cmd("shared"));
    let set = CommandSet::new()
        .shared("one", Rc::clone(&shared))
        .shared("two", shared);

    for name in ["one", "two"] {
        let outcome = set.call(&mut Context::new(), vec![name.into()], &Env::new());
        assert!(outcome.is_done());
    }
    assert_eq!(*seen.borrow(), ["shared", "shared"]);
}

/// Renders help and usage signals the way `Program` prints them.
trait Rendered {
    fn to_string_lossy(&self) -> String;
}

impl Rendered for Outcome {
    fn to_string_lossy(&self) -> String {
        match self {
            Outcome::Help(help) => help.to_string(),
            Outcome::Usage(usage) => usage.to_string(),
            other => format!("{:?}", other),
        }
    }
}
