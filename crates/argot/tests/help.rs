//! Help and usage text.
//!
//! The layout is checked exactly: it is what users read, and column
//! alignment breaks silently.

use argot::{Command, CommandSet, Context, Env, Node, Options, Program};
use insta::assert_snapshot;

fn run(program: &Program, args: &[&str]) -> (i32, String) {
    let mut out = Vec::new();
    let argv = args.iter().map(|s| s.to_string()).collect();
    let code = program.call(argv, &Env::new(), &mut out);
    (code, String::from_utf8(out).unwrap())
}

#[derive(Options)]
struct DoConfig {
    #[opt(flag = "--path", help = "Path to some file", default = "file", env = "-")]
    path: String,

    #[opt(flag = "-d,--debug", help = "Enable debug mode")]
    debug: bool,
}

#[test]
fn test_command_help() {
    let program = Program::new(
        "prog",
        CommandSet::new().command("do", Command::new(|_: DoConfig| {})),
    );
    assert_eq!(
        run(&program, &["do", "-h"]),
        (
            0,
            "\nUsage:\n  prog do [options]\n\n\
             Options:\n\
             \x20 -d, --debug        Enable debug mode\n\
             \x20 -h, --help         Show this help message\n\
             \x20     --path string  Path to some file (default: file)\n\n"
                .to_string()
        )
    );
}

#[derive(Options)]
struct CountConfig {
    #[opt(flag = "-n", help = "Number of things", default = "1")]
    count: i64,

    #[opt(flag = "-d,--debug", help = "Enable debug mode")]
    debug: bool,
}

#[test]
fn test_decode_error_usage() {
    let program = Program::new(
        "prog",
        CommandSet::new().command("do", Command::new(|_: CountConfig| {})),
    );
    assert_eq!(
        run(&program, &["do", "-n", "abc"]),
        (
            1,
            "\nUsage:\n  prog do [options]\n\n\
             Options:\n\
             \x20 -d, --debug  Enable debug mode\n\
             \x20 -h, --help   Show this help message\n\
             \x20 -n i64       Number of things (default: 1)\n\
             \nError:\n  decoding \"-n\": parsing \"abc\": invalid syntax\n\n\n"
                .to_string()
        )
    );
}

#[test]
fn test_help_after_positionals() {
    let cmd = Command::with_args(|_: (), _: (String, Option<u32>)| {});
    let outcome = cmd.call(
        &mut Context::new(),
        vec!["a".into(), "--help".into()],
        &Env::new(),
    );
    assert!(outcome.is_help());
}

#[derive(Options)]
#[opt(help = "Copy files between hosts")]
struct CopyConfig {
    #[opt(flag = "-r,--recursive", help = "Copy directories recursively")]
    recursive: bool,

    #[opt(flag = "-P,--port", help = "Port to connect to", default = "22")]
    port: u16,

    #[opt(flag = "-i,--identity", help = "Identity file", default = "-")]
    identity: Option<std::path::PathBuf>,

    #[opt(flag = "-o", help = "Extra ssh options")]
    ssh_options: Vec<String>,

    #[opt(flag = "--bwlimit", help = "Bandwidth limit", default = "-", hidden)]
    limit: u64,

    #[opt(flag = "-v,-vv,--verbose", help = "Enable verbose output")]
    verbose: bool,
}

fn copy() -> Command {
    Command::with_args(|_: CopyConfig, _: (String, Vec<String>)| {})
        .help("Copy files")
        .describe("Copies files between hosts over ssh.\nPaths may be local or remote.")
}

#[test]
fn test_copy_usage_line() {
    assert_eq!(copy().usage(), "[options] [string] [string...]");
    assert_eq!(copy().summary(), "Copy files between hosts");
}

#[test]
fn test_copy_description() {
    assert_snapshot!("copy_description", copy().description());
}

#[test]
fn test_tool_listing() {
    let tool = CommandSet::new()
        .command("_", Command::new(|_: ()| {}).help("Move data around"))
        .command("copy", copy())
        .command("sync", Command::new(|_: ()| {}).help("Synchronize two trees"))
        .command("ls", Command::new(|_: ()| {}))
        .command("remove", Command::new(|_: ()| {}).help("Delete files"))
        .command("remote", CommandSet::new().about("Manage remote hosts"));

    assert_eq!(tool.summary(), "Move data around");
    assert_snapshot!("tool_listing", tool.description());
}

#[test]
fn test_usage_override() {
    let cmd = Command::variadic(|_: (), (): (), _: Vec<String>| {})
        .synopsis("[options] -- cmd [args...]");
    assert_eq!(cmd.usage(), "[options] -- cmd [args...]");

    let cmd = Command::variadic(|_: (), (_,): (String,), _: Vec<String>| {});
    assert_eq!(cmd.usage(), "[options] [string] -- [command]");
}
