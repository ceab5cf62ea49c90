//! Tests for `#[derive(Options)]`: schema derivation and binding.

use std::time::Duration;

use argot::{
    BoxError, CommandSchema, ConfigError, OptionValues, Options, Scalar, ValueKind,
};

#[derive(Options, Debug, Default, PartialEq)]
struct Common {
    #[opt(flag = "-v,--verbose", help = "Enable verbose mode")]
    verbose: bool,

    #[opt(flag = "--timeout", help = "How long to wait", default = "1m")]
    timeout: Duration,
}

#[derive(Options, Debug, PartialEq)]
#[opt(help = "Deploy a service")]
struct Deploy {
    #[opt(flatten)]
    common: Common,

    #[opt(flag = "-n,--name", help = "Service name")]
    name: String,

    #[opt(flag = "-r,--replicas", default = "1")]
    replicas: u32,

    #[opt(flag = "-t,--tag", help = "Image tags")]
    tags: Vec<String>,

    #[opt(flag = "--region", default = "-", env = "DEPLOY_REGION")]
    region: Option<String>,

    #[opt(flag = "--token", env = "-", default = "-", hidden)]
    token: String,

    #[opt(skip)]
    attempts: usize,
}

#[test]
fn test_derived_fields_include_flattened() {
    let schema = CommandSchema::derive::<Deploy>().unwrap();
    let names: Vec<&str> = schema.fields().map(|f| f.canonical()).collect();
    assert_eq!(
        names,
        [
            "--help",
            "--name",
            "--region",
            "--replicas",
            "--tag",
            "--timeout",
            "--token",
            "--verbose"
        ]
    );

    let verbose = schema.get("--verbose").unwrap();
    assert_eq!(verbose.path, ["common", "verbose"]);
    assert_eq!(verbose.kind, ValueKind::Flag);
    assert_eq!(schema.about(), Some("Deploy a service"));
}

#[test]
fn test_field_metadata() {
    let schema = CommandSchema::derive::<Deploy>().unwrap();

    let name = schema.resolve("-n").unwrap();
    assert_eq!(name.canonical(), "--name");
    assert_eq!(name.env, ["NAME"]);
    assert!(name.is_required());

    let tags = schema.get("--tag").unwrap();
    assert_eq!(tags.kind, ValueKind::List);
    assert_eq!(tags.placeholder, "string...");
    assert!(!tags.is_required());

    let region = schema.get("--region").unwrap();
    assert_eq!(region.env, ["DEPLOY_REGION"]);
    assert!(!region.has_default());
    assert!(!region.is_required());

    let token = schema.get("--token").unwrap();
    assert!(token.hidden);
    assert!(token.env.is_empty());

    assert_eq!(schema.get("--timeout").unwrap().placeholder, "duration");
    assert_eq!(schema.get("--replicas").unwrap().placeholder, "u32");
}

#[test]
fn test_bind_full_record() {
    let values: OptionValues = [
        ("--name", "api"),
        ("--verbose", "true"),
        ("--timeout", "90s"),
        ("--replicas", "0x10"),
        ("--tag", "v1"),
        ("--tag", "latest"),
        ("--region", "eu-west-1"),
    ]
    .into_iter()
    .collect();

    let deploy = Deploy::bind(&values).unwrap();
    assert_eq!(
        deploy,
        Deploy {
            common: Common {
                verbose: true,
                timeout: Duration::from_secs(90),
            },
            name: "api".into(),
            replicas: 16,
            tags: vec!["v1".into(), "latest".into()],
            region: Some("eu-west-1".into()),
            token: String::new(),
            attempts: 0,
        }
    );
}

#[test]
fn test_bind_absent_fields_are_zero() {
    let deploy = Deploy::bind(&OptionValues::new()).unwrap();
    assert_eq!(deploy.common, Common::default());
    assert!(deploy.tags.is_empty());
    assert_eq!(deploy.region, None);
}

#[test]
fn test_bind_reports_option() {
    let values: OptionValues = [("--replicas", "many")].into_iter().collect();
    let err = Deploy::bind(&values).unwrap_err();
    assert_eq!(err.option, "--replicas");
    assert_eq!(err.to_string(), "decoding \"--replicas\"");
}

#[derive(Options)]
struct Clash {
    #[opt(flatten)]
    common: Common,

    #[opt(flag = "-v,--version")]
    version: bool,
}

#[test]
fn test_duplicate_flag_through_flatten() {
    let err = CommandSchema::derive::<Clash>().unwrap_err();
    assert_eq!(err, ConfigError::DuplicateFlag("-v".into()));
}

#[derive(Options)]
struct HelpClash {
    #[opt(flag = "-h,--host")]
    host: String,
}

#[test]
fn test_help_switch_is_reserved() {
    let err = CommandSchema::derive::<HelpClash>().unwrap_err();
    assert_eq!(err, ConfigError::DuplicateFlag("-h".into()));
}

#[derive(Debug, Default, PartialEq)]
enum Level {
    #[default]
    Low,
    High,
}

impl Scalar for Level {
    fn decode_text(text: &str) -> Result<Self, BoxError> {
        match text {
            "low" => Ok(Level::Low),
            "high" => Ok(Level::High),
            other => Err(format!("unknown level: {:?}", other).into()),
        }
    }
}

#[derive(Options)]
struct Tune {
    #[opt(flag = "-l,--level", default = "low")]
    level: Level,
}

#[test]
fn test_custom_scalar() {
    let schema = CommandSchema::derive::<Tune>().unwrap();
    assert_eq!(schema.get("--level").unwrap().placeholder, "level");

    let values: OptionValues = [("--level", "high")].into_iter().collect();
    assert_eq!(Tune::bind(&values).unwrap().level, Level::High);

    let values: OptionValues = [("--level", "max")].into_iter().collect();
    assert!(Tune::bind(&values).is_err());
}

#[derive(Options)]
struct Empty;

#[test]
fn test_unit_record() {
    let schema = CommandSchema::derive::<Empty>().unwrap();
    assert_eq!(schema.fields().count(), 1);
    assert!(Empty::bind(&OptionValues::new()).is_ok());
}
