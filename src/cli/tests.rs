use super::*;
use clap::error::ErrorKind;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("cnab-arm").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_log_level_from_flags() {
    assert_eq!(parse(&["view"]).build_config().log_level.as_deref(), Some("info"));
    assert_eq!(parse(&["-q", "view"]).build_config().log_level.as_deref(), Some("error"));
    assert_eq!(parse(&["view", "--verbose"]).build_config().log_level.as_deref(), Some("debug"));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    let err = Cli::try_parse_from(["cnab-arm", "-v", "-q", "view"]).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn test_config_path_is_global() {
    let cli = parse(&["generate", "--config", "defaults.toml"]);
    assert_eq!(cli.build_config().config_path, Some(PathBuf::from("defaults.toml")));
}

#[test]
fn test_generate_defaults() {
    let cli = parse(&["generate"]);
    let Commands::Generate(cmd) = cli.command else {
        panic!("expected generate");
    };
    let debug = format!("{cmd:?}");
    assert!(debug.contains("bundle.json"));
    assert!(debug.contains("azuredeploy.json"));
    assert!(debug.contains("createUiDefinition.json"));
    assert!(debug.contains("timeout: 15"));
}

#[test]
fn test_include_resource_requires_customrp() {
    let err = Cli::try_parse_from(["cnab-arm", "generate", "--includeresource"]).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

    parse(&["generate", "--customrp", "--includeresource"]);
}

#[test]
fn test_timeout_range_is_validated() {
    for bad in ["4", "121", "soon"] {
        let err = Cli::try_parse_from(["cnab-arm", "generate", "--timeout", bad]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation, "timeout {bad}");
    }
    parse(&["generate", "--timeout", "120"]);
}

#[test]
fn test_deployment_requires_uri() {
    let err = Cli::try_parse_from(["cnab-arm", "deployment"]).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

    parse(&["deployment", "--uri", "https://example.io/azuredeploy.json", "-o", "-"]);
}

#[test]
fn test_managedapp_requires_uri() {
    let err = Cli::try_parse_from(["cnab-arm", "managedapp"]).err().unwrap();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

    parse(&["managedapp", "-u", "https://example.io/app.zip", "--indent"]);
}
