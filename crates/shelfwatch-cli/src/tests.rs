use super::*;

#[test]
fn parses_ingest_command() {
    let cli = Cli::try_parse_from(["shelfwatch-cli", "ingest"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Ingest { json: false })));
}

#[test]
fn parses_ingest_json_flag() {
    let cli = Cli::try_parse_from(["shelfwatch-cli", "ingest", "--json"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Ingest { json: true })));
}

#[test]
fn parses_view_with_limit() {
    let cli = Cli::try_parse_from(["shelfwatch-cli", "view", "--limit", "5"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::View {
            json: false,
            limit: Some(5)
        })
    ));
}

#[test]
fn parses_analyze_command() {
    let cli = Cli::try_parse_from(["shelfwatch-cli", "analyze"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Analyze { json: false })));
}

#[test]
fn parses_schedule_command() {
    let cli = Cli::try_parse_from(["shelfwatch-cli", "schedule"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Schedule)));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["shelfwatch-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn rejects_non_numeric_limit() {
    assert!(Cli::try_parse_from(["shelfwatch-cli", "view", "--limit", "many"]).is_err());
}
