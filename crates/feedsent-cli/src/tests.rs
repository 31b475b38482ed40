use clap::Parser;
use feedsent_core::SentimentLabel;
use feedsent_sentiment::StageTrace;

use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["feedsent-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["feedsent-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["feedsent-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_predict_with_emoji() {
    let cli = Cli::try_parse_from(["feedsent-cli", "predict", "Bien 👍"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Predict { ref comment, trace: false }) if comment == "Bien 👍"
    ));
}

#[test]
fn parses_predict_trace_flag() {
    let cli = Cli::try_parse_from(["feedsent-cli", "predict", "--trace", "ok"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Predict { trace: true, .. })
    ));
}

#[test]
fn predict_requires_a_comment() {
    assert!(Cli::try_parse_from(["feedsent-cli", "predict"]).is_err());
}

#[test]
fn parses_report_filters() {
    let cli = Cli::try_parse_from([
        "feedsent-cli",
        "report",
        "--language",
        "en,fr",
        "--sentiment",
        "positive",
        "--sentiment",
        "Negative",
        "--rating-min",
        "2",
        "--from",
        "2024-06-01",
    ])
    .unwrap();

    let Some(Commands::Report(args)) = cli.command else {
        panic!("expected report command");
    };
    assert_eq!(args.language, ["en", "fr"]);
    assert_eq!(
        args.sentiment,
        [SentimentLabel::Positive, SentimentLabel::Negative]
    );
    assert_eq!(args.rating_min, Some(2.0));
    assert!(args.rating_max.is_none());
    assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 6, 1));
}

#[test]
fn report_rejects_unknown_sentiment() {
    let err = Cli::try_parse_from(["feedsent-cli", "report", "--sentiment", "furious"]).unwrap_err();
    assert!(err.to_string().contains("furious"));
}

#[test]
fn report_rejects_malformed_date() {
    assert!(Cli::try_parse_from(["feedsent-cli", "report", "--to", "06/01/2024"]).is_err());
}

#[test]
fn trace_output_lists_every_stage() {
    let stages = StageTrace {
        emoji_score: 0.6447,
        emoji_sentiment: SentimentLabel::Positive,
        normalized: "Bien".to_string(),
        translated: "Good".to_string(),
        text_sentiment: SentimentLabel::Positive,
        combined: SentimentLabel::Positive,
        model_sentiment: SentimentLabel::Neutral,
        sentiment: SentimentLabel::Positive,
    };
    let out = predict::render_trace(&stages);
    assert!(out.contains("translated:      \"Good\""));
    assert!(out.contains("model:           neutral"));
    assert!(out.ends_with("final:           positive\n"));
}
