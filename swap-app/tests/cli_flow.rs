use std::path::{Path, PathBuf};

use clap::Parser;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use swap_app::app::App;
use swap_app::cli::Cli;
use swap_app::commands::dispatch;
use swap_app::config::AppConfig;
use swap_app::state::AppState;
use swap_core::db::DbConfig;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn sqlite_config(dir: &TempDir) -> AppConfig {
    AppConfig {
        database: DbConfig {
            backend: "sqlite".to_string(),
            connection_string: dir.path().join("flatswaps.db").display().to_string(),
        },
        export_dir: dir.path().join("exports"),
        state_file: dir.path().join("state.json"),
        ..AppConfig::default()
    }
}

async fn run(
    app: &App,
    state: &mut AppState,
    args: &[&str],
) -> anyhow::Result<String> {
    let cli = Cli::try_parse_from(std::iter::once("flatswaps").chain(args.iter().copied()))?;
    let mut out = Vec::new();
    dispatch(cli.command, app, state, &mut out).await?;
    Ok(String::from_utf8(out)?)
}

#[test]
fn config_fixture_loads() {
    let config = AppConfig::load(Some(&fixture("config.toml"))).unwrap();

    assert_eq!(config.database.backend, "memory");
    assert_eq!(config.platform_fee_percentage, Some(dec!(5.0)));
    assert_eq!(config.log_level, "warn");
}

#[tokio::test]
async fn pricing_uses_configured_fee() {
    let config = AppConfig::load(Some(&fixture("config.toml"))).unwrap();
    let app = App::open(config).await.unwrap();

    let text = run(&app, &mut AppState::default(), &["pricing", "--rent1", "1,200", "--rent2", "950"])
        .await
        .unwrap();

    assert!(text.starts_with("Platform fee: 5%"));
    assert!(text.contains("Total monthly: €1260.00"));
    assert!(text.contains("Total monthly: €997.50"));
}

#[tokio::test]
async fn exported_and_saved_contract_appears_on_dashboard() {
    let dir = TempDir::new().unwrap();
    let app = App::open(sqlite_config(&dir)).await.unwrap();
    let mut state = AppState::default();
    let answers = fixture("answers.toml").display().to_string();

    let text = run(&app, &mut state, &["contract", "--answers", &answers, "--export", "--save"])
        .await
        .unwrap();

    assert!(text.contains("Carlos Gomez"));
    assert!(text.contains("exported to"));
    assert!(text.contains("(pending)"));
    let exported: Vec<_> = std::fs::read_dir(dir.path().join("exports")).unwrap().collect();
    assert_eq!(exported.len(), 1);

    let dashboard = run(&app, &mut state, &["dashboard"]).await.unwrap();
    assert!(dashboard.starts_with("Alex Johnson"));
    assert!(dashboard.contains("Contracts (1)"));
    assert!(dashboard.contains("with Carlos Gomez [pending]"));
}

#[tokio::test]
async fn incomplete_answers_save_nothing() {
    let dir = TempDir::new().unwrap();
    let app = App::open(sqlite_config(&dir)).await.unwrap();
    let answers = dir.path().join("answers.toml");
    std::fs::write(&answers, "conversation_id = \"2\"\n").unwrap();

    let err = run(
        &app,
        &mut AppState::default(),
        &["contract", "--answers", &answers.display().to_string(), "--save"],
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("step 3"));
    assert!(app.repo.list_contracts("currentUser").await.unwrap().is_empty());
}

#[tokio::test]
async fn seeded_inbox_and_reading_a_conversation() {
    let dir = TempDir::new().unwrap();
    let app = App::open(sqlite_config(&dir)).await.unwrap();
    let mut state = AppState::default();

    let inbox = run(&app, &mut state, &["messages"]).await.unwrap();
    assert!(inbox.starts_with("2 conversations, 2 unread"));

    let conversation = run(&app, &mut state, &["messages", "--conversation", "1", "--send", "See you in June!"])
        .await
        .unwrap();
    assert!(conversation.starts_with("Conversation with Carlos Gomez"));
    assert!(conversation.contains("You: See you in June!"));

    let inbox = run(&app, &mut state, &["messages"]).await.unwrap();
    assert!(inbox.starts_with("2 conversations, 1 unread"));
}

#[tokio::test]
async fn checklist_progress_persists_through_state_file() {
    let dir = TempDir::new().unwrap();
    let config = sqlite_config(&dir);
    let app = App::open(config.clone()).await.unwrap();
    let mut state = AppState::load(&config.state_file).unwrap();

    run(&app, &mut state, &["checklist", "--toggle", "visa", "passport"]).await.unwrap();
    state.save(&config.state_file).unwrap();

    let mut reloaded = AppState::load(&config.state_file).unwrap();
    let text = run(&app, &mut reloaded, &["checklist", "--urgent"]).await.unwrap();
    assert!(text.contains("[x] Apply for student visa/permits"));
    assert!(text.contains("[ ]"));
}
