use popcalc::calculator::Outcome;
use popcalc::domain::{Precision, Settings, SettingsPatch, Theme};
use popcalc::editor::KeyPress;
use popcalc::infrastructure::MemoryClipboard;
use popcalc::storage::{select_backend, BackendKind, SettingsStore};
use popcalc::{CalculatorSession, Config};
use tempfile::TempDir;

async fn open(config: &Config) -> CalculatorSession {
    let store = SettingsStore::new(select_backend(config));
    let mut session = CalculatorSession::new(store, Box::new(MemoryClipboard::new()));
    session.start().await;
    session
}

fn type_text(session: &mut CalculatorSession, text: &str) {
    for c in text.chars() {
        session.handle_key(KeyPress::Char(c));
    }
}

#[tokio::test]
async fn test_extension_storage_survives_restart() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        extension_storage: Some(dir.path().join("extension.json")),
        ..Config::default()
    };

    let mut session = open(&config).await;
    assert_eq!(*session.settings(), Settings::default());

    session.update_settings(SettingsPatch::precision(Precision::clamped(2)));
    session.update_settings(SettingsPatch::theme(Theme::Nord));
    type_text(&mut session, "10/3");
    assert_eq!(session.outcome(), &Outcome::Value("3.33".into()));
    session.handle_key(KeyPress::Enter);
    session.flush().await.expect("flush");
    drop(session);

    let session = open(&config).await;
    assert_eq!(session.settings().precision, Precision::clamped(2));
    assert_eq!(session.settings().theme, Theme::Nord);
    assert_eq!(session.history().len(), 1);
    let item = session.history().get(0).expect("entry");
    assert_eq!(item.expression, "10/3");
    assert_eq!(item.result, "3.33");
}

#[tokio::test]
async fn test_local_storage_writes_per_key_files() {
    let dir = TempDir::new().expect("tempdir");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    assert_eq!(select_backend(&config).kind(), BackendKind::Local);

    let mut session = open(&config).await;
    type_text(&mut session, "(1+2");
    assert_eq!(session.expression(), "(1+2)");
    session.add_to_history();
    session.update_settings(SettingsPatch::history_enabled(false));
    session.flush().await.expect("flush");

    let storage = dir.path().join("storage");
    assert!(storage.join("calculator_settings.json").is_file());
    assert!(storage.join("calculator_history.json").is_file());

    let mut session = open(&config).await;
    assert!(!session.settings().history_enabled);
    assert_eq!(session.history().len(), 1);

    session.clear_history();
    session.flush().await.expect("flush");
    assert!(!storage.join("calculator_history.json").exists());
}

#[tokio::test]
async fn test_corrupt_document_starts_with_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("extension.json");
    std::fs::write(&path, "{ broken").expect("write");
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        extension_storage: Some(path),
        ..Config::default()
    };

    let mut session = open(&config).await;
    assert!(session.phase().is_ready());
    assert!(session.history().is_empty());

    session.set_expression("2*21");
    assert_eq!(session.outcome(), &Outcome::Value("42".into()));
}
