use highlight_export::load_config::{load_config, COOKIE_ENV};
use highlight_export_core::config::SourceConfig;
use highlight_export_core::store::TitleCollision;
use serial_test::serial;
use std::env;
use std::fs::write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn config_file(yaml: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), yaml).unwrap();
    file
}

/// A bookmate source picks up the session cookie from the environment.
#[tokio::test]
#[serial]
async fn test_load_config_injects_cookie_for_bookmate_source() {
    let file = config_file(
        r#"
source:
  type: bookmate
  per_page: 20
output:
  dir: ./tmp/quotes
"#,
    );
    env::set_var(COOKIE_ENV, "session=top-secret");

    let config = load_config(file.path()).expect("Config should load");

    match &config.export.source {
        SourceConfig::Bookmate(b) => {
            assert_eq!(b.base_url, "https://bookmate.ru");
            assert_eq!(b.per_page, 20);
        }
        SourceConfig::File(_) => panic!("Unexpected file source in this test"),
    }
    assert_eq!(config.export.output.dir, PathBuf::from("./tmp/quotes"));
    assert_eq!(config.export.output.on_title_collision, TitleCollision::SuffixId);
    assert_eq!(
        config.credentials.map(|c| c.cookie).as_deref(),
        Some("session=top-secret")
    );
}

/// A file source needs no secrets and defaults to the maximum page size.
#[tokio::test]
#[serial]
async fn test_load_config_file_source_without_env() {
    let file = config_file(
        r#"
source:
  type: file
  path: ./quotes.json
output:
  dir: ./out
  on_title_collision: overwrite
"#,
    );
    env::remove_var(COOKIE_ENV);

    let config = load_config(file.path()).expect("Config should load without cookie");
    match &config.export.source {
        SourceConfig::File(f) => {
            assert_eq!(f.path, PathBuf::from("./quotes.json"));
            assert_eq!(f.per_page, 50);
        }
        SourceConfig::Bookmate(_) => panic!("Unexpected bookmate source in this test"),
    }
    assert_eq!(config.export.output.on_title_collision, TitleCollision::Overwrite);
    assert!(config.credentials.is_none());
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_on_missing_cookie() {
    let file = config_file("source:\n  type: bookmate\noutput:\n  dir: ./out\n");
    env::remove_var(COOKIE_ENV);

    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(msg.contains(COOKIE_ENV), "Must error for missing env var, got: {msg}");
}

#[tokio::test]
#[serial]
async fn test_load_config_rejects_page_size_above_api_limit() {
    let file = config_file(
        "source:\n  type: file\n  path: q.json\n  per_page: 51\noutput:\n  dir: ./out\n",
    );

    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(msg.contains("per_page"), "Range error expected, got: {msg}");
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_invalid_file() {
    let file = config_file("not-yaml: [:::");

    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_unknown_source_type() {
    let file = config_file("source:\n  type: kindle\noutput:\n  dir: ./out\n");

    let msg = load_config(file.path()).unwrap_err().to_string();
    assert!(msg.contains("YAML"), "Parse error expected, got: {msg}");
}

#[tokio::test]
#[serial]
async fn test_load_config_errors_for_missing_file() {
    let msg = load_config("/no/such/config.yaml").unwrap_err().to_string();
    assert!(msg.contains("Failed to read config file"), "got: {msg}");
}
