//! Configuration tests
//!
//! These tests guard the config file format: every field written by
//! `to_toml()` must parse back through `FileConfig` with its value intact.

use super::analysis::MAX_BOOK_RESULTS;
use super::*;
use std::collections::HashMap;
use tracing::level_filters::LevelFilter;

fn no_env(_: &str) -> Option<String> {
    None
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that serialized config can be parsed back.
#[test]
fn test_config_roundtrip_default() {
    let config = Config::default();
    let toml_str = config.to_toml();

    let parsed: Result<FileConfig, _> = toml::from_str(&toml_str);
    assert!(
        parsed.is_ok(),
        "Default config should round-trip.\nTOML:\n{}\nError: {:?}",
        toml_str,
        parsed.err()
    );
}

/// Non-default values must survive serialization and resolution.
#[test]
fn test_config_roundtrip_preserves_values() {
    let mut config = Config::default();
    config.bind_addr = "0.0.0.0:9000".parse().unwrap();
    config.data_dir = PathBuf::from("/tmp/lang");
    config.max_passage_bytes = 4096;
    config.books.max_results = 2;
    config.books.timeout_secs = 7;
    config.summary.sentences = 2;
    config.summary.max_sentences = 50;
    config.language.stopwords = StopwordSource::Iso;
    config.language.stopwords_url = "http://mirror.example/stopwords.zip".to_string();
    config.logging.level = LevelFilter::DEBUG;
    config.logging.file.enabled = true;
    config.logging.file.rotation = LogRotation::Hourly;

    let file: FileConfig = toml::from_str(&config.to_toml()).expect("should parse");
    let resolved = Config::resolve(file, no_env).expect("should resolve");

    assert_eq!(resolved.bind_addr, config.bind_addr);
    assert_eq!(resolved.data_dir, config.data_dir);
    assert_eq!(resolved.max_passage_bytes, 4096);
    assert_eq!(resolved.books.max_results, 2);
    assert_eq!(resolved.books.timeout_secs, 7);
    assert_eq!(resolved.summary.sentences, 2);
    assert_eq!(resolved.summary.max_sentences, 50);
    assert_eq!(resolved.language.stopwords, StopwordSource::Iso);
    assert_eq!(resolved.language.stopwords_url, "http://mirror.example/stopwords.zip");
    assert_eq!(resolved.logging.level, LevelFilter::DEBUG);
    assert!(resolved.logging.file.enabled);
    assert_eq!(resolved.logging.file.rotation, LogRotation::Hourly);
}

/// Every section header must be present so users can discover the options.
#[test]
fn test_all_sections_have_toml_serialization() {
    let toml_str = Config::default().to_toml();

    for section in ["[books]", "[summary]", "[language]", "[logging]"] {
        assert!(
            toml_str.contains(section),
            "{} missing from TOML output!\nTOML output:\n{}",
            section,
            toml_str
        );
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_defaults_when_file_empty() {
    let config = Config::resolve(FileConfig::default(), no_env).unwrap();

    assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    assert_eq!(config.max_passage_bytes, DEFAULT_MAX_PASSAGE_BYTES);
    assert_eq!(config.books.max_results, 3);
    assert_eq!(config.summary.sentences, 3);
    assert_eq!(config.summary.max_sentences, 200);
    assert_eq!(config.language.stopwords, StopwordSource::Nltk);
    assert!(config.language.stopwords_url.ends_with("stopwords.zip"));
    assert_eq!(config.logging.level, LevelFilter::INFO);
    assert!(!config.logging.file.enabled);
}

#[test]
fn test_env_overrides_file() {
    let file: FileConfig = toml::from_str(
        r#"
bind_addr = "127.0.0.1:7000"
data_dir = "/from/file"

[books]
api_url = "http://file.example/books"
"#,
    )
    .unwrap();

    let env: HashMap<&str, &str> = [
        ("PASSAGE_LENS_BIND", "127.0.0.1:7100"),
        ("PASSAGE_LENS_BOOKS_API_URL", "http://env.example/books"),
    ]
    .into_iter()
    .collect();

    let config = Config::resolve(file, |k| env.get(k).map(|v| v.to_string())).unwrap();

    assert_eq!(config.bind_addr.port(), 7100);
    assert_eq!(config.books.api_url, "http://env.example/books");
    // Not overridden by env
    assert_eq!(config.data_dir, PathBuf::from("/from/file"));
}

#[test]
fn test_invalid_bind_addr_is_an_error() {
    let file = FileConfig {
        bind_addr: Some("not-an-address".to_string()),
        ..Default::default()
    };

    let err = Config::resolve(file, no_env).unwrap_err();
    assert!(err.to_string().contains("not-an-address"));
}

#[test]
fn test_unknown_enum_values_fall_back() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(StopwordSource::parse("klingon"), StopwordSource::Nltk);
    assert_eq!(StopwordSource::parse("ISO"), StopwordSource::Iso);
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_book_results_capped_at_three() {
    let file: FileConfig = toml::from_str("[books]\nmax_results = 25\n").unwrap();
    let config = Config::resolve(file, no_env).unwrap();
    assert_eq!(config.books.max_results, MAX_BOOK_RESULTS);

    let file: FileConfig = toml::from_str("[books]\nmax_results = 1\n").unwrap();
    let config = Config::resolve(file, no_env).unwrap();
    assert_eq!(config.books.max_results, 1);
}

#[test]
fn test_invalid_log_level_is_an_error() {
    let file: FileConfig = toml::from_str("[logging]\nlevel = \"chatty\"\n").unwrap();
    let err = Config::resolve(file, no_env).unwrap_err();
    assert!(err.to_string().contains("chatty"));
}

#[test]
fn test_log_level_is_case_insensitive() {
    let file: FileConfig = toml::from_str("[logging]\nlevel = \"WARN\"\n").unwrap();
    let config = Config::resolve(file, no_env).unwrap();
    assert_eq!(config.logging.level, LevelFilter::WARN);
}

#[test]
fn test_sentence_cap_never_zero() {
    let file: FileConfig = toml::from_str("[summary]\nmax_sentences = 0\n").unwrap();
    let config = Config::resolve(file, no_env).unwrap();
    assert_eq!(config.summary.max_sentences, 1);
}
