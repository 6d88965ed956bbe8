//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use housing_filter::analyzer::{self, AnalyzeOptions};
use housing_filter::config::Config;
use housing_filter::error::FilterError;
use housing_filter::scanner;
use housing_filter_common::default_classifier;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// 存在しないパスをスキャンした場合
#[test]
fn test_scan_nonexistent_input() {
    let result = scanner::scan_archives(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, FilterError::FileNotFound(_)));
}

/// アーカイブのないフォルダをスキャンした場合
#[test]
fn test_scan_folder_without_archives() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    // 空の結果はエラーではない（NoArchiveFoundにするのは呼び出し側）
    let result = scanner::scan_archives(dir.path());
    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

/// 集計途中でファイルが消えた場合はIOエラー
#[test]
fn test_analyze_missing_file_is_io_error() {
    let missing = vec![PathBuf::from("/nonexistent/posts.ndjson")];
    let result = analyzer::analyze_archives(&missing, default_classifier(), AnalyzeOptions::default());
    assert!(matches!(result, Err(FilterError::Io(_))));
}

/// 不正なUTF-8を含む行があってもアーカイブ全体は失敗しない
#[test]
fn test_analyze_invalid_utf8_line_keeps_archive() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("posts.ndjson");

    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"{\"created_utc\": 1705276800, \"title\": \"Sublease available\"}\n");
    bytes.extend_from_slice(b"{\"created_utc\": 1705276800, \"title\": \"Caf\xff sublet\"}\n");
    bytes.extend_from_slice(b"{\"created_utc\": 1707523200, \"title\": \"CS 225 question\"}\n");
    std::fs::write(&path, bytes).unwrap();

    let report = analyzer::analyze_archives(&[path], default_classifier(), AnalyzeOptions::default())
        .expect("不正なバイトでIOエラーになった");

    assert_eq!(report.total_records, 3);
    assert_eq!(report.matched_records, 2);
    assert_eq!(report.skipped_records, 0);
    assert_eq!(report.buckets.len(), 2);
}

/// 壊れた設定ファイル
#[test]
fn test_broken_config_is_json_error() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, "{ not json").unwrap();

    let result = Config::load_from(&path);
    assert!(matches!(result, Err(FilterError::JsonParse(_))));
}

/// 不正な正規表現は設定エラーとして上がる
#[test]
fn test_invalid_label_pattern() {
    let config = Config {
        label_patterns: vec!["[unclosed".to_string()],
        ..Default::default()
    };

    let err = config.classifier().unwrap_err();
    let display = format!("{}", err);
    assert!(display.contains("[unclosed"), "パターンがメッセージに無い: {}", display);
}

/// FilterErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        FilterError::Config("テスト設定エラー".to_string()),
        FilterError::FileNotFound("posts.ndjson".to_string()),
        FilterError::NoArchiveFound("/path/to/folder".to_string()),
        FilterError::ExcelGeneration("Excel生成エラー".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: FilterError = io_err.into();

    assert!(matches!(err, FilterError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: FilterError = json_err.into();

    assert!(matches!(err, FilterError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラーなのでメッセージがそのまま表示される）
#[test]
fn test_common_error_transparent() {
    let common_err = housing_filter_common::Error::Storage("quota exceeded".to_string());
    let err: FilterError = common_err.into();

    assert!(matches!(err, FilterError::Common(_)));
    assert!(format!("{}", err).contains("quota exceeded"));
}
