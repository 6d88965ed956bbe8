use crate::error::{FilterError, Result};
use housing_filter_common::rules::{DEFAULT_LABEL_PATTERNS, DEFAULT_TITLE_PATTERNS};
use housing_filter_common::{Classifier, RuleConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title_patterns: Vec<String>,
    pub label_patterns: Vec<String>,
    /// フレア（link_flair_text）もラベルルールで判定する
    pub use_flair: bool,
    /// グラフのY軸上限（%）
    pub chart_y_max: f64,
    pub default_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title_patterns: DEFAULT_TITLE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            label_patterns: DEFAULT_LABEL_PATTERNS.iter().map(|p| p.to_string()).collect(),
            use_flair: false,
            chart_y_max: 25.0,
            default_title: "Housing Posts on r/UIUC Over Time".into(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FilterError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("housing-filter").join("config.json"))
    }

    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            title_patterns: self.title_patterns.clone(),
            label_patterns: self.label_patterns.clone(),
        }
    }

    /// 設定のルールから分類器を作る（不正なパターンはここでエラー）
    pub fn classifier(&self) -> Result<Classifier> {
        Ok(Classifier::from_config(&self.rule_config())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("config.json");

        let config = Config {
            use_flair: true,
            chart_y_max: 40.0,
            ..Default::default()
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"title_patterns": ["dorm"]}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.title_patterns, vec!["dorm".to_string()]);
        assert_eq!(config.label_patterns.len(), DEFAULT_LABEL_PATTERNS.len());
        assert_eq!(config.chart_y_max, 25.0);
    }

    #[test]
    fn test_invalid_pattern_is_reported() {
        let config = Config {
            title_patterns: vec!["(broken".into()],
            ..Default::default()
        };
        assert!(matches!(config.classifier(), Err(FilterError::Common(_))));
    }
}
