//! 住宅関連投稿の判定
//!
//! タイトルとラベルをそれぞれのルール列で評価し、論理和を返す純粋関数。

use crate::error::Result;
use crate::rules::{RuleConfig, RuleSet};
use serde::Serialize;

/// ルールの適用対象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleTarget {
    Title,
    Label,
}

impl std::fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuleTarget::Title => write!(f, "title"),
            RuleTarget::Label => write!(f, "label"),
        }
    }
}

/// 一致したルール
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleHit {
    pub target: RuleTarget,
    pub pattern: String,
}

#[derive(Debug, Clone)]
pub struct Classifier {
    title_rules: RuleSet,
    label_rules: RuleSet,
}

impl Classifier {
    pub fn new(title_rules: RuleSet, label_rules: RuleSet) -> Self {
        Self {
            title_rules,
            label_rules,
        }
    }

    pub fn from_config(config: &RuleConfig) -> Result<Self> {
        Ok(Self::new(
            RuleSet::from_patterns(&config.title_patterns)?,
            RuleSet::from_patterns(&config.label_patterns)?,
        ))
    }

    /// タイトルまたはラベルがルールに一致するか
    ///
    /// 空のタイトル・空または無しのラベルは不一致扱い
    pub fn classify(&self, title: &str, label: Option<&str>) -> bool {
        if self.title_rules.any_match(title) {
            return true;
        }
        label.is_some_and(|l| self.label_rules.any_match(l))
    }

    /// 一致したルールの一覧（`classify` の根拠表示用）
    pub fn explain(&self, title: &str, label: Option<&str>) -> Vec<RuleHit> {
        let mut hits: Vec<RuleHit> = self
            .title_rules
            .matching(title)
            .map(|r| RuleHit {
                target: RuleTarget::Title,
                pattern: r.pattern().to_string(),
            })
            .collect();

        if let Some(label) = label {
            hits.extend(self.label_rules.matching(label).map(|r| RuleHit {
                target: RuleTarget::Label,
                pattern: r.pattern().to_string(),
            }));
        }

        hits
    }

    pub fn title_rules(&self) -> &RuleSet {
        &self.title_rules
    }

    pub fn label_rules(&self) -> &RuleSet {
        &self.label_rules
    }
}

lazy_static::lazy_static! {
    static ref HOUSING_CLASSIFIER: Classifier =
        Classifier::from_config(&RuleConfig::default()).unwrap();
}

/// 既定ルールの分類器
pub fn default_classifier() -> &'static Classifier {
    &HOUSING_CLASSIFIER
}

/// 既定ルールで判定
pub fn is_housing(title: &str, label: Option<&str>) -> bool {
    HOUSING_CLASSIFIER.classify(title, label)
}
