//! 判定ルール定義
//!
//! ルールは大文字小文字を区別しない部分一致の正規表現。
//! タイトル用とラベル（フレア）用の2系統を持ち、それぞれOR評価する。
//! `\d` `\w` `\b` はASCIIの意味で解釈する（`١BR` は間取り表記ではない）。

use crate::error::{Error, Result};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// タイトル用の既定パターン
pub const DEFAULT_TITLE_PATTERNS: &[&str] = &[
    // サブリース
    r"subleas",
    r"sublet",
    r"sublessee",
    // ルームメイト
    r"roommate",
    r"room\s*mate",
    // リース引き継ぎ
    r"lease\s*(takeover|take\s*over)",
    r"(takeover|take\s*over)\s*lease",
    r"relet",
    // 家賃表記（$500/month, $400/mo）
    r"\$\d+\s*/\s*(mo|month|m)\b",
    r"\$\d+\s*(per|a)\s*month",
    // 間取り（1BR, 2B2B, 1 bedroom）
    r"\dB\dB",
    r"\dBR\b",
    r"\d\s*bed(room)?s?\b",
    r"\dbd\b",
];

/// ラベル用の既定パターン
pub const DEFAULT_LABEL_PATTERNS: &[&str] = &["sublease", "housing", "roommate"];

/// 差し替え可能なルール設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleConfig {
    pub title_patterns: Vec<String>,
    pub label_patterns: Vec<String>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            title_patterns: DEFAULT_TITLE_PATTERNS.iter().map(|p| p.to_string()).collect(),
            label_patterns: DEFAULT_LABEL_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// 単一ルール
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    regex: Regex,
}

impl Rule {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&ascii_classes(pattern))
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// 数字・単語クラスと単語境界をASCII版に書き換える
///
/// `\s` や `\p{..}` などその他のエスケープはそのまま残す。
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    let mut in_class = false;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let Some(next) = chars.next() else {
                    out.push(c);
                    break;
                };
                let ascii = match (next, in_class) {
                    ('d', false) => Some("[0-9]"),
                    ('D', false) => Some("[^0-9]"),
                    ('w', false) => Some("[0-9A-Za-z_]"),
                    ('W', false) => Some("[^0-9A-Za-z_]"),
                    ('b', false) => Some("(?-u:\\b)"),
                    ('B', false) => Some("(?-u:\\B)"),
                    ('d', true) => Some("0-9"),
                    ('w', true) => Some("0-9A-Za-z_"),
                    _ => None,
                };
                match ascii {
                    Some(replacement) => out.push_str(replacement),
                    None => {
                        out.push(c);
                        out.push(next);
                    }
                }
            }
            '[' if !in_class => {
                in_class = true;
                out.push(c);
            }
            ']' if in_class => {
                in_class = false;
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// 順序付きルール列（OR評価）
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn from_patterns<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let rules = patterns
            .into_iter()
            .map(|p| Rule::new(p.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// いずれかのルールに一致するか（空文字列は常に不一致）
    pub fn any_match(&self, text: &str) -> bool {
        !text.is_empty() && self.rules.iter().any(|r| r.is_match(text))
    }

    /// 一致したルールを順に返す
    pub fn matching<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules
            .iter()
            .filter(move |r| !text.is_empty() && r.is_match(text))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
