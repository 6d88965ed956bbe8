//! パイプラインで受け渡す型
//!
//! - RawItem: ロケータが列挙した候補項目
//! - Classification: レジストリの判定結果
//! - ScanReport: 1回のスキャンの結果

use serde::Serialize;

/// ロケータが抽出した未分類の項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem<K> {
    /// 再スキャンをまたいで安定な識別キー
    pub identity_key: K,
    pub title: String,
    pub label: Option<String>,
}

impl<K> RawItem<K> {
    pub fn new(identity_key: K, title: impl Into<String>) -> Self {
        Self {
            identity_key,
            title: title.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.is_empty() { None } else { Some(label) };
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// `classify_if_new` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_match: bool,
    /// 同じキーが既に分類済み（診断ログ出力済み）
    pub already_logged: bool,
}

/// 新たに一致した項目（診断出力用）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedItem {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl std::fmt::Display for MatchedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{} [{}]", self.title, label),
            None => write!(f, "{}", self.title),
        }
    }
}

/// スキャン1回分の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// 列挙された項目数
    pub enumerated: usize,
    /// 今回初めて分類された項目数
    pub newly_classified: usize,
    /// 今回初めて一致した項目
    pub newly_matched: Vec<MatchedItem>,
    /// 表示状態を適用した一致項目数
    pub applied: usize,
}

impl ScanReport {
    pub fn merge(&mut self, other: ScanReport) {
        self.enumerated += other.enumerated;
        self.newly_classified += other.newly_classified;
        self.newly_matched.extend(other.newly_matched);
        self.applied += other.applied;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_label_is_none() {
        let item = RawItem::new(1u32, "Sublet").with_label("");
        assert_eq!(item.label(), None);
    }

    #[test]
    fn test_matched_item_display() {
        let with_label = MatchedItem {
            title: "Sublet 1BR".to_string(),
            label: Some("Housing".to_string()),
        };
        assert_eq!(with_label.to_string(), "Sublet 1BR [Housing]");

        let without = MatchedItem {
            title: "Roommate wanted".to_string(),
            label: None,
        };
        assert_eq!(without.to_string(), "Roommate wanted");
    }

    #[test]
    fn test_scan_report_merge() {
        let mut a = ScanReport {
            enumerated: 2,
            newly_classified: 2,
            newly_matched: vec![],
            applied: 1,
        };
        a.merge(ScanReport {
            enumerated: 3,
            newly_classified: 1,
            newly_matched: vec![MatchedItem {
                title: "x".into(),
                label: None,
            }],
            applied: 2,
        });
        assert_eq!(a.enumerated, 5);
        assert_eq!(a.newly_classified, 3);
        assert_eq!(a.newly_matched.len(), 1);
        assert_eq!(a.applied, 3);
    }
}
