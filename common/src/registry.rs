//! 分類済み項目のレジストリ
//!
//! 識別キーごとに判定結果を一度だけ記録し、
//! 繰り返しスキャンでの再分類・重複ログ出力を防ぐ。

use crate::classifier::Classifier;
use crate::types::{Classification, RawItem};
use std::collections::HashMap;
use std::hash::Hash;

/// 識別キーごとの記録
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryEntry {
    pub is_match: bool,
    pub logged_once: bool,
}

#[derive(Debug, Clone)]
pub struct ItemRegistry<K> {
    entries: HashMap<K, RegistryEntry>,
    /// 一致した順のキー（reapply用）
    matched: Vec<K>,
    logged: usize,
}

impl<K> Default for ItemRegistry<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            matched: Vec::new(),
            logged: 0,
        }
    }
}

impl<K> ItemRegistry<K>
where
    K: Clone + Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// 未登録なら分類して記録、登録済みなら記録値を返す
    pub fn classify_if_new(&mut self, classifier: &Classifier, item: &RawItem<K>) -> Classification {
        if let Some(entry) = self.entries.get(&item.identity_key) {
            return Classification {
                is_match: entry.is_match,
                already_logged: true,
            };
        }

        let is_match = classifier.classify(&item.title, item.label());
        self.entries.insert(
            item.identity_key.clone(),
            RegistryEntry {
                is_match,
                logged_once: true,
            },
        );

        if is_match {
            self.matched.push(item.identity_key.clone());
            self.logged += 1;
            tracing::info!(
                title = %item.title,
                label = item.label().unwrap_or(""),
                "housing item matched"
            );
        }

        Classification {
            is_match,
            already_logged: false,
        }
    }

    pub fn get(&self, key: &K) -> Option<RegistryEntry> {
        self.entries.get(key).copied()
    }

    /// 一致と判定された全キー
    pub fn matched_keys(&self) -> &[K] {
        &self.matched
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    /// 出力した診断ログの件数
    pub fn logged_count(&self) -> usize {
        self.logged
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
