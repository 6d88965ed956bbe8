//! 表示設定（一致項目を表示するか）
//!
//! 永続化はキー・バリューストアに委譲する。値は文字列 `"true"` のみ真、
//! それ以外または未設定は偽。

use crate::error::Result;
use std::collections::HashMap;

/// 設定を保存するキー
pub const SHOW_MATCHES_KEY: &str = "housingFilter.showMatches";

/// 文字列キー・バリューストア（ブラウザの localStorage 等）
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// メモリ上のストア
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// `set` の呼び出し回数
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct PreferenceStore<S> {
    store: S,
    show_matches: bool,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// ストアから読み込む（既定値は `false`）
    pub fn load(store: S) -> Self {
        let show_matches = store.get(SHOW_MATCHES_KEY).as_deref() == Some("true");
        Self {
            store,
            show_matches,
        }
    }

    pub fn show_matches(&self) -> bool {
        self.show_matches
    }

    /// 設定を変更して即座に保存する
    ///
    /// 保存に失敗してもメモリ上の値は変更する。
    ///
    /// # Returns
    /// 値が変わった場合 `true`
    pub fn set_show_matches(&mut self, show: bool) -> bool {
        if self.show_matches == show {
            return false;
        }
        self.show_matches = show;

        let value = if show { "true" } else { "false" };
        if let Err(e) = self.store.set(SHOW_MATCHES_KEY, value) {
            tracing::warn!(error = %e, "failed to persist preference");
        }
        true
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
