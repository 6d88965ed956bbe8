//! ホストドキュメントの抽象
//!
//! エンジンは実際のDOMを知らず、識別キーで項目の表示状態を切り替える
//! 能力だけを要求する。

use std::fmt::Debug;
use std::hash::Hash;

pub trait HostDocument {
    /// 項目の識別キー
    type Key: Clone + Eq + Hash + Debug;

    /// 項目の表示状態を設定する
    ///
    /// 項目がもう存在しない場合は `false` を返す
    fn set_item_visible(&self, key: &Self::Key, visible: bool) -> bool;

    /// ページから外れた項目への参照を手放す（スキャンの終わりに呼ばれる）
    fn release_detached(&self) {}
}

/// 変更通知（サブツリーへのノード挿入）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationBatch {
    pub inserted_nodes: usize,
}

impl MutationBatch {
    pub fn inserted(count: usize) -> Self {
        Self {
            inserted_nodes: count,
        }
    }

    pub fn has_insertions(&self) -> bool {
        self.inserted_nodes > 0
    }
}
