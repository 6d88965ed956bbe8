//! 表示状態の適用
//!
//! 一致項目のみを対象に、`show_matches` に従って表示/非表示を揃える。
//! 不一致項目には一切触れない（ホスト側の他の表示制御を壊さない）。

use crate::document::HostDocument;
use crate::registry::ItemRegistry;

/// 列挙済み項目に表示設定を適用する
///
/// # Returns
/// 表示状態を設定した一致項目の数
pub fn apply<D: HostDocument>(document: &D, items: &[(D::Key, bool)], show_matches: bool) -> usize {
    items
        .iter()
        .filter(|(_, is_match)| *is_match)
        .filter(|(key, _)| document.set_item_visible(key, show_matches))
        .count()
}

/// レジストリ上の全一致項目に再適用する（設定変更時）
pub fn reapply_all<D: HostDocument>(
    document: &D,
    registry: &ItemRegistry<D::Key>,
    show_matches: bool,
) -> usize {
    registry
        .matched_keys()
        .iter()
        .filter(|key| document.set_item_visible(key, show_matches))
        .count()
}
