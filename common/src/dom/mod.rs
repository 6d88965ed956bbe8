//! DOMベースのホストドキュメント
//!
//! `DomElement` はブラウザ（web-sys）とメモリ上のツリー（`memory`）の
//! 両方で実装される最小限の要素操作。

pub mod memory;

use crate::document::HostDocument;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// 識別属性が無い要素に付与する属性名
pub const GENERATED_KEY_ATTR: &str = "data-housing-key";

/// 要素（またはシャドウルート）への最小限の操作
pub trait DomElement: Clone {
    /// 子孫からセレクタに一致する要素をドキュメント順に返す（シャドウ境界は越えない）
    fn query_selector_all(&self, selectors: &str) -> Vec<Self>;

    fn query_selector(&self, selectors: &str) -> Option<Self> {
        self.query_selector_all(selectors).into_iter().next()
    }

    fn text_content(&self) -> String;

    fn attribute(&self, name: &str) -> Option<String>;

    fn set_attribute(&self, name: &str, value: &str);

    /// 開いているシャドウルート
    fn shadow_root(&self) -> Option<Self>;

    /// `true` で非表示、`false` で既定の表示に戻す
    fn set_hidden(&self, hidden: bool);

    fn is_connected(&self) -> bool;

    /// 同一ノードか（ラッパーが別でも同じ実体なら `true`）
    fn is_same_node(&self, other: &Self) -> bool;
}

/// ホストのテンプレート種別（優先順）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateVariant {
    Modern,
    Legacy,
}

impl TemplateVariant {
    /// スキャン時の試行順
    pub const PRIORITY: [TemplateVariant; 2] = [TemplateVariant::Modern, TemplateVariant::Legacy];

    pub fn item_selectors(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => r#"shreddit-post, [data-testid="post-container"], article"#,
            TemplateVariant::Legacy => ".thing.link",
        }
    }

    pub fn title_selectors(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => {
                r#"a[slot="title"], [data-testid="post-title"], h3, [slot="title"]"#
            }
            TemplateVariant::Legacy => "a.title",
        }
    }

    /// 要素内にタイトルが無い場合に参照する属性
    pub fn title_attribute(&self) -> Option<&'static str> {
        match self {
            TemplateVariant::Modern => Some("post-title"),
            TemplateVariant::Legacy => None,
        }
    }

    pub fn label_selectors(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => r#"shreddit-post-flair, [slot="post-flair"], flair-pill"#,
            TemplateVariant::Legacy => ".linkflairlabel",
        }
    }

    /// ラベル要素のテキストが空の場合に参照する属性
    pub fn label_attribute(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => "flair-text",
            TemplateVariant::Legacy => "title",
        }
    }

    /// ラベル要素が無い場合に項目要素自体から読む属性
    pub fn item_label_attribute(&self) -> Option<&'static str> {
        match self {
            TemplateVariant::Modern => Some("flair-text"),
            TemplateVariant::Legacy => None,
        }
    }

    /// 識別キーに使う属性（優先順）
    pub fn identity_attributes(&self) -> &'static [&'static str] {
        match self {
            TemplateVariant::Modern => &["id", "data-fullname"],
            TemplateVariant::Legacy => &["data-fullname", "id"],
        }
    }

    /// トグルを挿入するアンカー
    pub fn anchor_selectors(&self) -> &'static str {
        match self {
            TemplateVariant::Modern => {
                r#"[data-testid="subreddit-sidebar"], #right-sidebar-container, shreddit-subreddit-header"#
            }
            TemplateVariant::Legacy => ".side, .tabmenu",
        }
    }
}

impl std::fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateVariant::Modern => write!(f, "modern"),
            TemplateVariant::Legacy => write!(f, "legacy"),
        }
    }
}

/// DOMツリーを `HostDocument` として扱うアダプタ
///
/// 識別キー → 列挙した要素群 の対応を保持する。同じ投稿が複数の要素で
/// 描かれていれば全部に表示状態を適用する。ページから外れた要素は
/// スキャンの終わりに `release_detached` で手放す。
pub struct DomDocument<E: DomElement> {
    root: E,
    elements: RefCell<HashMap<String, Vec<E>>>,
    next_key: Cell<u64>,
}

impl<E: DomElement> DomDocument<E> {
    pub fn new(root: E) -> Self {
        Self {
            root,
            elements: RefCell::new(HashMap::new()),
            next_key: Cell::new(1),
        }
    }

    pub fn root(&self) -> &E {
        &self.root
    }

    /// 要素の識別キーを決める（無ければ生成して要素に刻む）
    pub fn identify(&self, element: &E, attributes: &[&str]) -> String {
        let explicit = attributes
            .iter()
            .filter_map(|name| element.attribute(name))
            .find(|value| !value.is_empty());
        if let Some(key) = explicit {
            return key;
        }

        if let Some(key) = element.attribute(GENERATED_KEY_ATTR).filter(|k| !k.is_empty()) {
            return key;
        }

        let n = self.next_key.get();
        self.next_key.set(n + 1);
        let key = format!("hf-{}", n);
        element.set_attribute(GENERATED_KEY_ATTR, &key);
        key
    }

    /// 識別キーに要素を結びつける（既に結びついていれば何もしない）
    pub fn track(&self, key: &str, element: &E) {
        let mut elements = self.elements.borrow_mut();
        let bound = elements.entry(key.to_string()).or_default();
        bound.retain(|e| e.is_connected());
        if !bound.iter().any(|e| e.is_same_node(element)) {
            bound.push(element.clone());
        }
    }

    pub fn is_tracked(&self, key: &str) -> bool {
        self.elements.borrow().contains_key(key)
    }

    /// 保持しているキーの数
    pub fn tracked_count(&self) -> usize {
        self.elements.borrow().len()
    }

    /// 保持している要素の総数
    pub fn tracked_elements(&self) -> usize {
        self.elements.borrow().values().map(Vec::len).sum()
    }
}

impl<E: DomElement> HostDocument for DomDocument<E> {
    type Key = String;

    fn set_item_visible(&self, key: &String, visible: bool) -> bool {
        let elements = self.elements.borrow();
        let Some(bound) = elements.get(key) else {
            return false;
        };

        let mut applied = false;
        for element in bound.iter().filter(|e| e.is_connected()) {
            element.set_hidden(!visible);
            applied = true;
        }
        applied
    }

    fn release_detached(&self) {
        let mut elements = self.elements.borrow_mut();
        elements.retain(|_, bound| {
            bound.retain(|e| e.is_connected());
            !bound.is_empty()
        });
    }
}
