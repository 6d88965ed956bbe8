//! 項目ロケータ
//!
//! テンプレートごとのセレクタで候補項目を列挙する。該当しないテンプレートでは
//! 単に空を返すため、全バリアントを毎回優先順に実行してよい。

use crate::document::HostDocument;
use crate::dom::{DomDocument, DomElement, TemplateVariant};
use crate::types::RawItem;

/// ドキュメントから候補項目を列挙する能力
pub trait ItemLocator<D: HostDocument> {
    fn name(&self) -> &'static str;

    /// 描画途中のドキュメントでも失敗しない（見つからなければ空）
    fn enumerate_items(&self, document: &D) -> Vec<RawItem<D::Key>>;
}

/// セレクタ表に基づくテンプレート別ロケータ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateLocator {
    variant: TemplateVariant,
}

impl TemplateLocator {
    pub fn new(variant: TemplateVariant) -> Self {
        Self { variant }
    }

    pub fn variant(&self) -> TemplateVariant {
        self.variant
    }

    /// 優先順に並んだ全バリアント
    pub fn all() -> Vec<TemplateLocator> {
        TemplateVariant::PRIORITY
            .iter()
            .map(|v| TemplateLocator::new(*v))
            .collect()
    }

    fn extract<E: DomElement>(&self, element: &E) -> (String, Option<String>) {
        let title = first_text(element, self.variant.title_selectors())
            .or_else(|| {
                self.variant
                    .title_attribute()
                    .and_then(|name| element.attribute(name))
            })
            .unwrap_or_default();

        let label = query_with_shadow(element, self.variant.label_selectors())
            .and_then(|label_el| {
                let text = label_el.text_content().trim().to_string();
                if text.is_empty() {
                    label_el.attribute(self.variant.label_attribute())
                } else {
                    Some(text)
                }
            })
            .or_else(|| {
                self.variant
                    .item_label_attribute()
                    .and_then(|name| element.attribute(name))
            })
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());

        (title.trim().to_string(), label)
    }
}

impl<E: DomElement> ItemLocator<DomDocument<E>> for TemplateLocator {
    fn name(&self) -> &'static str {
        match self.variant {
            TemplateVariant::Modern => "modern",
            TemplateVariant::Legacy => "legacy",
        }
    }

    fn enumerate_items(&self, document: &DomDocument<E>) -> Vec<RawItem<String>> {
        find_with_shadow(document.root(), self.variant.item_selectors())
            .into_iter()
            .map(|element| {
                let key = document.identify(&element, self.variant.identity_attributes());
                document.track(&key, &element);
                let (title, label) = self.extract(&element);
                RawItem {
                    identity_key: key,
                    title,
                    label,
                }
            })
            .collect()
    }
}

/// 通常の探索で見つからなければシャドウルート内を探す
fn find_with_shadow<E: DomElement>(root: &E, selectors: &str) -> Vec<E> {
    let found = root.query_selector_all(selectors);
    if !found.is_empty() {
        return found;
    }

    shadow_roots_within(root)
        .iter()
        .flat_map(|shadow| shadow.query_selector_all(selectors))
        .collect()
}

fn query_with_shadow<E: DomElement>(element: &E, selectors: &str) -> Option<E> {
    element.query_selector(selectors).or_else(|| {
        element
            .shadow_root()
            .and_then(|shadow| shadow.query_selector(selectors))
    })
}

/// 最初に空でないテキストを持つ一致要素
fn first_text<E: DomElement>(element: &E, selectors: &str) -> Option<String> {
    let light = element.query_selector_all(selectors);
    let shadow = element
        .shadow_root()
        .map(|s| s.query_selector_all(selectors))
        .unwrap_or_default();

    light
        .iter()
        .chain(shadow.iter())
        .map(|e| e.text_content())
        .find(|t| !t.trim().is_empty())
}

/// 子孫に存在する（入れ子を含む）開いたシャドウルート
fn shadow_roots_within<E: DomElement>(root: &E) -> Vec<E> {
    let mut roots = Vec::new();
    let mut pending = vec![root.clone()];

    while let Some(scope) = pending.pop() {
        for element in scope.query_selector_all("*") {
            if let Some(shadow) = element.shadow_root() {
                roots.push(shadow.clone());
                pending.push(shadow);
            }
        }
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::memory::MemoryElement;

    fn modern_post(id: &str, title: &str) -> MemoryElement {
        MemoryElement::new("shreddit-post")
            .with_attr("id", id)
            .with_child(MemoryElement::new("a").with_attr("slot", "title").with_text(title))
    }

    fn legacy_post(fullname: &str, title: &str, flair: Option<&str>) -> MemoryElement {
        let mut post = MemoryElement::new("div")
            .with_class("thing link")
            .with_attr("data-fullname", fullname)
            .with_child(MemoryElement::new("a").with_class("title").with_text(title));
        if let Some(flair) = flair {
            post = post.with_child(
                MemoryElement::new("span")
                    .with_class("linkflairlabel")
                    .with_text(flair),
            );
        }
        post
    }

    #[test]
    fn test_modern_locator_extracts_title_and_id() {
        let root = MemoryElement::new("body").with_child(modern_post("t3_a", " Sublet 1BR "));
        let doc = DomDocument::new(root);

        let items = TemplateLocator::new(TemplateVariant::Modern).enumerate_items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identity_key, "t3_a");
        assert_eq!(items[0].title, "Sublet 1BR");
        assert_eq!(items[0].label, None);
        assert!(doc.is_tracked("t3_a"));
    }

    #[test]
    fn test_modern_locator_title_attribute_fallback() {
        let root = MemoryElement::new("body").with_child(
            MemoryElement::new("shreddit-post")
                .with_attr("id", "t3_b")
                .with_attr("post-title", "Roommate wanted")
                .with_attr("flair-text", "Housing"),
        );
        let doc = DomDocument::new(root);

        let items = TemplateLocator::new(TemplateVariant::Modern).enumerate_items(&doc);
        assert_eq!(items[0].title, "Roommate wanted");
        assert_eq!(items[0].label.as_deref(), Some("Housing"));
    }

    #[test]
    fn test_legacy_locator_reads_flair() {
        let root = MemoryElement::new("body")
            .with_child(legacy_post("t3_x", "Question about CS 225", None))
            .with_child(legacy_post("t3_y", "Looking for a place", Some("Sublease")));
        let doc = DomDocument::new(root);

        let items = TemplateLocator::new(TemplateVariant::Legacy).enumerate_items(&doc);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].label, None);
        assert_eq!(items[1].identity_key, "t3_y");
        assert_eq!(items[1].label.as_deref(), Some("Sublease"));
    }

    #[test]
    fn test_inapplicable_variant_is_empty() {
        let root = MemoryElement::new("body").with_child(modern_post("t3_a", "Sublet"));
        let doc = DomDocument::new(root);
        assert!(TemplateLocator::new(TemplateVariant::Legacy)
            .enumerate_items(&doc)
            .is_empty());
    }

    #[test]
    fn test_empty_document() {
        let doc = DomDocument::new(MemoryElement::new("body"));
        for locator in TemplateLocator::all() {
            assert!(locator.enumerate_items(&doc).is_empty());
        }
    }

    #[test]
    fn test_items_inside_nested_shadow_roots() {
        let root = MemoryElement::new("body");
        let app = MemoryElement::new("shreddit-app");
        root.append_child(&app);
        let outer = app.attach_shadow();
        let feed = MemoryElement::new("shreddit-feed");
        outer.append_child(&feed);
        let inner = feed.attach_shadow();
        inner.append_child(&modern_post("t3_deep", "2 bedroom apartment available"));

        let doc = DomDocument::new(root);
        let items = TemplateLocator::new(TemplateVariant::Modern).enumerate_items(&doc);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identity_key, "t3_deep");
    }

    #[test]
    fn test_title_inside_item_shadow_root() {
        let root = MemoryElement::new("body");
        let post = MemoryElement::new("shreddit-post").with_attr("id", "t3_s");
        root.append_child(&post);
        post.attach_shadow()
            .append_child(&MemoryElement::new("h3").with_text("Relet for summer"));

        let doc = DomDocument::new(root);
        let items = TemplateLocator::new(TemplateVariant::Modern).enumerate_items(&doc);
        assert_eq!(items[0].title, "Relet for summer");
    }

    #[test]
    fn test_generated_key_stable_across_scans() {
        let root = MemoryElement::new("body").with_child(
            MemoryElement::new("article").with_child(MemoryElement::new("h3").with_text("Hello")),
        );
        let doc = DomDocument::new(root);
        let locator = TemplateLocator::new(TemplateVariant::Modern);

        let first = locator.enumerate_items(&doc);
        let second = locator.enumerate_items(&doc);
        assert_eq!(first[0].identity_key, second[0].identity_key);
        assert_eq!(doc.tracked_count(), 1);
    }
}
