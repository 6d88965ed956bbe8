//! メモリ上の要素ツリー
//!
//! ブラウザ無しでロケータ・エンジンを動かすための `DomElement` 実装。
//! セレクタは複合セレクタ（`tag`, `*`, `#id`, `.class`, `[attr]`, `[attr="v"]`）
//! のカンマ区切りのみ対応する。

use super::DomElement;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

const SHADOW_ROOT_TAG: &str = "#shadow-root";

#[derive(Debug, Default)]
struct MemoryNode {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<MemoryElement>,
    shadow: Option<MemoryElement>,
    hidden: bool,
    detached: bool,
}

#[derive(Debug, Clone)]
pub struct MemoryElement(Rc<RefCell<MemoryNode>>);

impl MemoryElement {
    pub fn new(tag: &str) -> Self {
        Self(Rc::new(RefCell::new(MemoryNode {
            tag: tag.to_ascii_lowercase(),
            ..Default::default()
        })))
    }

    pub fn with_attr(self, name: &str, value: &str) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_class(self, classes: &str) -> Self {
        let merged = match self.attribute("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, classes),
            _ => classes.to_string(),
        };
        self.set_attribute("class", &merged);
        self
    }

    pub fn with_text(self, text: &str) -> Self {
        self.0.borrow_mut().text = text.to_string();
        self
    }

    pub fn with_child(self, child: MemoryElement) -> Self {
        self.append_child(&child);
        self
    }

    pub fn append_child(&self, child: &MemoryElement) {
        self.0.borrow_mut().children.push(child.clone());
    }

    /// 子要素をすべて切り離す（切り離した要素は `is_connected() == false`）
    pub fn clear_children(&self) {
        let children = std::mem::take(&mut self.0.borrow_mut().children);
        for child in &children {
            child.mark_detached();
        }
    }

    /// 開いたシャドウルートを作成して返す
    pub fn attach_shadow(&self) -> MemoryElement {
        let shadow = MemoryElement::new(SHADOW_ROOT_TAG);
        self.0.borrow_mut().shadow = Some(shadow.clone());
        shadow
    }

    pub fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    pub fn is_hidden(&self) -> bool {
        self.0.borrow().hidden
    }

    pub fn children(&self) -> Vec<MemoryElement> {
        self.0.borrow().children.clone()
    }

    fn mark_detached(&self) {
        let (children, shadow) = {
            let mut node = self.0.borrow_mut();
            node.detached = true;
            (node.children.clone(), node.shadow.clone())
        };
        for child in children.iter().chain(shadow.iter()) {
            child.mark_detached();
        }
    }

    fn collect_matches(&self, selectors: &[Compound], out: &mut Vec<MemoryElement>) {
        let children = self.0.borrow().children.clone();
        for child in children {
            if selectors.iter().any(|s| s.matches(&child)) {
                out.push(child.clone());
            }
            child.collect_matches(selectors, out);
        }
    }
}

impl PartialEq for MemoryElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl DomElement for MemoryElement {
    fn query_selector_all(&self, selectors: &str) -> Vec<Self> {
        let compounds: Vec<Compound> = selectors
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Compound::parse)
            .collect();

        let mut out = Vec::new();
        self.collect_matches(&compounds, &mut out);
        out
    }

    fn text_content(&self) -> String {
        let node = self.0.borrow();
        let mut text = node.text.clone();
        for child in &node.children {
            text.push_str(&child.text_content());
        }
        text
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn is_same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn shadow_root(&self) -> Option<Self> {
        self.0.borrow().shadow.clone()
    }

    fn set_hidden(&self, hidden: bool) {
        self.0.borrow_mut().hidden = hidden;
    }

    fn is_connected(&self) -> bool {
        !self.0.borrow().detached
    }
}

/// 複合セレクタ1つ分
#[derive(Debug, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attributes: Vec<(String, Option<String>)>,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

impl Compound {
    fn parse(selector: &str) -> Self {
        let chars: Vec<char> = selector.chars().collect();
        let mut compound = Compound::default();
        let mut i = 0;

        let start = i;
        while i < chars.len() && is_ident_char(chars[i]) {
            i += 1;
        }
        if i > start {
            let tag: String = chars[start..i].iter().collect();
            compound.tag = Some(tag.to_ascii_lowercase());
        } else if chars.first() == Some(&'*') {
            i += 1;
        }

        while i < chars.len() {
            match chars[i] {
                kind @ ('.' | '#') => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && is_ident_char(chars[i]) {
                        i += 1;
                    }
                    let name: String = chars[start..i].iter().collect();
                    if kind == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                }
                '[' => {
                    i += 1;
                    let start = i;
                    while i < chars.len() && chars[i] != ']' {
                        i += 1;
                    }
                    let inner: String = chars[start..i].iter().collect();
                    i += 1;
                    let attribute = match inner.split_once('=') {
                        Some((name, value)) => (
                            name.trim().to_string(),
                            Some(value.trim().trim_matches(|c: char| c == '"' || c == '\'').to_string()),
                        ),
                        None => (inner.trim().to_string(), None),
                    };
                    compound.attributes.push(attribute);
                }
                _ => i += 1,
            }
        }

        compound
    }

    fn matches(&self, element: &MemoryElement) -> bool {
        let node = element.0.borrow();

        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }

        if let Some(id) = &self.id {
            if node.attributes.get("id") != Some(id) {
                return false;
            }
        }

        if !self.classes.is_empty() {
            let class_attr = node.attributes.get("class").map(String::as_str).unwrap_or("");
            let present: Vec<&str> = class_attr.split_whitespace().collect();
            if !self.classes.iter().all(|c| present.contains(&c.as_str())) {
                return false;
            }
        }

        self.attributes.iter().all(|(name, expected)| {
            match (node.attributes.get(name), expected) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}
