//! web-sys による `DomElement` 実装

use housing_filter_common::DomElement;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, ShadowRoot};

/// ブラウザ上のノード（探索の起点になり得るもの）
#[derive(Clone)]
pub enum WebNode {
    Document(Document),
    Element(Element),
    Shadow(ShadowRoot),
}

impl WebNode {
    fn as_element(&self) -> Option<&Element> {
        match self {
            WebNode::Element(element) => Some(element),
            _ => None,
        }
    }

    fn as_node(&self) -> &web_sys::Node {
        match self {
            WebNode::Document(document) => document.as_ref(),
            WebNode::Element(element) => element.as_ref(),
            WebNode::Shadow(shadow) => shadow.as_ref(),
        }
    }
}

fn collect_elements(list: NodeList) -> Vec<WebNode> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(WebNode::Element)
        .collect()
}

impl DomElement for WebNode {
    fn query_selector_all(&self, selectors: &str) -> Vec<Self> {
        let list = match self {
            WebNode::Document(document) => document.query_selector_all(selectors),
            WebNode::Element(element) => element.query_selector_all(selectors),
            WebNode::Shadow(shadow) => shadow.query_selector_all(selectors),
        };
        // 不正なセレクタは空扱い
        list.map(collect_elements).unwrap_or_default()
    }

    fn text_content(&self) -> String {
        self.as_node().text_content().unwrap_or_default()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.as_element()?.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Some(element) = self.as_element() {
            let _ = element.set_attribute(name, value);
        }
    }

    fn shadow_root(&self) -> Option<Self> {
        self.as_element()?.shadow_root().map(WebNode::Shadow)
    }

    fn set_hidden(&self, hidden: bool) {
        let Some(element) = self.as_element().and_then(|e| e.dyn_ref::<HtmlElement>()) else {
            return;
        };
        let style = element.style();
        if hidden {
            let _ = style.set_property("display", "none");
        } else {
            let _ = style.remove_property("display");
        }
    }

    fn is_connected(&self) -> bool {
        self.as_node().is_connected()
    }

    fn is_same_node(&self, other: &Self) -> bool {
        self.as_node().is_same_node(Some(other.as_node()))
    }
}
