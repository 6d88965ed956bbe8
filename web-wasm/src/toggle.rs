//! 表示切替チェックボックス

use gloo::events::EventListener;
use housing_filter_common::{TemplateVariant, ToggleHost};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

/// トグルのコンテナ要素ID（存在確認にも使う）
pub const TOGGLE_ID: &str = "uiuc-housing-filter-toggle";

const TOGGLE_TEXT: &str = "Show housing posts";

const ANCHOR_STYLE: &str = "display:block;margin:8px 0;padding:8px 12px;font-size:14px;";

const FLOATING_STYLE: &str = "position:fixed;bottom:16px;right:16px;z-index:9999;\
    background:#fff;color:#1a1a1b;padding:8px 12px;border-radius:8px;\
    box-shadow:0 2px 6px rgba(0,0,0,0.2);font-size:14px;";

/// チェックボックスをページに配置する
pub struct PageToggle {
    document: Document,
    on_change: Rc<dyn Fn(bool)>,
}

impl PageToggle {
    pub fn new(document: Document, on_change: Rc<dyn Fn(bool)>) -> Self {
        Self { document, on_change }
    }

    fn build(&self, checked: bool, floating: bool) -> Option<Element> {
        let container = self.document.create_element("label").ok()?;
        container.set_id(TOGGLE_ID);
        container
            .set_attribute("style", if floating { FLOATING_STYLE } else { ANCHOR_STYLE })
            .ok()?;

        let input: HtmlInputElement = self.document.create_element("input").ok()?.dyn_into().ok()?;
        input.set_type("checkbox");
        input.set_checked(checked);
        input.set_attribute("style", "margin-right:6px;").ok()?;

        let on_change = self.on_change.clone();
        EventListener::new(&input, "change", move |event| {
            let checked = event
                .target()
                .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
                .map(|input| input.checked());
            if let Some(checked) = checked {
                on_change(checked);
            }
        })
        .forget();

        container.append_child(&input).ok()?;
        container
            .append_child(&self.document.create_text_node(TOGGLE_TEXT))
            .ok()?;
        Some(container)
    }
}

impl ToggleHost for PageToggle {
    fn control_present(&self) -> bool {
        self.document.get_element_by_id(TOGGLE_ID).is_some()
    }

    fn mount_at_anchor(&self, variant: TemplateVariant, checked: bool) -> bool {
        let Some(anchor) = self
            .document
            .query_selector(variant.anchor_selectors())
            .ok()
            .flatten()
        else {
            return false;
        };

        self.build(checked, false)
            .map(|toggle| anchor.prepend_with_node_1(&toggle).is_ok())
            .unwrap_or(false)
    }

    fn mount_floating(&self, checked: bool) -> bool {
        let Some(body) = self.document.body() else {
            return false;
        };

        self.build(checked, true)
            .map(|toggle| body.append_child(&toggle).is_ok())
            .unwrap_or(false)
    }
}
