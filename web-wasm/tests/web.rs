//! ブラウザ上での動作確認（wasm-pack test --headless --chrome）

use housing_filter_common::{
    default_classifier, DomDocument, DomElement, FilterEngine, KeyValueStore, MemoryStore,
    RetryPolicy, SHOW_MATCHES_KEY,
};
use housing_filter_wasm::{LocalStorageStore, WebNode};
use wasm_bindgen_test::*;
use web_sys::{Document, Element};

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn mount(html: &str) -> Element {
    let document = document();
    let root = document.create_element("div").unwrap();
    root.set_inner_html(html);
    document.body().unwrap().append_child(&root).unwrap();
    root
}

#[wasm_bindgen_test]
fn query_and_attributes() {
    let root = mount(r#"<div class="thing link" data-fullname="t3_a"><a class="title">Sublet</a></div>"#);
    let node = WebNode::Element(root.clone());

    let items = node.query_selector_all(".thing.link");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].attribute("data-fullname").as_deref(), Some("t3_a"));
    assert_eq!(items[0].query_selector("a.title").unwrap().text_content(), "Sublet");
    assert!(items[0].is_connected());

    root.remove();
}

#[wasm_bindgen_test]
fn hides_legacy_matches() {
    let root = mount(
        r#"<div class="thing link" data-fullname="t3_x"><a class="title">Subleasing my room</a></div>
           <div class="thing link" data-fullname="t3_y"><a class="title">CS 225 question</a></div>"#,
    );

    let document = DomDocument::new(WebNode::Element(root.clone()));
    let mut engine = FilterEngine::for_dom(default_classifier().clone(), MemoryStore::new(), RetryPolicy::default());
    let report = engine.start(&document);
    assert_eq!(report.newly_matched.len(), 1);

    let hidden = root.query_selector(r#"[data-fullname="t3_x"]"#).unwrap().unwrap();
    assert!(hidden.get_attribute("style").unwrap_or_default().contains("none"));

    root.remove();
}

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut store = LocalStorageStore::new();
    store.set(SHOW_MATCHES_KEY, "true").unwrap();
    assert_eq!(store.get(SHOW_MATCHES_KEY).as_deref(), Some("true"));
    store.set(SHOW_MATCHES_KEY, "false").unwrap();
}
