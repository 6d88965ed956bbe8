//! r/UIUC 住宅投稿フィルタ（ブラウザ用バインディング）
//!
//! 共通エンジンに web-sys のDOM・localStorage・タイマーを接続する。
//! エンジンは `Rc<RefCell<_>>` でページ全体から共有する。

mod dom;
mod storage;
mod toggle;

pub use dom::WebNode;
pub use storage::LocalStorageStore;
pub use toggle::{PageToggle, TOGGLE_ID};

use gloo::console;
use gloo::timers::callback::Timeout;
use housing_filter_common::{
    default_classifier, DomDocument, FilterEngine, MutationBatch, RetryPolicy, ScanReport,
};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, MutationObserver, MutationObserverInit, MutationRecord};

const LOG_PREFIX: &str = "[UIUC Housing Filter]";

type WebEngine = FilterEngine<DomDocument<WebNode>, LocalStorageStore>;

/// ページ上で動くフィルタ一式
struct PageFilter {
    engine: RefCell<WebEngine>,
    document: DomDocument<WebNode>,
    toggle: PageToggle,
}

impl PageFilter {
    fn new(document: &Document) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<PageFilter>| {
            let weak = weak.clone();
            let on_change: Rc<dyn Fn(bool)> = Rc::new(move |show| {
                if let Some(filter) = weak.upgrade() {
                    filter.set_show_matches(show);
                }
            });

            Self {
                engine: RefCell::new(WebEngine::for_dom(
                    default_classifier().clone(),
                    LocalStorageStore::new(),
                    RetryPolicy::default(),
                )),
                document: DomDocument::new(WebNode::Document(document.clone())),
                toggle: PageToggle::new(document.clone(), on_change),
            }
        })
    }

    fn start(&self) {
        let (report, show) = {
            let mut engine = self.engine.borrow_mut();
            let report = engine.start(&self.document);
            (report, engine.show_matches())
        };
        log_matches(&report, show);
    }

    fn on_mutation(self: &Rc<Self>, batch: MutationBatch) {
        let (report, reinject, show) = {
            let mut engine = self.engine.borrow_mut();
            let report = engine.on_mutation(&self.document, batch);
            let reinject = engine.check_toggle_presence(&self.toggle);
            (report, reinject, engine.show_matches())
        };

        if let Some(report) = report {
            log_matches(&report, show);
        }
        if reinject {
            schedule_injection(self.clone(), 0);
        }
    }

    fn set_show_matches(&self, show: bool) {
        self.engine.borrow_mut().set_show_matches(&self.document, show);
    }

    fn retry_interval_ms(&self) -> u32 {
        let interval = self.engine.borrow().injector().policy().interval;
        u32::try_from(interval.as_millis()).unwrap_or(u32::MAX)
    }
}

/// 一致項目のログ見出し（表示中の項目を "Hidden" とは書かない）
fn match_verb(show_matches: bool) -> &'static str {
    if show_matches {
        "Matched:"
    } else {
        "Hidden:"
    }
}

fn log_matches(report: &ScanReport, show_matches: bool) {
    let verb = match_verb(show_matches);
    for item in &report.newly_matched {
        console::log!(LOG_PREFIX, verb, item.to_string());
    }
}

/// トグル配置を `delay_ms` 後に試み、未配置なら間隔をあけて繰り返す
fn schedule_injection(filter: Rc<PageFilter>, delay_ms: u32) {
    Timeout::new(delay_ms, move || {
        let outcome = filter.engine.borrow_mut().attempt_injection(&filter.toggle);
        if !outcome.is_terminal() {
            let interval = filter.retry_interval_ms();
            schedule_injection(filter, interval);
        }
    })
    .forget();
}

/// body 以下の挿入を監視する（ページが生きている間ずっと）
fn observe(filter: &Rc<PageFilter>, document: &Document) -> Result<(), JsValue> {
    let target: web_sys::Node = match document.body() {
        Some(body) => body.into(),
        None => document.clone().into(),
    };

    let handler = filter.clone();
    let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
        move |records: js_sys::Array, _observer: MutationObserver| {
            let inserted = records
                .iter()
                .filter_map(|record| record.dyn_into::<MutationRecord>().ok())
                .map(|record| record.added_nodes().length() as usize)
                .sum();
            handler.on_mutation(MutationBatch::inserted(inserted));
        },
    );

    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let options = MutationObserverInit::new();
    options.set_child_list(true);
    options.set_subtree(true);
    observer.observe_with_options(&target, &options)?;

    callback.forget();
    Ok(())
}

fn run() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("window is unavailable")?;
    let document = window.document().ok_or("document is unavailable")?;

    let filter = PageFilter::new(&document);
    filter.start();
    observe(&filter, &document)?;
    schedule_injection(filter, 0);

    console::log!(LOG_PREFIX, "Loaded and active");
    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    if let Err(e) = run() {
        console::error!(LOG_PREFIX, e);
    }
}

#[cfg(test)]
mod tests {
    use super::match_verb;

    #[test]
    fn test_match_verb_follows_preference() {
        assert_eq!(match_verb(false), "Hidden:");
        assert_eq!(match_verb(true), "Matched:");
    }
}
