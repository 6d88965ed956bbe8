//! フィルタエンジン（パイプラインの調停役）
//!
//! 分類器・レジストリ・表示設定を1つのコンテキストにまとめて所有し、
//! ロケータ → 分類 → 重複排除 → 表示適用 の流れを実行する。
//! ホスト（WASMやテスト）はこの型だけを扱う。

use crate::classifier::Classifier;
use crate::document::{HostDocument, MutationBatch};
use crate::dom::{DomDocument, DomElement};
use crate::injector::{AttemptOutcome, RetryPolicy, ToggleHost, ToggleInjector};
use crate::locator::{ItemLocator, TemplateLocator};
use crate::preference::{KeyValueStore, PreferenceStore};
use crate::registry::ItemRegistry;
use crate::scanner::{ReactiveScanner, ScanTrigger};
use crate::types::{MatchedItem, ScanReport};

/// パイプラインが共有する可変状態
pub struct FilterContext<K, S> {
    pub classifier: Classifier,
    pub registry: ItemRegistry<K>,
    pub preference: PreferenceStore<S>,
}

pub struct FilterEngine<D: HostDocument, S> {
    context: FilterContext<D::Key, S>,
    locators: Vec<Box<dyn ItemLocator<D>>>,
    scanner: ReactiveScanner,
    injector: ToggleInjector,
}

impl<D, S> FilterEngine<D, S>
where
    D: HostDocument,
    S: KeyValueStore,
{
    /// 設定をストアから読み込んでエンジンを作る（ロケータは未登録）
    pub fn new(classifier: Classifier, store: S, policy: RetryPolicy) -> Self {
        Self {
            context: FilterContext {
                classifier,
                registry: ItemRegistry::new(),
                preference: PreferenceStore::load(store),
            },
            locators: Vec::new(),
            scanner: ReactiveScanner::new(),
            injector: ToggleInjector::new(policy),
        }
    }

    /// ロケータを優先順の末尾に追加する
    pub fn with_locator<L>(mut self, locator: L) -> Self
    where
        L: ItemLocator<D> + 'static,
    {
        self.locators.push(Box::new(locator));
        self
    }

    pub fn context(&self) -> &FilterContext<D::Key, S> {
        &self.context
    }

    pub fn registry(&self) -> &ItemRegistry<D::Key> {
        &self.context.registry
    }

    pub fn show_matches(&self) -> bool {
        self.context.preference.show_matches()
    }

    pub fn scanner(&self) -> &ReactiveScanner {
        &self.scanner
    }

    pub fn injector(&self) -> &ToggleInjector {
        &self.injector
    }

    /// 初回スキャン
    pub fn start(&mut self, document: &D) -> ScanReport {
        match self.scanner.begin() {
            ScanTrigger::Started => self.run_scans(document),
            _ => ScanReport::default(),
        }
    }

    /// 変更通知を処理する（挿入が無ければ何もしない）
    pub fn on_mutation(&mut self, document: &D, batch: MutationBatch) -> Option<ScanReport> {
        match self.scanner.notify(&batch) {
            ScanTrigger::Started => Some(self.run_scans(document)),
            ScanTrigger::Ignored | ScanTrigger::Deferred => None,
        }
    }

    /// 表示設定を変更し、既存の一致項目すべてに再適用する
    ///
    /// # Returns
    /// 再適用した項目数（設定が変わらなければ0）
    pub fn set_show_matches(&mut self, document: &D, show: bool) -> usize {
        if !self.context.preference.set_show_matches(show) {
            return 0;
        }
        let touched = crate::visibility::reapply_all(document, &self.context.registry, show);
        tracing::debug!(show, touched, "preference changed");
        touched
    }

    /// トグル配置を1回試みる
    pub fn attempt_injection<H: ToggleHost>(&mut self, host: &H) -> AttemptOutcome {
        let checked = self.show_matches();
        self.injector.attempt(host, checked)
    }

    /// トグルが消えていたら再挿入待ちに戻す
    pub fn check_toggle_presence<H: ToggleHost>(&mut self, host: &H) -> bool {
        self.injector.check_presence(host)
    }

    /// 取りこぼしが無くなるまで全体スキャンを繰り返す
    fn run_scans(&mut self, document: &D) -> ScanReport {
        let mut report = self.scan_once(document);
        while self.scanner.finish() {
            report.merge(self.scan_once(document));
        }
        report
    }

    /// パイプライン1回分
    fn scan_once(&mut self, document: &D) -> ScanReport {
        let mut report = ScanReport::default();
        let mut items = Vec::new();

        for locator in &self.locators {
            for raw in locator.enumerate_items(document) {
                report.enumerated += 1;
                let result = self
                    .context
                    .registry
                    .classify_if_new(&self.context.classifier, &raw);

                if !result.already_logged {
                    report.newly_classified += 1;
                    if result.is_match {
                        report.newly_matched.push(MatchedItem {
                            title: raw.title.clone(),
                            label: raw.label.clone(),
                        });
                    }
                }
                items.push((raw.identity_key, result.is_match));
            }
        }

        report.applied = crate::visibility::apply(
            document,
            &items,
            self.context.preference.show_matches(),
        );
        document.release_detached();

        tracing::debug!(
            enumerated = report.enumerated,
            new = report.newly_classified,
            matched = report.newly_matched.len(),
            "scan finished"
        );
        report
    }
}

impl<E, S> FilterEngine<DomDocument<E>, S>
where
    E: DomElement,
    S: KeyValueStore,
{
    /// 全テンプレートのロケータを優先順に登録したエンジン
    pub fn for_dom(classifier: Classifier, store: S, policy: RetryPolicy) -> Self {
        TemplateLocator::all()
            .into_iter()
            .fold(Self::new(classifier, store, policy), |engine, locator| {
                engine.with_locator(locator)
            })
    }
}
