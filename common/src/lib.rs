//! Housing Filter Common Library
//!
//! CLIとWeb(WASM)で共有される分類エンジン
//!
//! - `classifier` / `rules`: 住宅関連投稿の判定
//! - `registry` / `visibility` / `scanner` / `injector`: ライブドキュメントへの逐次適用
//! - `aggregate`: アーカイブの月別集計

pub mod aggregate;
pub mod classifier;
pub mod document;
pub mod dom;
pub mod engine;
pub mod error;
pub mod export;
pub mod injector;
pub mod locator;
pub mod preference;
pub mod registry;
pub mod rules;
pub mod scanner;
pub mod types;
pub mod visibility;

pub use aggregate::{aggregate_lines, month_key, ArchiveRecord, MonthBucket, MonthlyAggregator, MonthlyReport};
pub use classifier::{default_classifier, is_housing, Classifier, RuleHit, RuleTarget};
pub use document::{HostDocument, MutationBatch};
pub use dom::{DomDocument, DomElement, TemplateVariant};
pub use engine::{FilterContext, FilterEngine};
pub use error::{Error, Result};
pub use injector::{AttemptOutcome, InjectorState, Placement, RetryPolicy, ToggleHost, ToggleInjector};
pub use locator::{ItemLocator, TemplateLocator};
pub use preference::{KeyValueStore, MemoryStore, PreferenceStore, SHOW_MATCHES_KEY};
pub use registry::{ItemRegistry, RegistryEntry};
pub use rules::{Rule, RuleConfig, RuleSet};
pub use scanner::{ReactiveScanner, ScanState, ScanTrigger};
pub use types::{Classification, MatchedItem, RawItem, ScanReport};
