//! アーカイブの月別集計
//!
//! NDJSON形式の投稿アーカイブを1行ずつ読み、UTCの暦月ごとに
//! 総数・一致数・一致率を求める。壊れた行は読み飛ばして件数だけ数える。

use crate::classifier::Classifier;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// アーカイブ1行分（必要なフィールドのみ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchiveRecord {
    /// 整数・小数・数値文字列のいずれも来る
    #[serde(default)]
    pub created_utc: serde_json::Value,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub link_flair_text: Option<String>,
}

impl ArchiveRecord {
    /// 作成時刻（UNIX秒）
    pub fn timestamp(&self) -> Option<i64> {
        let seconds = match &self.created_utc {
            serde_json::Value::Number(n) => n.as_f64()?,
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        if seconds.is_finite() {
            Some(seconds.floor() as i64)
        } else {
            None
        }
    }
}

/// UNIX秒から `YYYY-MM` を求める
pub fn month_key(timestamp: i64) -> Option<String> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.format("%Y-%m").to_string())
}

/// 1か月分の集計
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    pub month_key: String,
    pub total_count: u64,
    pub match_count: u64,
    pub match_percentage: f64,
}

/// 月別集計の結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReport {
    /// 月順に並んだ集計
    pub buckets: Vec<MonthBucket>,
    pub total_records: u64,
    pub matched_records: u64,
    pub skipped_records: u64,
}

impl MonthlyReport {
    /// 全期間の一致率（レコードが無ければ0）
    pub fn overall_percentage(&self) -> f64 {
        percentage(self.matched_records, self.total_records)
    }

    /// 最初と最後の月
    pub fn date_range(&self) -> Option<(&str, &str)> {
        let first = self.buckets.first()?;
        let last = self.buckets.last()?;
        Some((first.month_key.as_str(), last.month_key.as_str()))
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    total: u64,
    matched: u64,
}

/// 逐次集計器（並列集計では `merge` で結合する）
#[derive(Debug, Clone, Default)]
pub struct MonthlyAggregator {
    months: BTreeMap<String, Counts>,
    skipped: u64,
    use_labels: bool,
}

impl MonthlyAggregator {
    /// `use_labels` が真ならフレアもラベルルールで判定する
    pub fn new(use_labels: bool) -> Self {
        Self {
            use_labels,
            ..Default::default()
        }
    }

    /// NDJSONの1行を取り込む（空行は無視、壊れた行はスキップ数に加算）
    pub fn push_line(&mut self, classifier: &Classifier, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match serde_json::from_str::<ArchiveRecord>(line) {
            Ok(record) => self.push_record(classifier, &record),
            Err(e) => {
                tracing::trace!(error = %e, "skipping malformed record");
                self.skipped += 1;
            }
        }
    }

    pub fn push_record(&mut self, classifier: &Classifier, record: &ArchiveRecord) {
        let Some(key) = record.timestamp().and_then(month_key) else {
            self.skipped += 1;
            return;
        };

        let title = record.title.as_deref().unwrap_or("");
        let label = if self.use_labels {
            record.link_flair_text.as_deref()
        } else {
            None
        };

        let counts = self.months.entry(key).or_default();
        counts.total += 1;
        if classifier.classify(title, label) {
            counts.matched += 1;
        }
    }

    pub fn merge(mut self, other: MonthlyAggregator) -> Self {
        for (key, counts) in other.months {
            let entry = self.months.entry(key).or_default();
            entry.total += counts.total;
            entry.matched += counts.matched;
        }
        self.skipped += other.skipped;
        self
    }

    pub fn finish(self) -> MonthlyReport {
        let buckets: Vec<MonthBucket> = self
            .months
            .into_iter()
            .map(|(month_key, counts)| MonthBucket {
                month_key,
                total_count: counts.total,
                match_count: counts.matched,
                match_percentage: percentage(counts.matched, counts.total),
            })
            .collect();

        MonthlyReport {
            total_records: buckets.iter().map(|b| b.total_count).sum(),
            matched_records: buckets.iter().map(|b| b.match_count).sum(),
            skipped_records: self.skipped,
            buckets,
        }
    }
}

/// 行の列をまとめて集計する
pub fn aggregate_lines<'a, I>(classifier: &Classifier, lines: I, use_labels: bool) -> MonthlyReport
where
    I: IntoIterator<Item = &'a str>,
{
    let mut aggregator = MonthlyAggregator::new(use_labels);
    for line in lines {
        aggregator.push_line(classifier, line);
    }
    aggregator.finish()
}
