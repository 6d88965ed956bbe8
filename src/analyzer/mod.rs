//! アーカイブの読み込みと並列集計

use crate::error::Result;
use housing_filter_common::aggregate::{MonthlyAggregator, MonthlyReport};
use housing_filter_common::Classifier;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::debug;

/// 集計オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// フレアもラベルルールで判定する
    pub use_flair: bool,
    /// 進捗バーを表示する
    pub show_progress: bool,
}

/// アーカイブ群を読み込み、月別に集計する
///
/// ファイル単位で読み込み、行の分類は rayon で並列に行う。
/// 月ごとの合計なので結合順序は結果に影響しない。
pub fn analyze_archives(
    archives: &[PathBuf],
    classifier: &Classifier,
    options: AnalyzeOptions,
) -> Result<MonthlyReport> {
    let progress = if options.show_progress {
        let bar = ProgressBar::new(archives.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut total = MonthlyAggregator::new(options.use_flair);

    for path in archives {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        progress.set_message(file_name);

        // 不正なUTF-8を含む行があってもファイル全体は捨てない
        let content = std::fs::read(path)?;
        let partial = aggregate_content(&content, classifier, options.use_flair);
        debug!(path = %path.display(), "archive aggregated");

        total = total.merge(partial);
        progress.inc(1);
    }

    progress.finish_and_clear();
    Ok(total.finish())
}

fn aggregate_content(content: &[u8], classifier: &Classifier, use_flair: bool) -> MonthlyAggregator {
    let lines: Vec<&[u8]> = content.split(|b| *b == b'\n').collect();

    lines
        .par_iter()
        .fold(
            || MonthlyAggregator::new(use_flair),
            |mut aggregator, line| {
                aggregator.push_line(classifier, &String::from_utf8_lossy(line));
                aggregator
            },
        )
        .reduce(|| MonthlyAggregator::new(use_flair), MonthlyAggregator::merge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use housing_filter_common::aggregate::aggregate_lines;
    use housing_filter_common::default_classifier;

    #[test]
    fn test_parallel_matches_sequential() {
        let content: String = (0..200)
            .map(|i| {
                let ts = 1_704_067_200 + i * 86_400;
                let title = if i % 3 == 0 { "Sublease available" } else { "Class question" };
                format!("{}\n", serde_json::json!({ "created_utc": ts, "title": title }))
            })
            .collect();

        let parallel = aggregate_content(content.as_bytes(), default_classifier(), false).finish();
        let sequential = aggregate_lines(default_classifier(), content.lines(), false);
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.total_records, 200);
        assert_eq!(parallel.matched_records, 67);
    }
}
