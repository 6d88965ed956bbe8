//! HTMLグラフ出力（Chart.js）
//!
//! 月別の一致率（折れ線＋全期間平均の破線）と件数（棒グラフ）を
//! 1枚の自己完結HTMLに書き出す。

use super::ReportOptions;
use crate::error::Result;
use housing_filter_common::MonthlyReport;
use std::path::Path;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>__TITLE__</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 20px; background: #f5f5f5; }
    .container { max-width: 1200px; margin: 0 auto; }
    h1 { color: #333; }
    .subtitle { color: #666; }
    .chart-container { background: white; border-radius: 8px; padding: 20px; margin-bottom: 20px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    canvas { max-height: 400px; }
  </style>
</head>
<body>
  <div class="container">
    <h1>__TITLE__</h1>
    <p class="subtitle">__SUBTITLE__</p>

    <div class="chart-container">
      <h2>Housing Posts Percentage by Month</h2>
      <canvas id="percentageChart"></canvas>
    </div>

    <div class="chart-container">
      <h2>Post Counts by Month</h2>
      <canvas id="countsChart"></canvas>
    </div>
  </div>

  <script>
    const labels = __LABELS__;
    const totalPosts = __TOTALS__;
    const housingPosts = __MATCHES__;
    const housingPercentage = __PERCENTAGES__;
    const overallAvg = __OVERALL__;

    new Chart(document.getElementById('percentageChart'), {
      type: 'line',
      data: {
        labels: labels,
        datasets: [
          {
            label: 'Housing Posts %',
            data: housingPercentage,
            borderColor: '#e74c3c',
            backgroundColor: 'rgba(231, 76, 60, 0.1)',
            fill: true,
            tension: 0.3
          },
          {
            label: 'Overall Average (' + overallAvg.toFixed(1) + '%)',
            data: labels.map(() => overallAvg),
            borderColor: '#7f8c8d',
            borderDash: [5, 5],
            pointRadius: 0,
            fill: false
          }
        ]
      },
      options: {
        responsive: true,
        plugins: { legend: { position: 'top', labels: { usePointStyle: true } } },
        scales: {
          x: { ticks: { maxTicksLimit: 20, maxRotation: 45 } },
          y: {
            beginAtZero: true,
            max: __Y_MAX__,
            title: { display: true, text: 'Percentage of Posts (%)' },
            grid: { color: '#eee' }
          }
        }
      }
    });

    new Chart(document.getElementById('countsChart'), {
      type: 'bar',
      data: {
        labels: labels,
        datasets: [
          { label: 'Total Posts', data: totalPosts, backgroundColor: 'rgba(52, 152, 219, 0.7)', order: 2 },
          { label: 'Housing Posts', data: housingPosts, backgroundColor: 'rgba(231, 76, 60, 0.9)', order: 1 }
        ]
      },
      options: {
        responsive: true,
        plugins: { legend: { position: 'top' } },
        scales: {
          x: { stacked: false, ticks: { maxTicksLimit: 20, maxRotation: 45 } },
          y: { beginAtZero: true, title: { display: true, text: 'Number of Posts' } }
        }
      }
    });
  </script>
</body>
</html>
"#;

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn subtitle(report: &MonthlyReport) -> String {
    let generated = chrono::Local::now().format("%Y-%m-%d %H:%M");
    match report.date_range() {
        Some((first, last)) => format!(
            "Data from {} to {} ({} total posts, {} housing, {:.1}% overall) / generated {}",
            first,
            last,
            report.total_records,
            report.matched_records,
            report.overall_percentage(),
            generated
        ),
        None => format!("No posts / generated {}", generated),
    }
}

/// HTML文字列を組み立てる
pub fn render_html(report: &MonthlyReport, options: &ReportOptions) -> Result<String> {
    let labels: Vec<&str> = report.buckets.iter().map(|b| b.month_key.as_str()).collect();
    let totals: Vec<u64> = report.buckets.iter().map(|b| b.total_count).collect();
    let matches: Vec<u64> = report.buckets.iter().map(|b| b.match_count).collect();
    // 小数2桁に丸めてグラフの凡例を見やすくする
    let percentages: Vec<f64> = report
        .buckets
        .iter()
        .map(|b| (b.match_percentage * 100.0).round() / 100.0)
        .collect();

    let html = TEMPLATE
        .replace("__TITLE__", &escape_html(&options.title))
        .replace("__SUBTITLE__", &escape_html(&subtitle(report)))
        .replace("__LABELS__", &serde_json::to_string(&labels)?)
        .replace("__TOTALS__", &serde_json::to_string(&totals)?)
        .replace("__MATCHES__", &serde_json::to_string(&matches)?)
        .replace("__PERCENTAGES__", &serde_json::to_string(&percentages)?)
        .replace("__OVERALL__", &format!("{:.4}", report.overall_percentage()))
        .replace("__Y_MAX__", &format!("{}", options.y_max));

    Ok(html)
}

pub fn write_html(report: &MonthlyReport, output_path: &Path, options: &ReportOptions) -> Result<()> {
    let html = render_html(report, options)?;
    std::fs::write(output_path, html)?;
    Ok(())
}
