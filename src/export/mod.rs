pub mod excel;
pub mod html;
pub mod json;
pub mod png;

use crate::cli::ExportFormat;
use crate::error::Result;
use housing_filter_common::MonthlyReport;
use std::path::{Path, PathBuf};

/// レポートの描画設定
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// グラフのY軸上限（%）
    pub y_max: f64,
}

/// 出力先がディレクトリ（または拡張子なし）なら `<stem>.<ext>` を中に作る
fn output_path_for_format(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else if output.extension().and_then(|e| e.to_str()) == Some(extension) {
        output.to_path_buf()
    } else {
        // 複数形式の出力時はファイル名の拡張子だけ差し替える
        output.with_extension(extension)
    }
}

/// 指定形式でレポートを書き出し、作成したファイルを返す
pub fn export_report(
    report: &MonthlyReport,
    format: &ExportFormat,
    output: &Path,
    options: &ReportOptions,
) -> Result<Vec<PathBuf>> {
    const STEM: &str = "housing_report";

    if output.extension().is_none() {
        std::fs::create_dir_all(output)?;
    }

    let mut written = Vec::new();

    if format.includes(&ExportFormat::Json) {
        let path = output_path_for_format(output, STEM, "json");
        println!("- JSONを生成中...");
        json::write_json(report, &path)?;
        println!("✔ JSON出力: {}", path.display());
        written.push(path);
    }

    if format.includes(&ExportFormat::Html) {
        let path = output_path_for_format(output, STEM, "html");
        println!("- HTMLグラフを生成中...");
        html::write_html(report, &path, options)?;
        println!("✔ HTML出力: {}", path.display());
        written.push(path);
    }

    if format.includes(&ExportFormat::Excel) {
        let path = output_path_for_format(output, STEM, "xlsx");
        println!("- Excelを生成中...");
        excel::generate_excel(report, &path, &options.title)?;
        println!("✔ Excel出力: {}", path.display());
        written.push(path);
    }

    if format.includes(&ExportFormat::Png) {
        let path = output_path_for_format(output, STEM, "png");
        println!("- グラフ画像を生成中...");
        png::write_png(report, &path, options)?;
        println!("✔ PNG出力: {}", path.display());
        written.push(path);
    }

    Ok(written)
}
