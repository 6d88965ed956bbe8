//! Excel生成（共通ライブラリ）
//!
//! 月別集計を1シートの表と折れ線グラフとして書き出す

use crate::aggregate::MonthlyReport;
use rust_xlsxwriter::*;

const SHEET_NAME: &str = "Monthly";

/// 見出し行の位置（0: タイトル, 1: 空行, 2: 見出し）
const HEADER_ROW: u32 = 2;

/// 月別集計をExcelバッファに生成
///
/// # Arguments
/// * `report` - 月別集計
/// * `title` - シート先頭に書くタイトル
pub fn generate_monthly_excel_buffer(report: &MonthlyReport, title: &str) -> Result<Vec<u8>, String> {
    let mut workbook = Workbook::new();

    let title_format = Format::new().set_bold().set_font_size(14.0);

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let cell_format = Format::new()
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let percent_format = Format::new()
        .set_num_format("0.00")
        .set_border(FormatBorder::Hair)
        .set_border_color(Color::RGB(0xCCCCCC));

    let summary_format = Format::new().set_bold().set_border_top(FormatBorder::Double);
    let summary_percent_format = summary_format.clone().set_num_format("0.00");

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(|e| format!("シート名設定エラー: {}", e))?;

    worksheet
        .write_string_with_format(0, 0, title, &title_format)
        .map_err(|e| format!("タイトル書き込みエラー: {}", e))?;

    for (col, (header, width)) in [("Month", 12.0), ("Total", 10.0), ("Housing", 10.0), ("Housing %", 12.0)]
        .iter()
        .enumerate()
    {
        let col = col as u16;
        worksheet
            .set_column_width(col, *width)
            .map_err(|e| format!("列幅設定エラー: {}", e))?;
        worksheet
            .write_string_with_format(HEADER_ROW, col, *header, &header_format)
            .map_err(|e| format!("見出し書き込みエラー: {}", e))?;
    }

    let mut row = HEADER_ROW + 1;
    for bucket in &report.buckets {
        worksheet
            .write_string_with_format(row, 0, &bucket.month_key, &cell_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet
            .write_number_with_format(row, 1, bucket.total_count as f64, &cell_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet
            .write_number_with_format(row, 2, bucket.match_count as f64, &cell_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        worksheet
            .write_number_with_format(row, 3, bucket.match_percentage, &percent_format)
            .map_err(|e| format!("値書き込みエラー: {}", e))?;
        row += 1;
    }

    // 合計行
    worksheet
        .write_string_with_format(row, 0, "Total", &summary_format)
        .map_err(|e| format!("合計書き込みエラー: {}", e))?;
    worksheet
        .write_number_with_format(row, 1, report.total_records as f64, &summary_format)
        .map_err(|e| format!("合計書き込みエラー: {}", e))?;
    worksheet
        .write_number_with_format(row, 2, report.matched_records as f64, &summary_format)
        .map_err(|e| format!("合計書き込みエラー: {}", e))?;
    worksheet
        .write_number_with_format(row, 3, report.overall_percentage(), &summary_percent_format)
        .map_err(|e| format!("合計書き込みエラー: {}", e))?;

    if !report.buckets.is_empty() {
        let first = HEADER_ROW + 1;
        let last = HEADER_ROW + report.buckets.len() as u32;

        let mut chart = Chart::new(ChartType::Line);
        chart.title().set_name("Housing Posts %");
        chart
            .add_series()
            .set_name("Housing Posts %")
            .set_categories((SHEET_NAME, first, 0, last, 0))
            .set_values((SHEET_NAME, first, 3, last, 3));
        chart.y_axis().set_name("Percentage (%)");

        worksheet
            .insert_chart(HEADER_ROW, 5, &chart)
            .map_err(|e| format!("グラフ挿入エラー: {}", e))?;
    }

    workbook
        .save_to_buffer()
        .map_err(|e| format!("Excel保存エラー: {}", e))
}
