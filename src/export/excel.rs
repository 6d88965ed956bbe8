//! Excel出力
//!
//! シート生成は共通ライブラリ（excel_core）に任せ、ここではファイルに保存するだけ

use crate::error::{FilterError, Result};
use housing_filter_common::export::excel_core;
use housing_filter_common::MonthlyReport;
use std::path::Path;

pub fn generate_excel(report: &MonthlyReport, output_path: &Path, title: &str) -> Result<()> {
    let buffer = excel_core::generate_monthly_excel_buffer(report, title).map_err(FilterError::ExcelGeneration)?;
    std::fs::write(output_path, buffer)?;
    Ok(())
}
