use crate::error::Result;
use housing_filter_common::MonthlyReport;
use std::path::Path;

pub fn write_json(report: &MonthlyReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(output_path, json)?;
    Ok(())
}
