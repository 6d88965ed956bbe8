use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("アーカイブ(.ndjson)が見つかりません: {0}")]
    NoArchiveFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("Excel生成エラー: {0}")]
    ExcelGeneration(String),

    #[error("グラフ画像生成エラー: {0}")]
    ChartGeneration(String),

    #[error(transparent)]
    Common(#[from] housing_filter_common::Error),
}

pub type Result<T> = std::result::Result<T, FilterError>;
