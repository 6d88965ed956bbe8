use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "housing-filter")]
#[command(about = "r/UIUC 住宅関連投稿の分類・月別集計ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 投稿アーカイブ（NDJSON）を月別に集計してレポートを出力
    Analyze {
        /// .ndjson ファイル、または .ndjson を含むフォルダ
        #[arg(required = true)]
        input: PathBuf,

        /// 出力ファイル/ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 出力形式 (json/html/excel/png/all)
        #[arg(short, long, default_value = "html")]
        format: ExportFormat,

        /// レポートタイトル（省略時は設定の default_title）
        #[arg(short, long)]
        title: Option<String>,

        /// フレア（link_flair_text）もラベルルールで判定する
        #[arg(long)]
        use_flair: bool,

        /// グラフのY軸上限（%）
        #[arg(long)]
        y_max: Option<f64>,
    },

    /// タイトルを分類（省略時は標準入力から1行1件）
    Classify {
        /// 分類するタイトル
        titles: Vec<String>,

        /// ラベル（フレア）
        #[arg(short, long)]
        label: Option<String>,

        /// 一致したルールを表示
        #[arg(long)]
        explain: bool,
    },

    /// 有効なルール一覧を表示
    Rules,

    /// 設定を表示/初期化
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 設定ファイルを作成（既存なら何もしない）
        #[arg(long)]
        init: bool,

        /// 設定をデフォルトに戻す
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum ExportFormat {
    Json,
    #[default]
    Html,
    Excel,
    Png,
    All,
}

impl ExportFormat {
    pub fn includes(&self, other: &ExportFormat) -> bool {
        self == other || *self == ExportFormat::All
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "html" | "chart" => Ok(ExportFormat::Html),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "png" | "image" => Ok(ExportFormat::Png),
            "all" => Ok(ExportFormat::All),
            _ => Err(format!("Unknown format: {}. Use json, html, excel, png, or all", s)),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Html => write!(f, "html"),
            ExportFormat::Excel => write!(f, "excel"),
            ExportFormat::Png => write!(f, "png"),
            ExportFormat::All => write!(f, "all"),
        }
    }
}
