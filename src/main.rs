use clap::Parser;
use housing_filter::{analyzer, cli, config, error, export, scanner};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use std::io::BufRead;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("housing_filter={0},housing_filter_common={0}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { input, output, format, title, use_flair, y_max } => {
            println!("🏠 housing-filter - 月別集計\n");

            // 1. アーカイブ検出
            println!("[1/3] アーカイブをスキャン中...");
            let archives = scanner::scan_archives(&input)?;
            if archives.is_empty() {
                return Err(error::FilterError::NoArchiveFound(input.display().to_string()));
            }
            println!("✔ {}件のアーカイブを検出\n", archives.len());

            // 2. 集計
            println!("[2/3] 投稿を分類・集計中...");
            let classifier = config.classifier()?;
            let options = analyzer::AnalyzeOptions {
                use_flair: use_flair || config.use_flair,
                show_progress: true,
            };
            let report = analyzer::analyze_archives(&archives, &classifier, options)?;
            println!("✔ {}件の投稿を集計", report.total_records);
            if report.skipped_records > 0 {
                println!("  スキップ: {}件（不正な行・日時なし）", report.skipped_records);
            }
            println!("  月数: {}", report.buckets.len());
            if let Some((first, last)) = report.date_range() {
                println!("  期間: {} 〜 {}", first, last);
            }
            println!(
                "  住宅関連: {}件 ({:.2}%)\n",
                report.matched_records,
                report.overall_percentage()
            );

            // 3. 出力
            println!("[3/3] レポートを出力中... (形式: {})", format);
            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let report_options = export::ReportOptions {
                title: title.unwrap_or_else(|| config.default_title.clone()),
                y_max: y_max.unwrap_or(config.chart_y_max),
            };
            export::export_report(&report, &format, &output, &report_options)?;

            println!("\n✅ 集計完了");
        }

        Commands::Classify { titles, label, explain } => {
            let classifier = config.classifier()?;

            let titles = if titles.is_empty() {
                std::io::stdin()
                    .lock()
                    .lines()
                    .collect::<std::io::Result<Vec<_>>>()?
                    .into_iter()
                    .filter(|line| !line.trim().is_empty())
                    .collect()
            } else {
                titles
            };

            for title in &titles {
                let matched = classifier.classify(title, label.as_deref());
                println!("{} {}", if matched { "✔" } else { "-" }, title);

                if explain {
                    for hit in classifier.explain(title, label.as_deref()) {
                        println!("    [{}] {}", hit.target, hit.pattern);
                    }
                }
            }
        }

        Commands::Rules => {
            let classifier = config.classifier()?;

            println!("タイトルルール ({}件):", classifier.title_rules().len());
            for rule in classifier.title_rules().iter() {
                println!("  {}", rule.pattern());
            }
            println!("ラベルルール ({}件):", classifier.label_rules().len());
            for rule in classifier.label_rules().iter() {
                println!("  {}", rule.pattern());
            }
        }

        Commands::Config { show, init, reset } => {
            let path = Config::config_path()?;

            if reset {
                Config::default().save()?;
                println!("✔ 設定をデフォルトに戻しました: {}", path.display());
            } else if init {
                if path.exists() {
                    println!("設定ファイルは既に存在します: {}", path.display());
                } else {
                    config.save()?;
                    println!("✔ 設定ファイルを作成しました: {}", path.display());
                }
            }

            if show || !(init || reset) {
                let config = Config::load()?;
                println!("設定: {}", path.display());
                println!("  タイトルルール: {}件", config.title_patterns.len());
                println!("  ラベルルール: {}件", config.label_patterns.len());
                println!("  フレアを使用: {}", if config.use_flair { "はい" } else { "いいえ" });
                println!("  Y軸上限: {}%", config.chart_y_max);
                println!("  デフォルトタイトル: {}", config.default_title);
            }
        }
    }

    Ok(())
}
