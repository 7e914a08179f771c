use anyhow::{anyhow, Context, Result};
use bizdash::config::{self, ApplicationConfig, LogConfig, Validator};
use bizdash::dashboard::{Dashboard, Filters};
use bizdash::data_ingestion::processor::csv_io::CsvParser;
use bizdash::data_ingestion::{PlatformCleaner, ReportFormatter};
use bizdash::domain_types::{Baseline, DateRange, Granularity, Platform};
use bizdash::presentation::{self, OutputFormat};
use bizdash::session::Session;
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

/// 營運與行銷 KPI 儀表板
#[derive(Parser, Debug)]
#[command(name = "bizdash", version, about = "Business and marketing KPI dashboard")]
struct Cli {
    /// 配置檔路徑（預設為 config/<BIZDASH_ENV>.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 覆寫資料目錄
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 互動式儀表板（預設）
    Dashboard {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        format: Option<OutputFormat>,
    },
    /// 輸出一次儀表板後結束
    Report {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long)]
        format: Option<OutputFormat>,

        /// 同時輸出各資料來源的載入報告
        #[arg(long)]
        ingestion: bool,
    },
    /// 匯出篩選後的營運數據與統計摘要
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, short, default_value = ".")]
        output: PathBuf,
    },
    /// 清理平台原始匯出，產生 <Platform>_clean.csv
    Clean {
        /// 原始檔所在目錄（預設為資料目錄）
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default, Clone)]
struct FilterArgs {
    /// 開始日期 YYYY-MM-DD
    #[arg(long)]
    start: Option<NaiveDate>,

    /// 結束日期 YYYY-MM-DD
    #[arg(long)]
    end: Option<NaiveDate>,

    /// 最近 N 天，優先於 --start/--end
    #[arg(long)]
    last: Option<u32>,

    #[arg(long)]
    granularity: Option<Granularity>,

    #[arg(long)]
    baseline: Option<Baseline>,

    #[arg(long = "platform")]
    platforms: Vec<Platform>,

    #[arg(long = "tactic")]
    tactics: Vec<String>,

    #[arg(long = "state")]
    states: Vec<String>,
}

impl FilterArgs {
    /// 套用到設定檔產生的初始條件上
    fn apply(&self, dashboard: &Dashboard, mut filters: Filters) -> Result<Filters> {
        if let Some(days) = self.last {
            filters.range = Some(dashboard.last_n_days(days)?);
        } else if self.start.is_some() || self.end.is_some() {
            let data = dashboard.data_range().ok_or_else(|| anyhow!("沒有任何已載入的記錄"))?;
            let start = self.start.unwrap_or(data.start());
            let end = self.end.unwrap_or(data.end());
            filters.range = Some(DateRange::new(start, end)?);
        }
        if let Some(granularity) = self.granularity {
            filters.granularity = granularity;
        }
        if let Some(baseline) = self.baseline {
            filters.baseline = baseline;
        }
        if !self.platforms.is_empty() {
            filters = filters.with_platforms(self.platforms.iter().copied());
        }
        if !self.tactics.is_empty() {
            filters = filters.with_tactics(self.tactics.iter().cloned());
        }
        if !self.states.is_empty() {
            filters = filters.with_states(self.states.iter().cloned());
        }
        Ok(filters)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // 初始化配置
    let mut app_config = ApplicationConfig::load_from_env(cli.config.as_deref()).context("無法載入配置")?;
    if let Some(dir) = &cli.data_dir {
        app_config.data.directory = dir.display().to_string();
        app_config.validate()?;
    }
    let app_config = config::init_config(app_config);

    // 初始化日誌系統，guard 需存活到程式結束
    let _guard = init_logging(&app_config.log)?;

    let result = run(cli.command, app_config);
    if let Err(e) = &result {
        error!("執行失敗: {:#}", e);
    }
    result
}

fn run(command: Option<Command>, app_config: &ApplicationConfig) -> Result<()> {
    let command = command.unwrap_or(Command::Dashboard {
        filters: FilterArgs::default(),
        format: None,
    });

    match command {
        Command::Dashboard { filters, format } => {
            let dashboard = load_dashboard(app_config)?;
            let filters = initial_filters(&dashboard, app_config, &filters)?;
            let format = format.unwrap_or(app_config.dashboard.output_format);

            let mut session = Session::new(&dashboard, filters, format, app_config.dashboard.chart_width);
            let stdin = io::stdin();
            session.run(stdin.lock(), io::stdout())?;
            info!("互動結束");
        }
        Command::Report {
            filters,
            format,
            ingestion,
        } => {
            let dashboard = load_dashboard(app_config)?;
            let filters = initial_filters(&dashboard, app_config, &filters)?;
            let format = format.unwrap_or(app_config.dashboard.output_format);

            let view = dashboard.view(&filters);
            println!("{}", presentation::render(&view, format, app_config.dashboard.chart_width)?);

            if ingestion {
                for report in dashboard.reports() {
                    match format {
                        OutputFormat::Text => println!("{}", ReportFormatter::format_text(report)),
                        OutputFormat::Json => println!("{}", ReportFormatter::format_json(report)?),
                    }
                }
            }
        }
        Command::Export { filters, output } => {
            let dashboard = load_dashboard(app_config)?;
            let filters = initial_filters(&dashboard, app_config, &filters)?;

            let files = dashboard
                .export(&filters, &output, Local::now().date_naive())
                .with_context(|| format!("無法匯出到 {}", output.display()))?;
            println!(
                "Exported {} rows to {} and {}",
                files.rows,
                files.data.display(),
                files.summary.display()
            );
        }
        Command::Clean { dir } => {
            let dir = dir.unwrap_or_else(|| app_config.data.directory_path());
            let cleaner = PlatformCleaner::new(CsvParser::new(app_config.ingestion.date_formats.clone()));

            let mut cleaned = 0;
            for (platform, result) in cleaner.clean_dir(&dir) {
                match result {
                    Ok(summary) => {
                        cleaned += 1;
                        println!("{}: {} rows → {}", platform, summary.rows, summary.output.display());
                    }
                    Err(e) => {
                        warn!("{} 清理失敗: {}", platform, e);
                        eprintln!("{}: {}", platform, e);
                    }
                }
            }
            if cleaned == 0 {
                return Err(anyhow!("{} 中沒有任何平台檔案可清理", dir.display()));
            }
        }
    }

    Ok(())
}

fn load_dashboard(app_config: &ApplicationConfig) -> Result<Dashboard> {
    let dashboard = Dashboard::load(app_config).context("無法載入儀表板資料")?;
    for report in dashboard.reports() {
        if report.has_errors() {
            warn!(
                "{}: 丟棄 {} / {} 筆記錄",
                report.source, report.dropped_records, report.total_records
            );
        }
    }
    Ok(dashboard)
}

fn initial_filters(dashboard: &Dashboard, app_config: &ApplicationConfig, args: &FilterArgs) -> Result<Filters> {
    let defaults = dashboard.default_filters(&app_config.dashboard)?;
    args.apply(dashboard, defaults)
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    // RUST_LOG 優先於配置檔
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(log_config.level.to_lowercase())?,
    };

    // 標準輸出保留給儀表板畫面，日誌寫到 stderr 或檔案
    let (writer, guard) = match &log_config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, &log_config.file_prefix);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(writer), Some(guard))
        }
        None => (BoxMakeWriter::new(io::stderr), None),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer);
    let initialized = if log_config.format.eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    initialized.map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(guard)
}
