//! 互動式儀表板
//!
//! 逐行讀取指令，每次篩選條件改變都重新計算並輸出畫面。
//! 指令錯誤只顯示訊息，不會結束互動。

use crate::dashboard::{Dashboard, DashboardError, Filters};
use crate::domain_types::{Baseline, DateRange, DomainError, Granularity, Platform};
use crate::presentation::{self, OutputFormat, PresentationError};
use chrono::{Local, NaiveDate};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const HELP: &str = "\
Commands:
  range <start> <end>          date range, YYYY-MM-DD (inclusive)
  last <n>                     last n days up to the latest data date
  all                          full data range
  granularity <day|week|month> aggregation level
  baseline <previous|yoy>      comparison baseline
  platform <name..|all>        Facebook, Google, TikTok
  tactic <name..|all>          comma separated when names contain spaces
  state <name..|all>
  format <text|json>           output format
  show                         render the dashboard again
  export <dir>                 write filtered business data and summary CSVs
  help                         this message
  quit                         leave the dashboard";

/// 互動指令錯誤
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("未知的指令: {0}（輸入 help 查看可用指令）")]
    UnknownCommand(String),

    #[error("{command} 缺少參數，用法: {usage}")]
    MissingArgument { command: String, usage: &'static str },

    #[error("{command} 的參數 '{value}' 無效: {reason}")]
    InvalidArgument {
        command: String,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),

    #[error(transparent)]
    Render(#[from] PresentationError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// 多選條件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(Vec<T>),
}

/// 解析後的指令
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Range(DateRange),
    Last(u32),
    All,
    Granularity(Granularity),
    Baseline(Baseline),
    Platform(Selection<Platform>),
    Tactic(Selection<String>),
    State(Selection<String>),
    Format(OutputFormat),
    Show,
    Export(PathBuf),
    Help,
    Quit,
}

fn missing(command: &str, usage: &'static str) -> SessionError {
    SessionError::MissingArgument {
        command: command.to_string(),
        usage,
    }
}

fn invalid(command: &str, value: &str, reason: impl ToString) -> SessionError {
    SessionError::InvalidArgument {
        command: command.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_date(command: &str, raw: &str) -> SessionResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| invalid(command, raw, e))
}

/// 有逗號時以逗號分隔，否則以空白分隔
/// 以逗號分隔的名稱，名稱本身可以含空白（例如 `Prospecting Ads`）
fn split_names(rest: &str) -> Vec<String> {
    rest.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn selection(names: Vec<String>) -> Option<Selection<String>> {
    if names.is_empty() {
        None
    } else if names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        Some(Selection::All)
    } else {
        Some(Selection::Only(names))
    }
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let name = name.to_lowercase();
        let args: Vec<&str> = rest.split_whitespace().collect();

        match name.as_str() {
            "range" => match args.as_slice() {
                [start, end] => {
                    let start = parse_date("range", start)?;
                    let end = parse_date("range", end)?;
                    Ok(Command::Range(DateRange::new(start, end)?))
                }
                _ => Err(missing("range", "range <start> <end>")),
            },
            "last" => {
                let raw = args.first().ok_or_else(|| missing("last", "last <n>"))?;
                let days = raw.parse::<u32>().map_err(|e| invalid("last", raw, e))?;
                Ok(Command::Last(days))
            }
            "all" => Ok(Command::All),
            "granularity" | "g" => {
                let raw = args
                    .first()
                    .ok_or_else(|| missing("granularity", "granularity <day|week|month>"))?;
                Ok(Command::Granularity(raw.parse()?))
            }
            "baseline" | "b" => {
                let raw = args
                    .first()
                    .ok_or_else(|| missing("baseline", "baseline <previous|yoy>"))?;
                Ok(Command::Baseline(raw.parse()?))
            }
            "platform" | "platforms" => match selection(args.iter().flat_map(|a| split_names(a)).collect()) {
                None => Err(missing("platform", "platform <name..|all>")),
                Some(Selection::All) => Ok(Command::Platform(Selection::All)),
                Some(Selection::Only(names)) => {
                    let platforms = names
                        .iter()
                        .map(|n| n.parse::<Platform>())
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(Command::Platform(Selection::Only(platforms)))
                }
            },
            "tactic" | "tactics" => selection(split_names(rest))
                .map(Command::Tactic)
                .ok_or_else(|| missing("tactic", "tactic <name..|all>")),
            "state" | "states" => selection(split_names(rest))
                .map(Command::State)
                .ok_or_else(|| missing("state", "state <name..|all>")),
            "format" => {
                let raw = args.first().ok_or_else(|| missing("format", "format <text|json>"))?;
                Ok(Command::Format(raw.parse()?))
            }
            "show" | "" => Ok(Command::Show),
            "export" => {
                if rest.is_empty() {
                    return Err(missing("export", "export <dir>"));
                }
                Ok(Command::Export(PathBuf::from(rest)))
            }
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(SessionError::UnknownCommand(other.to_string())),
        }
    }
}

/// 指令執行結果
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// 重新輸出的畫面
    Render(String),
    Message(String),
    Quit,
}

/// 互動狀態：不可變的資料與目前的篩選條件
pub struct Session<'a> {
    dashboard: &'a Dashboard,
    filters: Filters,
    format: OutputFormat,
    chart_width: usize,
}

impl<'a> Session<'a> {
    pub fn new(dashboard: &'a Dashboard, filters: Filters, format: OutputFormat, chart_width: usize) -> Self {
        Self {
            dashboard,
            filters,
            format,
            chart_width,
        }
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// 以目前的篩選條件輸出畫面
    pub fn render(&self) -> SessionResult<String> {
        let view = self.dashboard.view(&self.filters);
        Ok(presentation::render(&view, self.format, self.chart_width)?)
    }

    /// 執行單一指令
    pub fn execute(&mut self, command: Command) -> SessionResult<Outcome> {
        debug!("執行指令: {:?}", command);

        match command {
            Command::Range(range) => self.filters.range = Some(range),
            Command::Last(days) => self.filters.range = Some(self.dashboard.last_n_days(days)?),
            Command::All => self.filters.range = None,
            Command::Granularity(granularity) => self.filters.granularity = granularity,
            Command::Baseline(baseline) => self.filters.baseline = baseline,
            Command::Platform(selection) => {
                self.filters.platforms = match selection {
                    Selection::All => Default::default(),
                    Selection::Only(platforms) => platforms.into_iter().collect(),
                }
            }
            Command::Tactic(selection) => {
                let known = self.dashboard.tactics();
                self.filters.tactics = self.checked_names("tactic", selection, &known)?;
            }
            Command::State(selection) => {
                let known = self.dashboard.states();
                self.filters.states = self.checked_names("state", selection, &known)?;
            }
            Command::Format(format) => self.format = format,
            Command::Show => {}
            Command::Export(dir) => {
                let files = self.dashboard.export(&self.filters, &dir, Local::now().date_naive())?;
                info!("已匯出 {} 筆營運數據", files.rows);
                return Ok(Outcome::Message(format!(
                    "Exported {} rows to {} and {}",
                    files.rows,
                    files.data.display(),
                    files.summary.display()
                )));
            }
            Command::Help => return Ok(Outcome::Message(HELP.to_string())),
            Command::Quit => return Ok(Outcome::Quit),
        }

        Ok(Outcome::Render(self.render()?))
    }

    fn checked_names(
        &self,
        command: &str,
        selection: Selection<String>,
        known: &std::collections::BTreeSet<&str>,
    ) -> SessionResult<std::collections::BTreeSet<String>> {
        match selection {
            Selection::All => Ok(Default::default()),
            Selection::Only(names) => {
                let mut selected = std::collections::BTreeSet::new();
                for name in names {
                    if known.contains(name.as_str()) {
                        selected.insert(name);
                        continue;
                    }

                    // 整段不是已知名稱時，改以空白拆成多個名稱
                    let words: Vec<&str> = name.split_whitespace().collect();
                    if words.len() > 1 && words.iter().all(|w| known.contains(w)) {
                        selected.extend(words.into_iter().map(str::to_string));
                        continue;
                    }

                    let available = known.iter().copied().collect::<Vec<_>>().join(", ");
                    return Err(invalid(command, &name, format!("available: {}", available)));
                }
                Ok(selected)
            }
        }
    }

    /// 解析並執行一行輸入
    pub fn handle(&mut self, line: &str) -> SessionResult<Outcome> {
        let command: Command = line.parse()?;
        self.execute(command)
    }

    /// 互動迴圈，直到 `quit` 或輸入結束
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        match self.render() {
            Ok(screen) => writeln!(output, "{}", screen)?,
            Err(e) => writeln!(output, "error: {}", e)?,
        }
        writeln!(output, "Type 'help' for commands.")?;

        let mut lines = input.lines();
        loop {
            write!(output, "bizdash> ")?;
            output.flush()?;

            let Some(line) = lines.next() else { break };
            let line = line?;

            match self.handle(&line) {
                Ok(Outcome::Render(screen)) => writeln!(output, "{}", screen)?,
                Ok(Outcome::Message(message)) => writeln!(output, "{}", message)?,
                Ok(Outcome::Quit) => break,
                Err(e) => {
                    warn!("指令失敗 '{}': {}", line.trim(), e);
                    writeln!(output, "error: {}", e)?;
                }
            }
        }

        writeln!(output)?;
        Ok(())
    }
}
