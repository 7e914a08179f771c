//! 聚合粒度定義
//!
//! 週以 ISO 週為準（週一開始），月以日曆月為準（每月 1 日開始）。
//! 每個分桶都以其第一個日曆日作為標籤。

use super::error::DomainError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 時間分桶大小
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    Month,
}

impl Granularity {
    /// 分桶寬度
    pub fn to_duration(&self) -> polars::prelude::Duration {
        match self {
            Granularity::Day => polars::prelude::Duration::parse("1d"),
            Granularity::Week => polars::prelude::Duration::parse("1w"),
            Granularity::Month => polars::prelude::Duration::parse("1mo"),
        }
    }

    /// 第一個分桶的對齊方式：週從週一開始，日與月對齊日曆邊界
    pub fn start_by(&self) -> polars::prelude::StartBy {
        match self {
            Granularity::Week => polars::prelude::StartBy::Monday,
            Granularity::Day | Granularity::Month => polars::prelude::StartBy::WindowBound,
        }
    }

    /// 分桶標籤，例如 `2024-01-15`、`2024-W03`、`2024-01`
    pub fn label(&self, period_start: NaiveDate) -> String {
        match self {
            Granularity::Day => period_start.format("%Y-%m-%d").to_string(),
            Granularity::Week => {
                let week = period_start.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
            Granularity::Month => period_start.format("%Y-%m").to_string(),
        }
    }

    /// 獲取顯示名稱
    pub fn display_name(&self) -> &'static str {
        match self {
            Granularity::Day => "Daily",
            Granularity::Week => "Weekly",
            Granularity::Month => "Monthly",
        }
    }
}

impl Default for Granularity {
    fn default() -> Self {
        Granularity::Day
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Day => write!(f, "day"),
            Granularity::Week => write!(f, "week"),
            Granularity::Month => write!(f, "month"),
        }
    }
}

impl FromStr for Granularity {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "d" | "day" | "daily" => Ok(Granularity::Day),
            "w" | "week" | "weekly" => Ok(Granularity::Week),
            "m" | "month" | "monthly" => Ok(Granularity::Month),
            other => Err(DomainError::UnknownGranularity(other.to_string())),
        }
    }
}
