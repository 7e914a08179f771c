//! 呈現層
//!
//! 只負責把 `DashboardView` 轉成文字（表格、KPI 卡片、長條圖）或 JSON，不含任何計算邏輯。

pub mod chart;
pub mod format;
pub mod kpi;
pub mod table;
pub mod text;

pub use chart::BarChart;
pub use kpi::{render_cards, KpiCard};
pub use text::TextRenderer;

use crate::dashboard::DashboardView;
use crate::domain_types::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// 呈現錯誤
#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("JSON 序列化失敗: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文字輸出失敗")]
    Text(#[from] fmt::Error),
}

pub type PresentationResult<T> = Result<T, PresentationError>;

/// 輸出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(DomainError::UnknownFormat(other.to_string())),
        }
    }
}

/// 依格式輸出畫面
pub fn render(view: &DashboardView, format: OutputFormat, chart_width: usize) -> PresentationResult<String> {
    match format {
        OutputFormat::Text => Ok(TextRenderer::new(chart_width).render(view)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
    }
}
