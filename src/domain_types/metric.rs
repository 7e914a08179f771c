//! 可能未定義的指標值
//!
//! 除以零等無法計算的情況以「缺值」表示，而不是 NaN 或無限大，
//! 所有輸出格式都會將缺值統一呈現為 `N/A`。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 未定義指標的顯示文字
pub const NOT_AVAILABLE: &str = "N/A";

/// 帶標記的選擇性數值
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricValue(Option<f64>);

impl MetricValue {
    /// 未定義的指標
    pub const NA: MetricValue = MetricValue(None);

    /// 建立指標值，非有限數值一律視為未定義
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(Some(value))
        } else {
            Self::NA
        }
    }

    /// 安全除法，分母為零時回傳未定義
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            Self::NA
        } else {
            Self::new(numerator / denominator)
        }
    }

    /// 百分比（numerator / denominator × 100）
    pub fn percentage(numerator: f64, denominator: f64) -> Self {
        Self::ratio(numerator, denominator).map(|v| v * 100.0)
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_defined(&self) -> bool {
        self.0.is_some()
    }

    pub fn map<F: FnOnce(f64) -> f64>(self, f: F) -> Self {
        match self.0 {
            Some(v) => Self::new(f(v)),
            None => Self::NA,
        }
    }

    /// 以指定格式化函數輸出，未定義時輸出 `N/A`
    pub fn format_with<F: FnOnce(f64) -> String>(&self, f: F) -> String {
        match self.0 {
            Some(v) => f(v),
            None => NOT_AVAILABLE.to_string(),
        }
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(value: Option<f64>) -> Self {
        value.map(Self::new).unwrap_or(Self::NA)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.2}", v),
            None => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}
