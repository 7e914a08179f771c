//! 儀表板畫面資料
//!
//! 每次篩選條件改變都會重新建立一份 `DashboardView`，呈現層只讀取這裡的資料。

use super::filters::Filters;
use crate::analytics::{
    BusinessMetrics, BusinessSummary, CostBreakdown, MarketingMetrics, MetricDelta,
};
use crate::domain_types::{BusinessTotals, DateRange, MarketingTotals, MetricValue, Platform};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 資料來源可能無法載入，此時顯示替代訊息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Ready(T),
    Unavailable { reason: String },
}

impl<T> Section<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Section::Ready(inner) => Some(inner),
            Section::Unavailable { .. } => None,
        }
    }
}

/// 單一分桶的營運數據
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessPoint {
    pub label: String,
    pub period_start: NaiveDate,
    pub revenue: f64,
    pub gross_profit: f64,
    pub orders: u64,
    pub new_orders: u64,
    pub new_customers: u64,
    pub profit_margin: MetricValue,
    pub repeat_order_rate: MetricValue,
    /// 依位置對齊的基準期營收
    pub baseline_revenue: MetricValue,
}

/// 營運區塊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessSection {
    pub totals: BusinessTotals,
    pub metrics: BusinessMetrics,
    pub comparison: Vec<MetricDelta>,
    pub series: Vec<BusinessPoint>,
    pub cost_breakdown: CostBreakdown,
    pub summary: BusinessSummary,
}

/// 圖表上的一個點
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: MetricValue,
}

/// 單一平台的行銷指標
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformBreakdown {
    pub platform: Platform,
    pub totals: MarketingTotals,
    pub metrics: MarketingMetrics,
    /// 各分桶的 ROAS
    pub roas_series: Vec<SeriesPoint>,
}

/// 無法載入的平台
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingSource {
    pub platform: Platform,
    pub reason: String,
}

/// 行銷區塊
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingSection {
    pub totals: MarketingTotals,
    pub metrics: MarketingMetrics,
    pub comparison: Vec<MetricDelta>,
    pub platforms: Vec<PlatformBreakdown>,
    pub missing: Vec<MissingSource>,
}

/// 完整的儀表板畫面
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub filters: Filters,
    /// 實際套用的日期區間，沒有任何資料時為 None
    pub range: Option<DateRange>,
    pub baseline_range: Option<DateRange>,
    pub business: Section<BusinessSection>,
    pub marketing: Section<MarketingSection>,
    pub notices: Vec<String>,
}
