//! 領域類型模組
//!
//! 定義儀表板使用的所有基礎資料結構：原始記錄、聚合粒度、日期區間、
//! 比較基準以及「可能未定義」的指標值。

pub mod error;
pub mod granularity;
pub mod metric;
pub mod period;
pub mod records;

pub use error::{DomainError, DomainResult};
pub use granularity::Granularity;
pub use metric::MetricValue;
pub use period::{
    AggregatedPeriod, Baseline, BusinessTotals, DateRange, Dated, MarketingTotals, Measured, Totals,
};
pub use records::{BusinessRecord, MarketingRecord, Platform};
