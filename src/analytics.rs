//! 分析模組：分桶聚合、衍生指標、期間比較與統計摘要

pub mod aggregator;
pub mod comparison;
pub mod frame;
pub mod metrics;
pub mod summary;

pub use aggregator::{AggregationConfig, Aggregator};
pub use comparison::{align_series, compare_business, compare_marketing, Direction, MetricDelta, MetricKind};
pub use metrics::{BusinessMetrics, MarketingMetrics, RoasRating};
pub use summary::{BusinessSummary, ColumnStats, CostBreakdown, DescriptiveStats, SummaryRow};
