//! 儀表板
//!
//! 啟動時載入一次資料，之後每次篩選條件改變都從不可變的原始記錄重新計算畫面。
//! 單一資料來源載入失敗時，對應區塊以替代訊息呈現，其餘區塊照常計算。

pub mod filters;
pub mod view;

pub use filters::Filters;
pub use view::{
    BusinessPoint, BusinessSection, DashboardView, MarketingSection, MissingSource,
    PlatformBreakdown, Section, SeriesPoint,
};

use crate::analytics::{
    align_series, compare_business, compare_marketing, AggregationConfig, Aggregator,
    BusinessMetrics, BusinessSummary, CostBreakdown, MarketingMetrics,
};
use crate::config::{ApplicationConfig, DashboardConfig, IngestionConfig};
use crate::data_ingestion::processor::csv_io::{CsvParser, CsvReaderConfig};
use crate::data_ingestion::{
    CsvError, CsvExporter, CsvReader, CsvResult, DataLoader, IngestionReport, Loaded, MarketingLoad,
};
use crate::domain_types::{
    AggregatedPeriod, BusinessRecord, BusinessTotals, DateRange, DomainError, MarketingRecord,
    MarketingTotals, Platform,
};
use chrono::NaiveDate;
use polars::prelude::{PolarsError, PolarsResult};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// 儀表板錯誤
#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("在 {0} 中找不到任何可用的資料")]
    NoData(PathBuf),

    #[error("沒有任何已載入的記錄")]
    Empty,

    #[error("營運數據無法使用: {0}")]
    BusinessUnavailable(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Csv(#[from] CsvError),

    #[error("統計計算失敗: {0}")]
    Analytics(#[from] PolarsError),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

/// 匯出的檔案
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFiles {
    pub data: PathBuf,
    pub summary: PathBuf,
    pub rows: usize,
}

/// 已載入的儀表板資料
#[derive(Debug, Clone)]
pub struct Dashboard {
    business: Result<Vec<BusinessRecord>, String>,
    marketing: Vec<MarketingRecord>,
    missing_platforms: Vec<MissingSource>,
    reports: Vec<IngestionReport>,
    load_notices: Vec<String>,
}

/// 依匯入設定建立資料載入器
pub fn loader_from_config(config: &IngestionConfig) -> DataLoader {
    let reader = CsvReader::new(CsvReaderConfig {
        separator: config.delimiter as u8,
        ..CsvReaderConfig::default()
    });
    DataLoader::new(reader, CsvParser::new(config.date_formats.clone()), config.on_row_error)
}

impl Dashboard {
    /// 從設定的資料目錄載入全部資料來源
    pub fn load(config: &ApplicationConfig) -> DashboardResult<Self> {
        let loader = loader_from_config(&config.ingestion);
        let directory = config.data.directory_path();
        info!("從 {} 載入儀表板資料", directory.display());

        let business = loader.load_business(config.data.business_path());
        let marketing = loader.load_marketing_dir(&directory);
        let dashboard = Self::from_loads(business, marketing);

        if !dashboard.has_data() {
            return Err(DashboardError::NoData(directory));
        }
        Ok(dashboard)
    }

    /// 由載入結果建立，載入失敗的來源轉為替代訊息
    pub fn from_loads(business: CsvResult<Loaded<BusinessRecord>>, marketing: MarketingLoad) -> Self {
        let mut reports = Vec::new();
        let mut load_notices = Vec::new();

        let business = match business {
            Ok(loaded) => {
                reports.push(loaded.report);
                Ok(loaded.records)
            }
            Err(e) => {
                warn!("營運數據載入失敗: {}", e);
                Err(e.to_string())
            }
        };

        reports.extend(marketing.reports);
        for report in reports.iter().filter(|r| r.has_errors()) {
            load_notices.push(format!(
                "{}: dropped {} of {} rows",
                report.source, report.dropped_records, report.total_records
            ));
        }

        let missing_platforms = marketing
            .failures
            .into_iter()
            .map(|(platform, error)| MissingSource {
                platform,
                reason: error.to_string(),
            })
            .collect();

        Self {
            business,
            marketing: marketing.records,
            missing_platforms,
            reports,
            load_notices,
        }
    }

    /// 直接由記錄建立
    pub fn from_records(business: Vec<BusinessRecord>, marketing: Vec<MarketingRecord>) -> Self {
        let mut business = business;
        business.sort_by_key(|r| r.date);
        Self {
            business: Ok(business),
            marketing,
            missing_platforms: Vec::new(),
            reports: Vec::new(),
            load_notices: Vec::new(),
        }
    }

    pub fn reports(&self) -> &[IngestionReport] {
        &self.reports
    }

    pub fn business_records(&self) -> &[BusinessRecord] {
        self.business.as_deref().unwrap_or(&[])
    }

    pub fn marketing_records(&self) -> &[MarketingRecord] {
        &self.marketing
    }

    pub fn missing_platforms(&self) -> &[MissingSource] {
        &self.missing_platforms
    }

    pub fn has_data(&self) -> bool {
        !self.business_records().is_empty() || !self.marketing.is_empty()
    }

    /// 所有資料來源涵蓋的日期範圍
    pub fn data_range(&self) -> Option<DateRange> {
        DateRange::spanning(
            self.business_records()
                .iter()
                .map(|r| r.date)
                .chain(self.marketing.iter().map(|r| r.date)),
        )
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.data_range().map(|range| range.end())
    }

    /// 以最新資料日為終點的最近 N 天
    pub fn last_n_days(&self, days: u32) -> DashboardResult<DateRange> {
        let anchor = self
            .latest_date()
            .ok_or(DashboardError::Empty)?;
        Ok(DateRange::last_n_days(anchor, days)?)
    }

    /// 依設定建立初始篩選條件
    pub fn default_filters(&self, config: &DashboardConfig) -> DashboardResult<Filters> {
        let filters = Filters::from_config(config);
        match config.default_window_days {
            Some(days) if self.has_data() => Ok(filters.with_range(self.last_n_days(days)?)),
            _ => Ok(filters),
        }
    }

    /// 資料中出現過的策略
    pub fn tactics(&self) -> BTreeSet<&str> {
        self.marketing.iter().map(|r| r.tactic.as_str()).collect()
    }

    /// 資料中出現過的州別
    pub fn states(&self) -> BTreeSet<&str> {
        self.marketing.iter().map(|r| r.state.as_str()).collect()
    }

    /// 篩選條件實際對應的日期區間
    pub fn effective_range(&self, filters: &Filters) -> Option<DateRange> {
        filters.range.or_else(|| self.data_range())
    }

    /// 區間內的營運記錄
    pub fn business_in(&self, range: &DateRange) -> Vec<BusinessRecord> {
        self.business_records()
            .iter()
            .filter(|r| range.contains(r.date))
            .cloned()
            .collect()
    }

    /// 符合平台、策略與州別條件的行銷記錄（不限日期）
    pub fn marketing_matching(&self, filters: &Filters) -> Vec<MarketingRecord> {
        self.marketing
            .iter()
            .filter(|r| filters.matches_marketing(r))
            .cloned()
            .collect()
    }

    /// 依篩選條件建立新的畫面
    pub fn view(&self, filters: &Filters) -> DashboardView {
        let range = self.effective_range(filters);
        let baseline_range = range.and_then(|r| r.baseline(filters.baseline));
        let mut notices = self.load_notices.clone();

        let (business, marketing) = match range {
            Some(range) => (
                self.business_section(filters, &range, baseline_range.as_ref(), &mut notices),
                self.marketing_section(filters, &range, baseline_range.as_ref(), &mut notices),
            ),
            None => (
                Section::Unavailable { reason: self.business_unavailable_reason() },
                Section::Unavailable { reason: self.marketing_unavailable_reason() },
            ),
        };

        debug!("重新計算儀表板: {}", filters.describe());

        DashboardView {
            filters: filters.clone(),
            range,
            baseline_range,
            business,
            marketing,
            notices,
        }
    }

    fn business_unavailable_reason(&self) -> String {
        match &self.business {
            Err(reason) => reason.clone(),
            Ok(_) => "no business records loaded".to_string(),
        }
    }

    fn marketing_unavailable_reason(&self) -> String {
        if self.missing_platforms.is_empty() {
            "no marketing records loaded".to_string()
        } else {
            self.missing_platforms
                .iter()
                .map(|m| format!("{}: {}", m.platform, m.reason))
                .collect::<Vec<_>>()
                .join("; ")
        }
    }

    fn business_section(
        &self,
        filters: &Filters,
        range: &DateRange,
        baseline_range: Option<&DateRange>,
        notices: &mut Vec<String>,
    ) -> Section<BusinessSection> {
        let records = match &self.business {
            Ok(records) => records,
            Err(reason) => return Section::Unavailable { reason: reason.clone() },
        };

        match self.compute_business(records, filters, range, baseline_range, notices) {
            Ok(section) => Section::Ready(section),
            Err(e) => {
                warn!("營運區塊計算失敗: {}", e);
                Section::Unavailable {
                    reason: format!("business metrics could not be computed: {}", e),
                }
            }
        }
    }

    fn compute_business(
        &self,
        records: &[BusinessRecord],
        filters: &Filters,
        range: &DateRange,
        baseline_range: Option<&DateRange>,
        notices: &mut Vec<String>,
    ) -> PolarsResult<BusinessSection> {
        let current: BusinessTotals = Aggregator::total(records, range)?;
        if current.days == 0 {
            notices.push(format!("No business records between {}", range));
        }

        let baseline: Option<BusinessTotals> = match baseline_range {
            Some(b) => Some(Aggregator::total(records, b)?).filter(|t: &BusinessTotals| t.days > 0),
            None => None,
        };
        if let (Some(b), None) = (baseline_range, &baseline) {
            notices.push(format!("No business baseline data for {}", b));
        }

        let series: Vec<AggregatedPeriod<BusinessTotals>> =
            Aggregator::aggregate(records, &AggregationConfig::new(*range, filters.granularity))?;
        let baseline_series: Vec<AggregatedPeriod<BusinessTotals>> = match baseline_range {
            Some(b) => Aggregator::aggregate(records, &AggregationConfig::new(*b, filters.granularity))?,
            None => Vec::new(),
        };

        let points = align_series(&series, &baseline_series)
            .into_iter()
            .map(|(period, previous)| {
                let metrics = BusinessMetrics::from_totals(&period.totals);
                BusinessPoint {
                    label: period.label(),
                    period_start: period.period_start,
                    revenue: period.totals.revenue,
                    gross_profit: period.totals.gross_profit,
                    orders: period.totals.orders,
                    new_orders: period.totals.new_orders,
                    new_customers: period.totals.new_customers,
                    profit_margin: metrics.profit_margin,
                    repeat_order_rate: metrics.repeat_order_rate,
                    baseline_revenue: previous.map(|p| p.totals.revenue.into()).unwrap_or_default(),
                }
            })
            .collect();

        let summary = BusinessSummary::describe(&self.business_in(range))?;

        Ok(BusinessSection {
            metrics: BusinessMetrics::from_totals(&current),
            comparison: compare_business(&current, baseline.as_ref()),
            series: points,
            cost_breakdown: CostBreakdown::from_summary(&summary),
            summary,
            totals: current,
        })
    }

    fn marketing_section(
        &self,
        filters: &Filters,
        range: &DateRange,
        baseline_range: Option<&DateRange>,
        notices: &mut Vec<String>,
    ) -> Section<MarketingSection> {
        if self.marketing.is_empty() && !self.missing_platforms.is_empty() {
            return Section::Unavailable { reason: self.marketing_unavailable_reason() };
        }

        match self.compute_marketing(filters, range, baseline_range, notices) {
            Ok(section) => Section::Ready(section),
            Err(e) => {
                warn!("行銷區塊計算失敗: {}", e);
                Section::Unavailable {
                    reason: format!("marketing metrics could not be computed: {}", e),
                }
            }
        }
    }

    fn compute_marketing(
        &self,
        filters: &Filters,
        range: &DateRange,
        baseline_range: Option<&DateRange>,
        notices: &mut Vec<String>,
    ) -> PolarsResult<MarketingSection> {
        let records = self.marketing_matching(filters);

        let current: MarketingTotals = Aggregator::total(&records, range)?;
        if current.rows == 0 {
            notices.push(format!("No marketing records match the filters between {}", range));
        }

        let baseline: Option<MarketingTotals> = match baseline_range {
            Some(b) => Some(Aggregator::total(&records, b)?).filter(|t: &MarketingTotals| t.rows > 0),
            None => None,
        };
        if let (Some(b), None, true) = (baseline_range, &baseline, current.rows > 0) {
            notices.push(format!("No marketing baseline data for {}", b));
        }

        let mut per_platform: BTreeMap<Platform, MarketingTotals> =
            Aggregator::total_by(&records, range, |r| r.platform)?;
        let mut roas_series: BTreeMap<Platform, Vec<AggregatedPeriod<MarketingTotals>>> =
            Aggregator::aggregate_by(
                &records,
                &AggregationConfig::new(*range, filters.granularity),
                |r| r.platform,
            )?;

        let platforms = Platform::all()
            .into_iter()
            .filter(|p| filters.platform_selected(*p))
            .filter(|p| !self.missing_platforms.iter().any(|m| m.platform == *p))
            .map(|platform| {
                let totals = per_platform.remove(&platform).unwrap_or_default();
                let series = roas_series.remove(&platform).unwrap_or_default();
                PlatformBreakdown {
                    platform,
                    metrics: MarketingMetrics::from_totals(&totals),
                    totals,
                    roas_series: series
                        .iter()
                        .map(|period| SeriesPoint {
                            label: period.label(),
                            value: MarketingMetrics::from_totals(&period.totals).roas,
                        })
                        .collect(),
                }
            })
            .collect();

        let missing = self
            .missing_platforms
            .iter()
            .filter(|m| filters.platform_selected(m.platform))
            .cloned()
            .collect();

        Ok(MarketingSection {
            metrics: MarketingMetrics::from_totals(&current),
            comparison: compare_marketing(&current, baseline.as_ref()),
            platforms,
            missing,
            totals: current,
        })
    }

    /// 匯出篩選後的營運數據與統計摘要
    ///
    /// 檔名為 `business_data_<YYYYMMDD>.csv` 與 `business_summary_<YYYYMMDD>.csv`。
    pub fn export(&self, filters: &Filters, dir: impl AsRef<Path>, stamp: NaiveDate) -> DashboardResult<ExportedFiles> {
        if let Err(reason) = &self.business {
            return Err(DashboardError::BusinessUnavailable(reason.clone()));
        }

        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(CsvError::from)?;

        let records = match self.effective_range(filters) {
            Some(range) => self.business_in(&range),
            None => Vec::new(),
        };
        let summary = BusinessSummary::describe(&records)?;

        let day = stamp.format("%Y%m%d");
        let data = dir.join(format!("business_data_{}.csv", day));
        let summary_path = dir.join(format!("business_summary_{}.csv", day));

        let rows = CsvExporter::write_file(&data, &records)?;
        CsvExporter::write_file(&summary_path, &summary.rows())?;

        info!("匯出完成: {} 與 {}", data.display(), summary_path.display());

        Ok(ExportedFiles {
            data,
            summary: summary_path,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::{Baseline, Granularity};
    use assert_matches::assert_matches;
    use chrono::Duration;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn business(date: NaiveDate, revenue: f64) -> BusinessRecord {
        BusinessRecord {
            date,
            order_count: 100,
            new_order_count: 30,
            new_customers: 25,
            total_revenue: revenue,
            gross_profit: revenue * 0.4,
            cogs: revenue * 0.6,
        }
    }

    fn marketing(date: NaiveDate, platform: Platform, spend: f64, revenue: f64) -> MarketingRecord {
        MarketingRecord {
            date,
            tactic: "ASC".to_string(),
            state: "CA".to_string(),
            campaign: "Winter".to_string(),
            impressions: 1000,
            clicks: 50,
            spend,
            attributed_revenue: revenue,
            platform,
        }
    }

    fn quarter() -> Dashboard {
        let start = date(2024, 1, 1);
        let business = (0..91).map(|i| business(start + Duration::days(i), 10000.0)).collect();
        let marketing = (0..91)
            .flat_map(|i| {
                let day = start + Duration::days(i);
                [
                    marketing(day, Platform::Facebook, 500.0, 2000.0),
                    marketing(day, Platform::Google, 100.0, 150.0),
                ]
            })
            .collect();
        Dashboard::from_records(business, marketing)
    }

    #[test]
    fn test_example_business_metrics() {
        let dashboard = Dashboard::from_records(vec![business(date(2024, 1, 1), 10000.0)], vec![]);
        let view = dashboard.view(&Filters::default());
        let section = view.business.ready().unwrap();

        assert_eq!(section.metrics.profit_margin.value(), Some(40.0));
        assert_eq!(section.metrics.repeat_order_rate.value(), Some(70.0));
    }

    #[test]
    fn test_example_facebook_roas() {
        let day = date(2024, 1, 1);
        let dashboard = Dashboard::from_records(vec![], vec![marketing(day, Platform::Facebook, 500.0, 2000.0)]);
        let view = dashboard.view(&Filters::default().with_platforms([Platform::Facebook]));
        let section = view.marketing.ready().unwrap();

        assert_eq!(section.metrics.roas.value(), Some(4.0));
        assert_eq!(section.metrics.roas_rating.label(), "Outstanding");
    }

    #[test]
    fn test_ninety_day_window_is_superset_of_thirty() {
        let dashboard = quarter();
        let thirty = dashboard.last_n_days(30).unwrap();
        let ninety = dashboard.last_n_days(90).unwrap();

        assert_eq!(thirty.end(), date(2024, 3, 31));
        assert_eq!(thirty.num_days(), 30);

        let in_thirty = dashboard.business_in(&thirty);
        let in_ninety = dashboard.business_in(&ninety);
        assert!(in_thirty.iter().all(|r| in_ninety.contains(r)));
        assert!(in_ninety.len() > in_thirty.len());
    }

    #[test]
    fn test_previous_period_comparison() {
        let dashboard = quarter();
        let range = DateRange::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        let view = dashboard.view(&Filters::default().with_range(range).with_granularity(Granularity::Week));

        assert_eq!(
            view.baseline_range,
            Some(DateRange::new(date(2024, 1, 3), date(2024, 1, 31)).unwrap())
        );
        let section = view.business.ready().unwrap();
        let revenue = section.comparison.iter().find(|d| d.label == "Total Revenue").unwrap();
        assert_eq!(revenue.change_pct.value(), Some(0.0));
        assert_eq!(section.series[0].period_start, date(2024, 1, 29));
    }

    #[test]
    fn test_yoy_without_history_is_na() {
        let dashboard = quarter();
        let view = dashboard.view(&Filters::default().with_baseline(Baseline::SamePeriodLastYear));
        let section = view.business.ready().unwrap();

        assert!(section.comparison.iter().all(|d| d.change_pct.to_string() == "N/A"));
        assert!(view.notices.iter().any(|n| n.contains("baseline")));
    }

    #[test]
    fn test_platform_filter_and_breakdown() {
        let dashboard = quarter();
        let view = dashboard.view(&Filters::default().with_platforms([Platform::Google]));
        let section = view.marketing.ready().unwrap();

        assert_eq!(section.platforms.len(), 1);
        assert_eq!(section.platforms[0].platform, Platform::Google);
        assert_eq!(section.metrics.roas.value(), Some(1.5));
        assert_eq!(section.metrics.roas_rating.label(), "Break-even");
    }

    #[test]
    fn test_missing_platform_placeholder() {
        let mut load = MarketingLoad::default();
        load.records.push(marketing(date(2024, 1, 1), Platform::Facebook, 10.0, 20.0));
        load.failures
            .push((Platform::TikTok, CsvError::FileNotFound(PathBuf::from("TikTok_clean.csv"))));

        let business = Ok(Loaded {
            records: vec![business(date(2024, 1, 1), 100.0)],
            report: IngestionReport::new("business.csv").finish(),
        });
        let dashboard = Dashboard::from_loads(business, load);
        let view = dashboard.view(&Filters::default());
        let section = view.marketing.ready().unwrap();

        assert_eq!(section.missing.len(), 1);
        assert_eq!(section.missing[0].platform, Platform::TikTok);
        assert!(section.platforms.iter().all(|p| p.platform != Platform::TikTok));
    }

    #[test]
    fn test_missing_business_placeholder() {
        let business = Err(CsvError::FileNotFound(PathBuf::from("business.csv")));
        let mut load = MarketingLoad::default();
        load.records.push(marketing(date(2024, 1, 1), Platform::Google, 10.0, 20.0));

        let dashboard = Dashboard::from_loads(business, load);
        let view = dashboard.view(&Filters::default());

        assert_matches!(view.business, Section::Unavailable { ref reason } if reason.contains("business.csv"));
        assert!(view.marketing.ready().is_some());
    }

    #[test]
    fn test_export_files() {
        let dashboard = quarter();
        let dir = tempdir().unwrap();
        let range = DateRange::new(date(2024, 3, 1), date(2024, 3, 10)).unwrap();
        let files = dashboard
            .export(&Filters::default().with_range(range), dir.path(), date(2024, 4, 2))
            .unwrap();

        assert_eq!(files.rows, 10);
        assert!(files.data.ends_with("business_data_20240402.csv"));
        let summary = std::fs::read_to_string(&files.summary).unwrap();
        assert!(summary.starts_with("statistic,orders,new_orders"));
        assert!(summary.contains("count,10.0"));
    }
}
