//! 終端機文字輸出

use super::chart::BarChart;
use super::kpi::{render_cards, KpiCard};
use super::table;
use crate::analytics::{MetricDelta, MetricKind};
use crate::dashboard::{BusinessSection, DashboardView, MarketingSection, Section};
use crate::domain_types::MetricValue;
use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

const BUSINESS_CARDS: [&str; 6] = [
    "Total Revenue",
    "Gross Profit",
    "Total Orders",
    "New Customers",
    "Profit Margin",
    "Repeat Order Rate",
];

/// 將 `DashboardView` 輸出為文字
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    chart_width: usize,
}

impl TextRenderer {
    pub fn new(chart_width: usize) -> Self {
        Self { chart_width }
    }

    pub fn render(&self, view: &DashboardView) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.header(&mut out, view)?;

        match &view.business {
            Section::Ready(section) => self.business(&mut out, section)?,
            Section::Unavailable { reason } => placeholder(&mut out, "Business Performance", reason)?,
        }

        match &view.marketing {
            Section::Ready(section) => self.marketing(&mut out, section)?,
            Section::Unavailable { reason } => placeholder(&mut out, "Marketing Performance", reason)?,
        }

        Ok(out)
    }

    fn header(&self, out: &mut String, view: &DashboardView) -> fmt::Result {
        writeln!(out, "📊 Business Performance Dashboard")?;
        match view.range {
            Some(range) => writeln!(out, "Period:   {} ({} days)", range, range.num_days())?,
            None => writeln!(out, "Period:   N/A")?,
        }
        if let Some(baseline) = view.baseline_range {
            writeln!(out, "Baseline: {}", baseline)?;
        }
        writeln!(out, "Filters:  {}", view.filters.describe())?;

        for notice in &view.notices {
            writeln!(out, "⚠ {}", notice)?;
        }
        writeln!(out)
    }

    fn business(&self, out: &mut String, section: &BusinessSection) -> fmt::Result {
        section_title(out, "📈 Key Performance Metrics")?;
        let cards: Vec<KpiCard> = BUSINESS_CARDS
            .iter()
            .filter_map(|label| find(&section.comparison, label))
            .map(KpiCard::from_delta)
            .collect();
        writeln!(out, "{}", render_cards(&cards, 3))?;

        section_title(out, "📈 Revenue & Profit Trends")?;
        let trend = section.series.iter().fold(
            BarChart::new("Revenue vs Gross Profit", MetricKind::Currency, self.chart_width)
                .legends(["Total Revenue", "Gross Profit", "Baseline Revenue"]),
            |chart, p| {
                chart.row(
                    p.label.clone(),
                    vec![p.revenue.into(), p.gross_profit.into(), p.baseline_revenue],
                )
            },
        );
        out.push_str(&trend.render());

        section_title(out, "📦 Orders Analysis")?;
        let orders = section.series.iter().fold(
            BarChart::new("Orders vs New Orders", MetricKind::Count, self.chart_width)
                .legends(["Orders", "New Orders"]),
            |chart, p| chart.row(p.label.clone(), vec![count(p.orders), count(p.new_orders)]),
        );
        out.push_str(&orders.render());

        section_title(out, "👥 Customer Acquisition")?;
        let customers = section.series.iter().fold(
            BarChart::new("New Customers", MetricKind::Count, self.chart_width),
            |chart, p| chart.row(p.label.clone(), vec![count(p.new_customers)]),
        );
        out.push_str(&customers.render());

        section_title(out, "💰 Cost Structure Analysis")?;
        writeln!(out, "{}", table::cost_table(&section.cost_breakdown))?;

        section_title(out, "🔁 Period Comparison")?;
        writeln!(out, "{}", table::comparison_table(&section.comparison))?;

        section_title(out, "📋 Summary Statistics")?;
        writeln!(out, "{}", table::summary_table(&section.summary))
    }

    fn marketing(&self, out: &mut String, section: &MarketingSection) -> fmt::Result {
        section_title(out, "📣 Marketing Performance")?;
        let cards: Vec<KpiCard> = section
            .comparison
            .iter()
            .map(|delta| {
                let card = KpiCard::from_delta(delta);
                if delta.kind == MetricKind::Ratio {
                    card.with_note(section.metrics.roas_rating.label())
                } else {
                    card
                }
            })
            .collect();
        writeln!(out, "{}", render_cards(&cards, 4))?;

        for missing in &section.missing {
            writeln!(out, "⚠ {} data unavailable: {}", missing.platform, missing.reason)?;
        }

        if !section.platforms.is_empty() {
            section_title(out, "🧭 Platform Breakdown")?;
            writeln!(out, "{}", table::platform_table(&section.platforms))?;

            // 以分桶標籤對齊各平台的 ROAS
            let mut by_label: BTreeMap<&str, Vec<MetricValue>> = BTreeMap::new();
            for (idx, platform) in section.platforms.iter().enumerate() {
                for point in &platform.roas_series {
                    let values = by_label
                        .entry(point.label.as_str())
                        .or_insert_with(|| vec![MetricValue::NA; section.platforms.len()]);
                    values[idx] = point.value;
                }
            }
            let chart = by_label.into_iter().fold(
                BarChart::new("ROAS by Platform", MetricKind::Ratio, self.chart_width)
                    .legends(section.platforms.iter().map(|p| p.platform.name())),
                |chart, (label, values)| chart.row(label, values),
            );
            out.push_str(&chart.render());
        }
        Ok(())
    }
}

fn find<'a>(deltas: &'a [MetricDelta], label: &str) -> Option<&'a MetricDelta> {
    deltas.iter().find(|d| d.label == label)
}

fn count(value: u64) -> MetricValue {
    MetricValue::new(value as f64)
}

fn section_title(out: &mut String, title: &str) -> fmt::Result {
    writeln!(out, "\n{}\n{}", title, "─".repeat(title.chars().count().max(20)))
}

fn placeholder(out: &mut String, title: &str, reason: &str) -> fmt::Result {
    section_title(out, title)?;
    writeln!(out, "⚠ Data unavailable: {}", reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::{Dashboard, Filters};
    use crate::domain_types::{BusinessRecord, MarketingRecord, Platform};
    use chrono::NaiveDate;

    fn dashboard() -> Dashboard {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Dashboard::from_records(
            vec![BusinessRecord {
                date,
                order_count: 100,
                new_order_count: 30,
                new_customers: 25,
                total_revenue: 10000.0,
                gross_profit: 4000.0,
                cogs: 6000.0,
            }],
            vec![MarketingRecord {
                date,
                tactic: "ASC".to_string(),
                state: "CA".to_string(),
                campaign: "Winter".to_string(),
                impressions: 10_000,
                clicks: 250,
                spend: 500.0,
                attributed_revenue: 2000.0,
                platform: Platform::Facebook,
            }],
        )
    }

    #[test]
    fn test_render_full_view() {
        let view = dashboard().view(&Filters::default());
        let rendered = TextRenderer::new(20).render(&view).unwrap();

        assert!(rendered.contains("Period:   2024-01-01 → 2024-01-01 (1 days)"));
        assert!(rendered.contains("40.0%"));
        assert!(rendered.contains("70.0%"));
        assert!(rendered.contains("4.00x (Outstanding)"));
        assert!(rendered.contains("ROAS by Platform"));
        assert!(rendered.contains("Summary Statistics"));
    }

    #[test]
    fn test_placeholder_for_unavailable_section() {
        let mut view = dashboard().view(&Filters::default());
        view.marketing = Section::Unavailable { reason: "找不到檔案: Google_clean.csv".to_string() };
        let rendered = TextRenderer::new(20).render(&view).unwrap();

        assert!(rendered.contains("⚠ Data unavailable: 找不到檔案: Google_clean.csv"));
        assert!(!rendered.contains("ROAS by Platform"));
    }
}
