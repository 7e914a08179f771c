//! 表格輸出

use super::format;
use crate::analytics::{BusinessSummary, CostBreakdown, MetricDelta, MetricKind};
use crate::dashboard::PlatformBreakdown;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

fn base_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header.into_iter().map(Into::into).collect::<Vec<Cell>>());
    table
}

fn right(text: impl ToString) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

/// 指標 / 本期 / 基準期 / 變化
pub fn comparison_table(deltas: &[MetricDelta]) -> Table {
    let mut table = base_table(["Metric", "Current", "Previous", "Change"]);
    for delta in deltas {
        table.add_row(vec![
            Cell::new(&delta.label),
            right(format::metric(delta.current, delta.kind)),
            right(format::metric(delta.previous, delta.kind)),
            right(format!("{} {}", delta.direction.symbol(), format::change(delta.change_pct))),
        ]);
    }
    table
}

/// 描述性統計，每個數值欄位一欄
pub fn summary_table(summary: &BusinessSummary) -> Table {
    let header = std::iter::once("".to_string()).chain(summary.columns.iter().map(|c| c.column.clone()));
    let mut table = base_table(header);

    for row in summary.rows() {
        let values = [
            row.orders,
            row.new_orders,
            row.new_customers,
            row.total_revenue,
            row.gross_profit,
            row.cogs,
        ];
        let mut cells = vec![Cell::new(row.statistic)];
        cells.extend(values.iter().map(|v| right(v.format_with(|x| format!("{:.2}", x)))));
        table.add_row(cells);
    }
    table
}

/// 平均 COGS 與平均毛利的占比
pub fn cost_table(breakdown: &CostBreakdown) -> Table {
    let mut table = base_table(["Category", "Average", "Share"]);
    table.add_row(vec![
        Cell::new("COGS"),
        right(format::metric(breakdown.average_cogs, MetricKind::Currency)),
        right(format::metric(breakdown.cogs_share, MetricKind::Percent)),
    ]);
    table.add_row(vec![
        Cell::new("Gross Profit"),
        right(format::metric(breakdown.average_gross_profit, MetricKind::Currency)),
        right(format::metric(breakdown.gross_profit_share, MetricKind::Percent)),
    ]);
    table
}

/// 各平台的行銷指標
pub fn platform_table(platforms: &[PlatformBreakdown]) -> Table {
    let mut table = base_table([
        "Platform",
        "Impressions",
        "Clicks",
        "Spend",
        "Attributed Revenue",
        "CTR",
        "CPC",
        "ROAS",
        "Rating",
    ]);
    for p in platforms {
        table.add_row(vec![
            Cell::new(p.platform.name()),
            right(format::compact(p.totals.impressions as f64)),
            right(format::compact(p.totals.clicks as f64)),
            right(format::currency(p.totals.spend)),
            right(format::currency(p.totals.attributed_revenue)),
            right(format::metric(p.metrics.ctr, MetricKind::Percent)),
            right(format::metric(p.metrics.cpc, MetricKind::Currency)),
            right(format::metric(p.metrics.roas, MetricKind::Ratio)),
            Cell::new(p.metrics.roas_rating.label()),
        ]);
    }
    table
}
