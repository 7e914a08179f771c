//! KPI 卡片

use super::format;
use crate::analytics::{Direction, MetricDelta};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use serde::Serialize;

/// 一張 KPI 卡片：名稱、本期值、相對基準期的變化與方向
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCard {
    pub label: String,
    pub value: String,
    pub delta: String,
    pub direction: Direction,
}

impl KpiCard {
    pub fn from_delta(delta: &MetricDelta) -> Self {
        Self {
            label: delta.label.clone(),
            value: format::metric(delta.current, delta.kind),
            delta: format::change(delta.change_pct),
            direction: delta.direction,
        }
    }

    /// 在數值後附加說明，例如 ROAS 評級
    pub fn with_note(mut self, note: impl AsRef<str>) -> Self {
        self.value = format!("{} ({})", self.value, note.as_ref());
        self
    }

    fn text(&self) -> String {
        format!("{}\n{}\n{} {}", self.label, self.value, self.direction.symbol(), self.delta)
    }
}

/// 以每列 `per_row` 張的方格排列卡片
pub fn render_cards(cards: &[KpiCard], per_row: usize) -> String {
    if cards.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    for chunk in cards.chunks(per_row.max(1)) {
        table.add_row(
            chunk
                .iter()
                .map(|card| Cell::new(card.text()).set_alignment(CellAlignment::Center))
                .collect::<Vec<_>>(),
        );
    }

    table.to_string()
}
