//! 文字長條圖

use super::format;
use crate::analytics::MetricKind;
use crate::domain_types::MetricValue;

const GLYPHS: [char; 3] = ['█', '▓', '░'];

/// 水平長條圖，每個標籤可有多個數列
#[derive(Debug, Clone)]
pub struct BarChart {
    title: String,
    legends: Vec<String>,
    rows: Vec<(String, Vec<MetricValue>)>,
    kind: MetricKind,
    width: usize,
}

impl BarChart {
    pub fn new(title: impl Into<String>, kind: MetricKind, width: usize) -> Self {
        Self {
            title: title.into(),
            legends: Vec::new(),
            rows: Vec::new(),
            kind,
            width,
        }
    }

    pub fn legends<I, S>(mut self, legends: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.legends = legends.into_iter().map(Into::into).collect();
        self
    }

    pub fn row(mut self, label: impl Into<String>, values: Vec<MetricValue>) -> Self {
        self.rows.push((label.into(), values));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 以所有數列中的最大值為滿格；負值與 N/A 不畫長條
    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.title);

        if self.legends.len() > 1 {
            let legend = self
                .legends
                .iter()
                .zip(GLYPHS.iter().cycle())
                .map(|(name, glyph)| format!("{} {}", glyph, name))
                .collect::<Vec<_>>()
                .join("  ");
            out.push_str(&format!("  {}\n", legend));
        }

        if self.rows.is_empty() {
            out.push_str("  (no data)\n");
            return out;
        }

        let max = self
            .rows
            .iter()
            .flat_map(|(_, values)| values.iter().filter_map(|v| v.value()))
            .fold(0.0_f64, f64::max);
        let label_width = self.rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);

        for (label, values) in &self.rows {
            for (idx, (value, glyph)) in values.iter().zip(GLYPHS.iter().cycle()).enumerate() {
                let shown_label = if idx == 0 { label.as_str() } else { "" };
                let bar = match value.value() {
                    Some(v) if v > 0.0 && max > 0.0 => {
                        let len = ((v / max) * self.width as f64).round() as usize;
                        glyph.to_string().repeat(len.max(1))
                    }
                    _ => String::new(),
                };
                out.push_str(&format!(
                    "  {:<label_width$} │{} {}\n",
                    shown_label,
                    bar,
                    format::metric(*value, self.kind),
                    label_width = label_width
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_scale_to_max() {
        let chart = BarChart::new("Revenue", MetricKind::Count, 10)
            .row("2024-01", vec![MetricValue::new(50.0)])
            .row("2024-02", vec![MetricValue::new(100.0)]);
        let rendered = chart.render();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Revenue");
        assert!(lines[1].contains(&"█".repeat(5)));
        assert!(!lines[1].contains(&"█".repeat(6)));
        assert!(lines[2].contains(&"█".repeat(10)));
    }

    #[test]
    fn test_grouped_series_and_na() {
        let chart = BarChart::new("ROAS", MetricKind::Ratio, 8)
            .legends(["Facebook", "Google"])
            .row("2024-01-01", vec![MetricValue::new(4.0), MetricValue::NA]);
        let rendered = chart.render();

        assert!(rendered.contains("█ Facebook  ▓ Google"));
        assert!(rendered.contains("4.00x"));
        assert!(rendered.contains("│ N/A"));
    }

    #[test]
    fn test_empty_chart() {
        let chart = BarChart::new("Orders", MetricKind::Count, 10);
        assert!(chart.is_empty());
        assert!(chart.render().contains("(no data)"));
    }
}
