//! 數字格式化

use crate::analytics::MetricKind;
use crate::domain_types::MetricValue;

/// 四捨五入到整數並加上千分位，例如 `12,345`
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// ≥1M 顯示 `1.2M`，≥1K 顯示 `3.4K`，其餘顯示千分位整數
pub fn compact(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{}{:.1}M", sign, abs / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{}{:.1}K", sign, abs / 1_000.0)
    } else {
        group_thousands(value)
    }
}

/// 金額：千元以上用縮寫，以下保留兩位小數
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let abs = value.abs();
    if abs >= 1_000.0 {
        format!("{}${}", sign, compact(abs))
    } else {
        format!("{}${:.2}", sign, abs)
    }
}

/// 依指標型態格式化，未定義時輸出 `N/A`
pub fn metric(value: MetricValue, kind: MetricKind) -> String {
    value.format_with(|v| match kind {
        MetricKind::Currency => currency(v),
        MetricKind::Count => compact(v),
        MetricKind::Percent => format!("{:.1}%", v),
        MetricKind::Ratio => format!("{:.2}x", v),
    })
}

/// 帶正負號的變化百分比，例如 `+10.0%`
pub fn change(value: MetricValue) -> String {
    value.format_with(|v| format!("{:+.1}%", v))
}
