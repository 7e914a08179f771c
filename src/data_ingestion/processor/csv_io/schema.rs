//! 輸入檔案的欄位定義
//!
//! 標題比對不分大小寫，並將空白與連字號正規化為底線，
//! 因此原始匯出的 `# of orders`、`attributed revenue` 等標題都能對應到標準欄位。

use super::error::{CsvError, CsvResult};
use std::collections::HashMap;

/// 單一欄位定義
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    /// 標準欄位名稱
    pub name: &'static str,
    /// 其他可接受的標題（已正規化）
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: true }
    }

    const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        Self { name, aliases, required: false }
    }

    fn matches(&self, normalized_header: &str) -> bool {
        self.name == normalized_header || self.aliases.contains(&normalized_header)
    }
}

/// 檔案結構定義
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
}

/// 欄位名稱常數
pub struct ColumnName;

impl ColumnName {
    pub const DATE: &'static str = "date";
    pub const ORDERS: &'static str = "orders";
    pub const NEW_ORDERS: &'static str = "new_orders";
    pub const NEW_CUSTOMERS: &'static str = "new_customers";
    pub const TOTAL_REVENUE: &'static str = "total_revenue";
    pub const GROSS_PROFIT: &'static str = "gross_profit";
    pub const COGS: &'static str = "cogs";
    pub const TACTIC: &'static str = "tactic";
    pub const STATE: &'static str = "state";
    pub const CAMPAIGN: &'static str = "campaign";
    pub const IMPRESSION: &'static str = "impression";
    pub const CLICKS: &'static str = "clicks";
    pub const SPEND: &'static str = "spend";
    pub const ATTRIBUTED_REVENUE: &'static str = "attributed_revenue";
    pub const PLATFORM: &'static str = "platform";
}

impl Schema {
    /// `business.csv`
    pub const BUSINESS: Schema = Schema {
        name: "business",
        columns: &[
            ColumnSpec::required(ColumnName::DATE, &[]),
            ColumnSpec::required(ColumnName::ORDERS, &["#_of_orders", "order_count"]),
            ColumnSpec::required(ColumnName::NEW_ORDERS, &["#_of_new_orders", "new_order_count"]),
            ColumnSpec::required(ColumnName::NEW_CUSTOMERS, &["#_of_new_customers"]),
            ColumnSpec::required(ColumnName::TOTAL_REVENUE, &["revenue"]),
            ColumnSpec::required(ColumnName::GROSS_PROFIT, &[]),
            ColumnSpec::required(ColumnName::COGS, &[]),
        ],
    };

    /// `{Facebook,Google,TikTok}_clean.csv`
    pub const MARKETING: Schema = Schema {
        name: "marketing",
        columns: &[
            ColumnSpec::required(ColumnName::DATE, &[]),
            ColumnSpec::required(ColumnName::TACTIC, &[]),
            ColumnSpec::required(ColumnName::STATE, &[]),
            ColumnSpec::required(ColumnName::CAMPAIGN, &[]),
            ColumnSpec::required(ColumnName::IMPRESSION, &["impressions"]),
            ColumnSpec::required(ColumnName::CLICKS, &[]),
            ColumnSpec::required(ColumnName::SPEND, &[]),
            ColumnSpec::required(ColumnName::ATTRIBUTED_REVENUE, &[]),
            ColumnSpec::optional(ColumnName::PLATFORM, &[]),
        ],
    };

    /// 將標題列對應到欄位索引，缺少必要欄位時回傳錯誤
    pub fn resolve<'h, I>(&self, file: &str, headers: I) -> CsvResult<ColumnIndex>
    where
        I: IntoIterator<Item = &'h str>,
    {
        let normalized: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let mut index = HashMap::new();

        for spec in self.columns {
            match normalized.iter().position(|h| spec.matches(h)) {
                Some(position) => {
                    index.insert(spec.name, position);
                }
                None if spec.required => {
                    return Err(CsvError::MissingColumn {
                        file: file.to_string(),
                        column: spec.name.to_string(),
                    });
                }
                None => {}
            }
        }

        Ok(ColumnIndex(index))
    }
}

/// 標準欄位名稱到欄位位置的對應
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndex(HashMap<&'static str, usize>);

impl ColumnIndex {
    pub fn get(&self, column: &str) -> Option<usize> {
        self.0.get(column).copied()
    }
}

/// 標題正規化：去除前後空白、轉小寫、空白與連字號改為底線
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .trim_start_matches('\u{feff}')
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
