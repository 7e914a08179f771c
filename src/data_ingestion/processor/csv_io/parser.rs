//! CSV 資料解析器
//!
//! 將 `RawTable` 中的字串欄位轉換為強型別記錄。

use super::error::{CsvError, CsvResult};
use super::reader::{RawRow, RawTable};
use super::schema::ColumnName;
use crate::domain_types::{BusinessRecord, MarketingRecord, Platform};
use chrono::{NaiveDate, NaiveDateTime};

/// 預設日期格式
pub const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// 帶時間的格式，時間部分會被捨去
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// CSV 解析器
#[derive(Debug, Clone)]
pub struct CsvParser {
    date_formats: Vec<String>,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl CsvParser {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self { date_formats }
    }

    /// 解析營運數據列
    pub fn parse_business_row(&self, table: &RawTable, row: &RawRow) -> CsvResult<BusinessRecord> {
        let ctx = RowContext { table, row };

        Ok(BusinessRecord {
            date: self.parse_date(&ctx, ColumnName::DATE)?,
            order_count: parse_count(&ctx, ColumnName::ORDERS)?,
            new_order_count: parse_count(&ctx, ColumnName::NEW_ORDERS)?,
            new_customers: parse_count(&ctx, ColumnName::NEW_CUSTOMERS)?,
            total_revenue: parse_amount(&ctx, ColumnName::TOTAL_REVENUE)?,
            gross_profit: parse_amount(&ctx, ColumnName::GROSS_PROFIT)?,
            cogs: parse_amount(&ctx, ColumnName::COGS)?,
        })
    }

    /// 解析行銷數據列
    ///
    /// `platform` 欄位存在且有值時以其為準，否則使用 `fallback`（通常由檔名推斷）。
    pub fn parse_marketing_row(
        &self,
        table: &RawTable,
        row: &RawRow,
        fallback: Option<Platform>,
    ) -> CsvResult<MarketingRecord> {
        let ctx = RowContext { table, row };

        let raw_platform = ctx.value(ColumnName::PLATFORM);
        let platform = if raw_platform.is_empty() {
            fallback.ok_or_else(|| ctx.error(ColumnName::PLATFORM, "無法判斷平台".to_string()))?
        } else {
            raw_platform
                .parse::<Platform>()
                .map_err(|e| ctx.error(ColumnName::PLATFORM, e.to_string()))?
        };

        Ok(MarketingRecord {
            date: self.parse_date(&ctx, ColumnName::DATE)?,
            tactic: ctx.value(ColumnName::TACTIC).to_string(),
            state: ctx.value(ColumnName::STATE).to_string(),
            campaign: ctx.value(ColumnName::CAMPAIGN).to_string(),
            impressions: parse_count(&ctx, ColumnName::IMPRESSION)?,
            clicks: parse_count(&ctx, ColumnName::CLICKS)?,
            spend: parse_amount(&ctx, ColumnName::SPEND)?,
            attributed_revenue: parse_amount(&ctx, ColumnName::ATTRIBUTED_REVENUE)?,
            platform,
        })
    }

    /// 嘗試以設定的格式解析日期字串
    pub fn parse_date_str(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                DATETIME_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
    }

    fn parse_date(&self, ctx: &RowContext<'_>, column: &str) -> CsvResult<NaiveDate> {
        let raw = ctx.value(column);
        self.parse_date_str(raw)
            .ok_or_else(|| ctx.error(column, "無法解析的日期格式".to_string()))
    }
}

struct RowContext<'a> {
    table: &'a RawTable,
    row: &'a RawRow,
}

impl<'a> RowContext<'a> {
    fn value(&self, column: &str) -> &'a str {
        self.table.field(self.row, column)
    }

    fn error(&self, column: &str, reason: String) -> CsvError {
        CsvError::ParseError {
            file: self.table.source.clone(),
            line: self.row.line,
            column: column.to_string(),
            value: self.value(column).to_string(),
            reason,
        }
    }
}

/// 去除千分位與貨幣符號
fn clean_number(raw: &str) -> String {
    raw.trim().chars().filter(|c| *c != ',' && *c != '$').collect()
}

/// 單列計數上限，加總千萬列仍不會溢位
pub const MAX_COUNT: u64 = 1_000_000_000_000;

fn parse_count(ctx: &RowContext<'_>, column: &str) -> CsvResult<u64> {
    let cleaned = clean_number(ctx.value(column));
    if cleaned.is_empty() {
        return Err(ctx.error(column, "缺少數值".to_string()));
    }

    let value = match cleaned.parse::<u64>() {
        Ok(value) => value,
        // 部分匯出會把整數寫成 `100.0`
        Err(_) => match cleaned.parse::<f64>() {
            Ok(value) if value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 => value as u64,
            _ => return Err(ctx.error(column, "必須為非負整數".to_string())),
        },
    };

    if value > MAX_COUNT {
        return Err(ctx.error(column, format!("超過上限 {}", MAX_COUNT)));
    }
    Ok(value)
}

fn parse_amount(ctx: &RowContext<'_>, column: &str) -> CsvResult<f64> {
    let cleaned = clean_number(ctx.value(column));
    if cleaned.is_empty() {
        return Err(ctx.error(column, "缺少數值".to_string()));
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        Ok(_) => Err(ctx.error(column, "無效的數值（NaN 或無限大）".to_string())),
        Err(_) => Err(ctx.error(column, "無法解析的數值".to_string())),
    }
}
