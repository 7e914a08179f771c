use chrono::NaiveDate;
use thiserror::Error;

/// 領域類型錯誤
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("無效的日期區間: 開始日期 {start} 晚於結束日期 {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("日期視窗天數必須大於 0")]
    EmptyWindow,

    #[error("未知的平台: {0}（可用: Facebook, Google, TikTok）")]
    UnknownPlatform(String),

    #[error("未知的聚合粒度: {0}（可用: day, week, month）")]
    UnknownGranularity(String),

    #[error("未知的比較基準: {0}（可用: previous, yoy）")]
    UnknownBaseline(String),

    #[error("未知的輸出格式: {0}（可用: text, json）")]
    UnknownFormat(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
