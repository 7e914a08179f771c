//! 原始記錄類型

use super::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 行銷平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Platform {
    Facebook,
    Google,
    TikTok,
}

impl Platform {
    /// 獲取所有平台列表
    pub fn all() -> [Platform; 3] {
        [Platform::Facebook, Platform::Google, Platform::TikTok]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Platform::Facebook => "Facebook",
            Platform::Google => "Google",
            Platform::TikTok => "TikTok",
        }
    }

    /// 平台原始匯出檔名，例如 `Facebook.csv`
    pub fn raw_file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// 清理後的檔名，例如 `Facebook_clean.csv`
    pub fn clean_file_name(&self) -> String {
        format!("{}_clean.csv", self.name())
    }

    /// 從檔名推斷平台（`TikTok_clean.csv` → TikTok）
    pub fn from_file_name(path: &Path) -> Option<Platform> {
        let stem = path.file_stem()?.to_str()?.to_lowercase();
        let prefix = stem.split('_').next().unwrap_or_default();
        Platform::all()
            .into_iter()
            .find(|p| p.name().to_lowercase() == prefix)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "facebook" | "fb" | "meta" => Ok(Platform::Facebook),
            "google" => Ok(Platform::Google),
            "tiktok" => Ok(Platform::TikTok),
            _ => Err(DomainError::UnknownPlatform(s.trim().to_string())),
        }
    }
}

/// 每日營運記錄（每個日曆日一筆）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub date: NaiveDate,
    pub order_count: u64,
    pub new_order_count: u64,
    pub new_customers: u64,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub cogs: f64,
}

/// 行銷平台投放記錄（每天每個活動/策略一筆）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketingRecord {
    pub date: NaiveDate,
    pub tactic: String,
    pub state: String,
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub platform: Platform,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Facebook", Platform::Facebook)]
    #[case("tik tok", Platform::TikTok)]
    #[case(" GOOGLE ", Platform::Google)]
    fn test_platform_from_str(#[case] input: &str, #[case] expected: Platform) {
        assert_eq!(input.parse::<Platform>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_platform() {
        assert_eq!(
            "Snapchat".parse::<Platform>(),
            Err(DomainError::UnknownPlatform("Snapchat".to_string()))
        );
    }

    #[test]
    fn test_platform_from_file_name() {
        assert_eq!(Platform::from_file_name(Path::new("data/TikTok_clean.csv")), Some(Platform::TikTok));
        assert_eq!(Platform::from_file_name(Path::new("Google.csv")), Some(Platform::Google));
        assert_eq!(Platform::from_file_name(Path::new("business.csv")), None);
        assert_eq!(Platform::Facebook.clean_file_name(), "Facebook_clean.csv");
    }
}
