//! 儀表板篩選條件

use crate::config::DashboardConfig;
use crate::domain_types::{Baseline, DateRange, Granularity, MarketingRecord, Platform};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 目前套用的篩選條件
///
/// 空集合代表「全部」。`range` 為 None 時使用資料的完整日期範圍。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Filters {
    pub range: Option<DateRange>,
    pub granularity: Granularity,
    pub baseline: Baseline,
    pub platforms: BTreeSet<Platform>,
    pub tactics: BTreeSet<String>,
    pub states: BTreeSet<String>,
}

impl Filters {
    /// 以設定檔的預設粒度與比較基準建立
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            granularity: config.default_granularity,
            baseline: config.default_baseline,
            ..Self::default()
        }
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_baseline(mut self, baseline: Baseline) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_platforms<I: IntoIterator<Item = Platform>>(mut self, platforms: I) -> Self {
        self.platforms = platforms.into_iter().collect();
        self
    }

    pub fn with_tactics<I: IntoIterator<Item = String>>(mut self, tactics: I) -> Self {
        self.tactics = tactics.into_iter().collect();
        self
    }

    pub fn with_states<I: IntoIterator<Item = String>>(mut self, states: I) -> Self {
        self.states = states.into_iter().collect();
        self
    }

    /// 行銷記錄是否符合平台、策略與州別條件（不含日期）
    pub fn matches_marketing(&self, record: &MarketingRecord) -> bool {
        (self.platforms.is_empty() || self.platforms.contains(&record.platform))
            && (self.tactics.is_empty() || self.tactics.contains(&record.tactic))
            && (self.states.is_empty() || self.states.contains(&record.state))
    }

    pub fn platform_selected(&self, platform: Platform) -> bool {
        self.platforms.is_empty() || self.platforms.contains(&platform)
    }

    /// 單行摘要，用於畫面標題
    pub fn describe(&self) -> String {
        fn selection<T: ToString>(items: &BTreeSet<T>) -> String {
            if items.is_empty() {
                "all".to_string()
            } else {
                items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            }
        }

        format!(
            "{} | vs {} | platforms: {} | tactics: {} | states: {}",
            self.granularity.display_name(),
            self.baseline.display_name(),
            selection(&self.platforms),
            selection(&self.tactics),
            selection(&self.states),
        )
    }
}
