use super::error::ValidationResult;
use super::traits::{check_amount, Validator};
use crate::domain_types::MarketingRecord;

/// 行銷投放記錄驗證器
///
/// 曝光與點擊為非負整數（解析階段已保證），這裡只檢查金額欄位。
/// 不要求點擊數小於曝光數，平台可能計入瀏覽後點擊。
#[derive(Debug, Default)]
pub struct MarketingValidator;

impl MarketingValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Validator for MarketingValidator {
    type Data = MarketingRecord;

    fn validate_record(&self, record: &Self::Data) -> ValidationResult<()> {
        check_amount("spend", record.spend)?;
        check_amount("attributed_revenue", record.attributed_revenue)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::Platform;
    use chrono::NaiveDate;

    fn create_test_record(spend: f64, revenue: f64) -> MarketingRecord {
        MarketingRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            tactic: "ASC".to_string(),
            state: "CA".to_string(),
            campaign: "Winter".to_string(),
            impressions: 1000,
            clicks: 1200,
            spend,
            attributed_revenue: revenue,
            platform: Platform::Facebook,
        }
    }

    #[test]
    fn test_clicks_above_impressions_allowed() {
        assert!(MarketingValidator::new().validate_record(&create_test_record(500.0, 2000.0)).is_ok());
    }

    #[test]
    fn test_negative_spend_rejected() {
        assert!(MarketingValidator::new().validate_record(&create_test_record(-1.0, 0.0)).is_err());
    }

    #[test]
    fn test_nan_revenue_rejected() {
        assert!(MarketingValidator::new().validate_record(&create_test_record(1.0, f64::NAN)).is_err());
    }
}
