use super::error::{ValidationError, ValidationResult};
use super::traits::{check_amount, Validator};
use crate::domain_types::BusinessRecord;

/// 每日營運記錄驗證器
///
/// 規則：
/// - 營收、毛利、銷貨成本必須為有限且非負的數值
/// - 新訂單數不可超過總訂單數
/// - 毛利不可超過營收（來源資料不保證）
#[derive(Debug, Default)]
pub struct BusinessValidator;

impl BusinessValidator {
    pub fn new() -> Self {
        Self
    }

    fn validate_orders(&self, record: &BusinessRecord) -> ValidationResult<()> {
        if record.new_order_count > record.order_count {
            return Err(ValidationError::InconsistentValue {
                description: format!(
                    "{}: 新訂單數 ({}) 超過總訂單數 ({})",
                    record.date, record.new_order_count, record.order_count
                ),
            });
        }
        Ok(())
    }

    fn validate_profit(&self, record: &BusinessRecord) -> ValidationResult<()> {
        if record.gross_profit > record.total_revenue {
            return Err(ValidationError::InconsistentValue {
                description: format!(
                    "{}: 毛利 ({}) 超過營收 ({})",
                    record.date, record.gross_profit, record.total_revenue
                ),
            });
        }
        Ok(())
    }
}

impl Validator for BusinessValidator {
    type Data = BusinessRecord;

    fn validate_record(&self, record: &Self::Data) -> ValidationResult<()> {
        check_amount("total_revenue", record.total_revenue)?;
        check_amount("gross_profit", record.gross_profit)?;
        check_amount("cogs", record.cogs)?;

        self.validate_orders(record)?;
        self.validate_profit(record)?;

        Ok(())
    }
}
