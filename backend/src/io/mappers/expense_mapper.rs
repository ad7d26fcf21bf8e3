use shared::{ExpenseRecord, RawAmount};

use crate::domain::errors::EngineResult;
use crate::domain::models::dates::parse_date;
use crate::domain::models::money::parse_money;
use crate::domain::models::{Expense, NewExpense};

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_domain(record: &ExpenseRecord) -> EngineResult<Expense> {
        let new = NewExpense {
            id: record.id.clone(),
            description: record.description.clone(),
            amount: parse_money("amount", &record.amount)?,
            category: record.category.clone(),
            date: parse_date("date", &record.date)?,
            is_gst_applicable: record.is_gst_applicable,
            receipt_ref: record.receipt_ref.clone(),
        };
        let gst_amount = match &record.gst_amount {
            Some(raw) if !raw.as_text().is_empty() => parse_money("gstAmount", raw)?,
            _ => rust_decimal::Decimal::ZERO,
        };
        Expense::restore(new, gst_amount)
    }

    pub fn to_domain_all(records: &[ExpenseRecord]) -> EngineResult<Vec<Expense>> {
        records.iter().map(Self::to_domain).collect()
    }

    pub fn to_dto(expense: &Expense) -> ExpenseRecord {
        ExpenseRecord {
            id: expense.id().to_string(),
            description: expense.description().to_string(),
            amount: RawAmount::Text(expense.amount().to_string()),
            category: expense.category().to_string(),
            date: expense.date().to_string(),
            is_gst_applicable: expense.is_gst_applicable(),
            gst_amount: Some(RawAmount::Text(expense.gst_amount().to_string())),
            receipt_ref: expense.receipt_ref().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::EngineError;
    use rust_decimal::Decimal;

    fn record() -> ExpenseRecord {
        ExpenseRecord {
            id: "7".to_string(),
            description: "Courier".to_string(),
            amount: RawAmount::from("80.00"),
            category: "Shipping".to_string(),
            date: "2026-09-03".to_string(),
            is_gst_applicable: true,
            gst_amount: Some(RawAmount::from("14.40")),
            receipt_ref: Some("receipts/7.png".to_string()),
        }
    }

    #[test]
    fn test_to_domain() {
        let expense = ExpenseMapper::to_domain(&record()).unwrap();
        assert_eq!(expense.amount(), Decimal::from(80));
        assert_eq!(expense.gst_amount(), Decimal::new(1440, 2));
        assert_eq!(expense.receipt_ref(), Some("receipts/7.png"));
    }

    #[test]
    fn test_missing_gst_defaults_to_zero_only_when_absent() {
        let mut untaxed = record();
        untaxed.is_gst_applicable = false;
        untaxed.gst_amount = None;
        assert_eq!(ExpenseMapper::to_domain(&untaxed).unwrap().gst_amount(), Decimal::ZERO);

        let mut garbage = record();
        garbage.gst_amount = Some(RawAmount::from("abc"));
        assert!(matches!(
            ExpenseMapper::to_domain(&garbage),
            Err(EngineError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_stored_expense_goes_through_validation() {
        let mut negative = record();
        negative.amount = RawAmount::from("-5");
        let err = ExpenseMapper::to_domain(&negative).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "amount"));

        let mut untaxed = record();
        untaxed.is_gst_applicable = false;
        untaxed.gst_amount = Some(RawAmount::from("99"));
        let err = ExpenseMapper::to_domain(&untaxed).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "gstAmount"));
    }

    #[test]
    fn test_bad_date_is_invalid() {
        let mut bad = record();
        bad.date = "yesterday".to_string();
        let err = ExpenseMapper::to_domain(&bad).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "date"));
    }

    #[test]
    fn test_to_dto_preserves_values() {
        let expense = ExpenseMapper::to_domain(&record()).unwrap();
        let dto = ExpenseMapper::to_dto(&expense);
        assert_eq!(dto.amount.as_text(), "80.00");
        assert_eq!(dto.date, "2026-09-03");
        assert_eq!(ExpenseMapper::to_domain(&dto).unwrap(), expense);
    }
}
