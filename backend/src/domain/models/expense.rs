use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::money::ensure_non_negative;
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::tax_service::TaxCalculator;

/// Fields of an expense before GST has been attached
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub id: String,
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub is_gst_applicable: bool,
    pub receipt_ref: Option<String>,
}

/// A validated expense. `gst_amount` is zero whenever GST does not apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    id: String,
    description: String,
    amount: Decimal,
    category: String,
    date: NaiveDate,
    is_gst_applicable: bool,
    gst_amount: Decimal,
    receipt_ref: Option<String>,
}

impl Expense {
    /// Create a new expense, computing its GST with the given calculator
    pub fn create(new: NewExpense, tax: &TaxCalculator) -> EngineResult<Self> {
        let amount = ensure_non_negative("amount", new.amount)?;
        let gst_amount = tax.apply_gst(amount, new.is_gst_applicable);
        Self::restore(new, gst_amount)
    }

    /// Rebuild an expense from stored fields, checking the GST invariant
    pub fn restore(new: NewExpense, gst_amount: Decimal) -> EngineResult<Self> {
        let amount = ensure_non_negative("amount", new.amount)?;
        let gst_amount = ensure_non_negative("gstAmount", gst_amount)?;

        if !new.is_gst_applicable && !gst_amount.is_zero() {
            return Err(EngineError::invalid(
                "gstAmount",
                format!("expense {} is not GST applicable but carries GST of {}", new.id, gst_amount),
            ));
        }

        Ok(Self {
            id: new.id,
            description: new.description,
            amount,
            category: new.category,
            date: new.date,
            is_gst_applicable: new.is_gst_applicable,
            gst_amount,
            receipt_ref: new.receipt_ref,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_gst_applicable(&self) -> bool {
        self.is_gst_applicable
    }

    pub fn gst_amount(&self) -> Decimal {
        self.gst_amount
    }

    pub fn receipt_ref(&self) -> Option<&str> {
        self.receipt_ref.as_deref()
    }
}
