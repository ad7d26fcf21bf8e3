//! GST calculation for the BizTracker engine.
//!
//! GST is charged at a single flat rate. The same [`TaxCalculator`] is used
//! when expenses and invoices are created, so the two paths always agree on
//! the rate, and again when quarterly GST returns are summarised.
//!
//! Quarter windows are half-open: a record dated on the first day of the next
//! quarter belongs to that next quarter.

use chrono::{Datelike, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use shared::{QuarterlyGst, QuarterlyGstSummary};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::dates::{add_months, first_of_month};
use crate::domain::models::money::{checked_sub, checked_sum};
use crate::domain::models::{round2, Expense, Invoice};

/// Flat GST rate (18%)
pub const GST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Day of the month after a quarter closes on which its return is due
pub const GST_FILING_DAY: u32 = 28;

/// Default number of quarters shown in the GST history
pub const DEFAULT_QUARTER_HISTORY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxCalculator {
    rate: Decimal,
}

impl TaxCalculator {
    /// Calculator using [`GST_RATE`]
    pub fn new() -> Self {
        Self { rate: GST_RATE }
    }

    /// Calculator with a configured rate, which must lie in `[0, 1)`
    pub fn with_rate(rate: Decimal) -> EngineResult<Self> {
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            return Err(EngineError::configuration(format!(
                "GST rate must be between 0 and 1, got {}",
                rate
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Rate as a percentage label, e.g. `GST (18%)`
    pub fn rate_label(&self) -> String {
        format!("GST ({}%)", (self.rate * Decimal::ONE_HUNDRED).normalize())
    }

    /// GST on `amount_base`, rounded to cents; zero when GST does not apply
    pub fn apply_gst(&self, amount_base: Decimal, applicable: bool) -> Decimal {
        if applicable {
            round2(amount_base * self.rate)
        } else {
            Decimal::ZERO
        }
    }

    /// GST collected on paid invoices and paid on expenses within
    /// `[quarter_start, quarter_end)`
    pub fn compute_quarterly_gst(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        quarter_start: NaiveDate,
        quarter_end: NaiveDate,
    ) -> EngineResult<QuarterlyGst> {
        if quarter_start >= quarter_end {
            return Err(EngineError::InvalidWindow {
                start: quarter_start,
                end: quarter_end,
            });
        }
        let in_quarter = |date: NaiveDate| date >= quarter_start && date < quarter_end;

        let gst_collected = checked_sum(
            "gstAmount",
            invoices
                .iter()
                .filter(|invoice| invoice.is_paid() && in_quarter(invoice.created_on()))
                .map(Invoice::gst_amount),
        )?;
        let gst_paid = checked_sum(
            "gstAmount",
            expenses
                .iter()
                .filter(|expense| in_quarter(expense.date()))
                .map(Expense::gst_amount),
        )?;

        debug!(
            "🧾 TAX: {}..{} collected={} paid={}",
            quarter_start, quarter_end, gst_collected, gst_paid
        );

        Ok(QuarterlyGst {
            gst_collected,
            gst_paid,
            net_gst: checked_sub("netGst", gst_collected, gst_paid)?,
        })
    }

    /// The last `count` quarters up to and including the one containing
    /// `today`, oldest first
    pub fn quarterly_history(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        today: NaiveDate,
        count: usize,
    ) -> EngineResult<Vec<QuarterlyGstSummary>> {
        let (current_start, _) = quarter_bounds(today)?;
        let mut rows = Vec::with_capacity(count);

        for back in (0..count).rev() {
            let offset = i32::try_from(back * 3)
                .map_err(|_| EngineError::invalid("count", format!("{} quarters is too many", count)))?;
            let start = add_months(current_start, -offset)?;
            let end = add_months(start, 3)?;
            let totals = self.compute_quarterly_gst(expenses, invoices, start, end)?;

            rows.push(QuarterlyGstSummary {
                period: quarter_label(start),
                quarter_start: start,
                quarter_end: end,
                gst_collected: totals.gst_collected,
                gst_paid: totals.gst_paid,
                net_gst: totals.net_gst,
                due_date: filing_due_date(end)?,
            });
        }

        Ok(rows)
    }
}

impl Default for TaxCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// GST at [`GST_RATE`]
pub fn apply_gst(amount_base: Decimal, applicable: bool) -> Decimal {
    TaxCalculator::new().apply_gst(amount_base, applicable)
}

/// Zero-based quarter index of a date (Jan–Mar = 0)
pub fn quarter_index(date: NaiveDate) -> u32 {
    date.month0() / 3
}

/// `(start, end)` of the quarter containing `date`; `end` is exclusive
pub fn quarter_bounds(date: NaiveDate) -> EngineResult<(NaiveDate, NaiveDate)> {
    let month_start = first_of_month(date);
    let start = add_months(month_start, -((date.month0() % 3) as i32))?;
    let end = add_months(start, 3)?;
    Ok((start, end))
}

/// Label such as `Q3 2026` for the quarter starting at `quarter_start`
pub fn quarter_label(quarter_start: NaiveDate) -> String {
    format!("Q{} {}", quarter_index(quarter_start) + 1, quarter_start.year())
}

/// Returns fall due on the 28th of the month after the quarter closes.
/// `quarter_end` is the exclusive bound, i.e. the first day of that month.
fn filing_due_date(quarter_end: NaiveDate) -> EngineResult<NaiveDate> {
    quarter_end
        .with_day(GST_FILING_DAY)
        .ok_or_else(|| EngineError::invalid("dueDate", format!("no filing day in month of {}", quarter_end)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{InvoiceItem, NewExpense, NewInvoice};
    use shared::{InvoiceStatus, NetGstPosition};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense_with_gst(on: NaiveDate, gst: &str) -> Expense {
        let new = NewExpense {
            id: format!("exp-{}", on),
            description: "Supplies".to_string(),
            amount: dec("1000"),
            category: "Office".to_string(),
            date: on,
            is_gst_applicable: true,
            receipt_ref: None,
        };
        Expense::restore(new, dec(gst)).unwrap()
    }

    fn invoice_on(on: NaiveDate, subtotal: &str, status: InvoiceStatus) -> Invoice {
        let new = NewInvoice {
            id: format!("inv-{}", on),
            invoice_number: format!("INV-{}", on),
            client_name: "Client".to_string(),
            client_email: None,
            client_address: None,
            items: vec![InvoiceItem::new("Work", 1, dec(subtotal)).unwrap()],
            status,
            created_at: on.and_hms_opt(12, 0, 0).unwrap().and_utc(),
            due_date: None,
            paid_date: None,
            notes: None,
        };
        Invoice::create(new, &TaxCalculator::new()).unwrap()
    }

    #[test]
    fn test_apply_gst() {
        for x in ["0", "1", "99.99", "1234.56", "0.05", "100"] {
            assert_eq!(apply_gst(dec(x), true), round2(dec(x) * dec("0.18")));
            assert_eq!(apply_gst(dec(x), false), Decimal::ZERO);
        }
        assert_eq!(apply_gst(dec("100"), true), dec("18"));
    }

    #[test]
    fn test_with_rate_validates_range() {
        assert!(TaxCalculator::with_rate(dec("0.05")).is_ok());
        assert!(TaxCalculator::with_rate(dec("-0.01")).is_err());
        assert!(matches!(TaxCalculator::with_rate(dec("1.5")), Err(EngineError::Configuration(_))));
        assert_eq!(TaxCalculator::new().rate_label(), "GST (18%)");
    }

    #[test]
    fn test_quarter_bounds_are_half_open() {
        assert_eq!(quarter_bounds(date(2026, 10, 19)).unwrap(), (date(2026, 10, 1), date(2027, 1, 1)));
        assert_eq!(quarter_bounds(date(2026, 3, 31)).unwrap(), (date(2026, 1, 1), date(2026, 4, 1)));
        assert_eq!(quarter_bounds(date(2026, 4, 1)).unwrap(), (date(2026, 4, 1), date(2026, 7, 1)));
        assert_eq!(quarter_label(date(2026, 7, 1)), "Q3 2026");
    }

    #[test]
    fn test_quarterly_gst_liability() {
        let tax = TaxCalculator::new();
        let invoices = vec![
            invoice_on(date(2026, 1, 5), "500", InvoiceStatus::Paid),
            invoice_on(date(2026, 3, 20), "500", InvoiceStatus::Paid),
            invoice_on(date(2026, 2, 1), "900", InvoiceStatus::Sent),
        ];
        let expenses = vec![expense_with_gst(date(2026, 2, 14), "50")];

        let q = tax
            .compute_quarterly_gst(&expenses, &invoices, date(2026, 1, 1), date(2026, 4, 1))
            .unwrap();

        assert_eq!(q.gst_collected, dec("180"));
        assert_eq!(q.gst_paid, dec("50"));
        assert_eq!(q.net_gst, dec("130"));
        assert_eq!(q.position(), NetGstPosition::Liability);
    }

    #[test]
    fn test_quarter_upper_bound_is_exclusive() {
        let tax = TaxCalculator::new();
        let expenses = vec![
            expense_with_gst(date(2026, 3, 31), "10"),
            expense_with_gst(date(2026, 4, 1), "99"),
        ];

        let q = tax
            .compute_quarterly_gst(&expenses, &[], date(2026, 1, 1), date(2026, 4, 1))
            .unwrap();
        assert_eq!(q.gst_paid, dec("10"));
        assert_eq!(q.net_gst, dec("-10"));
        assert_eq!(q.position(), NetGstPosition::Refund);
    }

    #[test]
    fn test_quarterly_gst_overflow_is_invalid() {
        let tax = TaxCalculator::new();
        let huge = "50000000000000000000000000000";
        let expenses = vec![
            expense_with_gst(date(2026, 1, 10), huge),
            expense_with_gst(date(2026, 2, 10), huge),
        ];

        let err = tax
            .compute_quarterly_gst(&expenses, &[], date(2026, 1, 1), date(2026, 4, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "gstAmount"));
    }

    #[test]
    fn test_empty_quarter_window_is_rejected() {
        let tax = TaxCalculator::new();
        let err = tax
            .compute_quarterly_gst(&[], &[], date(2026, 4, 1), date(2026, 4, 1))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidWindow { .. }));
    }

    #[test]
    fn test_quarterly_history() {
        let tax = TaxCalculator::new();
        let expenses = vec![expense_with_gst(date(2026, 2, 14), "50")];
        let invoices = vec![invoice_on(date(2026, 8, 2), "1000", InvoiceStatus::Paid)];

        let rows = tax
            .quarterly_history(&expenses, &invoices, date(2026, 10, 19), DEFAULT_QUARTER_HISTORY)
            .unwrap();

        let periods: Vec<&str> = rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["Q1 2026", "Q2 2026", "Q3 2026", "Q4 2026"]);
        assert_eq!(rows[0].gst_paid, dec("50"));
        assert_eq!(rows[0].due_date, date(2026, 4, 28));
        assert_eq!(rows[2].gst_collected, dec("180"));
        assert_eq!(rows[3].due_date, date(2027, 1, 28));
    }
}
