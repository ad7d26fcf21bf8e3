use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::InvoiceStatus;

use super::money::{checked_add, checked_mul, checked_sum, ensure_non_negative, round2};
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::tax_service::TaxCalculator;

/// One billed line on an invoice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceItem {
    description: String,
    quantity: u32,
    rate: Decimal,
}

impl InvoiceItem {
    pub fn new(description: impl Into<String>, quantity: i64, rate: Decimal) -> EngineResult<Self> {
        if quantity < 1 {
            return Err(EngineError::invalid("quantity", format!("quantity must be at least 1, got {}", quantity)));
        }
        let quantity = u32::try_from(quantity)
            .map_err(|_| EngineError::invalid("quantity", format!("quantity {} is too large", quantity)))?;
        let rate = ensure_non_negative("rate", rate)?;
        checked_mul("rate", Decimal::from(quantity), rate)?;

        Ok(Self {
            description: description.into(),
            quantity,
            rate,
        })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// quantity × rate, unrounded. Construction guarantees the product fits.
    pub fn line_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.rate
    }
}

/// Fields of an invoice before its totals are derived
#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub id: String,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    pub items: Vec<InvoiceItem>,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Totals as persisted alongside an invoice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoredTotals {
    pub subtotal: Decimal,
    pub gst_amount: Decimal,
    pub total_amount: Decimal,
}

/// A validated invoice whose totals always agree with its items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Invoice {
    id: String,
    invoice_number: String,
    client_name: String,
    client_email: Option<String>,
    client_address: Option<String>,
    items: Vec<InvoiceItem>,
    subtotal: Decimal,
    gst_amount: Decimal,
    total_amount: Decimal,
    status: InvoiceStatus,
    created_at: DateTime<Utc>,
    due_date: Option<NaiveDate>,
    paid_date: Option<NaiveDate>,
    notes: Option<String>,
}

impl Invoice {
    /// Create an invoice, deriving subtotal, GST and total from its items
    pub fn create(new: NewInvoice, tax: &TaxCalculator) -> EngineResult<Self> {
        if new.invoice_number.trim().is_empty() {
            return Err(EngineError::invalid("invoiceNumber", "invoice number is empty"));
        }
        if new.paid_date.is_some() && new.status != InvoiceStatus::Paid {
            return Err(EngineError::invalid(
                "paidDate",
                format!("invoice {} has a paid date but status '{}'", new.invoice_number, new.status),
            ));
        }

        let subtotal = checked_sum("subtotal", new.items.iter().map(InvoiceItem::line_amount))?;
        let gst_amount = tax.apply_gst(subtotal, true);
        let total_amount = checked_add("totalAmount", subtotal, gst_amount)?;

        Ok(Self {
            id: new.id,
            invoice_number: new.invoice_number,
            client_name: new.client_name,
            client_email: new.client_email,
            client_address: new.client_address,
            items: new.items,
            subtotal,
            gst_amount,
            total_amount,
            status: new.status,
            created_at: new.created_at,
            due_date: new.due_date,
            paid_date: new.paid_date,
            notes: new.notes,
        })
    }

    /// Rebuild a stored invoice. The stored totals must match the totals
    /// derived from the items to within one cent.
    pub fn restore(new: NewInvoice, stored: StoredTotals, tax: &TaxCalculator) -> EngineResult<Self> {
        let invoice = Self::create(new, tax)?;
        let cent = Decimal::new(1, 2);

        let checks = [
            ("subtotal", stored.subtotal, invoice.subtotal),
            ("gstAmount", stored.gst_amount, invoice.gst_amount),
            ("totalAmount", stored.total_amount, invoice.total_amount),
        ];
        for (field, stored_value, derived) in checks {
            ensure_non_negative(field, stored_value)?;
            if (round2(stored_value) - round2(derived)).abs() > cent {
                return Err(EngineError::invalid(
                    field,
                    format!(
                        "invoice {} stores {} but its items give {}",
                        invoice.invoice_number,
                        stored_value,
                        round2(derived)
                    ),
                ));
            }
        }

        Ok(invoice)
    }

    /// Move the invoice to a new status. Only a transition to `Paid` sets the
    /// paid date; leaving `Paid` clears it.
    pub fn transition_to(&self, status: InvoiceStatus, on: NaiveDate) -> Self {
        let paid_date = match (self.status, status) {
            (InvoiceStatus::Paid, InvoiceStatus::Paid) => self.paid_date,
            (_, InvoiceStatus::Paid) => Some(on),
            _ => None,
        };
        Self {
            status,
            paid_date,
            ..self.clone()
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_email(&self) -> Option<&str> {
        self.client_email.as_deref()
    }

    pub fn client_address(&self) -> Option<&str> {
        self.client_address.as_deref()
    }

    pub fn items(&self) -> &[InvoiceItem] {
        &self.items
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn gst_amount(&self) -> Decimal {
        self.gst_amount
    }

    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    pub fn is_paid(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Calendar date (UTC) the invoice was issued
    pub fn created_on(&self) -> NaiveDate {
        self.created_at.date_naive()
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn paid_date(&self) -> Option<NaiveDate> {
        self.paid_date
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn new_invoice(items: Vec<InvoiceItem>, status: InvoiceStatus) -> NewInvoice {
        NewInvoice {
            id: "inv-1".to_string(),
            invoice_number: "INV-001".to_string(),
            client_name: "Acme Traders".to_string(),
            client_email: None,
            client_address: None,
            items,
            status,
            created_at: "2026-02-10T10:00:00Z".parse().unwrap(),
            due_date: None,
            paid_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_totals_are_derived_from_items() {
        let items = vec![InvoiceItem::new("Consulting", 2, dec("50")).unwrap()];
        let invoice = Invoice::create(new_invoice(items, InvoiceStatus::Paid), &TaxCalculator::new()).unwrap();

        assert_eq!(invoice.subtotal(), dec("100"));
        assert_eq!(invoice.gst_amount(), dec("18"));
        assert_eq!(invoice.total_amount(), dec("118"));
    }

    #[test]
    fn test_total_matches_rounded_gross_within_a_cent() {
        let tax = TaxCalculator::new();
        let cases = [
            vec![("A", 3, "19.99"), ("B", 7, "0.33")],
            vec![("A", 1, "0.01")],
            vec![("A", 13, "7.77"), ("B", 2, "1234.565"), ("C", 1, "0")],
        ];

        for lines in cases {
            let items = lines
                .iter()
                .map(|(d, q, r)| InvoiceItem::new(*d, *q, dec(r)).unwrap())
                .collect();
            let invoice = Invoice::create(new_invoice(items, InvoiceStatus::Sent), &tax).unwrap();
            let expected = round2(round2(invoice.subtotal()) * dec("1.18"));
            assert!((round2(invoice.total_amount()) - expected).abs() <= dec("0.01"));
        }
    }

    #[test]
    fn test_item_validation() {
        assert!(InvoiceItem::new("Zero", 0, dec("1")).is_err());
        assert!(InvoiceItem::new("Negative rate", 1, dec("-1")).is_err());
        assert_eq!(InvoiceItem::new("Ok", 3, dec("2.5")).unwrap().line_amount(), dec("7.5"));
    }

    #[test]
    fn test_oversized_amounts_are_rejected_not_overflowed() {
        let err = InvoiceItem::new("Huge", 3, dec("39614081257132168796771975168")).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "rate"));

        let half = dec("50000000000000000000000000000");
        let items = vec![
            InvoiceItem::new("A", 1, half).unwrap(),
            InvoiceItem::new("B", 1, half).unwrap(),
        ];
        let err = Invoice::create(new_invoice(items, InvoiceStatus::Sent), &TaxCalculator::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "subtotal"));

        let items = vec![InvoiceItem::new("A", 1, dec("70000000000000000000000000000")).unwrap()];
        let err = Invoice::create(new_invoice(items, InvoiceStatus::Sent), &TaxCalculator::new()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "totalAmount"));
    }

    #[test]
    fn test_paid_date_requires_paid_status() {
        let mut new = new_invoice(vec![], InvoiceStatus::Sent);
        new.paid_date = NaiveDate::from_ymd_opt(2026, 2, 11);
        assert!(Invoice::create(new, &TaxCalculator::new()).is_err());
    }

    #[test]
    fn test_restore_rejects_totals_that_disagree_with_items() {
        let tax = TaxCalculator::new();
        let items = vec![InvoiceItem::new("Consulting", 2, dec("50")).unwrap()];
        let good = StoredTotals {
            subtotal: dec("100.00"),
            gst_amount: dec("18.00"),
            total_amount: dec("118.00"),
        };
        assert!(Invoice::restore(new_invoice(items.clone(), InvoiceStatus::Paid), good, &tax).is_ok());

        let bad = StoredTotals {
            total_amount: dec("120.00"),
            ..good
        };
        let err = Invoice::restore(new_invoice(items, InvoiceStatus::Paid), bad, &tax).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "totalAmount"));
    }

    #[test]
    fn test_transition_to_paid_sets_paid_date() {
        let tax = TaxCalculator::new();
        let items = vec![InvoiceItem::new("Design", 1, dec("400")).unwrap()];
        let invoice = Invoice::create(new_invoice(items, InvoiceStatus::Sent), &tax).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();

        let paid = invoice.transition_to(InvoiceStatus::Paid, today);
        assert_eq!(paid.paid_date(), Some(today));
        assert!(paid.is_paid());

        let reopened = paid.transition_to(InvoiceStatus::Overdue, today);
        assert_eq!(reopened.paid_date(), None);
    }
}
