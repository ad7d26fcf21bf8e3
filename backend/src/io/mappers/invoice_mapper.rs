use serde::{Deserialize, Serialize};
use shared::{InvoiceRecord, InvoiceStatus, RawAmount};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::dates::{parse_optional_date, parse_timestamp};
use crate::domain::models::money::{parse_money, round2};
use crate::domain::models::{Invoice, InvoiceItem, NewInvoice, StoredTotals};
use crate::domain::tax_service::TaxCalculator;

/// Shape of one entry in the serialized `items` payload
#[derive(Debug, Serialize, Deserialize)]
struct RawInvoiceItem {
    description: String,
    quantity: RawAmount,
    rate: RawAmount,
}

pub struct InvoiceMapper;

impl InvoiceMapper {
    pub fn to_domain(record: &InvoiceRecord, tax: &TaxCalculator) -> EngineResult<Invoice> {
        let status: InvoiceStatus = record
            .status
            .parse()
            .map_err(|e| EngineError::invalid("status", format!("{}", e)))?;

        let new = NewInvoice {
            id: record.id.clone(),
            invoice_number: record.invoice_number.clone(),
            client_name: record.client_name.clone(),
            client_email: record.client_email.clone(),
            client_address: record.client_address.clone(),
            items: Self::parse_items(&record.items)?,
            status,
            created_at: parse_timestamp("createdAt", &record.created_at)?,
            due_date: parse_optional_date("dueDate", record.due_date.as_deref())?,
            paid_date: parse_optional_date("paidDate", record.paid_date.as_deref())?,
            notes: record.notes.clone().filter(|n| !n.trim().is_empty()),
        };
        let stored = StoredTotals {
            subtotal: parse_money("subtotal", &record.subtotal)?,
            gst_amount: parse_money("gstAmount", &record.gst_amount)?,
            total_amount: parse_money("totalAmount", &record.total_amount)?,
        };

        Invoice::restore(new, stored, tax)
    }

    pub fn to_domain_all(records: &[InvoiceRecord], tax: &TaxCalculator) -> EngineResult<Vec<Invoice>> {
        records.iter().map(|r| Self::to_domain(r, tax)).collect()
    }

    /// Parse the serialized item list. A payload that is not a JSON array of
    /// `{description, quantity, rate}` is malformed; bad numbers are invalid.
    pub fn parse_items(payload: &str) -> EngineResult<Vec<InvoiceItem>> {
        let raw: Vec<RawInvoiceItem> = serde_json::from_str(payload)
            .map_err(|e| EngineError::malformed(format!("invoice items payload: {}", e)))?;

        raw.into_iter()
            .map(|item| {
                let quantity_text = item.quantity.as_text();
                let quantity: i64 = quantity_text.parse().map_err(|_| {
                    EngineError::invalid("quantity", format!("'{}' is not a whole number", quantity_text))
                })?;
                let rate = parse_money("rate", &item.rate)?;
                InvoiceItem::new(item.description, quantity, rate)
            })
            .collect()
    }

    pub fn to_dto(invoice: &Invoice) -> EngineResult<InvoiceRecord> {
        let raw_items: Vec<RawInvoiceItem> = invoice
            .items()
            .iter()
            .map(|item| RawInvoiceItem {
                description: item.description().to_string(),
                quantity: RawAmount::from(i64::from(item.quantity())),
                rate: RawAmount::Text(item.rate().to_string()),
            })
            .collect();
        let items = serde_json::to_string(&raw_items)
            .map_err(|e| EngineError::malformed(format!("cannot serialize invoice items: {}", e)))?;

        Ok(InvoiceRecord {
            id: invoice.id().to_string(),
            invoice_number: invoice.invoice_number().to_string(),
            client_name: invoice.client_name().to_string(),
            client_email: invoice.client_email().map(str::to_string),
            client_address: invoice.client_address().map(str::to_string),
            items,
            subtotal: RawAmount::Text(format!("{:.2}", round2(invoice.subtotal()))),
            gst_amount: RawAmount::Text(format!("{:.2}", round2(invoice.gst_amount()))),
            total_amount: RawAmount::Text(format!("{:.2}", round2(invoice.total_amount()))),
            status: invoice.status().to_string(),
            created_at: invoice.created_at().to_rfc3339(),
            due_date: invoice.due_date().map(|d| d.to_string()),
            paid_date: invoice.paid_date().map(|d| d.to_string()),
            notes: invoice.notes().map(str::to_string),
        })
    }
}
