use log::info;

use super::layout::{Column, Element, PageLayout, TotalsLine};
use super::{Document, DocumentRenderer};
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::Invoice;

const FOOTER_LINES: [&str; 2] = ["Thank you for your business!", "Generated by BizTracker Pro"];

impl DocumentRenderer {
    /// Lay out an invoice. Fails with `MalformedRecord` when it has no items.
    pub fn render_invoice(&self, invoice: &Invoice) -> EngineResult<Document> {
        if invoice.items().is_empty() {
            return Err(EngineError::malformed(format!(
                "invoice {} has no line items",
                invoice.invoice_number()
            )));
        }

        let mut layout = PageLayout::new(self.config.geometry)?;
        layout.header("INVOICE", self.company_lines())?;

        let mut details = vec![
            format!("Invoice Number: {}", invoice.invoice_number()),
            format!("Date: {}", self.date(invoice.created_on())),
        ];
        if let Some(due) = invoice.due_date() {
            details.push(format!("Due Date: {}", self.date(due)));
        }
        details.push(format!("Status: {}", invoice.status().as_str().to_uppercase()));
        layout.place_text(Some("Invoice Details".to_string()), details)?;

        let mut bill_to = vec![invoice.client_name().to_string()];
        if let Some(email) = invoice.client_email().filter(|e| !e.trim().is_empty()) {
            bill_to.push(email.to_string());
        }
        if let Some(address) = invoice.client_address() {
            bill_to.extend(
                address
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }
        layout.place_text(Some("Bill To:".to_string()), bill_to)?;

        layout.begin_table(vec![
            Column::left("Description", 6),
            Column::right("Qty", 1),
            Column::right("Rate", 2),
            Column::right("Amount", 2),
        ])?;
        for item in invoice.items() {
            layout.table_row(vec![
                item.description().to_string(),
                item.quantity().to_string(),
                self.money(item.rate()),
                self.money(item.line_amount()),
            ])?;
        }

        layout.place(Element::Totals {
            lines: vec![
                TotalsLine::Amount {
                    label: "Subtotal:".to_string(),
                    value: self.money(invoice.subtotal()),
                },
                TotalsLine::Amount {
                    label: format!("{}:", self.tax.rate_label()),
                    value: self.money(invoice.gst_amount()),
                },
                TotalsLine::Rule,
                TotalsLine::Amount {
                    label: "Total:".to_string(),
                    value: self.money(invoice.total_amount()),
                },
            ],
        })?;

        if let Some(notes) = invoice.notes() {
            layout.place_text(Some("Notes:".to_string()), wrap_words(notes, self.config.notes_wrap_chars))?;
        }

        let pages = layout.footer(FOOTER_LINES.iter().map(|l| l.to_string()).collect())?;
        info!(
            "📄 DOCUMENT: invoice {} laid out on {} pages",
            invoice.invoice_number(),
            pages.len()
        );

        Ok(Document {
            title: format!("Invoice {}", invoice.invoice_number()),
            geometry: self.config.geometry,
            pages,
            included_rows: invoice.items().len(),
            omitted_rows: 0,
        })
    }
}

/// Greedy word wrap to at most `width` characters per line. Paragraph breaks
/// are kept; words longer than a line are split.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                lines.push(word.drain(..width).collect());
            }
            if word.is_empty() {
                continue;
            }

            let current_len = current.chars().count();
            if current_len > 0 && current_len + 1 + word.len() > width {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.extend(word);
        }
        lines.push(current);
    }
    lines
}
