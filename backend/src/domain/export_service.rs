//! Export service for invoices and expense reports.
//!
//! Renders a document, encodes it with the caller's [`DocumentEncoder`] and,
//! on request, writes the result into a directory on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info};
use shared::{ExportToPathResponse, QuarterlyGstSummary, RenderedDocument};

use crate::domain::document::{Document, DocumentEncoder, DocumentRenderer};
use crate::domain::errors::EngineResult;
use crate::domain::models::{Expense, Invoice};

#[derive(Debug, Clone)]
pub struct ExportService {
    renderer: DocumentRenderer,
}

impl ExportService {
    pub fn new(renderer: DocumentRenderer) -> Self {
        Self { renderer }
    }

    pub fn renderer(&self) -> &DocumentRenderer {
        &self.renderer
    }

    /// Render and encode an invoice as `invoice-<number>.<ext>`
    pub fn export_invoice(&self, invoice: &Invoice, encoder: &dyn DocumentEncoder) -> EngineResult<RenderedDocument> {
        info!("📄 EXPORT: Exporting invoice {}", invoice.invoice_number());

        let document = self.renderer.render_invoice(invoice)?;
        let filename = format!(
            "invoice-{}.{}",
            file_safe(invoice.invoice_number()),
            encoder.extension()
        );
        self.encode(document, filename, encoder)
    }

    /// Render and encode an expense report as
    /// `expense-report-<epoch millis>.<ext>`
    pub fn export_expense_report(
        &self,
        expenses: &[Expense],
        period_label: &str,
        generated_at: DateTime<Utc>,
        encoder: &dyn DocumentEncoder,
    ) -> EngineResult<RenderedDocument> {
        info!(
            "📄 EXPORT: Exporting expense report '{}' with {} expenses",
            period_label,
            expenses.len()
        );

        let document = self
            .renderer
            .render_expense_report(expenses, period_label, generated_at.date_naive())?;
        let filename = format!(
            "expense-report-{}.{}",
            generated_at.timestamp_millis(),
            encoder.extension()
        );
        self.encode(document, filename, encoder)
    }

    /// Render and encode the quarterly GST history as
    /// `gst-summary-<epoch millis>.<ext>`
    pub fn export_gst_summary(
        &self,
        quarters: &[QuarterlyGstSummary],
        generated_at: DateTime<Utc>,
        encoder: &dyn DocumentEncoder,
    ) -> EngineResult<RenderedDocument> {
        info!("📄 EXPORT: Exporting GST summary of {} quarters", quarters.len());

        let document = self.renderer.render_gst_summary(quarters, generated_at.date_naive())?;
        let filename = format!(
            "gst-summary-{}.{}",
            generated_at.timestamp_millis(),
            encoder.extension()
        );
        self.encode(document, filename, encoder)
    }

    /// Write a rendered document into `custom_path`, or into the user's
    /// documents directory (falling back to home) when no path is given.
    /// Missing directories are created.
    pub fn export_to_path(&self, document: &RenderedDocument, custom_path: Option<String>) -> Result<ExportToPathResponse> {
        info!("📁 EXPORT: Exporting {} to path - custom_path: {:?}", document.filename, custom_path);

        let export_dir = match custom_path {
            Some(custom_path) if !custom_path.trim().is_empty() => PathBuf::from(self.sanitize_path(&custom_path)),
            _ => dirs::document_dir()
                .or_else(dirs::home_dir)
                .ok_or_else(|| anyhow!("Could not determine default export directory"))?,
        };

        fs::create_dir_all(&export_dir).map_err(|e| {
            error!("❌ EXPORT: Failed to create export directory {:?}: {}", export_dir, e);
            anyhow!(e).context(format!("Failed to create export directory {}", export_dir.display()))
        })?;

        let file_path = export_dir.join(&document.filename);
        fs::write(&file_path, &document.bytes)
            .with_context(|| format!("Failed to write export file {}", file_path.display()))?;

        let file_path = file_path.to_string_lossy().to_string();
        info!(
            "✅ EXPORT: Wrote {} bytes ({} pages) to: {}",
            document.bytes.len(),
            document.page_count,
            file_path
        );

        Ok(ExportToPathResponse {
            file_path,
            bytes_written: document.bytes.len(),
            page_count: document.page_count,
        })
    }

    fn encode(&self, document: Document, filename: String, encoder: &dyn DocumentEncoder) -> EngineResult<RenderedDocument> {
        let bytes = encoder.encode(&document)?;
        info!(
            "✅ EXPORT: Generated {} ({} bytes, {} pages)",
            filename,
            bytes.len(),
            document.page_count()
        );

        Ok(RenderedDocument {
            filename,
            content_type: encoder.content_type().to_string(),
            bytes,
            page_count: document.page_count(),
            included_rows: document.included_rows,
            omitted_rows: document.omitted_rows,
        })
    }

    /// Clean up a user-typed directory: surrounding quotes, escaped spaces,
    /// trailing separators and a leading `~`
    fn sanitize_path(&self, path: &str) -> String {
        let mut cleaned = path.trim().to_string();

        let quoted = (cleaned.starts_with('"') && cleaned.ends_with('"'))
            || (cleaned.starts_with('\'') && cleaned.ends_with('\''));
        if quoted && cleaned.len() >= 2 {
            cleaned = cleaned[1..cleaned.len() - 1].trim().to_string();
        }

        cleaned = cleaned.replace("\\ ", " ");

        while cleaned.len() > 1 && (cleaned.ends_with('/') || cleaned.ends_with('\\')) {
            cleaned.pop();
        }

        if cleaned.starts_with('~') {
            if let Some(home) = dirs::home_dir() {
                if cleaned == "~" {
                    cleaned = home.to_string_lossy().to_string();
                } else if cleaned.starts_with("~/") || cleaned.starts_with("~\\") {
                    cleaned = home.join(&cleaned[2..]).to_string_lossy().to_string();
                }
            }
        }

        cleaned
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new(DocumentRenderer::default())
    }
}

/// Keep an invoice number usable as part of a file name
fn file_safe(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}
