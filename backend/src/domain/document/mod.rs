//! Printable documents: invoices, expense reports and GST summaries.
//!
//! Rendering happens in two steps. The renderer lays a document out onto
//! fixed-size pages ([`layout`]); a [`DocumentEncoder`] then turns the laid
//! out pages into bytes.

pub mod encoder;
pub mod expense_report;
pub mod gst_summary;
pub mod invoice;
pub mod layout;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::format_money;
use crate::domain::tax_service::TaxCalculator;

pub use encoder::{DocumentEncoder, JsonEncoder, TextEncoder};
pub use layout::{Align, Column, Element, LayoutPhase, Page, PageGeometry, PageLayout, PlacedElement, TotalsLine};

/// Settings shared by every generated document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub geometry: PageGeometry,
    pub company_name: String,
    pub company_address: Vec<String>,
    pub currency_prefix: String,
    /// Most expense rows written to a report
    pub max_expense_rows: usize,
    /// Characters of an expense description shown in a report row
    pub description_char_budget: usize,
    /// Characters per line when wrapping invoice notes
    pub notes_wrap_chars: usize,
    /// strftime pattern for dates printed on documents
    pub date_format: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            company_name: "BizTracker Pro".to_string(),
            company_address: vec!["123 Business Street".to_string(), "City, State 12345".to_string()],
            currency_prefix: "$".to_string(),
            max_expense_rows: 30,
            description_char_budget: 25,
            notes_wrap_chars: 90,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl DocumentConfig {
    pub fn validate(&self) -> EngineResult<()> {
        self.geometry.validate()?;
        if self.max_expense_rows == 0 {
            return Err(EngineError::configuration("maxExpenseRows must be at least 1"));
        }
        if self.description_char_budget == 0 {
            return Err(EngineError::configuration("descriptionCharBudget must be at least 1"));
        }
        if self.notes_wrap_chars == 0 {
            return Err(EngineError::configuration("notesWrapChars must be at least 1"));
        }
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(EngineError::configuration(format!(
                "'{}' is not a valid date format",
                self.date_format
            )));
        }
        Ok(())
    }
}

/// A laid out document, before encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub title: String,
    pub geometry: PageGeometry,
    pub pages: Vec<Page>,
    pub included_rows: usize,
    pub omitted_rows: usize,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Lays out invoices and expense reports with a fixed configuration
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    config: DocumentConfig,
    tax: TaxCalculator,
}

impl DocumentRenderer {
    pub fn new(config: DocumentConfig, tax: TaxCalculator) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self { config, tax })
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    fn money(&self, value: Decimal) -> String {
        format_money(&self.config.currency_prefix, value)
    }

    fn date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }

    fn company_lines(&self) -> Vec<String> {
        std::iter::once(self.config.company_name.clone())
            .chain(self.config.company_address.iter().cloned())
            .collect()
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self {
            config: DocumentConfig::default(),
            tax: TaxCalculator::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DocumentConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_expense_rows, 30);
        assert_eq!(config.description_char_budget, 25);
    }

    #[test]
    fn test_config_validation() {
        let mut config = DocumentConfig::default();
        config.max_expense_rows = 0;
        assert!(matches!(config.validate(), Err(EngineError::Configuration(_))));

        let mut config = DocumentConfig::default();
        config.date_format = "%Q".to_string();
        assert!(matches!(
            DocumentRenderer::new(config, TaxCalculator::new()),
            Err(EngineError::Configuration(_))
        ));
    }

    #[test]
    fn test_renderer_formats_money_and_dates() {
        let renderer = DocumentRenderer::default();
        assert_eq!(renderer.money(Decimal::new(1185, 1)), "$118.50");
        assert_eq!(renderer.date(NaiveDate::from_ymd_opt(2026, 4, 3).unwrap()), "2026-04-03");
        assert_eq!(renderer.company_lines()[0], "BizTracker Pro");
    }
}
