//! Engine configuration.
//!
//! Every field has a default, so a YAML file only needs the settings it
//! changes:
//!
//! ```yaml
//! gstRate: "0.05"
//! document:
//!   maxExpenseRows: 50
//!   currencyPrefix: "Rs "
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::document::DocumentConfig;
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::metrics_service::DEFAULT_RECENT_TRANSACTIONS;
use crate::domain::series_service::{DEFAULT_CHART_MONTHS, DEFAULT_TOP_CATEGORIES, DEFAULT_TREND_MONTHS};
use crate::domain::tax_service::{TaxCalculator, DEFAULT_QUARTER_HISTORY, GST_RATE};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub gst_rate: Decimal,
    /// Quarters listed in the GST history
    pub quarter_history: usize,
    /// Months in the profit trend
    pub trend_months: usize,
    /// Months in the revenue/expense chart
    pub chart_months: usize,
    pub top_categories: usize,
    pub recent_transactions: usize,
    pub document: DocumentConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gst_rate: GST_RATE,
            quarter_history: DEFAULT_QUARTER_HISTORY,
            trend_months: DEFAULT_TREND_MONTHS,
            chart_months: DEFAULT_CHART_MONTHS,
            top_categories: DEFAULT_TOP_CATEGORIES,
            recent_transactions: DEFAULT_RECENT_TRANSACTIONS,
            document: DocumentConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_yaml::from_str(yaml).context("Failed to parse engine configuration")?;
        config.validate().context("Invalid engine configuration")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        info!("⚙️ CONFIG: Loading engine configuration from {:?}", path);
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_yaml_str(&yaml).with_context(|| format!("In configuration file {}", path.display()))
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize engine configuration")
    }

    pub fn validate(&self) -> EngineResult<()> {
        TaxCalculator::with_rate(self.gst_rate)?;

        let counts = [
            ("quarterHistory", self.quarter_history),
            ("trendMonths", self.trend_months),
            ("chartMonths", self.chart_months),
            ("topCategories", self.top_categories),
            ("recentTransactions", self.recent_transactions),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(EngineError::configuration(format!("{} must be at least 1", name)));
            }
        }

        self.document.validate()
    }

    pub fn tax_calculator(&self) -> EngineResult<TaxCalculator> {
        TaxCalculator::with_rate(self.gst_rate)
    }
}
