//! # BizTracker Backend
//!
//! Financial aggregation and document generation for a small-business
//! tracker. The engine is synchronous and holds no records of its own:
//! callers hand it snapshots of expenses, invoices and inventory and get back
//! metrics, chart series, calendar grids and rendered documents.
//!
//! Domain code logs through the `log` facade; the host application picks the
//! logger.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use shared::{CategoryAmount, MonthlyProfitPoint, QuarterlyGstSummary, RecentTransaction, RevenueExpenseSeries};

pub mod config;
pub mod domain;
pub mod io;

pub use config::EngineConfig;
pub use domain::{EngineError, EngineResult};

use domain::document::DocumentRenderer;
use domain::models::{Expense, Invoice};

/// Main backend struct that wires every service from one configuration
#[derive(Clone)]
pub struct Backend {
    pub config: EngineConfig,
    pub tax_calculator: domain::TaxCalculator,
    pub metrics_service: domain::MetricsService,
    pub series_service: domain::SeriesService,
    pub calendar_service: domain::CalendarService,
    pub export_service: domain::ExportService,
}

impl Backend {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().context("Invalid engine configuration")?;

        let tax_calculator = config.tax_calculator()?;
        let renderer = DocumentRenderer::new(config.document.clone(), tax_calculator)
            .context("Failed to set up document renderer")?;

        let metrics_service = domain::MetricsService::new(tax_calculator);
        let series_service = domain::SeriesService::new();
        let calendar_service = domain::CalendarService::new();
        let export_service = domain::ExportService::new(renderer);

        info!("🚀 BACKEND: Initialized with GST rate {}", tax_calculator.rate());

        Ok(Backend {
            config,
            tax_calculator,
            metrics_service,
            series_service,
            calendar_service,
            export_service,
        })
    }

    pub fn with_defaults() -> Result<Self> {
        Self::new(EngineConfig::default())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Self::new(EngineConfig::from_yaml_str(yaml)?)
    }

    // Dashboard and report views, sized by the configured counts

    pub fn gst_history(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> EngineResult<Vec<QuarterlyGstSummary>> {
        self.tax_calculator
            .quarterly_history(expenses, invoices, today, self.config.quarter_history)
    }

    pub fn profit_trend(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> EngineResult<Vec<MonthlyProfitPoint>> {
        self.series_service
            .monthly_trend(expenses, invoices, self.config.trend_months, today)
    }

    pub fn revenue_expense_chart(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        today: NaiveDate,
    ) -> EngineResult<RevenueExpenseSeries> {
        self.series_service
            .revenue_expense_series(expenses, invoices, self.config.chart_months, today)
    }

    pub fn top_categories(&self, expenses: &[Expense]) -> EngineResult<Vec<CategoryAmount>> {
        self.series_service
            .category_breakdown(expenses, Some(self.config.top_categories))
    }

    pub fn recent_transactions(&self, expenses: &[Expense]) -> Vec<RecentTransaction> {
        self.metrics_service
            .recent_transactions(expenses, self.config.recent_transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use shared::{ExpenseRecord, InvoiceRecord, RawAmount};

    fn expense_record() -> ExpenseRecord {
        ExpenseRecord {
            id: "1".to_string(),
            description: "Printer paper".to_string(),
            amount: RawAmount::from("100"),
            category: "Office".to_string(),
            date: "2026-10-02".to_string(),
            is_gst_applicable: false,
            gst_amount: None,
            receipt_ref: None,
        }
    }

    fn invoice_record() -> InvoiceRecord {
        InvoiceRecord {
            id: "1".to_string(),
            invoice_number: "INV-001".to_string(),
            client_name: "Acme".to_string(),
            client_email: None,
            client_address: None,
            items: r#"[{"description":"Design","quantity":2,"rate":"50"}]"#.to_string(),
            subtotal: RawAmount::from("100.00"),
            gst_amount: RawAmount::from("18.00"),
            total_amount: RawAmount::from("118.00"),
            status: "paid".to_string(),
            created_at: "2026-10-05T10:00:00Z".to_string(),
            due_date: None,
            paid_date: None,
            notes: None,
        }
    }

    #[test]
    fn test_backend_with_defaults() {
        let backend = Backend::with_defaults().unwrap();
        let snapshot = backend
            .metrics_service
            .compute_metrics_from_records(&[expense_record()], &[invoice_record()], None)
            .unwrap();

        assert_eq!(snapshot.total_revenue, Decimal::from(118));
        assert_eq!(snapshot.total_expenses, Decimal::from(100));
        assert_eq!(snapshot.net_profit, Decimal::from(18));
        assert_eq!(snapshot.gst_collected, Decimal::from(18));
    }

    #[test]
    fn test_backend_uses_configured_rate() {
        let backend = Backend::from_yaml_str("gstRate: \"0.10\"").unwrap();
        assert_eq!(backend.tax_calculator.rate_label(), "GST (10%)");
        assert_eq!(
            backend.tax_calculator.apply_gst(Decimal::from(50), true),
            Decimal::from(5)
        );
        assert_eq!(backend.export_service.renderer().config().max_expense_rows, 30);
    }

    #[test]
    fn test_backend_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.document.description_char_budget = 0;
        assert!(Backend::new(config).is_err());
    }

    #[test]
    fn test_backend_services_work_together() {
        let backend = Backend::with_defaults().unwrap();
        let expenses = io::mappers::ExpenseMapper::to_domain_all(&[expense_record()]).unwrap();
        let invoices =
            io::mappers::InvoiceMapper::to_domain_all(&[invoice_record()], &backend.tax_calculator).unwrap();

        let calendar = backend
            .calendar_service
            .generate_calendar_month(10, 2026, &expenses, &invoices)
            .unwrap();
        assert_eq!(calendar.total_revenue, Decimal::from(118));

        let trend = backend
            .series_service
            .monthly_trend(
                &expenses,
                &invoices,
                backend.config.trend_months,
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            )
            .unwrap();
        assert_eq!(trend.len(), 12);
        assert_eq!(trend[11].profit, Decimal::from(18));

        let rendered = backend
            .export_service
            .export_invoice(&invoices[0], &domain::document::TextEncoder::default())
            .unwrap();
        assert_eq!(rendered.filename, "invoice-INV-001.txt");
    }

    #[test]
    fn test_backend_views_follow_configured_counts() {
        let yaml = "quarterHistory: 2\ntrendMonths: 3\nchartMonths: 4\ntopCategories: 1\nrecentTransactions: 1\n";
        let backend = Backend::from_yaml_str(yaml).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let mut second = expense_record();
        second.id = "2".to_string();
        second.category = "Travel".to_string();
        second.amount = RawAmount::from("250");
        second.date = "2026-10-09".to_string();
        let expenses = io::mappers::ExpenseMapper::to_domain_all(&[expense_record(), second]).unwrap();
        let invoices =
            io::mappers::InvoiceMapper::to_domain_all(&[invoice_record()], &backend.tax_calculator).unwrap();

        let history = backend.gst_history(&expenses, &invoices, today).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].period, "Q4 2026");
        assert_eq!(history[1].gst_collected, Decimal::from(18));

        assert_eq!(backend.profit_trend(&expenses, &invoices, today).unwrap().len(), 3);
        assert_eq!(
            backend.revenue_expense_chart(&expenses, &invoices, today).unwrap().labels.len(),
            4
        );

        let top = backend.top_categories(&expenses).unwrap();
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].category, "Travel");

        let recent = backend.recent_transactions(&expenses);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, "2");
    }
}
