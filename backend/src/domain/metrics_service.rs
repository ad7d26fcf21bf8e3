//! Metric aggregation for the BizTracker engine.
//!
//! Reduces validated expenses, invoices and inventory items into the figures
//! shown on the dashboard, tax and inventory panels. Every function is a pure
//! reduction over the slices it is given; nothing is cached between calls.
//!
//! ## Window semantics
//!
//! A window is an inclusive date range. Expenses match on their `date`,
//! invoices on the calendar date of `created_at`. No window means all time.
//!
//! ## Precision
//!
//! Sums keep full decimal precision. Rounding to cents happens only when a
//! snapshot is presented (see [`MetricSnapshot::rounded`]).

use chrono::NaiveDate;
use log::info;
use rust_decimal::Decimal;
use shared::{
    DateWindow, ExpenseRecord, ExpenseReportSummary, InventorySummary, InvoiceRecord, InvoiceSummary, MetricSnapshot,
    RecentTransaction, StockAlert, StockStatus,
};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::money::{checked_mul, checked_sub, checked_sum};
use crate::domain::models::{Expense, InventoryItem, Invoice};
use crate::domain::tax_service::TaxCalculator;
use crate::io::mappers::{ExpenseMapper, InvoiceMapper};

/// Expenses listed under "recent transactions" on the dashboard
pub const DEFAULT_RECENT_TRANSACTIONS: usize = 5;

/// Service that turns record snapshots into derived metrics
#[derive(Clone)]
pub struct MetricsService {
    tax: TaxCalculator,
}

impl MetricsService {
    pub fn new(tax: TaxCalculator) -> Self {
        Self { tax }
    }

    /// Build a validated window from two dates
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<DateWindow> {
        DateWindow::new(start, end).ok_or(EngineError::InvalidWindow { start, end })
    }

    /// Compute the dashboard metric snapshot for `window` (all time if `None`)
    pub fn compute_metrics(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        window: Option<DateWindow>,
    ) -> EngineResult<MetricSnapshot> {
        let in_window = |date: NaiveDate| window.map_or(true, |w| w.contains(date));

        let windowed_expenses: Vec<&Expense> = expenses.iter().filter(|e| in_window(e.date())).collect();
        let windowed_invoices: Vec<&Invoice> = invoices.iter().filter(|i| in_window(i.created_on())).collect();
        let paid_invoices = || windowed_invoices.iter().filter(|i| i.is_paid());

        let total_expenses = checked_sum("amount", windowed_expenses.iter().map(|e| e.amount()))?;
        let gst_paid = checked_sum("gstAmount", windowed_expenses.iter().map(|e| e.gst_amount()))?;
        let total_revenue = checked_sum("totalAmount", paid_invoices().map(|i| i.total_amount()))?;
        let gst_collected = checked_sum("gstAmount", paid_invoices().map(|i| i.gst_amount()))?;
        let pending_invoices = windowed_invoices.iter().filter(|i| !i.is_paid()).count();

        info!(
            "📊 METRICS: {} expenses and {} invoices in window {:?}",
            windowed_expenses.len(),
            windowed_invoices.len(),
            window
        );

        Ok(MetricSnapshot {
            window,
            total_revenue,
            total_expenses,
            net_profit: checked_sub("netProfit", total_revenue, total_expenses)?,
            pending_invoices,
            gst_collected,
            gst_paid,
            net_gst: checked_sub("netGst", gst_collected, gst_paid)?,
        })
    }

    /// Validate raw store records and compute metrics over them. Fails on the
    /// first invalid record without producing a partial snapshot.
    pub fn compute_metrics_from_records(
        &self,
        expenses: &[ExpenseRecord],
        invoices: &[InvoiceRecord],
        window: Option<DateWindow>,
    ) -> EngineResult<MetricSnapshot> {
        let expenses = ExpenseMapper::to_domain_all(expenses)?;
        let invoices = InvoiceMapper::to_domain_all(invoices, &self.tax)?;
        self.compute_metrics(&expenses, &invoices, window)
    }

    /// Totals for the summary block of an expense report
    pub fn summarize_expenses(&self, expenses: &[Expense]) -> EngineResult<ExpenseReportSummary> {
        Ok(ExpenseReportSummary {
            total_expenses: checked_sum("amount", expenses.iter().map(Expense::amount))?,
            total_gst_paid: checked_sum("gstAmount", expenses.iter().map(Expense::gst_amount))?,
            transaction_count: expenses.len(),
        })
    }

    /// Invoiced, paid and outstanding totals across every invoice given,
    /// whatever its status
    pub fn summarize_invoices(&self, invoices: &[Invoice]) -> EngineResult<InvoiceSummary> {
        let total_invoiced = checked_sum("totalAmount", invoices.iter().map(Invoice::total_amount))?;
        let paid_amount = checked_sum(
            "totalAmount",
            invoices.iter().filter(|i| i.is_paid()).map(Invoice::total_amount),
        )?;
        let average_invoice = match invoices.len() {
            0 => Decimal::ZERO,
            n => total_invoiced / Decimal::from(n),
        };

        info!(
            "📊 METRICS: {} invoices, invoiced={} paid={}",
            invoices.len(),
            total_invoiced,
            paid_amount
        );

        Ok(InvoiceSummary {
            invoice_count: invoices.len(),
            total_invoiced,
            paid_amount,
            pending_amount: total_invoiced - paid_amount,
            average_invoice,
        })
    }

    /// Stock value and alerts for every item not comfortably in stock
    pub fn summarize_inventory(&self, items: &[InventoryItem]) -> EngineResult<InventorySummary> {
        let alerts: Vec<StockAlert> = items
            .iter()
            .filter(|item| item.stock_status() != StockStatus::InStock)
            .map(|item| StockAlert {
                item_id: item.id().to_string(),
                item_name: item.item_name().to_string(),
                quantity: item.quantity(),
                min_stock_level: item.min_stock_level(),
                status: item.stock_status(),
            })
            .collect();

        let out_of_stock_count = alerts.iter().filter(|a| a.status == StockStatus::OutOfStock).count();

        Ok(InventorySummary {
            item_count: items.len(),
            total_value: checked_sum("stockValue", items.iter().map(InventoryItem::stock_value))?,
            low_stock_count: alerts.len() - out_of_stock_count,
            out_of_stock_count,
            alerts,
        })
    }

    /// Newest expenses first; expenses on the same day keep their input order
    pub fn recent_transactions(&self, expenses: &[Expense], limit: usize) -> Vec<RecentTransaction> {
        let mut sorted: Vec<&Expense> = expenses.iter().collect();
        sorted.sort_by(|a, b| b.date().cmp(&a.date()));

        sorted
            .into_iter()
            .take(limit)
            .map(|e| RecentTransaction {
                id: e.id().to_string(),
                description: e.description().to_string(),
                category: e.category().to_string(),
                amount: e.amount(),
                date: e.date(),
            })
            .collect()
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new(TaxCalculator::new())
    }
}

/// `part` as a percentage of `whole`; zero when `whole` is zero
pub fn percentage_of(field: &str, part: Decimal, whole: Decimal) -> EngineResult<Decimal> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    let ratio = part
        .checked_div(whole)
        .ok_or_else(|| EngineError::invalid(field, "value is too large to compute"))?;
    checked_mul(field, ratio, Decimal::ONE_HUNDRED)
}

/// Net profit as a percentage of revenue; zero when there is no revenue
pub fn profit_margin(snapshot: &MetricSnapshot) -> EngineResult<Decimal> {
    percentage_of("profitMargin", snapshot.net_profit, snapshot.total_revenue)
}

/// Percentage change from `previous` to `current`; zero when `previous` is zero
pub fn growth_rate(current: Decimal, previous: Decimal) -> EngineResult<Decimal> {
    let change = checked_sub("growthRate", current, previous)?;
    percentage_of("growthRate", change, previous)
}
