use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of decimal places money is presented with
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Round a money value to two decimal places, halves away from zero
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// A numeric field as delivered by the record store: either a JSON number or
/// a decimal string such as `"118.00"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl RawAmount {
    /// Textual form used for exact decimal parsing
    pub fn as_text(&self) -> String {
        match self {
            RawAmount::Number(n) => n.to_string(),
            RawAmount::Text(s) => s.trim().to_string(),
        }
    }
}

impl From<&str> for RawAmount {
    fn from(value: &str) -> Self {
        RawAmount::Text(value.to_string())
    }
}

impl From<i64> for RawAmount {
    fn from(value: i64) -> Self {
        RawAmount::Number(serde_json::Number::from(value))
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// Expense row as stored by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRecord {
    pub id: String,
    pub description: String,
    pub amount: RawAmount,
    pub category: String,
    /// `YYYY-MM-DD` or RFC 3339
    pub date: String,
    pub is_gst_applicable: bool,
    pub gst_amount: Option<RawAmount>,
    #[serde(alias = "receiptUrl")]
    pub receipt_ref: Option<String>,
}

/// Invoice row as stored by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceRecord {
    pub id: String,
    pub invoice_number: String,
    pub client_name: String,
    pub client_email: Option<String>,
    pub client_address: Option<String>,
    /// JSON array of `{description, quantity, rate}` objects
    pub items: String,
    pub subtotal: RawAmount,
    pub gst_amount: RawAmount,
    pub total_amount: RawAmount,
    pub status: String,
    /// RFC 3339 timestamp or `YYYY-MM-DD`
    pub created_at: String,
    pub due_date: Option<String>,
    pub paid_date: Option<String>,
    pub notes: Option<String>,
}

/// Inventory row as stored by the record store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: String,
    pub item_name: String,
    pub quantity: i64,
    pub min_stock_level: i64,
    pub unit_price: RawAmount,
    pub category: String,
}

/// Lifecycle state of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an invoice status string is not recognised
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownInvoiceStatus(pub String);

impl fmt::Display for UnknownInvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown invoice status: {}", self.0)
    }
}

impl std::error::Error for UnknownInvoiceStatus {}

impl FromStr for InvoiceStatus {
    type Err = UnknownInvoiceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            _ => Err(UnknownInvoiceStatus(s.to_string())),
        }
    }
}

/// Stock level classification for an inventory item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classify a quantity against its minimum stock level
    pub fn classify(quantity: u32, min_stock_level: u32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= min_stock_level {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

/// Inclusive date range used to scope an aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Returns `None` when `start` is after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Derived financial metrics for one window. Values keep full precision;
/// call [`MetricSnapshot::rounded`] before presenting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub window: Option<DateWindow>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    pub pending_invoices: usize,
    pub gst_collected: Decimal,
    pub gst_paid: Decimal,
    pub net_gst: Decimal,
}

impl MetricSnapshot {
    /// Copy with every money value rounded to two decimals
    pub fn rounded(&self) -> Self {
        Self {
            window: self.window,
            total_revenue: round2(self.total_revenue),
            total_expenses: round2(self.total_expenses),
            net_profit: round2(self.net_profit),
            pending_invoices: self.pending_invoices,
            gst_collected: round2(self.gst_collected),
            gst_paid: round2(self.gst_paid),
            net_gst: round2(self.net_gst),
        }
    }

    pub fn net_gst_position(&self) -> NetGstPosition {
        NetGstPosition::from_net(self.net_gst)
    }
}

/// Whether a net GST figure is owed, refundable or nil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetGstPosition {
    Liability,
    Refund,
    Settled,
}

impl NetGstPosition {
    pub fn from_net(net_gst: Decimal) -> Self {
        if net_gst > Decimal::ZERO {
            NetGstPosition::Liability
        } else if net_gst < Decimal::ZERO {
            NetGstPosition::Refund
        } else {
            NetGstPosition::Settled
        }
    }

    /// Suffix shown next to a net GST amount
    pub fn label(&self) -> &'static str {
        match self {
            NetGstPosition::Liability => "(Payable)",
            NetGstPosition::Refund => "(Refund)",
            NetGstPosition::Settled => "",
        }
    }
}

/// GST totals over one quarter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyGst {
    pub gst_collected: Decimal,
    pub gst_paid: Decimal,
    pub net_gst: Decimal,
}

impl QuarterlyGst {
    pub fn position(&self) -> NetGstPosition {
        NetGstPosition::from_net(self.net_gst)
    }
}

/// One row of the quarterly GST history table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterlyGstSummary {
    /// e.g. `Q3 2026`
    pub period: String,
    pub quarter_start: NaiveDate,
    /// Exclusive upper bound
    pub quarter_end: NaiveDate,
    pub gst_collected: Decimal,
    pub gst_paid: Decimal,
    pub net_gst: Decimal,
    pub due_date: NaiveDate,
}

/// Profit for one calendar month bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyProfitPoint {
    pub label: String,
    pub month_start: NaiveDate,
    pub profit: Decimal,
}

/// Amount spent in one expense category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAmount {
    pub category: String,
    pub amount: Decimal,
    /// Percentage of all expenses, unrounded
    pub share: Decimal,
}

/// Parallel revenue and expense series aligned by month label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueExpenseSeries {
    pub labels: Vec<String>,
    pub revenue: Vec<Decimal>,
    pub expenses: Vec<Decimal>,
}

/// An inventory item that needs attention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub item_id: String,
    pub item_name: String,
    pub quantity: u32,
    pub min_stock_level: u32,
    pub status: StockStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub item_count: usize,
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub out_of_stock_count: usize,
    pub alerts: Vec<StockAlert>,
}

/// Totals printed in the summary block of an expense report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseReportSummary {
    pub total_expenses: Decimal,
    pub total_gst_paid: Decimal,
    pub transaction_count: usize,
}

/// Receivables figures for the invoices and reports views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceSummary {
    pub invoice_count: usize,
    pub total_invoiced: Decimal,
    pub paid_amount: Decimal,
    pub pending_amount: Decimal,
    pub average_invoice: Decimal,
}

/// Expense shown in the dashboard's recent activity list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub id: String,
    pub description: String,
    pub category: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Type of calendar day for explicit rendering logic
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarDayType {
    /// Empty padding day before the start of the month
    PaddingBefore,
    /// Actual day within the month
    MonthDay,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CalendarEventKind {
    Expense,
    Invoice,
}

/// A record shown on a calendar day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub kind: CalendarEventKind,
    pub record_id: String,
    pub title: String,
    pub amount: Decimal,
    /// Expense category or invoice client
    pub detail: String,
}

/// Represents a single day in the calendar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub day: u32,
    pub day_type: CalendarDayType,
    pub events: Vec<CalendarEvent>,
}

/// Represents a calendar month with its expenses and invoices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub month: u32,
    pub year: i32,
    pub days: Vec<CalendarDay>,
    pub first_day_of_week: u32, // 0 = Sunday, 1 = Monday, etc.
    pub total_expenses: Decimal,
    pub total_revenue: Decimal,
}

/// A laid-out and encoded document ready to hand to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
    /// Table rows written to the document
    pub included_rows: usize,
    /// Rows left out because of the export row cap
    pub omitted_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportToPathResponse {
    pub file_path: String,
    pub bytes_written: usize,
    pub page_count: usize,
}
