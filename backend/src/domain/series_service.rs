//! Chart-ready time series for the dashboard and reports views.
//!
//! Each call scans its inputs once into a [`MonthlyIndex`] and then reads the
//! requested month buckets from it, so months without records still produce a
//! zero-valued bucket.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use shared::{CategoryAmount, MonthlyProfitPoint, RevenueExpenseSeries};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::metrics_service::percentage_of;
use crate::domain::models::dates::{add_months, first_of_month};
use crate::domain::models::money::{checked_add, checked_sum};
use crate::domain::models::{Expense, Invoice};

/// Months shown by the profit trend chart
pub const DEFAULT_TREND_MONTHS: usize = 12;
/// Months shown by the revenue/expense chart
pub const DEFAULT_CHART_MONTHS: usize = 6;
/// Categories listed in the top-expenses panel
pub const DEFAULT_TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthTotals {
    /// Paid invoice totals, bucketed by issue date
    pub revenue: Decimal,
    pub expenses: Decimal,
}

impl MonthTotals {
    pub fn profit(&self) -> Decimal {
        self.revenue - self.expenses
    }
}

/// Revenue and expense totals keyed by the first day of each month
#[derive(Debug, Clone, Default)]
pub struct MonthlyIndex {
    buckets: BTreeMap<NaiveDate, MonthTotals>,
}

impl MonthlyIndex {
    pub fn build(expenses: &[Expense], invoices: &[Invoice]) -> EngineResult<Self> {
        let mut buckets: BTreeMap<NaiveDate, MonthTotals> = BTreeMap::new();

        for expense in expenses {
            let bucket = buckets.entry(first_of_month(expense.date())).or_default();
            bucket.expenses = checked_add("amount", bucket.expenses, expense.amount())?;
        }
        for invoice in invoices.iter().filter(|i| i.is_paid()) {
            let bucket = buckets.entry(first_of_month(invoice.created_on())).or_default();
            bucket.revenue = checked_add("totalAmount", bucket.revenue, invoice.total_amount())?;
        }

        Ok(Self { buckets })
    }

    pub fn totals(&self, month_start: NaiveDate) -> MonthTotals {
        self.buckets.get(&month_start).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Short chart label for a month, e.g. `Oct 26`
pub fn month_label(month_start: NaiveDate) -> String {
    month_start.format("%b %y").to_string()
}

/// Start dates of the `month_count` months ending with the month of `today`,
/// oldest first
pub fn trailing_months(month_count: usize, today: NaiveDate) -> EngineResult<Vec<NaiveDate>> {
    let current = first_of_month(today);
    (0..month_count)
        .rev()
        .map(|back| {
            let offset = i32::try_from(back)
                .map_err(|_| EngineError::invalid("monthCount", format!("{} months is too many", month_count)))?;
            add_months(current, -offset)
        })
        .collect()
}

#[derive(Clone, Default)]
pub struct SeriesService;

impl SeriesService {
    pub fn new() -> Self {
        Self
    }

    /// Profit per month for the trailing `month_count` months, oldest first
    pub fn monthly_trend(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        month_count: usize,
        today: NaiveDate,
    ) -> EngineResult<Vec<MonthlyProfitPoint>> {
        let index = MonthlyIndex::build(expenses, invoices)?;
        debug!("📈 SERIES: indexed {} populated months", index.len());

        Ok(trailing_months(month_count, today)?
            .into_iter()
            .map(|month_start| MonthlyProfitPoint {
                label: month_label(month_start),
                month_start,
                profit: index.totals(month_start).profit(),
            })
            .collect())
    }

    /// Spend per category, largest first. Equal amounts keep the order in
    /// which their categories first appear. `top_n = None` keeps every
    /// category. Shares are taken against all expenses, not just the
    /// categories kept.
    pub fn category_breakdown(&self, expenses: &[Expense], top_n: Option<usize>) -> EngineResult<Vec<CategoryAmount>> {
        let mut position: HashMap<&str, usize> = HashMap::new();
        let mut totals: Vec<CategoryAmount> = Vec::new();

        for expense in expenses {
            match position.get(expense.category()) {
                Some(&i) => totals[i].amount = checked_add("amount", totals[i].amount, expense.amount())?,
                None => {
                    position.insert(expense.category(), totals.len());
                    totals.push(CategoryAmount {
                        category: expense.category().to_string(),
                        amount: expense.amount(),
                        share: Decimal::ZERO,
                    });
                }
            }
        }

        let grand_total = checked_sum("amount", totals.iter().map(|c| c.amount))?;
        for category in totals.iter_mut() {
            category.share = percentage_of("share", category.amount, grand_total)?;
        }

        // sort_by is stable, which gives the first-seen tie-break
        totals.sort_by(|a, b| b.amount.cmp(&a.amount));
        if let Some(n) = top_n {
            totals.truncate(n);
        }
        Ok(totals)
    }

    /// Revenue and expense totals for the trailing `month_count` months as
    /// two parallel vectors sharing one label list
    pub fn revenue_expense_series(
        &self,
        expenses: &[Expense],
        invoices: &[Invoice],
        month_count: usize,
        today: NaiveDate,
    ) -> EngineResult<RevenueExpenseSeries> {
        let index = MonthlyIndex::build(expenses, invoices)?;
        let months = trailing_months(month_count, today)?;

        let mut series = RevenueExpenseSeries {
            labels: Vec::with_capacity(months.len()),
            revenue: Vec::with_capacity(months.len()),
            expenses: Vec::with_capacity(months.len()),
        };
        for month_start in months {
            let totals = index.totals(month_start);
            series.labels.push(month_label(month_start));
            series.revenue.push(totals.revenue);
            series.expenses.push(totals.expenses);
        }

        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{InvoiceItem, NewExpense, NewInvoice};
    use crate::domain::tax_service::TaxCalculator;
    use shared::InvoiceStatus;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(category: &str, amount: &str, on: NaiveDate) -> Expense {
        let new = NewExpense {
            id: format!("{}-{}", category, on),
            description: category.to_string(),
            amount: dec(amount),
            category: category.to_string(),
            date: on,
            is_gst_applicable: false,
            receipt_ref: None,
        };
        Expense::create(new, &TaxCalculator::new()).unwrap()
    }

    fn paid_invoice(subtotal: &str, on: NaiveDate, status: InvoiceStatus) -> Invoice {
        let new = NewInvoice {
            id: format!("inv-{}", on),
            invoice_number: format!("INV-{}", on),
            client_name: "Client".to_string(),
            client_email: None,
            client_address: None,
            items: vec![InvoiceItem::new("Work", 1, dec(subtotal)).unwrap()],
            status,
            created_at: on.and_hms_opt(10, 0, 0).unwrap().and_utc(),
            due_date: None,
            paid_date: None,
            notes: None,
        };
        Invoice::create(new, &TaxCalculator::new()).unwrap()
    }

    #[test]
    fn test_monthly_trend_emits_zero_buckets_oldest_first() {
        let service = SeriesService::new();
        let today = date(2026, 10, 19);
        let expenses = vec![expense("Rent", "500", date(2026, 8, 1))];
        let invoices = vec![
            paid_invoice("1000", date(2026, 10, 2), InvoiceStatus::Paid),
            paid_invoice("9999", date(2026, 10, 3), InvoiceStatus::Sent),
        ];

        for count in [1, 3, DEFAULT_TREND_MONTHS] {
            let trend = service.monthly_trend(&expenses, &invoices, count, today).unwrap();
            assert_eq!(trend.len(), count);
            assert_eq!(trend.last().unwrap().label, "Oct 26");
            assert!(trend.windows(2).all(|w| w[0].month_start < w[1].month_start));
        }

        let trend = service.monthly_trend(&expenses, &invoices, 12, today).unwrap();
        assert_eq!(trend[0].label, "Nov 25");
        assert_eq!(trend[9].profit, dec("-500"));
        assert_eq!(trend[10].profit, Decimal::ZERO);
        assert_eq!(trend[11].profit, dec("1180"));
    }

    #[test]
    fn test_monthly_trend_with_no_records() {
        let service = SeriesService::new();
        let trend = service.monthly_trend(&[], &[], 6, date(2026, 1, 31)).unwrap();
        assert_eq!(trend.len(), 6);
        assert!(trend.iter().all(|p| p.profit.is_zero()));
        assert_eq!(trend[0].label, "Aug 25");
    }

    #[test]
    fn test_category_breakdown_sorted_with_stable_ties() {
        let service = SeriesService::new();
        let d = date(2026, 1, 1);
        let expenses = vec![
            expense("Travel", "100", d),
            expense("Meals", "40", d),
            expense("Software", "100", d),
            expense("Meals", "60", d),
            expense("Office", "250", d),
        ];

        let breakdown = service.category_breakdown(&expenses, None).unwrap();
        let order: Vec<(&str, Decimal)> = breakdown.iter().map(|c| (c.category.as_str(), c.amount)).collect();
        assert_eq!(
            order,
            vec![
                ("Office", dec("250")),
                ("Travel", dec("100")),
                ("Meals", dec("100")),
                ("Software", dec("100")),
            ]
        );

        let top = service.category_breakdown(&expenses, Some(2)).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[1].category, "Travel");
    }

    #[test]
    fn test_category_share_of_all_expenses() {
        let service = SeriesService::new();
        let d = date(2026, 1, 1);
        let expenses = vec![
            expense("Rent", "600", d),
            expense("Meals", "300", d),
            expense("Software", "100", d),
        ];

        let top = service.category_breakdown(&expenses, Some(2)).unwrap();
        let shares: Vec<Decimal> = top.iter().map(|c| c.share).collect();
        assert_eq!(shares, vec![dec("60"), dec("30")]);

        let all = service.category_breakdown(&expenses, None).unwrap();
        let total: Decimal = all.iter().map(|c| c.share).sum();
        assert_eq!(total, dec("100"));

        let free = vec![expense("Samples", "0", d)];
        assert_eq!(service.category_breakdown(&free, None).unwrap()[0].share, Decimal::ZERO);
    }

    #[test]
    fn test_series_overflow_is_invalid() {
        let service = SeriesService::new();
        let d = date(2026, 10, 1);
        let huge = "50000000000000000000000000000";
        let expenses = vec![expense("Capital", huge, d), expense("Capital", huge, d)];

        assert!(matches!(
            service.monthly_trend(&expenses, &[], 3, date(2026, 10, 19)),
            Err(EngineError::InvalidRecord { .. })
        ));
        assert!(matches!(
            service.category_breakdown(&expenses, None),
            Err(EngineError::InvalidRecord { .. })
        ));
    }

    #[test]
    fn test_month_count_beyond_i32_is_rejected() {
        let err = trailing_months(i32::MAX as usize + 2, date(2026, 10, 19)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecord { ref field, .. } if field == "monthCount"));
    }

    #[test]
    fn test_revenue_expense_series_is_aligned() {
        let service = SeriesService::new();
        let expenses = vec![
            expense("Rent", "500", date(2026, 9, 1)),
            expense("Rent", "500", date(2026, 10, 1)),
        ];
        let invoices = vec![paid_invoice("100", date(2026, 9, 30), InvoiceStatus::Paid)];

        let series = service
            .revenue_expense_series(&expenses, &invoices, DEFAULT_CHART_MONTHS, date(2026, 10, 19))
            .unwrap();

        assert_eq!(series.labels.len(), 6);
        assert_eq!(series.revenue.len(), 6);
        assert_eq!(series.expenses.len(), 6);
        assert_eq!(series.labels[4], "Sep 26");
        assert_eq!(series.revenue[4], dec("118"));
        assert_eq!(series.expenses[4], dec("500"));
        assert_eq!(series.revenue[5], Decimal::ZERO);
        assert_eq!(series.expenses[5], dec("500"));
    }
}
