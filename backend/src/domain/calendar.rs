//! Calendar view of the business records.
//!
//! Lays a month out as a Sunday-first grid and attaches the expenses and
//! invoices that fall on each day, together with the month's spend and paid
//! revenue. Navigation state lives with the caller; every call receives the
//! month it should render.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use log::{debug, info};
use rust_decimal::Decimal;
use shared::{CalendarDay, CalendarDayType, CalendarEvent, CalendarEventKind, CalendarMonth};

use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::money::checked_add;
use crate::domain::models::{Expense, Invoice};

#[derive(Clone, Default)]
pub struct CalendarService;

impl CalendarService {
    pub fn new() -> Self {
        Self
    }

    /// Generate the grid for `month`/`year` with its events and totals.
    ///
    /// Events on a day keep input order, expenses before invoices. Expenses
    /// are placed by their date and invoices by their issue date.
    pub fn generate_calendar_month(
        &self,
        month: u32,
        year: i32,
        expenses: &[Expense],
        invoices: &[Invoice],
    ) -> EngineResult<CalendarMonth> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| EngineError::invalid("month", format!("{}/{} is not a calendar month", month, year)))?;
        let days_in_month = self.days_in_month(month, year);
        let first_day = first.weekday().num_days_from_sunday();
        let in_month = |date: NaiveDate| date.year() == year && date.month() == month;

        let mut events_by_day: HashMap<u32, Vec<CalendarEvent>> = HashMap::new();
        let mut total_expenses = Decimal::ZERO;
        let mut total_revenue = Decimal::ZERO;

        for expense in expenses.iter().filter(|e| in_month(e.date())) {
            total_expenses = checked_add("amount", total_expenses, expense.amount())?;
            events_by_day.entry(expense.date().day()).or_default().push(CalendarEvent {
                kind: CalendarEventKind::Expense,
                record_id: expense.id().to_string(),
                title: expense.description().to_string(),
                amount: expense.amount(),
                detail: expense.category().to_string(),
            });
        }

        for invoice in invoices.iter().filter(|i| in_month(i.created_on())) {
            if invoice.is_paid() {
                total_revenue = checked_add("totalAmount", total_revenue, invoice.total_amount())?;
            }
            events_by_day.entry(invoice.created_on().day()).or_default().push(CalendarEvent {
                kind: CalendarEventKind::Invoice,
                record_id: invoice.id().to_string(),
                title: format!("Invoice {}", invoice.invoice_number()),
                amount: invoice.total_amount(),
                detail: invoice.client_name().to_string(),
            });
        }

        let mut days = Vec::with_capacity((first_day + days_in_month) as usize);
        for _ in 0..first_day {
            days.push(CalendarDay {
                day: 0,
                day_type: CalendarDayType::PaddingBefore,
                events: Vec::new(),
            });
        }
        for day in 1..=days_in_month {
            days.push(CalendarDay {
                day,
                day_type: CalendarDayType::MonthDay,
                events: events_by_day.remove(&day).unwrap_or_default(),
            });
        }

        debug!(
            "🗓️ CALENDAR: {} {} has {} padding days, {} days",
            self.month_name(month),
            year,
            first_day,
            days_in_month
        );
        info!(
            "🗓️ CALENDAR: {}/{} expenses={} revenue={}",
            month, year, total_expenses, total_revenue
        );

        Ok(CalendarMonth {
            month,
            year,
            days,
            first_day_of_week: first_day,
            total_expenses,
            total_revenue,
        })
    }

    /// Number of days in a month; 0 for a month outside 1-12
    pub fn days_in_month(&self, month: u32, year: i32) -> u32 {
        match month {
            2 => {
                if self.is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            _ => 0,
        }
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January",
            2 => "February",
            3 => "March",
            4 => "April",
            5 => "May",
            6 => "June",
            7 => "July",
            8 => "August",
            9 => "September",
            10 => "October",
            11 => "November",
            12 => "December",
            _ => "Invalid Month",
        }
    }

    pub fn previous_month(&self, month: u32, year: i32) -> (u32, i32) {
        if month <= 1 {
            (12, year - 1)
        } else {
            (month - 1, year)
        }
    }

    pub fn next_month(&self, month: u32, year: i32) -> (u32, i32) {
        if month >= 12 {
            (1, year + 1)
        } else {
            (month + 1, year)
        }
    }
}
