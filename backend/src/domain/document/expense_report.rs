use chrono::NaiveDate;
use log::{info, warn};

use super::layout::{Column, PageLayout};
use super::{Document, DocumentRenderer};
use crate::domain::errors::EngineResult;
use crate::domain::metrics_service::MetricsService;
use crate::domain::models::Expense;

impl DocumentRenderer {
    /// Lay out an expense report for `expenses` in the given order.
    ///
    /// The summary covers every expense; the table stops after
    /// `max_expense_rows` rows and the document says how many were left out.
    pub fn render_expense_report(
        &self,
        expenses: &[Expense],
        period_label: &str,
        generated_on: NaiveDate,
    ) -> EngineResult<Document> {
        let summary = MetricsService::new(self.tax).summarize_expenses(expenses)?;
        let included = expenses.len().min(self.config.max_expense_rows);
        let omitted = expenses.len() - included;

        let mut layout = PageLayout::new(self.config.geometry)?;
        layout.header("Expense Report", vec![self.config.company_name.clone()])?;
        layout.place_text(
            None,
            vec![
                format!("Period: {}", period_label),
                format!("Generated: {}", self.date(generated_on)),
            ],
        )?;
        layout.place_text(
            Some("Summary".to_string()),
            vec![
                format!("Total Expenses: {}", self.money(summary.total_expenses)),
                format!("Total GST Paid: {}", self.money(summary.total_gst_paid)),
                format!("Number of Transactions: {}", summary.transaction_count),
            ],
        )?;

        if expenses.is_empty() {
            layout.place_text(None, vec!["No expenses recorded for this period.".to_string()])?;
        } else {
            layout.begin_table(vec![
                Column::left("Date", 2),
                Column::left("Description", 4),
                Column::left("Category", 3),
                Column::right("Amount", 2),
            ])?;
            for expense in &expenses[..included] {
                layout.table_row(vec![
                    self.date(expense.date()),
                    truncate_chars(expense.description(), self.config.description_char_budget),
                    expense.category().to_string(),
                    self.money(expense.amount()),
                ])?;
            }
        }

        if omitted > 0 {
            warn!(
                "📄 DOCUMENT: expense report capped at {} rows, {} omitted",
                included, omitted
            );
            layout.place_text(
                None,
                vec![format!(
                    "Showing the first {} of {} expenses ({} omitted).",
                    included,
                    expenses.len(),
                    omitted
                )],
            )?;
        }

        let pages = layout.footer(vec![format!("Generated by {}", self.config.company_name)])?;
        info!(
            "📄 DOCUMENT: expense report for '{}' laid out on {} pages",
            period_label,
            pages.len()
        );

        Ok(Document {
            title: "Expense Report".to_string(),
            geometry: self.config.geometry,
            pages,
            included_rows: included,
            omitted_rows: omitted,
        })
    }
}

fn truncate_chars(text: &str, budget: usize) -> String {
    text.chars().take(budget).collect()
}
