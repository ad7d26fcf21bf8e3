use chrono::NaiveDate;
use log::info;
use shared::QuarterlyGstSummary;

use super::layout::{Column, Element, PageLayout, TotalsLine};
use super::{Document, DocumentRenderer};
use crate::domain::errors::{EngineError, EngineResult};
use crate::domain::models::format_net_gst;
use crate::domain::models::money::{checked_sub, checked_sum};

impl DocumentRenderer {
    /// Lay out the quarterly GST history, one row per quarter in the given
    /// order, with a net position per quarter and overall
    pub fn render_gst_summary(&self, quarters: &[QuarterlyGstSummary], generated_on: NaiveDate) -> EngineResult<Document> {
        if quarters.is_empty() {
            return Err(EngineError::malformed("GST summary has no quarters"));
        }

        let mut layout = PageLayout::new(self.config.geometry)?;
        layout.header("GST Summary", vec![self.config.company_name.clone()])?;
        layout.place_text(
            None,
            vec![
                format!("Generated: {}", self.date(generated_on)),
                format!("Rate: {}", self.tax.rate_label()),
            ],
        )?;

        layout.begin_table(vec![
            Column::left("Period", 2),
            Column::right("Collected", 2),
            Column::right("Paid", 2),
            Column::right("Net GST", 3),
            Column::right("Due", 2),
        ])?;
        for quarter in quarters {
            layout.table_row(vec![
                quarter.period.clone(),
                self.money(quarter.gst_collected),
                self.money(quarter.gst_paid),
                format_net_gst(&self.config.currency_prefix, quarter.net_gst),
                self.date(quarter.due_date),
            ])?;
        }

        let collected = checked_sum("gstCollected", quarters.iter().map(|q| q.gst_collected))?;
        let paid = checked_sum("gstPaid", quarters.iter().map(|q| q.gst_paid))?;
        let net = checked_sub("netGst", collected, paid)?;
        layout.place(Element::Totals {
            lines: vec![
                TotalsLine::Amount {
                    label: "GST Collected:".to_string(),
                    value: self.money(collected),
                },
                TotalsLine::Amount {
                    label: "GST Paid:".to_string(),
                    value: self.money(paid),
                },
                TotalsLine::Rule,
                TotalsLine::Amount {
                    label: "Net GST:".to_string(),
                    value: format_net_gst(&self.config.currency_prefix, net),
                },
            ],
        })?;

        let pages = layout.footer(vec![format!("Generated by {}", self.config.company_name)])?;
        info!("📄 DOCUMENT: GST summary of {} quarters laid out", quarters.len());

        Ok(Document {
            title: "GST Summary".to_string(),
            geometry: self.config.geometry,
            pages,
            included_rows: quarters.len(),
            omitted_rows: 0,
        })
    }
}
