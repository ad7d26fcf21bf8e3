//! Byte encodings for laid out documents.

use super::layout::{Align, Column, Element, Page, TotalsLine};
use super::Document;
use crate::domain::errors::{EngineError, EngineResult};

/// Turns a laid out [`Document`] into bytes
pub trait DocumentEncoder {
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn encode(&self, document: &Document) -> EngineResult<Vec<u8>>;
}

/// The page description as pretty-printed JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl DocumentEncoder for JsonEncoder {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, document: &Document) -> EngineResult<Vec<u8>> {
        serde_json::to_vec_pretty(document)
            .map_err(|e| EngineError::malformed(format!("cannot encode document as JSON: {}", e)))
    }
}

/// Monospaced plain text; pages are separated by a form feed
#[derive(Debug, Clone, Copy)]
pub struct TextEncoder {
    line_width: usize,
}

pub const PAGE_SEPARATOR: char = '\u{0C}';
const TOTALS_WIDTH: usize = 32;

impl TextEncoder {
    pub fn new(line_width: usize) -> Self {
        Self {
            line_width: line_width.max(20),
        }
    }

    fn render_page(&self, page: &Page) -> String {
        let width = self.line_width;
        let mut out: Vec<String> = Vec::new();
        let mut columns: &[Column] = &[];

        for placed in &page.elements {
            match &placed.element {
                Element::Band { title, lines } => {
                    out.push(title.to_uppercase());
                    out.extend(lines.iter().map(|l| format!("{:>width$}", l, width = width)));
                    out.push("=".repeat(width));
                    out.push(String::new());
                }
                Element::TextBlock { heading, lines } => {
                    if let Some(heading) = heading {
                        out.push(heading.clone());
                    }
                    out.extend(lines.iter().cloned());
                    out.push(String::new());
                }
                Element::ColumnHeadings { columns: headings } => {
                    columns = headings.as_slice();
                    let titles: Vec<&str> = headings.iter().map(|c| c.title.as_str()).collect();
                    out.push(self.format_cells(columns, &titles));
                    out.push("-".repeat(width));
                }
                Element::TableRow { cells } => {
                    let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
                    out.push(self.format_cells(columns, &cells));
                }
                Element::Totals { lines } => {
                    out.push(String::new());
                    for line in lines {
                        let text = match line {
                            TotalsLine::Amount { label, value } => format!("{} {:>12}", label, value),
                            TotalsLine::Rule => "-".repeat(TOTALS_WIDTH),
                        };
                        out.push(format!("{:>width$}", text, width = width));
                    }
                    out.push(String::new());
                }
                Element::Footer { lines } => {
                    out.push(String::new());
                    out.extend(lines.iter().map(|l| center(l, width)));
                }
            }
        }

        let mut text = out.join("\n");
        text.push('\n');
        text
    }

    /// Fit each cell into its column's share of the line
    fn format_cells(&self, columns: &[Column], cells: &[&str]) -> String {
        let weights: Vec<usize> = if columns.len() == cells.len() {
            columns.iter().map(|c| c.weight.max(1) as usize).collect()
        } else {
            vec![1; cells.len()]
        };
        let total: usize = weights.iter().sum::<usize>().max(1);

        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            let cell_width = (self.line_width * weights[i] / total).max(2);
            let text: String = cell.chars().take(cell_width - 1).collect();
            let align = columns.get(i).map(|c| c.align).unwrap_or(Align::Left);
            match align {
                Align::Left => line.push_str(&format!("{:<w$}", text, w = cell_width)),
                Align::Right => line.push_str(&format!("{:>w$}", text, w = cell_width)),
            }
        }
        line.trim_end().to_string()
    }
}

impl Default for TextEncoder {
    fn default() -> Self {
        Self::new(80)
    }
}

impl DocumentEncoder for TextEncoder {
    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn extension(&self) -> &'static str {
        "txt"
    }

    fn encode(&self, document: &Document) -> EngineResult<Vec<u8>> {
        let pages: Vec<String> = document.pages.iter().map(|p| self.render_page(p)).collect();
        let separator = PAGE_SEPARATOR.to_string();
        Ok(pages.join(separator.as_str()).into_bytes())
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}
