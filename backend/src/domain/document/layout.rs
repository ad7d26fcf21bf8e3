//! Page layout for generated documents.
//!
//! [`PageLayout`] walks through three phases: the header band on the first
//! page, the body (blocks and tables placed top to bottom, breaking onto new
//! pages as needed) and the footer on the last page. All measurements are in
//! millimetres with the origin at the top left corner of the page.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{EngineError, EngineResult};

/// Fixed page size and the vertical metrics of each kind of element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageGeometry {
    pub width: u32,
    pub height: u32,
    pub margin_top: u32,
    pub margin_bottom: u32,
    pub margin_left: u32,
    pub margin_right: u32,
    /// Height of the coloured band across the top of the first page
    pub band_height: u32,
    /// Height of one line inside text blocks, totals and the footer
    pub line_height: u32,
    pub heading_height: u32,
    pub row_height: u32,
    /// Space left after each text block and totals block
    pub block_gap: u32,
}

impl Default for PageGeometry {
    /// A4 portrait
    fn default() -> Self {
        Self {
            width: 210,
            height: 297,
            margin_top: 20,
            margin_bottom: 20,
            margin_left: 20,
            margin_right: 20,
            band_height: 30,
            line_height: 7,
            heading_height: 10,
            row_height: 10,
            block_gap: 8,
        }
    }
}

impl PageGeometry {
    /// Lowest y an element may reach
    pub fn usable_bottom(&self) -> u32 {
        self.height.saturating_sub(self.margin_bottom)
    }

    /// Vertical space on a page without a header band
    pub fn page_capacity(&self) -> u32 {
        self.usable_bottom().saturating_sub(self.margin_top)
    }

    pub fn content_width(&self) -> u32 {
        self.width
            .saturating_sub(self.margin_left.saturating_add(self.margin_right))
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.line_height == 0 || self.row_height == 0 || self.heading_height == 0 {
            return Err(EngineError::configuration("line, row and heading heights must be positive"));
        }
        if measure(&[self.margin_left, self.margin_right])? >= self.width {
            return Err(EngineError::configuration(format!(
                "horizontal margins {}+{} leave no room on a page {} wide",
                self.margin_left, self.margin_right, self.width
            )));
        }
        if measure(&[self.margin_top, self.margin_bottom])? >= self.height {
            return Err(EngineError::configuration(format!(
                "vertical margins {}+{} leave no room on a page {} high",
                self.margin_top, self.margin_bottom, self.height
            )));
        }
        let capacity = self.page_capacity();
        if measure(&[self.heading_height, self.row_height])? > capacity {
            return Err(EngineError::configuration(
                "a table heading and one row must fit on a page",
            ));
        }
        if measure(&[self.line_height, self.line_height, self.block_gap])? > capacity {
            return Err(EngineError::configuration("a text block heading and one line must fit on a page"));
        }
        if measure(&[self.band_height, self.block_gap])? >= self.usable_bottom() {
            return Err(EngineError::configuration(format!(
                "header band of {} leaves no room for content",
                self.band_height
            )));
        }
        Ok(())
    }
}

/// Sum of page measurements, rejected when it does not fit in a `u32`
fn measure(parts: &[u32]) -> EngineResult<u32> {
    parts
        .iter()
        .try_fold(0u32, |total, &part| total.checked_add(part))
        .ok_or_else(|| EngineError::configuration(format!("page measurements {:?} are too large", parts)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    Left,
    Right,
}

/// A table column; `weight` is its share of the content width
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub title: String,
    pub weight: u32,
    pub align: Align,
}

impl Column {
    pub fn left(title: &str, weight: u32) -> Self {
        Self {
            title: title.to_string(),
            weight,
            align: Align::Left,
        }
    }

    pub fn right(title: &str, weight: u32) -> Self {
        Self {
            title: title.to_string(),
            weight,
            align: Align::Right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TotalsLine {
    Amount { label: String, value: String },
    Rule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    Band { title: String, lines: Vec<String> },
    TextBlock { heading: Option<String>, lines: Vec<String> },
    ColumnHeadings { columns: Vec<Column> },
    TableRow { cells: Vec<String> },
    Totals { lines: Vec<TotalsLine> },
    Footer { lines: Vec<String> },
}

impl Element {
    pub fn height(&self, geometry: &PageGeometry) -> u32 {
        // saturates, so an oversized element simply never fits
        let lines = |n: usize| u32::try_from(n).unwrap_or(u32::MAX).saturating_mul(geometry.line_height);
        match self {
            Element::Band { .. } => geometry.band_height,
            Element::TextBlock { heading, lines: body } => {
                lines(body.len() + usize::from(heading.is_some())).saturating_add(geometry.block_gap)
            }
            Element::ColumnHeadings { .. } => geometry.heading_height,
            Element::TableRow { .. } => geometry.row_height,
            Element::Totals { lines: body } => lines(body.len()).saturating_add(geometry.block_gap),
            Element::Footer { lines: body } => lines(body.len()),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Element::Band { .. } => "band",
            Element::TextBlock { .. } => "text block",
            Element::ColumnHeadings { .. } => "column headings",
            Element::TableRow { .. } => "table row",
            Element::Totals { .. } => "totals",
            Element::Footer { .. } => "footer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedElement {
    pub x: u32,
    pub y: u32,
    pub height: u32,
    pub element: Element,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub index: usize,
    pub elements: Vec<PlacedElement>,
}

impl Page {
    fn new(index: usize) -> Self {
        Self {
            index,
            elements: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|p| matches!(p.element, Element::TableRow { .. }))
            .count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutPhase {
    Header,
    Body { page_index: usize, cursor_y: u32 },
    Footer,
}

/// Places elements onto pages.
///
/// An element fits when `cursor_y + height <= usable_bottom`. Inside an open
/// table a page break repeats the column headings, and headings are only
/// started where at least one row fits beneath them.
pub struct PageLayout {
    geometry: PageGeometry,
    pages: Vec<Page>,
    phase: LayoutPhase,
    table: Option<Vec<Column>>,
}

impl PageLayout {
    pub fn new(geometry: PageGeometry) -> EngineResult<Self> {
        geometry.validate()?;
        Ok(Self {
            geometry,
            pages: vec![Page::new(0)],
            phase: LayoutPhase::Header,
            table: None,
        })
    }

    pub fn phase(&self) -> LayoutPhase {
        self.phase
    }

    /// Put the band across the top of the first page
    pub fn header(&mut self, title: impl Into<String>, lines: Vec<String>) -> EngineResult<()> {
        if self.phase != LayoutPhase::Header {
            return Err(EngineError::malformed("document header placed after body content"));
        }
        let band = Element::Band {
            title: title.into(),
            lines,
        };
        let height = band.height(&self.geometry);
        self.pages[0].elements.push(PlacedElement {
            x: 0,
            y: 0,
            height,
            element: band,
        });
        self.phase = LayoutPhase::Body {
            page_index: 0,
            cursor_y: height.saturating_add(self.geometry.block_gap),
        };
        Ok(())
    }

    /// Place an element that must stay on one page. Closes any open table.
    pub fn place(&mut self, element: Element) -> EngineResult<()> {
        self.table = None;
        let height = element.height(&self.geometry);
        if height > self.geometry.page_capacity() {
            return Err(EngineError::malformed(format!(
                "{} of height {} does not fit on a page",
                element.kind(),
                height
            )));
        }
        let (_, cursor_y) = self.cursor();
        if !self.fits(cursor_y, height) {
            self.new_page();
        }
        self.push(element);
        Ok(())
    }

    /// Place a text block, splitting its lines across pages when it is taller
    /// than a page. The heading stays with the first part.
    pub fn place_text(&mut self, heading: Option<String>, lines: Vec<String>) -> EngineResult<()> {
        let whole = Element::TextBlock {
            heading: heading.clone(),
            lines: lines.clone(),
        };
        if whole.height(&self.geometry) <= self.geometry.page_capacity() {
            return self.place(whole);
        }

        self.table = None;
        let mut heading = heading;
        let mut remaining = lines.as_slice();
        loop {
            let (_, cursor_y) = self.cursor();
            let room = self.geometry.usable_bottom().saturating_sub(cursor_y);
            let fit = (room.saturating_sub(self.geometry.block_gap) / self.geometry.line_height)
                .saturating_sub(u32::from(heading.is_some())) as usize;
            if fit == 0 {
                self.new_page();
                continue;
            }

            let take = fit.min(remaining.len());
            self.push(Element::TextBlock {
                heading: heading.take(),
                lines: remaining[..take].to_vec(),
            });
            remaining = &remaining[take..];
            if remaining.is_empty() {
                return Ok(());
            }
            self.new_page();
        }
    }

    /// Start a table. The headings move to a new page unless a row fits
    /// beneath them.
    pub fn begin_table(&mut self, columns: Vec<Column>) -> EngineResult<()> {
        self.table = None;
        let needed = self.geometry.heading_height.saturating_add(self.geometry.row_height);
        let (_, cursor_y) = self.cursor();
        if !self.fits(cursor_y, needed) {
            self.new_page();
        }
        self.push(Element::ColumnHeadings {
            columns: columns.clone(),
        });
        self.table = Some(columns);
        Ok(())
    }

    pub fn table_row(&mut self, cells: Vec<String>) -> EngineResult<()> {
        if self.table.is_none() {
            return Err(EngineError::malformed("table row placed outside a table"));
        }
        let (_, cursor_y) = self.cursor();
        if !self.fits(cursor_y, self.geometry.row_height) {
            self.new_page();
        }
        self.push(Element::TableRow { cells });
        Ok(())
    }

    /// Anchor the footer to the bottom of the last page and hand back the
    /// finished pages
    pub fn footer(mut self, lines: Vec<String>) -> EngineResult<Vec<Page>> {
        self.table = None;
        let footer = Element::Footer { lines };
        let height = footer.height(&self.geometry);
        if height > self.geometry.page_capacity() {
            return Err(EngineError::malformed(format!("footer of height {} does not fit on a page", height)));
        }

        let anchor = self.geometry.usable_bottom() - height;
        let (_, cursor_y) = self.cursor();
        if cursor_y > anchor {
            self.new_page();
        }
        let last = self.pages.len() - 1;
        self.pages[last].elements.push(PlacedElement {
            x: self.geometry.margin_left,
            y: anchor,
            height,
            element: footer,
        });
        self.phase = LayoutPhase::Footer;

        debug!("📄 LAYOUT: finished {} pages", self.pages.len());
        Ok(self.pages)
    }

    /// Current page and cursor, entering the body if no header was placed
    fn cursor(&mut self) -> (usize, u32) {
        match self.phase {
            LayoutPhase::Body { page_index, cursor_y } => (page_index, cursor_y),
            // footer() consumes the layout, so only Header reaches here
            LayoutPhase::Header | LayoutPhase::Footer => {
                let start = self.geometry.margin_top;
                self.phase = LayoutPhase::Body {
                    page_index: 0,
                    cursor_y: start,
                };
                (0, start)
            }
        }
    }

    fn fits(&self, cursor_y: u32, height: u32) -> bool {
        cursor_y.saturating_add(height) <= self.geometry.usable_bottom()
    }

    fn new_page(&mut self) {
        let index = self.pages.len();
        self.pages.push(Page::new(index));
        self.phase = LayoutPhase::Body {
            page_index: index,
            cursor_y: self.geometry.margin_top,
        };
        debug!("📄 LAYOUT: page break, starting page {}", index + 1);

        if let Some(columns) = self.table.clone() {
            self.push(Element::ColumnHeadings { columns });
        }
    }

    fn push(&mut self, element: Element) {
        let (page_index, cursor_y) = self.cursor();
        let height = element.height(&self.geometry);
        self.pages[page_index].elements.push(PlacedElement {
            x: self.geometry.margin_left,
            y: cursor_y,
            height,
            element,
        });
        self.phase = LayoutPhase::Body {
            page_index,
            cursor_y: cursor_y.saturating_add(height),
        };
    }
}
