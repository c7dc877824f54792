use serde::Serialize;

use super::document::{Block, FooterBand, HeaderBand, Page, ReportDocument, RowBlock};
use super::table::{Cell, CellTone, ColumnSpec, MeasuredRow, Shade, TableRenderer};
use crate::config::LayoutConfig;
use crate::error::{AuditError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SectionKind {
    Overview,
    CategoryTable,
    GrandTotal,
    WarrantyTable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionRow {
    pub cells: Vec<Cell>,
}

impl SectionRow {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }
}

/// A titled table: header band plus rows, laid out as one unit of content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub id: String,
    pub kind: SectionKind,
    pub title: String,
    pub columns: Vec<ColumnSpec>,
    pub header: Vec<String>,
    pub rows: Vec<SectionRow>,
}

/// Position of the layout run. Lives for exactly one document build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCursor {
    pub current_page_index: usize,
    pub current_y: f32,
    pub page_height: f32,
    pub safe_margin: f32,
}

impl LayoutCursor {
    fn fits(&self, height: f32) -> bool {
        self.current_y + height + self.safe_margin <= self.page_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LayoutState {
    Idle,
    /// `header_drawn` is true once the section's header band is on the current page
    LayingOutSection {
        section: usize,
        row: usize,
        header_drawn: bool,
    },
    NeedsPageBreak {
        section: usize,
        row: usize,
    },
    Done,
}

struct MeasuredSection<'a> {
    section: &'a Section,
    header: MeasuredRow,
    rows: Vec<MeasuredRow>,
}

/// Paginates sections onto fixed-size pages. Rows never split; a page that
/// continues a table starts with that table's header band.
#[derive(Debug, Clone)]
pub struct ReportLayoutEngine {
    config: LayoutConfig,
    renderer: TableRenderer,
    footer_label: String,
}

impl ReportLayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            renderer: TableRenderer::new(config),
            footer_label: String::new(),
        }
    }

    /// Text printed at the left of every footer band.
    pub fn with_footer_label(mut self, label: impl Into<String>) -> Self {
        self.footer_label = label.into();
        self
    }

    fn band_height(&self, header: &MeasuredRow) -> f32 {
        self.config.title_height + header.height
    }

    /// # Errors
    ///
    /// `AuditError::LayoutOverflow` when a row plus its section header cannot fit
    /// on an empty page.
    pub fn layout(&self, sections: &[Section]) -> Result<ReportDocument> {
        let measured: Vec<MeasuredSection<'_>> = sections
            .iter()
            .map(|section| MeasuredSection {
                section,
                header: self.renderer.measure(&section.columns, &header_cells(section)),
                rows: section
                    .rows
                    .iter()
                    .map(|row| self.renderer.measure(&section.columns, &row.cells))
                    .collect(),
            })
            .collect();

        let mut pages: Vec<Page> = Vec::new();
        let mut cursor = LayoutCursor {
            current_page_index: 0,
            current_y: self.config.margin_top,
            page_height: self.config.page_height,
            safe_margin: self.config.safe_margin,
        };
        let mut state = LayoutState::Idle;

        loop {
            state = match state {
                LayoutState::Idle => {
                    self.open_page(&mut pages, &mut cursor);
                    LayoutState::LayingOutSection { section: 0, row: 0, header_drawn: false }
                }
                LayoutState::LayingOutSection { section, .. } if section >= measured.len() => {
                    LayoutState::Done
                }
                LayoutState::LayingOutSection { section, row, header_drawn: false } => {
                    self.place_header_unit(section, &measured[section], row, &mut pages, &mut cursor)?
                }
                LayoutState::LayingOutSection { section, row, header_drawn: true } => {
                    let current = &measured[section];
                    match current.rows.get(row) {
                        None => LayoutState::LayingOutSection {
                            section: section + 1,
                            row: 0,
                            header_drawn: false,
                        },
                        Some(measured_row) if cursor.fits(measured_row.height) => {
                            self.place_row(current, row, measured_row, &mut pages, &mut cursor);
                            LayoutState::LayingOutSection { section, row: row + 1, header_drawn: true }
                        }
                        Some(_) => LayoutState::NeedsPageBreak { section, row },
                    }
                }
                LayoutState::NeedsPageBreak { section, row } => {
                    tracing::debug!(
                        "page break before row {} of section '{}' (page {})",
                        row,
                        measured[section].section.id,
                        cursor.current_page_index + 1
                    );
                    self.open_page(&mut pages, &mut cursor);
                    LayoutState::LayingOutSection { section, row, header_drawn: false }
                }
                LayoutState::Done => break,
            };
        }

        let total_pages = pages.len();
        let footer_y = self.config.page_height - self.config.safe_margin / 2.0;
        for page in &mut pages {
            page.blocks.push(Block::Footer(FooterBand {
                label: self.footer_label.clone(),
                page_number: page.number,
                total_pages,
                y: footer_y,
            }));
        }

        Ok(ReportDocument {
            title: self.footer_label.clone(),
            page_width: self.config.page_width,
            page_height: self.config.page_height,
            pages,
        })
    }

    fn open_page(&self, pages: &mut Vec<Page>, cursor: &mut LayoutCursor) {
        pages.push(Page::new(pages.len() + 1));
        cursor.current_page_index = pages.len() - 1;
        cursor.current_y = self.config.margin_top;
    }

    fn at_page_top(&self, cursor: &LayoutCursor) -> bool {
        cursor.current_y <= self.config.margin_top
    }

    /// Draws the header band together with row `row` (if any) as one unit and
    /// returns the next state.
    fn place_header_unit(
        &self,
        section: usize,
        current: &MeasuredSection<'_>,
        row: usize,
        pages: &mut [Page],
        cursor: &mut LayoutCursor,
    ) -> Result<LayoutState> {
        let band = self.band_height(&current.header);
        let first = current.rows.get(row);
        let unit = band + first.map_or(0.0, |r| r.height);

        if self.at_page_top(cursor) {
            if !cursor.fits(unit) {
                let id = &current.section.id;
                tracing::warn!(
                    "section '{}' row {} overflows the page: {:.1}pt > {:.1}pt",
                    id,
                    row,
                    unit,
                    self.config.printable_height()
                );
                return Err(AuditError::LayoutOverflow {
                    section: id.clone(),
                    row_index: row,
                    required: unit,
                    available: self.config.printable_height(),
                });
            }
        } else {
            // sections are separated by a gap, continuations start flush at the top
            let gap = if row == 0 { self.config.section_gap } else { 0.0 };
            if !cursor.fits(gap + unit) {
                return Ok(LayoutState::NeedsPageBreak { section, row });
            }
            cursor.current_y += gap;
        }

        let title_height = self.config.title_height;
        pages[cursor.current_page_index].blocks.push(Block::Header(HeaderBand {
            section: current.section.id.clone(),
            title: current.section.title.clone(),
            y: cursor.current_y,
            title_height,
            height: band,
            cells: self.renderer.draw(
                &current.section.columns,
                &current.header,
                cursor.current_y + title_height,
                Shade::Header,
            ),
        }));
        cursor.current_y += band;

        let next_row = match first {
            Some(measured_row) => {
                self.place_row(current, row, measured_row, pages, cursor);
                row + 1
            }
            None => row,
        };
        Ok(LayoutState::LayingOutSection { section, row: next_row, header_drawn: true })
    }

    fn place_row(
        &self,
        current: &MeasuredSection<'_>,
        row: usize,
        measured_row: &MeasuredRow,
        pages: &mut [Page],
        cursor: &mut LayoutCursor,
    ) {
        let shade = if row % 2 == 1 { Shade::Alternate } else { Shade::None };
        let cells = self
            .renderer
            .draw(&current.section.columns, measured_row, cursor.current_y, shade);
        pages[cursor.current_page_index].blocks.push(Block::Row(RowBlock {
            section: current.section.id.clone(),
            row_index: row,
            y: cursor.current_y,
            height: measured_row.height,
            cells,
        }));
        cursor.current_y += measured_row.height;
    }
}

fn header_cells(section: &Section) -> Vec<Cell> {
    section
        .header
        .iter()
        .map(|h| Cell::toned(h.clone(), CellTone::Strong))
        .collect()
}
