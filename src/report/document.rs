use serde::Serialize;

use super::table::DrawCell;

/// Title line plus column header of a section, repeated on each page the
/// section touches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderBand {
    pub section: String,
    pub title: String,
    pub y: f32,
    pub title_height: f32,
    pub height: f32,
    pub cells: Vec<DrawCell>,
}

impl HeaderBand {
    /// Everything printed by the band, for identity checks across pages.
    pub fn text(&self) -> Vec<String> {
        std::iter::once(self.title.clone())
            .chain(self.cells.iter().map(|c| c.lines.join("\n")))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowBlock {
    pub section: String,
    pub row_index: usize,
    pub y: f32,
    pub height: f32,
    pub cells: Vec<DrawCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FooterBand {
    pub label: String,
    pub page_number: usize,
    pub total_pages: usize,
    pub y: f32,
}

impl FooterBand {
    pub fn page_text(&self) -> String {
        format!("Page {} of {}", self.page_number, self.total_pages)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "block", rename_all = "snake_case")]
pub enum Block {
    Header(HeaderBand),
    Row(RowBlock),
    Footer(FooterBand),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// 1-based
    pub number: usize,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self { number, blocks: Vec::new() }
    }

    pub fn headers(&self) -> impl Iterator<Item = &HeaderBand> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Header(h) => Some(h),
            _ => None,
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = &RowBlock> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Row(r) => Some(r),
            _ => None,
        })
    }

    pub fn footer(&self) -> Option<&FooterBand> {
        self.blocks.iter().find_map(|b| match b {
            Block::Footer(f) => Some(f),
            _ => None,
        })
    }

    pub fn holds_section(&self, section: &str) -> bool {
        self.headers().any(|h| h.section == section)
    }
}

/// Laid-out report. Pages are only ever appended while the layout engine runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Pages on which `section` has at least one block.
    pub fn pages_for_section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages.iter().filter(move |p| p.holds_section(section))
    }
}
