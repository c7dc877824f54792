use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, StringFormat};

use super::document::{Block, FooterBand, HeaderBand, Page, ReportDocument, RowBlock};
use super::table::{Align, CellTone, DrawCell, Shade};
use crate::config::LayoutConfig;
use crate::error::{AuditError, Result};

const REGULAR: &[u8] = b"F1";
const BOLD: &[u8] = b"F2";

type Rgb = (f32, f32, f32);

const BLACK: Rgb = (0.0, 0.0, 0.0);
const INCREASE: Rgb = (0.75, 0.1, 0.1);
const DECREASE: Rgb = (0.1, 0.5, 0.2);
const FLAGGED: Rgb = (0.7, 0.45, 0.0);
const HEADER_FILL: Rgb = (0.82, 0.85, 0.9);
const ALTERNATE_FILL: Rgb = (0.95, 0.95, 0.95);
const MUTED: Rgb = (0.4, 0.4, 0.4);

/// Paints a laid-out document as PDF. Coordinates are flipped from the layout's
/// top-down y to PDF's bottom-up y here and nowhere else.
pub struct PdfRenderer {
    config: LayoutConfig,
}

impl PdfRenderer {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn render(&self, report: &ReportDocument) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(font("Helvetica"));
        let bold_id = doc.add_object(font("Helvetica-Bold"));
        let mut fonts = Dictionary::new();
        fonts.set(REGULAR.to_vec(), Object::Reference(regular_id));
        fonts.set(BOLD.to_vec(), Object::Reference(bold_id));
        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        let resources_id = doc.add_object(resources);

        let mut page_ids = Vec::with_capacity(report.pages.len());
        for page in &report.pages {
            let content = Content {
                operations: self.page_operations(report, page),
            };
            let encoded = content
                .encode()
                .map_err(|e| AuditError::Pdf(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), encoded));

            let page_dict = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Real(report.page_width.into()),
                        Object::Real(report.page_height.into()),
                    ]),
                ),
                ("Resources", Object::Reference(resources_id)),
                ("Contents", Object::Reference(content_id)),
            ]);
            page_ids.push(doc.add_object(page_dict));
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]);
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| AuditError::Pdf(e.to_string()))?;

        tracing::debug!("rendered {} page(s), {} bytes", report.page_count(), buffer.len());
        Ok(buffer)
    }

    fn page_operations(&self, report: &ReportDocument, page: &Page) -> Vec<Operation> {
        let mut ops = Vec::new();
        for block in &page.blocks {
            match block {
                Block::Header(band) => self.header_ops(report, band, &mut ops),
                Block::Row(row) => self.row_ops(report, row, &mut ops),
                Block::Footer(footer) => self.footer_ops(report, footer, &mut ops),
            }
        }
        ops
    }

    fn header_ops(&self, report: &ReportDocument, band: &HeaderBand, ops: &mut Vec<Operation>) {
        let baseline = band.y + band.title_height - 5.0;
        self.text(
            ops,
            report,
            BOLD,
            self.config.font_size + 2.0,
            BLACK,
            self.config.margin_left,
            baseline,
            &band.title,
        );
        for cell in &band.cells {
            self.cell_ops(report, cell, true, ops);
        }
    }

    fn row_ops(&self, report: &ReportDocument, row: &RowBlock, ops: &mut Vec<Operation>) {
        for cell in &row.cells {
            self.cell_ops(report, cell, false, ops);
        }
    }

    fn footer_ops(&self, report: &ReportDocument, footer: &FooterBand, ops: &mut Vec<Operation>) {
        let size = self.config.font_size - 1.0;
        self.text(ops, report, REGULAR, size, MUTED, self.config.margin_left, footer.y, &footer.label);
        let page_text = footer.page_text();
        let width = text_width(&page_text, size, self.config.glyph_width_ratio);
        let x = report.page_width - self.config.margin_right - width;
        self.text(ops, report, REGULAR, size, MUTED, x, footer.y, &page_text);
    }

    fn cell_ops(&self, report: &ReportDocument, cell: &DrawCell, header: bool, ops: &mut Vec<Operation>) {
        let fill = match cell.shade {
            Shade::Header => Some(HEADER_FILL),
            Shade::Alternate => Some(ALTERNATE_FILL),
            Shade::None => None,
        };
        if let Some((r, g, b)) = fill {
            ops.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
            ops.push(Operation::new(
                "re",
                vec![
                    real(cell.x),
                    real(report.page_height - cell.y - cell.height),
                    real(cell.width),
                    real(cell.height),
                ],
            ));
            ops.push(Operation::new("f", vec![]));
        }

        let (font, color) = match cell.tone {
            _ if header => (BOLD, BLACK),
            CellTone::Plain => (REGULAR, BLACK),
            CellTone::Strong => (BOLD, BLACK),
            CellTone::Increase => (REGULAR, INCREASE),
            CellTone::Decrease => (REGULAR, DECREASE),
            CellTone::Flagged => (REGULAR, FLAGGED),
        };
        let size = self.config.font_size;
        let inset = self.config.cell_inset;
        let top = cell.y + self.config.cell_padding / 2.0;

        for (idx, line) in cell.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let baseline = top + (idx as f32 + 1.0) * self.config.line_height - 2.0;
            let x = match cell.align {
                Align::Left => cell.x + inset,
                Align::Right => {
                    cell.x + cell.width - inset - text_width(line, size, self.config.glyph_width_ratio)
                }
            };
            self.text(ops, report, font, size, color, x, baseline, line);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &self,
        ops: &mut Vec<Operation>,
        report: &ReportDocument,
        font: &[u8],
        size: f32,
        (r, g, b): Rgb,
        x: f32,
        y: f32,
        text: &str,
    ) {
        if text.is_empty() {
            return;
        }
        ops.push(Operation::new("rg", vec![real(r), real(g), real(b)]));
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![Object::Name(font.to_vec()), real(size)]));
        ops.push(Operation::new("Td", vec![real(x), real(report.page_height - y)]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }
}

fn font(base: &str) -> Dictionary {
    Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(base.as_bytes().to_vec())),
        ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
    ])
}

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn text_width(text: &str, size: f32, ratio: f32) -> f32 {
    unicode_width::UnicodeWidthStr::width(text) as f32 * size * ratio
}

/// Latin-1 subset of WinAnsi; anything else prints as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7e | 0xa0..=0xff => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::layout::{ReportLayoutEngine, Section, SectionKind, SectionRow};
    use crate::report::table::{Cell, ColumnSpec};

    fn document(rows: usize) -> ReportDocument {
        let section = Section {
            id: "parts".to_string(),
            kind: SectionKind::CategoryTable,
            title: "PARTS".to_string(),
            columns: vec![ColumnSpec::left(300.0), ColumnSpec::right(240.0)],
            header: vec!["Description".to_string(), "Total".to_string()],
            rows: (0..rows)
                .map(|i| SectionRow::new(vec![Cell::plain(format!("Part {i}")), Cell::plain("$9.99")]))
                .collect(),
        };
        ReportLayoutEngine::new(LayoutConfig::default())
            .with_footer_label("CLM-1")
            .layout(&[section])
            .unwrap()
    }

    #[test]
    fn renders_one_pdf_page_per_layout_page() {
        let report = document(100);
        assert!(report.page_count() > 1);

        let bytes = PdfRenderer::new(LayoutConfig::default()).render(&report).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.7"));

        let parsed = Document::load_mem(&bytes).unwrap();
        assert_eq!(parsed.get_pages().len(), report.page_count());
    }

    #[test]
    fn non_latin_text_degrades_to_placeholders() {
        assert_eq!(win_ansi("Café"), b"Caf\xe9".to_vec());
        assert_eq!(win_ansi("板金"), b"??".to_vec());
    }
}
