pub mod csv_export;
pub mod document;
pub mod layout;
pub mod pdf;
pub mod sections;
pub mod table;

pub use csv_export::{export_to_csv, write_csv};
pub use document::{Block, FooterBand, HeaderBand, Page, ReportDocument, RowBlock};
pub use layout::{LayoutCursor, ReportLayoutEngine, Section, SectionKind, SectionRow};
pub use pdf::PdfRenderer;
pub use sections::build_sections;
pub use table::{Align, Cell, CellTone, ColumnSpec, DrawCell, TableRenderer};
