use thiserror::Error;

/// Errors surfaced by the audit pipeline and its output writers.
///
/// Only `LayoutOverflow` comes from the core; malformed line data never fails.
#[derive(Error, Debug)]
pub enum AuditError {
    #[error(
        "section '{section}' row {row_index} needs {required:.1}pt but only {available:.1}pt fit on a page"
    )]
    LayoutOverflow {
        section: String,
        row_index: usize,
        required: f32,
        available: f32,
    },

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AuditError {
    pub fn is_layout_overflow(&self) -> bool {
        matches!(self, Self::LayoutOverflow { .. })
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
