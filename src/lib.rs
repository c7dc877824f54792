pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod service;

pub use config::{AppConfig, LayoutConfig};
pub use error::{AuditError, Result};
pub use service::{AuditReport, AuditService};
