use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub audit: AuditConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Business thresholds for variance review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// |total %| at or above this marks an item significant
    pub pct_threshold: f64,
    /// |total delta| at or above this marks an item significant
    pub amount_threshold: f64,
    /// Differences at or below this are treated as unchanged
    pub amount_tolerance: f64,
    /// Allowed gap between a cost breakdown's sum and the line total
    pub breakdown_tolerance: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            pct_threshold: 10.0,
            amount_threshold: 500.0,
            amount_tolerance: 0.01,
            breakdown_tolerance: 0.01,
        }
    }
}

/// Page geometry and typography, in PDF points (1/72 in). Y grows downward from
/// the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Reserved space at the bottom of each page; the footer band prints here.
    pub safe_margin: f32,
    pub font_size: f32,
    pub line_height: f32,
    /// Vertical padding added once per row
    pub cell_padding: f32,
    /// Horizontal inset of text inside a cell
    pub cell_inset: f32,
    /// Height of a section title line above the column header
    pub title_height: f32,
    pub section_gap: f32,
    /// Average Helvetica advance as a fraction of the font size
    pub glyph_width_ratio: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            margin_top: 54.0,
            margin_left: 36.0,
            margin_right: 36.0,
            safe_margin: 54.0,
            font_size: 8.0,
            line_height: 10.0,
            cell_padding: 6.0,
            cell_inset: 3.0,
            title_height: 18.0,
            section_gap: 14.0,
            glyph_width_ratio: 0.5,
        }
    }
}

impl LayoutConfig {
    pub fn content_width(&self) -> f32 {
        (self.page_width - self.margin_left - self.margin_right).max(1.0)
    }

    /// Vertical space usable by section content on one page.
    pub fn printable_height(&self) -> f32 {
        self.page_height - self.margin_top - self.safe_margin
    }

    /// Height of a row whose tallest cell wraps to `lines` lines.
    pub fn row_height(&self, lines: usize) -> f32 {
        lines.max(1) as f32 * self.line_height + self.cell_padding
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = AuditConfig::default();
        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            audit: AuditConfig {
                pct_threshold: env_f64("AUDIT_PCT_THRESHOLD").unwrap_or(defaults.pct_threshold),
                amount_threshold: env_f64("AUDIT_AMOUNT_THRESHOLD")
                    .unwrap_or(defaults.amount_threshold),
                ..defaults
            },
            layout: LayoutConfig::default(),
        }
    }

    /// Loads `config/default`, `config/{RUN_MODE}`, then `CLAIM_AUDIT__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CLAIM_AUDIT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

fn env_f64(key: &str) -> Option<f64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
