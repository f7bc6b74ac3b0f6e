//! Run configuration.
//!
//! Handles loading, validating, and merging `contactsheet.toml`. Every value
//! has a stock default; a user file only needs the keys it wants to change.
//! The file is merged key-by-key on top of the stock defaults, so a sparse
//! file like
//!
//! ```toml
//! [sheet]
//! cols = 6
//! rows = 10
//! ```
//!
//! keeps the tabloid page, margins, colors and thumbnail sizes.
//!
//! ## Lookup
//!
//! 1. `--config <file>` on the command line (must exist)
//! 2. `contactsheet.toml` in the working directory, if present
//! 3. stock defaults
//!
//! Unknown keys are rejected to catch typos early. Run
//! `contactsheet gen-config` for a fully commented file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file picked up from the working directory.
pub const CONFIG_FILENAME: &str = "contactsheet.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Complete run configuration.
///
/// All fields have defaults matching the classic tabloid 8×14 sheet and the
/// 1200×800 / 300×200 / 75px derivative set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Contact sheet page and grid settings.
    pub sheet: SheetConfig,
    /// Flat fill/stroke colors used on the sheet.
    pub colors: ColorConfig,
    /// Thumbnail and icon sizes.
    pub thumbnails: ThumbnailsConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    ///
    /// Grid density against the page is checked by the layout engine, which
    /// is the only place that knows the derived cell size.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sheet = &self.sheet;
        if sheet.cols == 0 || sheet.rows == 0 {
            return Err(ConfigError::Validation(
                "sheet.cols and sheet.rows must be non-zero".into(),
            ));
        }
        if sheet.page_width_cm <= 0.0 || sheet.page_height_cm <= 0.0 {
            return Err(ConfigError::Validation(
                "sheet.page_width_cm and sheet.page_height_cm must be positive".into(),
            ));
        }
        if sheet.margin_cm < 0.0 || sheet.gutter_cm < 0.0 || sheet.font_size < 0.0 {
            return Err(ConfigError::Validation(
                "sheet.margin_cm, sheet.gutter_cm and sheet.font_size must not be negative".into(),
            ));
        }
        if sheet.image_dpi == 0 {
            return Err(ConfigError::Validation(
                "sheet.image_dpi must be non-zero".into(),
            ));
        }
        if sheet.jpeg_quality == 0 || sheet.jpeg_quality > 100 {
            return Err(ConfigError::Validation(
                "sheet.jpeg_quality must be 1-100".into(),
            ));
        }
        if sheet.output.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sheet.output must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("background", &self.colors.background),
            ("label", &self.colors.label),
            ("cell_border", &self.colors.cell_border),
            ("image_border", &self.colors.image_border),
        ] {
            parse_color(value).map_err(|_| {
                ConfigError::Validation(format!(
                    "colors.{key} must be #rgb or #rrggbb, got {value:?}"
                ))
            })?;
        }
        let thumbs = &self.thumbnails;
        if thumbs.sizes.iter().any(|[w, h]| *w == 0 || *h == 0) {
            return Err(ConfigError::Validation(
                "thumbnails.sizes values must be non-zero".into(),
            ));
        }
        if thumbs.icon_size == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.icon_size must be non-zero".into(),
            ));
        }
        if thumbs.quality == 0 || thumbs.quality > 100 {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Contact sheet page and grid settings.
///
/// Physical sizes are in centimetres; the layout engine converts them to
/// PDF points.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetConfig {
    /// Grid columns per page.
    pub cols: u32,
    /// Grid rows per page.
    pub rows: u32,
    /// Page width in centimetres (tabloid: 27.94).
    pub page_width_cm: f32,
    /// Page height in centimetres (tabloid: 43.18).
    pub page_height_cm: f32,
    /// Blank border around the grid on every side.
    pub margin_cm: f32,
    /// Padding between a cell edge and its image.
    pub gutter_cm: f32,
    /// Label font size in points. Also the height of the label strip.
    pub font_size: f32,
    /// Where the finished document is written.
    pub output: String,
    /// Fill every page with the background color before placing cells.
    pub background: bool,
    /// Stroke a rectangle around every cell.
    pub draw_cell_border: bool,
    /// Stroke a rectangle around every placed image.
    pub draw_image_border: bool,
    /// Resolution images are downsampled to before embedding.
    pub image_dpi: u32,
    /// JPEG quality for embedded images (1-100).
    pub jpeg_quality: u8,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            cols: 8,
            rows: 14,
            page_width_cm: 27.94,
            page_height_cm: 43.18,
            margin_cm: 1.0,
            gutter_cm: 0.1,
            font_size: 6.0,
            output: "Contactsheet.pdf".to_string(),
            background: false,
            draw_cell_border: true,
            draw_image_border: true,
            image_dpi: 150,
            jpeg_quality: 85,
        }
    }
}

/// Flat colors, as `#rgb` or `#rrggbb`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page fill when `sheet.background` is on.
    pub background: String,
    /// Filename label color.
    pub label: String,
    /// Cell rectangle stroke.
    pub cell_border: String,
    /// Stroke around each placed image.
    pub image_border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#000000".to_string(),
            label: "#808080".to_string(),
            cell_border: "#808080".to_string(),
            image_border: "#666666".to_string(),
        }
    }
}

/// Derivative image sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Bounding boxes as `[width, height]`; images are resized to fit inside.
    pub sizes: Vec<[u32; 2]>,
    /// Edge of the square, top-anchored icon crop.
    pub icon_size: u32,
    /// JPEG quality for thumbnails and icons (1-100).
    pub quality: u8,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            sizes: vec![[1200, 800], [300, 200]],
            icon_size: 75,
            quality: 90,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of folders processed at once by `thumbs`.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, and at least one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Parse `#rgb` / `#rrggbb` into normalized RGB components.
pub fn parse_color(value: &str) -> Result<[f32; 3], ConfigError> {
    let invalid = || ConfigError::Validation(format!("invalid color {value:?}"));
    let hex = value.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
    let [r, g, b] = match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = channel(&c.to_string())?;
                out[i] = v * 17;
            }
            out
        }
        6 => [
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ],
        _ => return Err(invalid()),
    };
    Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from an explicit file. The file must exist.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load config from `contactsheet.toml` in `dir`, falling back to defaults
/// when the file doesn't exist.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() {
        load_config_file(&path)
    } else {
        resolve_config(None)
    }
}

/// Returns a fully-commented stock `contactsheet.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# contactsheet configuration
# ==========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Contact sheet
# ---------------------------------------------------------------------------
[sheet]
# Grid size per page.
cols = 8
rows = 14

# Physical page size in centimetres (tabloid).
page_width_cm = 27.94
page_height_cm = 43.18

# Blank border around the grid, and padding between a cell and its image.
margin_cm = 1.0
gutter_cm = 0.1

# Filename label size in points. The label strip is this tall.
font_size = 6.0

# Where the document is written (relative to the working directory).
output = "Contactsheet.pdf"

# Fill each page with colors.background before placing cells (same as -b).
background = false

# Page furniture.
draw_cell_border = true
draw_image_border = true

# Embedded images are downsampled to this resolution and stored as JPEG.
image_dpi = 150
jpeg_quality = 85

# ---------------------------------------------------------------------------
# Colors (#rgb or #rrggbb)
# ---------------------------------------------------------------------------
[colors]
background = "#000000"
label = "#808080"
cell_border = "#808080"
image_border = "#666666"

# ---------------------------------------------------------------------------
# Thumbnails and icons
# ---------------------------------------------------------------------------
[thumbnails]
# Bounding boxes [width, height]. Each size writes to <folder>-<W>x<H>/.
sizes = [[1200, 800], [300, 200]]

# Square icon edge. Icons write to <folder>-<N>/.
icon_size = 75

# JPEG quality for thumbnails and icons (1-100).
quality = 90

# ---------------------------------------------------------------------------
# Parallel processing
# ---------------------------------------------------------------------------
[processing]
# Maximum folders processed at once by `thumbs`.
# Omit to use all CPU cores. Values above the core count are clamped.
# max_processes = 4
"##
}
