//! Settings loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable settings files. Missing
//! fields fall back to `RenderSettings::default()`.

use std::fs;
use std::path::Path;
use crate::error::Result;
use crate::rasterizer::RenderSettings;

/// Load and validate settings from a RON file
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<RenderSettings> {
    let contents = fs::read_to_string(path)?;
    settings_from_str(&contents)
}

/// Parse and validate settings from a RON string
pub fn settings_from_str(s: &str) -> Result<RenderSettings> {
    let settings: RenderSettings = ron::from_str(s)?;
    settings.validate()?;
    Ok(settings)
}

/// Save settings to a RON file
pub fn save_settings<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<()> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(2)
        .indentor("  ".to_string());

    let contents = ron::ser::to_string_pretty(settings, config)?;
    fs::write(path, contents)?;
    Ok(())
}
