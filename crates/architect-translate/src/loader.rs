use architect_core::resource::svg_data_uri;
use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{CatalogError, Catalogs, ResourceCatalog};
use crate::settings::TranslatorSettings;

const BUILTIN_SHAPES: &str = include_str!("../../../data/catalogs/shapes.ron");
const BUILTIN_NOISE: &str = include_str!("../../../data/catalogs/noise.ron");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to parse shape catalog RON: {0}")]
    ShapeCatalogParseError(String),
    #[error("Failed to parse noise catalog RON: {0}")]
    NoiseCatalogParseError(String),
    #[error("Failed to parse translator settings RON: {0}")]
    SettingsParseError(String),
    #[error("Invalid catalog entry: {0}")]
    InvalidCatalog(#[from] CatalogError),
}

/// A particle shape, stored as SVG markup and referenced as an inline data URI.
#[derive(Debug, Deserialize)]
struct ShapeEntry {
    symbol: String,
    svg: String,
}

/// A turbulence texture, referenced by URL.
#[derive(Debug, Deserialize)]
struct NoiseEntry {
    name: String,
    url: String,
}

/// Parse a shape catalog RON string.
pub fn load_shape_catalog_from_str(ron_str: &str) -> Result<ResourceCatalog, LoadError> {
    let entries: Vec<ShapeEntry> = ron::Options::default()
        .from_str(ron_str)
        .map_err(|e| LoadError::ShapeCatalogParseError(e.to_string()))?;

    let mut catalog = ResourceCatalog::new();
    for entry in entries {
        catalog.insert(entry.symbol, svg_data_uri(&entry.svg))?;
    }
    Ok(catalog)
}

/// Parse a noise catalog RON string.
pub fn load_noise_catalog_from_str(ron_str: &str) -> Result<ResourceCatalog, LoadError> {
    let entries: Vec<NoiseEntry> = ron::Options::default()
        .from_str(ron_str)
        .map_err(|e| LoadError::NoiseCatalogParseError(e.to_string()))?;

    let mut catalog = ResourceCatalog::new();
    for entry in entries {
        catalog.insert(entry.name, entry.url)?;
    }
    Ok(catalog)
}

/// Parse translator settings. Missing fields take their defaults.
pub fn load_settings_from_str(ron_str: &str) -> Result<TranslatorSettings, LoadError> {
    ron::Options::default()
        .from_str(ron_str)
        .map_err(|e| LoadError::SettingsParseError(e.to_string()))
}

impl Catalogs {
    /// Parse the catalogs shipped with the crate.
    pub fn builtin() -> Result<Self, LoadError> {
        let catalogs = Self {
            shapes: load_shape_catalog_from_str(BUILTIN_SHAPES)?,
            noise: load_noise_catalog_from_str(BUILTIN_NOISE)?,
        };
        log::info!(
            "Loaded {} shapes and {} noise textures",
            catalogs.shapes.len(),
            catalogs.noise.len()
        );
        Ok(catalogs)
    }
}
