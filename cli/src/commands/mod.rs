//! CLI command implementations

pub mod check;
pub mod list;
pub mod plan;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use counterpass_shared::{Api, CatalogFile, DeviceFamily, StaticCatalog};

use crate::config::CliConfig;

/// A validated catalog and the context its file declares
pub struct LoadedCatalog {
    pub context: Option<(Api, DeviceFamily)>,
    pub catalog: StaticCatalog,
}

/// Resolve the catalog path from the command line, falling back to the config
pub fn catalog_path(arg: Option<PathBuf>, config: &CliConfig) -> Result<PathBuf> {
    arg.or_else(|| config.catalog.clone())
        .context("No catalog given (use --catalog or set `catalog` in counterpass.toml)")
}

pub fn load_catalog(path: &Path) -> Result<LoadedCatalog> {
    let file = CatalogFile::from_path(path)
        .with_context(|| format!("Failed to load catalog {}", path.display()))?;
    let context = file.context();
    let catalog = file
        .into_catalog()
        .with_context(|| format!("Invalid catalog {}", path.display()))?;

    Ok(LoadedCatalog { context, catalog })
}

#[cfg(test)]
pub(crate) fn sample_catalog_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("catalogs/gfx9_dx11.toml")
}
