//! Check command - validate a catalog file

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use counterpass_shared::{CounterCatalog, StaticCatalog};
use tracing::info;

use crate::config::CliConfig;
use crate::output;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Catalog file (JSON or TOML)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,
}

pub fn run(args: CheckArgs, config: &CliConfig) -> Result<()> {
    let path = super::catalog_path(args.catalog, config)?;
    let loaded = super::load_catalog(&path)?;

    match loaded.context {
        Some((api, family)) => info!("Catalog targets {} on {}", api, family),
        None => output::warning("Catalog does not declare both `api` and `family`"),
    }

    for name in unused_hardware_counters(&loaded.catalog) {
        output::warning(&format!("Hardware counter {} is not used by any public counter", name));
    }

    output::success(&format!(
        "{} is valid: {} block instances, {} hardware counters, {} public counters",
        path.display(),
        loaded.catalog.blocks().len(),
        loaded.catalog.hardware_counters().len(),
        loaded.catalog.public_counters().len()
    ));

    Ok(())
}

/// Hardware counters no public counter depends on
fn unused_hardware_counters(catalog: &StaticCatalog) -> Vec<&str> {
    catalog
        .hardware_counters()
        .iter()
        .filter(|counter| {
            !catalog
                .public_counters()
                .iter()
                .any(|definition| definition.depends_on(counter.id))
        })
        .map(|counter| counter.name.as_str())
        .collect()
}
