//! List command - show the public counters a catalog defines

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use counterpass_shared::{CounterCatalog, PublicCounterDefinition, StaticCatalog};

use crate::config::CliConfig;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Catalog file (JSON or TOML)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Only show counters whose name contains this text (case-insensitive)
    #[arg(short, long)]
    pub filter: Option<String>,
}

pub fn run(args: ListArgs, config: &CliConfig) -> Result<()> {
    let path = super::catalog_path(args.catalog, config)?;
    let catalog = super::load_catalog(&path)?.catalog;

    let counters = matching(&catalog, args.filter.as_deref());
    if counters.is_empty() {
        output::warning("No public counters match");
        return Ok(());
    }

    for definition in counters {
        println!("{:>5}  {}", definition.id.0, definition.name.green());
        for hw in &definition.hardware_counters {
            match catalog.block_of(*hw) {
                Some((_, block)) => {
                    let name = catalog
                        .hardware_counter(*hw)
                        .map(|counter| counter.name.as_str())
                        .unwrap_or_default();
                    println!("         {:<24} {:<8} {}", name, hw.to_string(), block.label());
                }
                None => println!("         {}", hw),
            }
        }
    }

    Ok(())
}

fn matching<'a>(
    catalog: &'a StaticCatalog,
    filter: Option<&str>,
) -> Vec<&'a PublicCounterDefinition> {
    let filter = filter.map(str::to_lowercase);
    catalog
        .public_counters()
        .iter()
        .filter(|definition| match &filter {
            Some(text) => definition.name.to_lowercase().contains(text.as_str()),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{load_catalog, sample_catalog_path};

    #[test]
    fn test_filter_is_case_insensitive() {
        let catalog = load_catalog(&sample_catalog_path()).unwrap().catalog;

        let busy: Vec<_> = matching(&catalog, Some("BUSY"))
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(busy, vec!["GPUBusy", "CPBusy", "CSBusy", "TexUnitBusy"]);

        assert_eq!(matching(&catalog, None).len(), 7);
        assert!(matching(&catalog, Some("nothing")).is_empty());
    }
}
