//! Plan command - schedule public counters into passes

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use counterpass_scheduler::{CounterScheduler, ScheduleSummary, SchedulerOptions};
use counterpass_shared::{CounterCatalog, HardwareCounterId, IsolationClass, PublicCounterId};
use serde::Serialize;
use tracing::debug;

use crate::config::{CliConfig, OutputFormat};
use crate::output;

#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Catalog file (JSON or TOML)
    #[arg(short, long)]
    pub catalog: Option<PathBuf>,

    /// Public counter to enable, by name or numeric id (repeatable)
    #[arg(short = 'e', long = "counter", value_name = "NAME|ID")]
    pub counters: Vec<String>,

    /// Enable every public counter in the catalog
    #[arg(long)]
    pub all: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Where one hardware result lands
#[derive(Debug, Clone, Serialize)]
pub struct LocationReport {
    pub hardware: HardwareCounterId,
    pub name: String,
    pub pass: u32,
    pub offset: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CounterReport {
    pub id: PublicCounterId,
    pub name: String,
    pub locations: Vec<LocationReport>,
}

/// Everything a replay driver needs from a schedule
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub summary: ScheduleSummary,
    pub passes: Vec<Vec<HardwareCounterId>>,
    pub counters: Vec<CounterReport>,
}

pub fn run(args: PlanArgs, config: &CliConfig) -> Result<()> {
    let path = super::catalog_path(args.catalog, config)?;
    let loaded = super::load_catalog(&path)?;
    let catalog = &loaded.catalog;

    let options = SchedulerOptions {
        mode: config.scheduling_mode,
    };
    let mut scheduler = CounterScheduler::with_options(catalog, options);

    if args.all {
        for definition in catalog.public_counters() {
            scheduler.enable_counter(definition.id)?;
        }
    }
    for selector in &args.counters {
        let id = enable(&mut scheduler, selector)?;
        debug!("Enabled {} as {}", selector, id);
    }

    if scheduler.enabled_count() == 0 {
        anyhow::bail!("No counters selected (use --counter NAME or --all)");
    }

    let report = build_report(&scheduler);
    output::info(&format!(
        "{} public counters need {} passes",
        report.summary.public_counter_count, report.summary.pass_count
    ));

    let rendered = match args.format.unwrap_or(config.format) {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            json
        }
    };

    output::emit(&rendered, args.output.as_deref())
}

/// Enable a counter given by numeric id or by name
fn enable<C>(scheduler: &mut CounterScheduler<'_, C>, selector: &str) -> Result<PublicCounterId>
where
    C: CounterCatalog + ?Sized,
{
    match selector.parse::<u32>() {
        Ok(raw) => {
            let id = PublicCounterId(raw);
            scheduler
                .enable_counter(id)
                .with_context(|| format!("Cannot enable counter {}", selector))?;
            Ok(id)
        }
        Err(_) => scheduler
            .enable_counter_by_name(selector)
            .with_context(|| format!("Cannot enable counter {}", selector)),
    }
}

pub fn build_report<C>(scheduler: &CounterScheduler<'_, C>) -> PlanReport
where
    C: CounterCatalog + ?Sized,
{
    let catalog = scheduler.catalog();
    let hardware_name = |hw: HardwareCounterId| {
        catalog
            .hardware_counter(hw)
            .map(|counter| counter.name.clone())
            .unwrap_or_else(|| hw.to_string())
    };

    let counters = scheduler
        .result_locations()
        .iter()
        .map(|(id, locations)| CounterReport {
            id,
            name: catalog
                .public_counter(id)
                .map(|definition| definition.name.clone())
                .unwrap_or_else(|| id.to_string()),
            locations: locations
                .iter()
                .map(|(hw, location)| LocationReport {
                    hardware: hw,
                    name: hardware_name(hw),
                    pass: location.pass,
                    offset: location.offset,
                })
                .collect(),
        })
        .collect();

    PlanReport {
        summary: scheduler.summary(),
        passes: scheduler
            .passes()
            .iter()
            .map(|pass| pass.counters().to_vec())
            .collect(),
        counters,
    }
}

pub fn render_text(report: &PlanReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    let _ = writeln!(
        out,
        "{} {} public counters, {} hardware counters, {} passes",
        "Schedule:".bold(),
        summary.public_counter_count,
        summary.hardware_counter_count,
        summary.pass_count
    );

    if summary.pass_count > 0 {
        let _ = writeln!(
            out,
            "Largest pass captures {} counters",
            summary.max_counters_per_pass()
        );
    }
    let saturated = summary.saturated_blocks();

    for pass in &summary.passes {
        let _ = writeln!(out);
        let header = format!("Pass {}", pass.index);
        if pass.isolation == IsolationClass::None {
            let _ = writeln!(out, "{} ({} counters)", header.cyan().bold(), pass.counters);
        } else {
            let _ = writeln!(
                out,
                "{} [{}] ({} counters)",
                header.cyan().bold(),
                pass.isolation,
                pass.counters
            );
        }
        for usage in &pass.blocks {
            let line = format!("  {:<12} {}/{}", usage.block, usage.used, usage.capacity);
            if saturated.contains(&(pass.index, usage.block.as_str())) {
                let _ = writeln!(out, "{} {}", line, "full".yellow());
            } else {
                let _ = writeln!(out, "{}", line);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "Result locations".bold());
    for counter in &report.counters {
        let _ = writeln!(out, "  {} ({})", counter.name.green(), counter.id);
        for location in &counter.locations {
            let _ = writeln!(
                out,
                "    {:<24} {:<8} pass {} offset {}",
                location.name,
                location.hardware.to_string(),
                location.pass,
                location.offset
            );
        }
    }

    out
}
