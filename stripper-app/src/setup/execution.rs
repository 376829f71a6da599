//! Handles the execution of the `strip` and `merge` commands.

use std::time::Instant;

use anyhow::Context;
use log::info;
use rayon::prelude::*;
use stripper_core::{
    merge_catalogs, DecisionEngine, RunAggregator, ShaderStripper, StaticHost, StripperConfig,
};
use stripper_rules::loader::{load_catalog_from_file, load_from_file, save_catalog_to_file};

use crate::config::{AppConfig, MergeArgs, ReportOverrides, StripArgs};
use crate::error::AppError;
use crate::manifest::{BuildManifest, PassWork};
use crate::output;

/// Totals of a `strip` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StripSummary {
    pub passes: usize,
    pub variants_in: usize,
    pub variants_out: usize,
    pub enabled: bool,
}

/// Runs the stripper over a recorded build.
///
/// # Arguments
///
/// * `config` - Global application options (config file location).
/// * `args` - Options of the `strip` command.
///
/// # Returns
///
/// * `Ok(StripSummary)` with the variant totals.
/// * `Err(AppError)` if settings, manifest or rules could not be loaded.
pub fn run_strip(config: &AppConfig, args: &StripArgs) -> Result<StripSummary, AppError> {
    info!("Loading stripper settings from {}", args.settings.display());
    let mut settings = load_from_file(&args.settings)?;
    ReportOverrides::load(&config.config_file, args)?.apply(&mut settings);

    info!("Loading build manifest from {}", args.manifest.display());
    let mut manifest = BuildManifest::load(&args.manifest)?;
    let (host, handles) = manifest.to_host();
    let variants_in = manifest.variant_count();

    let mut builder = StripperConfig::builder()
        .settings(settings)
        .development_build(args.development);
    if let Some(dir) = args.settings.parent() {
        builder = builder.base_dir(dir);
    }
    let mut stripper = ShaderStripper::new(builder.build());
    stripper.prepare(&host, args.asset_bundles)?;

    let mut work = manifest.take_work(&handles);
    let passes = work.len();
    let started = Instant::now();
    if args.jobs > 1 {
        if let Some(engine) = stripper.engine() {
            let shard = process_parallel(engine, &host, &mut work, args.jobs)?;
            stripper.absorb(shard);
        }
    } else {
        for item in &mut work {
            stripper.on_process_variants(&host, item.shader, &item.snippet, &mut item.candidates);
        }
    }
    info!(
        "Processed {} passes in {}ms",
        passes,
        started.elapsed().as_millis()
    );

    let enabled = stripper.is_enabled();
    let report = stripper.finalize();
    manifest.restore_work(work);

    if let Some(path) = &args.output {
        manifest.save(path)?;
        info!("Filtered manifest written to {}", path.display());
    }
    if let (Some(path), Some(report)) = (&args.summary, &report) {
        output::save_summary(report, path)?;
    }

    Ok(StripSummary {
        passes,
        variants_in,
        variants_out: manifest.variant_count(),
        enabled,
    })
}

/// Evaluates passes on a dedicated pool, one aggregator per worker split.
///
/// Splits are reduced left to right, so pass keys keep manifest order.
fn process_parallel(
    engine: &DecisionEngine,
    host: &StaticHost,
    work: &mut [PassWork],
    jobs: usize,
) -> Result<RunAggregator, AppError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;
    info!("Evaluating {} passes on {} workers", work.len(), jobs);
    Ok(pool.install(|| {
        work.par_iter_mut()
            .fold(RunAggregator::new, |mut shard, item| {
                engine.process_variants(
                    host,
                    item.shader,
                    &item.snippet,
                    &mut item.candidates,
                    &mut shard,
                );
                shard
            })
            .reduce(RunAggregator::new, |mut left, right| {
                left.merge(right);
                left
            })
    }))
}

/// Merges reference catalogs, validating them against the manifest's shaders.
pub fn run_merge(args: &MergeArgs) -> Result<usize, AppError> {
    let manifest = BuildManifest::load(&args.manifest)?;
    let (host, _) = manifest.to_host();

    let mut catalogs = Vec::with_capacity(args.inputs.len());
    for path in &args.inputs {
        match load_catalog_from_file(path)? {
            Some(catalog) => catalogs.push(catalog),
            None => info!("Catalog {} not found, treating it as empty", path.display()),
        }
    }

    let merged = merge_catalogs(&catalogs, &host);
    save_catalog_to_file(&args.output, &merged)?;
    Ok(merged.variant_count())
}
