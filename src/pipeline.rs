//! Run orchestration: catalog → walker → path planner → synthesis driver.

use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::config::PipelineConfig;
use crate::driver::SynthesisDriver;
use crate::error::PipelineError;
use crate::paths::{plan_path, SublevelId};
use crate::walker::{duplicate_sublevels, CorpusWalker, SublevelBatch, SublevelOutcome};
use crate::SynthesisEngine;

/// One string and the file it renders to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedItem {
    pub sublevel: SublevelId,
    pub text: String,
    pub path: PathBuf,
}

/// An item whose synthesis failed. The rest of the run went on without it.
#[derive(Debug, Clone)]
pub struct FailedItem {
    pub sublevel: SublevelId,
    pub text: String,
    pub path: PathBuf,
    pub error: String,
}

/// Counters for one run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Sublevels with at least one string to synthesize.
    pub processed: usize,
    pub skipped: usize,
    pub missing: usize,
    pub unreadable: usize,
    pub empty: usize,
    /// Sublevels sharing an output directory with an earlier one.
    pub duplicates: Vec<SublevelId>,
    /// Items planned, including failures and dry-run items.
    pub planned: usize,
    pub written: usize,
    pub failed: Vec<FailedItem>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn record(&mut self, outcome: &SublevelOutcome) {
        match outcome {
            SublevelOutcome::Ready(_) => self.processed += 1,
            SublevelOutcome::Skipped { .. } => self.skipped += 1,
            SublevelOutcome::Missing { .. } => self.missing += 1,
            SublevelOutcome::Unreadable { .. } => self.unreadable += 1,
            SublevelOutcome::Empty { .. } => self.empty += 1,
        }
    }
}

/// Assign every string of a batch its output path, in sorted order.
pub fn plan_batch(config: &PipelineConfig, batch: &SublevelBatch) -> Vec<PlannedItem> {
    batch
        .strings
        .iter()
        .enumerate()
        .map(|(i, text)| PlannedItem {
            sublevel: batch.sublevel.clone(),
            text: text.clone(),
            path: plan_path(&config.audio_root, &batch.sublevel, i + 1, &config.extension),
        })
        .collect()
}

pub struct Pipeline<E: SynthesisEngine> {
    config: PipelineConfig,
    driver: SynthesisDriver<E>,
}

impl<E> Pipeline<E>
where
    E: SynthesisEngine,
    E::SynthesisParams: Clone,
{
    pub fn new(config: PipelineConfig, engine: E) -> Self {
        let driver = SynthesisDriver::new(engine, config.sample_rate);
        Self { config, driver }
    }

    /// Inference parameters used for every item.
    pub fn with_params(mut self, params: E::SynthesisParams) -> Self {
        self.driver = self.driver.with_params(params);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn into_engine(self) -> E {
        self.driver.into_engine()
    }

    /// Compute the full (text, path) plan without synthesizing anything.
    pub fn plan(&self) -> Result<Vec<PlannedItem>, PipelineError> {
        self.config.validate()?;
        let catalog = Catalog::load(&self.config.catalog_path)?;

        let mut items = Vec::new();
        for outcome in CorpusWalker::new(&catalog, &self.config) {
            if let SublevelOutcome::Ready(batch) = outcome {
                items.extend(plan_batch(&self.config, &batch));
            }
        }
        Ok(items)
    }

    /// Run the pipeline.
    ///
    /// Fails only when the configuration or catalog is unusable; per-sublevel
    /// problems and per-item synthesis faults are logged and reported.
    pub fn run(&mut self) -> Result<RunReport, PipelineError> {
        let config = &self.config;
        let driver = &mut self.driver;
        config.validate()?;
        let catalog = Catalog::load(&config.catalog_path)?;
        log::info!(
            "Loaded {} levels ({} sublevels) from {}",
            catalog.levels.len(),
            catalog.sublevel_count(),
            config.catalog_path.display()
        );

        let mut report = RunReport {
            duplicates: duplicate_sublevels(&catalog),
            ..RunReport::default()
        };
        for outcome in CorpusWalker::new(&catalog, config) {
            report.record(&outcome);
            let SublevelOutcome::Ready(batch) = outcome else {
                continue;
            };

            for item in plan_batch(config, &batch) {
                report.planned += 1;
                if config.dry_run {
                    log::info!("[DRY RUN] {} → {}", item.text, item.path.display());
                    continue;
                }

                match driver.synthesize_to(&item.text, &item.path) {
                    Ok(()) => report.written += 1,
                    Err(e) => {
                        log::warn!(
                            "Synthesis failed for {} {:?}: {e}",
                            item.sublevel.code,
                            item.text
                        );
                        report.failed.push(FailedItem {
                            sublevel: item.sublevel,
                            text: item.text,
                            path: item.path,
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        log::info!(
            "Done: {} written, {} failed, {} sublevels processed, {} skipped, {} missing, {} unreadable, {} empty, {} duplicate codes",
            report.written,
            report.failed.len(),
            report.processed,
            report.skipped,
            report.missing,
            report.unreadable,
            report.empty,
            report.duplicates.len()
        );
        Ok(report)
    }
}
