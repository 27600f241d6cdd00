//! Memory test families
//!
//! A [`MemoryTest`] names a set of optimized/baseline [`PairSpec`]s. Running
//! it measures each side of each pair in its own window, combines the two
//! results and collects everything into a [`TestOutcome`]. A pair that fails
//! is recorded on its entity; its siblings still run.

pub mod big;
pub mod multi;
pub mod small;

pub use big::LargeStructTest;
pub use multi::MultiStructTest;
pub use small::SmallStructTest;

use indicatif::ProgressBar;
use log::{info, warn};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ConfigFile;
use crate::config::file::{DEFAULT_LARGE_OBJECT_COUNT, DEFAULT_OBJECT_COUNT};
use crate::error::LayoutDeltaError;
use crate::memory::{
    combine, CollectionController, DeltaEngine, EntityReport, HeapSampler, LayoutComparison,
    SavingsError, SavingsReport, TestOutcome, Workload,
};
use crate::models::{compare, Model};

/// Object counts and seed for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    /// Count for high-volume pairs
    pub object_count: usize,
    /// Count for the wide-struct family
    pub large_object_count: usize,
    /// Multiplier applied to every count
    pub scale: f64,
    /// Seed used to populate both sides of every pair
    pub seed: u64,
    /// Per-entity count overrides, keyed by entity label
    pub overrides: BTreeMap<String, usize>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            object_count: DEFAULT_OBJECT_COUNT,
            large_object_count: DEFAULT_LARGE_OBJECT_COUNT,
            scale: 1.0,
            seed: DeltaEngine::default().seed(),
            overrides: BTreeMap::new(),
        }
    }
}

impl RunSettings {
    /// Settings from a loaded configuration file
    ///
    /// Without a configured seed, the current time seeds the run.
    pub fn from_config(config: &ConfigFile) -> Self {
        let seed = config.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default()
        });

        Self {
            object_count: config.object_count(),
            large_object_count: config.large_object_count(),
            scale: config.scale(),
            seed,
            overrides: config.entities.clone(),
        }
    }

    /// Replace the count multiplier
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Count for an entity: its override, or `default`, times the scale
    pub fn count_for(&self, label: &str, default: usize) -> usize {
        let base = self.overrides.get(label).copied().unwrap_or(default);
        (base as f64 * self.scale).round() as usize
    }
}

/// One optimized/baseline pair to measure
#[derive(Debug)]
pub struct PairSpec {
    /// Entity label shown in reports
    pub label: String,
    /// Instances allocated on each side
    pub object_count: usize,
    /// Workload with the padding-minimizing field order
    pub optimized: Workload,
    /// Workload with the original field order
    pub baseline: Workload,
    /// Static layout comparison reported next to the measurement
    pub layouts: Option<LayoutComparison>,
}

impl PairSpec {
    /// Pair of two models with their layout comparison
    pub fn of<O: Model, B: Model>(label: impl Into<String>, object_count: usize) -> Self {
        Self {
            label: label.into(),
            object_count,
            optimized: O::workload(),
            baseline: B::workload(),
            layouts: Some(compare::<O, B>()),
        }
    }
}

/// Shared state for running tests
pub struct RunContext<'a> {
    controller: CollectionController<&'a dyn HeapSampler>,
    engine: DeltaEngine,
    progress: ProgressBar,
}

impl<'a> RunContext<'a> {
    /// Context measuring through `sampler`, populating from `seed`
    pub fn new(sampler: &'a dyn HeapSampler, seed: u64) -> Self {
        Self {
            controller: CollectionController::with_sampler(sampler),
            engine: DeltaEngine::new(seed),
            progress: ProgressBar::hidden(),
        }
    }

    /// Report pair progress on `progress`
    ///
    /// The bar is only redrawn between measurements, never while a window
    /// is sampling.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// The progress bar pairs report to
    pub fn progress(&self) -> &ProgressBar {
        &self.progress
    }

    fn measure_pair(&self, pair: &PairSpec) -> Result<SavingsReport, SavingsError> {
        let optimized =
            self.engine
                .measure_isolated(&self.controller, &pair.optimized, pair.object_count)?;
        let baseline =
            self.engine
                .measure_isolated(&self.controller, &pair.baseline, pair.object_count)?;
        combine(&optimized, &baseline)
    }
}

/// A family of struct pairs measured together
pub trait MemoryTest {
    /// Registry key used on the command line
    fn key(&self) -> &'static str;

    /// Display name
    fn name(&self) -> &'static str;

    /// Pairs to measure under `settings`
    fn pairs(&self, settings: &RunSettings) -> Vec<PairSpec>;

    /// Measure every pair
    fn run(&self, settings: &RunSettings, ctx: &RunContext<'_>) -> TestOutcome {
        run_pairs(self.key(), self.name(), self.pairs(settings), ctx)
    }
}

/// Measure `pairs` in order and collect the outcome
///
/// Each side of each pair gets a fresh window. Failures are stored on the
/// entity and never stop the remaining pairs.
pub fn run_pairs(key: &str, name: &str, pairs: Vec<PairSpec>, ctx: &RunContext<'_>) -> TestOutcome {
    let mut outcome = TestOutcome::new(key, name);

    for pair in pairs {
        ctx.progress
            .set_message(format!("{}: {} ({} objects)", name, pair.label, pair.object_count));

        let savings = ctx.measure_pair(&pair);
        match &savings {
            Ok(report) => info!(
                "{}: saved {} bytes ({:.2}%)",
                pair.label, report.saved_bytes, report.saved_percent
            ),
            Err(e) => warn!("{}: not measured: {}", pair.label, e),
        }

        outcome.push_entity(EntityReport {
            label: pair.label,
            layouts: pair.layouts,
            savings,
        });
        ctx.progress.inc(1);
    }

    outcome
}

/// Fill the statistics a single-pair family reports
pub(crate) fn record_single_pair_stats(outcome: &mut TestOutcome) {
    let Some(entity) = outcome.entities.first() else {
        return;
    };
    let layouts = entity.layouts.clone();
    let report = entity.savings.clone().ok();

    if let Some(layouts) = layouts {
        outcome.set_stat("OptimizedStructSize", layouts.optimized.size as i64);
        outcome.set_stat("UnoptimizedStructSize", layouts.baseline.size as i64);
        outcome.set_stat("TheoreticalWastePerStruct", layouts.waste_per_instance());
        if let Some(report) = &report {
            outcome.set_stat(
                "TheoreticalTotalWaste",
                layouts.total_waste(report.object_count),
            );
        }
    }

    if let Some(report) = report {
        outcome.set_stat(
            "OptimizedMemory",
            i64::try_from(report.optimized_bytes).unwrap_or(i64::MAX),
        );
        outcome.set_stat(
            "UnoptimizedMemory",
            i64::try_from(report.baseline_bytes).unwrap_or(i64::MAX),
        );
        outcome.set_stat("MemorySavingPercent", report.saved_percent);
    }
}

/// Every built-in test, in run order
pub fn registry() -> Vec<Box<dyn MemoryTest>> {
    vec![
        Box::new(SmallStructTest),
        Box::new(LargeStructTest),
        Box::new(MultiStructTest),
    ]
}

/// Keys of every built-in test
pub fn available_keys() -> Vec<&'static str> {
    registry().iter().map(|t| t.key()).collect()
}

/// Labels of every pair across the built-in tests, in run order
pub fn entity_labels() -> Vec<String> {
    let settings = RunSettings::default();
    registry()
        .iter()
        .flat_map(|t| t.pairs(&settings))
        .map(|p| p.label)
        .collect()
}

/// Look up tests by key; an empty selection means every test
///
/// Names are trimmed and repeated names run once.
///
/// # Errors
///
/// [`LayoutDeltaError::UnknownTest`] for the first name that matches no test.
pub fn select(names: &[String]) -> Result<Vec<Box<dyn MemoryTest>>, LayoutDeltaError> {
    let wanted: Vec<&str> = names
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    if wanted.is_empty() {
        return Ok(registry());
    }

    let mut selected: Vec<Box<dyn MemoryTest>> = Vec::new();
    for name in wanted {
        if selected.iter().any(|t| t.key() == name) {
            continue;
        }
        let test = registry()
            .into_iter()
            .find(|t| t.key() == name)
            .ok_or_else(|| LayoutDeltaError::UnknownTest {
                name: name.to_string(),
                available: available_keys().iter().map(|k| k.to_string()).collect(),
            })?;
        selected.push(test);
    }

    Ok(selected)
}
