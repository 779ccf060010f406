//! Evolution loop driving the ruleset search.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::schema::{
    CHECKPOINT_VERSION, Checkpoint, ConfigError, Ruleset, SearchConfig, SearchProgress,
    SearchReport, SearchState, Shade, StopReason,
};

use super::checkpoint::{CheckpointError, CheckpointStore};
use super::fitness::{FitnessEvaluator, TargetRepresentation};
use super::genome::GenomeRng;
use super::selection::build_next_generation;

/// Errors raised while setting up or running a search cycle.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Target grid has side {found}, expected {expected}")]
    TargetSize { expected: usize, found: usize },
    #[error("Target grid contains shade {shade} outside the {num_shades}-shade palette")]
    TargetShade { shade: Shade, num_shades: usize },
    #[error("Population is empty, nothing to breed from")]
    EmptyBreedingPool,
    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
    #[error("Progress hook failed: {0}")]
    Hook(String),
}

/// Result of a single successful cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new generation was built.
    Continue,
    /// Termination condition holds; the scored generation is final.
    Stop,
}

/// Evolution engine that runs the search.
pub struct EvolutionEngine {
    config: SearchConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    state: SearchState,
    store: Option<CheckpointStore>,
    target_file: PathBuf,
    start_time: u64,
    started: Instant,
    elapsed_before: Duration,
    failed_cycles: usize,
    cancelled: Arc<AtomicBool>,
}

impl EvolutionEngine {
    /// Create an engine with a random initial population.
    pub fn new(config: SearchConfig, target: TargetRepresentation) -> Result<Self, SearchError> {
        config.validate()?;
        check_target(&config, &target)?;

        let mut rng = match config.random_seed {
            Some(seed) => GenomeRng::new(seed),
            None => GenomeRng::random(),
        };
        let population = (0..config.population_size)
            .map(|_| rng.random_ruleset(config.num_shades))
            .collect();

        let start_time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Ok(Self {
            evaluator: FitnessEvaluator::new(&config, target),
            rng,
            config,
            state: SearchState::new(population),
            store: None,
            target_file: PathBuf::new(),
            start_time,
            started: Instant::now(),
            elapsed_before: Duration::ZERO,
            failed_cycles: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Rebuild an engine from a checkpoint, continuing where it left off.
    pub fn from_checkpoint(checkpoint: Checkpoint) -> Result<Self, SearchError> {
        let config = checkpoint.config.clone();
        config.validate()?;

        let target = TargetRepresentation::from_parts(
            checkpoint.target.clone(),
            checkpoint.target_smoothed.clone(),
        );
        check_target(&config, &target)?;
        if checkpoint.rulesets.len() < config.breeding_size {
            return Err(SearchError::Config(ConfigError::PopulationTooSmall {
                field: "rulesets",
                size: checkpoint.rulesets.len(),
                breeding_size: config.breeding_size,
            }));
        }

        let rng = match config.random_seed {
            // Offset so a resumed run does not replay the original stream.
            Some(seed) => GenomeRng::new(seed.wrapping_add(checkpoint.current_generation as u64)),
            None => GenomeRng::random(),
        };

        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(checkpoint.start_time);
        let elapsed_before = Duration::from_secs(now.saturating_sub(checkpoint.start_time));

        log::info!(
            "Resuming search at generation {} ({} rulesets)",
            checkpoint.current_generation,
            checkpoint.rulesets.len()
        );

        Ok(Self {
            evaluator: FitnessEvaluator::new(&config, target),
            rng,
            state: checkpoint.to_state(),
            config,
            store: None,
            target_file: checkpoint.target_file,
            start_time: checkpoint.start_time,
            started: Instant::now(),
            elapsed_before,
            failed_cycles: 0,
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Persist autosaves and the final state into this store.
    pub fn with_checkpoint_store(mut self, store: CheckpointStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Record the target image path in checkpoints.
    pub fn with_target_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.target_file = path.into();
        self
    }

    /// Get cancellation handle.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Snapshot of the full search state.
    pub fn checkpoint(&self) -> Checkpoint {
        let target = self.evaluator.target();
        Checkpoint {
            version: CHECKPOINT_VERSION,
            config: self.config.clone(),
            current_generation: self.state.current_generation,
            current_fitness: self.state.current_fitness,
            start_time: self.start_time,
            target_file: self.target_file.clone(),
            target: target.grid().clone(),
            target_smoothed: target.smoothed().clone(),
            rulesets: self.state.population.clone(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.elapsed_before + self.started.elapsed()
    }

    /// Score, sort, and record the best fitness of the current generation.
    fn evaluate_population(&mut self) {
        self.evaluator.score_population(&mut self.state.population);
        self.state
            .population
            .sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        self.state.current_fitness = self.state.population.first().map(|r| r.fitness);
    }

    /// Check whether the search should stop after scoring.
    ///
    /// Both the generation budget and the fitness target must be met.
    fn should_stop(&self) -> bool {
        self.state.current_generation >= self.config.max_generations
            && self
                .state
                .current_fitness
                .is_some_and(|f| f <= self.config.convergence_threshold())
    }

    fn progress(&self) -> Option<SearchProgress> {
        let best = self.state.population.first()?;
        let avg_fitness = self.state.population.iter().map(|r| r.fitness).sum::<f64>()
            / self.state.population.len() as f64;

        Some(SearchProgress {
            generation: self.state.current_generation,
            best_fitness: best.fitness,
            avg_fitness,
            best: best.clone(),
            elapsed_seconds: self.elapsed().as_secs_f64(),
        })
    }

    /// Run one score, report, select, breed cycle.
    ///
    /// State changes made before an error are kept.
    pub fn step_generation<F>(&mut self, callback: &mut F) -> Result<CycleOutcome, SearchError>
    where
        F: FnMut(&SearchProgress) -> Result<(), SearchError>,
    {
        self.evaluate_population();
        let generation = self.state.current_generation;

        if generation > 0
            && generation % self.config.progress_frequency == 0
            && let Some(progress) = self.progress()
        {
            log::info!(
                "Breeding generation {}, current fitness: {:.0}",
                generation,
                progress.best_fitness
            );
            callback(&progress)?;
        }

        if generation > 0
            && generation % self.config.autosave_frequency == 0
            && let Some(store) = &self.store
        {
            let path = store.autosave(&self.checkpoint())?;
            log::debug!("Autosaved generation {} to {}", generation, path.display());
        }

        if self.should_stop() {
            return Ok(CycleOutcome::Stop);
        }

        let scored = std::mem::take(&mut self.state.population);
        self.state.population = build_next_generation(scored, &self.config, &mut self.rng)?;
        self.state.current_generation += 1;

        Ok(CycleOutcome::Continue)
    }

    /// Run evolution with progress callback.
    ///
    /// The callback receives a progress update every `progress_frequency`
    /// generations; an error from it fails that cycle like any other.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> SearchReport
    where
        F: FnMut(&SearchProgress) -> Result<(), SearchError>,
    {
        log::info!(
            "Starting search: {} shades, {} rulesets, target side {}",
            self.config.num_shades,
            self.state.population.len(),
            self.config.grid_side()
        );

        let stop_reason = loop {
            if self.cancelled.load(Ordering::Relaxed) {
                log::warn!(
                    "Search interrupted at generation {}",
                    self.state.current_generation
                );
                break StopReason::Cancelled;
            }

            match self.step_generation(&mut callback) {
                Ok(CycleOutcome::Stop) => break StopReason::Converged,
                Ok(CycleOutcome::Continue) => {}
                Err(e) => {
                    self.failed_cycles += 1;
                    log::error!(
                        "Generation {} failed: {}",
                        self.state.current_generation,
                        e
                    );
                }
            }
        };

        self.finish(stop_reason)
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> SearchReport {
        self.run_with_callback(|_| Ok(()))
    }

    /// Write the final checkpoint and build the report.
    fn finish(&mut self, stop_reason: StopReason) -> SearchReport {
        let final_checkpoint = self.store.as_ref().and_then(|store| {
            match store.save_final(&self.checkpoint()) {
                Ok(path) => Some(path),
                Err(e) => {
                    log::error!("Failed to write final checkpoint: {}", e);
                    None
                }
            }
        });

        let best: Option<Ruleset> = self
            .state
            .current_fitness
            .and_then(|_| self.state.population.first().cloned());

        let report = SearchReport {
            generations: self.state.current_generation,
            max_generations: self.config.max_generations,
            final_fitness: self.state.current_fitness,
            best,
            elapsed_seconds: self.elapsed().as_secs_f64(),
            failed_cycles: self.failed_cycles,
            final_checkpoint,
            stop_reason,
        };

        for line in report.to_string().lines() {
            log::info!("{}", line);
        }
        report
    }
}

/// Ensure the target matches the configured depth and palette.
fn check_target(config: &SearchConfig, target: &TargetRepresentation) -> Result<(), SearchError> {
    if target.side() != config.grid_side()
        || !target.grid().is_consistent()
        || target.smoothed().side() != target.side()
    {
        return Err(SearchError::TargetSize {
            expected: config.grid_side(),
            found: target.side(),
        });
    }
    if let Some(&shade) = target
        .grid()
        .cells()
        .iter()
        .find(|&&v| v as usize >= config.num_shades)
    {
        return Err(SearchError::TargetShade {
            shade,
            num_shades: config.num_shades,
        });
    }
    Ok(())
}
