//! Search state, checkpoint records, and progress/report types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{Grid, Ruleset, SearchConfig, ShadeGrid};

/// Current checkpoint format version.
pub const CHECKPOINT_VERSION: u32 = 1;

/// Mutable state of a running search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchState {
    /// Generation counter, starting at 0.
    pub current_generation: usize,
    /// Best score of the current generation, once scored.
    pub current_fitness: Option<f64>,
    /// Rulesets of the current generation.
    pub population: Vec<Ruleset>,
}

impl SearchState {
    /// Fresh state at generation 0.
    pub fn new(population: Vec<Ruleset>) -> Self {
        Self {
            current_generation: 0,
            current_fitness: None,
            population,
        }
    }
}

/// Everything needed to resume or inspect a search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Schema version for forward compatibility.
    pub version: u32,
    /// Configuration the search ran with.
    pub config: SearchConfig,
    pub current_generation: usize,
    pub current_fitness: Option<f64>,
    /// Run start, seconds since the Unix epoch.
    pub start_time: u64,
    /// Path of the target image.
    pub target_file: PathBuf,
    /// Posterized target grid.
    pub target: ShadeGrid,
    /// Target after diffusion smoothing.
    pub target_smoothed: Grid<f64>,
    /// Population, each with its last fitness.
    pub rulesets: Vec<Ruleset>,
}

impl Checkpoint {
    /// Check if checkpoint is compatible with current version.
    pub fn is_compatible(&self) -> bool {
        self.version <= CHECKPOINT_VERSION
    }

    /// Recover the search state this checkpoint was taken from.
    pub fn to_state(&self) -> SearchState {
        SearchState {
            current_generation: self.current_generation,
            current_fitness: self.current_fitness,
            population: self.rulesets.clone(),
        }
    }
}

/// Progress update emitted every `progress_frequency` generations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchProgress {
    pub generation: usize,
    /// Best fitness of this generation.
    pub best_fitness: f64,
    /// Mean fitness of this generation.
    pub avg_fitness: f64,
    /// Best ruleset of this generation.
    pub best: Ruleset,
    /// Wall-clock seconds since the run started.
    pub elapsed_seconds: f64,
}

/// Why the search stopped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Generation budget spent and fitness target met.
    Converged,
    /// Interrupted by the operator.
    Cancelled,
}

/// Summary produced when the search stops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Generation counter at stop.
    pub generations: usize,
    /// Configured generation budget.
    pub max_generations: usize,
    /// Best fitness of the last scored generation.
    pub final_fitness: Option<f64>,
    /// Best ruleset of the last scored generation.
    pub best: Option<Ruleset>,
    /// Wall-clock seconds since the run started.
    pub elapsed_seconds: f64,
    /// Cycles that failed and were skipped.
    pub failed_cycles: usize,
    /// Where the final checkpoint was written, if it was.
    pub final_checkpoint: Option<PathBuf>,
    pub stop_reason: StopReason,
}

impl fmt::Display for SearchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generations == self.max_generations {
            writeln!(
                f,
                "Training is over, maximum generations of {} reached.",
                self.max_generations
            )?;
        } else {
            writeln!(
                f,
                "Training was stopped, {} generations reached.",
                self.generations
            )?;
        }
        match self.final_fitness {
            Some(fitness) => writeln!(f, "Resulting fitness: {fitness:.0}")?,
            None => writeln!(f, "Resulting fitness: not scored")?,
        }
        if self.failed_cycles > 0 {
            writeln!(f, "Failed cycles: {}", self.failed_cycles)?;
        }

        let total = self.elapsed_seconds as u64;
        let (days, rem) = (total / 86_400, total % 86_400);
        write!(
            f,
            "Time elapsed: {} days, {} hours, {} minutes, {} seconds",
            days,
            rem / 3600,
            (rem / 60) % 60,
            rem % 60
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(generations: usize, elapsed_seconds: f64) -> SearchReport {
        SearchReport {
            generations,
            max_generations: 10,
            final_fitness: Some(12.0),
            best: None,
            elapsed_seconds,
            failed_cycles: 0,
            final_checkpoint: None,
            stop_reason: StopReason::Converged,
        }
    }

    #[test]
    fn test_report_wording() {
        let text = report(10, 0.0).to_string();
        assert!(text.contains("maximum generations of 10 reached"));
        assert!(text.contains("Resulting fitness: 12"));

        let text = report(4, 0.0).to_string();
        assert!(text.contains("Training was stopped, 4 generations reached."));
    }

    #[test]
    fn test_report_elapsed_breakdown() {
        // 1 day, 2 hours, 3 minutes, 4 seconds
        let text = report(10, 93_784.5).to_string();
        assert!(text.ends_with("1 days, 2 hours, 3 minutes, 4 seconds"));
    }

    #[test]
    fn test_state_roundtrip() {
        let state = SearchState::new(vec![Ruleset {
            rules: vec![[0; 9], [1; 9]],
            fitness: 3.5,
        }]);
        let json = serde_json::to_string(&state).unwrap();
        let parsed: SearchState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.current_generation, 0);
        assert!(parsed.current_fitness.is_none());
        assert!(parsed.population[0].same_rules(&state.population[0]));
    }
}
