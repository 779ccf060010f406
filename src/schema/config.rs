//! Configuration types for the ruleset search.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Shade;

/// Deepest target iteration accepted (3^10 = 59049 pixels per side).
pub const MAX_TARGET_ITERATION: u32 = 10;

/// Largest palette a [`Shade`] can index.
pub const MAX_SHADES: usize = Shade::MAX as usize + 1;

/// Top-level search configuration.
///
/// Every component reads the knobs it needs from a shared reference to this
/// struct; nothing mutates it after the search starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Number of shades, and therefore rules per ruleset (minimum 2).
    #[serde(default = "default_num_shades")]
    pub num_shades: usize,
    /// Number of random rulesets in the initial population.
    #[serde(default = "default_population_size")]
    pub population_size: usize,
    /// Number of rulesets per generation after the first.
    #[serde(default = "default_generation_size")]
    pub generation_size: usize,
    /// Fitness per pixel that counts as converged.
    /// The effective threshold is `target_convergence * 3^target_iteration`.
    #[serde(default = "default_target_convergence")]
    pub target_convergence: f64,
    /// Generation budget.
    #[serde(default = "default_max_generations")]
    pub max_generations: usize,
    /// Number of best rulesets that form the breeding pool.
    #[serde(default = "default_breeding_size")]
    pub breeding_size: usize,
    /// Number of top individuals carried over unchanged (elitism).
    #[serde(default = "default_spared_individuals")]
    pub spared_individuals: usize,
    /// Number of fresh random rulesets injected each generation.
    #[serde(default = "default_num_new_individuals")]
    pub num_new_individuals: usize,
    /// Fitness measurement strategy.
    #[serde(default)]
    pub fitness_type: FitnessType,
    /// Expansion depth compared against the target (side 3^n).
    #[serde(default = "default_target_iteration")]
    pub target_iteration: u32,
    /// Shade of the single cell the expansion starts from.
    #[serde(default)]
    pub start_shade: Shade,
    /// Probability that breeding uses shade-swap mode instead of crossover.
    #[serde(default = "default_shade_swap_prob")]
    pub shade_swap_prob: f64,
    /// Probability of inheriting each rule from parent A.
    #[serde(default = "default_genome_penetration_ratio")]
    pub genome_penetration_ratio: f64,
    /// Per-entry mutation probability; applied as a fixed count per child.
    #[serde(default = "default_mutation_prob")]
    pub mutation_prob: f64,
    /// Allow both parents of a child to be the same genotype.
    #[serde(default)]
    pub allow_cloning: bool,
    /// Drop consecutive identical genotypes from the breeding pool.
    #[serde(default)]
    pub discard_clones: bool,
    /// Prefix of the results directory; the target file stem is appended.
    #[serde(default = "default_save_folder")]
    pub save_folder: String,
    /// Generations between progress renders.
    #[serde(default = "default_progress_frequency")]
    pub progress_frequency: usize,
    /// Generations between checkpoints.
    #[serde(default = "default_autosave_frequency")]
    pub autosave_frequency: usize,
    /// RGB tint multiplied into rendered images.
    #[serde(default)]
    pub tint_color: Option<[u8; 3]>,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            num_shades: default_num_shades(),
            population_size: default_population_size(),
            generation_size: default_generation_size(),
            target_convergence: default_target_convergence(),
            max_generations: default_max_generations(),
            breeding_size: default_breeding_size(),
            spared_individuals: default_spared_individuals(),
            num_new_individuals: default_num_new_individuals(),
            fitness_type: FitnessType::default(),
            target_iteration: default_target_iteration(),
            start_shade: 0,
            shade_swap_prob: default_shade_swap_prob(),
            genome_penetration_ratio: default_genome_penetration_ratio(),
            mutation_prob: default_mutation_prob(),
            allow_cloning: false,
            discard_clones: false,
            save_folder: default_save_folder(),
            progress_frequency: default_progress_frequency(),
            autosave_frequency: default_autosave_frequency(),
            tint_color: None,
            random_seed: None,
        }
    }
}

fn default_num_shades() -> usize {
    30
}
fn default_population_size() -> usize {
    2000
}
fn default_generation_size() -> usize {
    200
}
fn default_target_convergence() -> f64 {
    100.0
}
fn default_max_generations() -> usize {
    50_000
}
fn default_breeding_size() -> usize {
    20
}
fn default_spared_individuals() -> usize {
    4
}
fn default_num_new_individuals() -> usize {
    5
}
fn default_target_iteration() -> u32 {
    4
}
fn default_shade_swap_prob() -> f64 {
    0.2
}
fn default_genome_penetration_ratio() -> f64 {
    0.5
}
fn default_mutation_prob() -> f64 {
    0.0001
}
fn default_save_folder() -> String {
    "results".to_string()
}
fn default_progress_frequency() -> usize {
    1
}
fn default_autosave_frequency() -> usize {
    100
}

/// Fitness measurement strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FitnessType {
    /// Squared error between the diffusion-smoothed target and phenotype.
    #[default]
    Average,
    /// Plain pixel-wise squared error.
    SquaredDiff,
}

impl SearchConfig {
    /// Side length of the target grid (3^target_iteration).
    #[inline]
    pub fn grid_side(&self) -> usize {
        3usize.pow(self.target_iteration)
    }

    /// Absolute fitness at or below which the search counts as converged.
    #[inline]
    pub fn convergence_threshold(&self) -> f64 {
        self.target_convergence * self.grid_side() as f64
    }

    /// Number of point mutations applied to every child.
    #[inline]
    pub fn mutations_per_child(&self) -> usize {
        (self.mutation_prob * self.num_shades as f64 * 9.0).floor() as usize
    }

    /// Results directory for a given target file: `<save_folder>-<stem>`.
    pub fn results_dir(&self, target_file: &Path) -> PathBuf {
        let stem = target_file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "target".to_string());
        PathBuf::from(format!("{}-{}", self.save_folder, stem))
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_shades < 2 || self.num_shades > MAX_SHADES {
            return Err(ConfigError::InvalidShadeCount(self.num_shades));
        }
        if self.start_shade as usize >= self.num_shades {
            return Err(ConfigError::InvalidStartShade {
                shade: self.start_shade,
                num_shades: self.num_shades,
            });
        }
        if self.target_iteration > MAX_TARGET_ITERATION {
            return Err(ConfigError::TargetIterationTooDeep(self.target_iteration));
        }
        if self.breeding_size == 0 {
            return Err(ConfigError::EmptyBreedingPool);
        }
        if self.population_size < self.breeding_size {
            return Err(ConfigError::PopulationTooSmall {
                field: "population_size",
                size: self.population_size,
                breeding_size: self.breeding_size,
            });
        }
        if self.generation_size < self.breeding_size {
            return Err(ConfigError::PopulationTooSmall {
                field: "generation_size",
                size: self.generation_size,
                breeding_size: self.breeding_size,
            });
        }
        if self.spared_individuals > self.breeding_size {
            return Err(ConfigError::TooManySpared {
                spared: self.spared_individuals,
                breeding_size: self.breeding_size,
            });
        }
        if self.spared_individuals + self.num_new_individuals > self.generation_size {
            return Err(ConfigError::GenerationOverfilled {
                carried: self.spared_individuals + self.num_new_individuals,
                generation_size: self.generation_size,
            });
        }

        let check_probability = |value: f64, name: &'static str| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::InvalidProbability { name, value })
            }
        };
        check_probability(self.shade_swap_prob, "shade_swap_prob")?;
        check_probability(self.genome_penetration_ratio, "genome_penetration_ratio")?;
        check_probability(self.mutation_prob, "mutation_prob")?;

        if self.progress_frequency == 0 || self.autosave_frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        if !self.target_convergence.is_finite() || self.target_convergence < 0.0 {
            return Err(ConfigError::InvalidConvergence(self.target_convergence));
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Shade count must be between 2 and 256, got {0}")]
    InvalidShadeCount(usize),
    #[error("Start shade {shade} is outside the palette of {num_shades} shades")]
    InvalidStartShade { shade: Shade, num_shades: usize },
    #[error("Target iteration {0} exceeds the maximum of 10")]
    TargetIterationTooDeep(u32),
    #[error("Breeding size must be non-zero")]
    EmptyBreedingPool,
    #[error("{field} ({size}) must be at least the breeding size ({breeding_size})")]
    PopulationTooSmall {
        field: &'static str,
        size: usize,
        breeding_size: usize,
    },
    #[error("Cannot spare {spared} individuals from a breeding pool of {breeding_size}")]
    TooManySpared { spared: usize, breeding_size: usize },
    #[error("Spared plus new individuals ({carried}) exceed the generation size ({generation_size})")]
    GenerationOverfilled {
        carried: usize,
        generation_size: usize,
    },
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("Progress and autosave frequencies must be non-zero")]
    ZeroFrequency,
    #[error("Target convergence must be a non-negative number, got {0}")]
    InvalidConvergence(f64),
}
