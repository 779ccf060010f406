//! Fitness evaluation of rulesets against the target image.
//!
//! Fitness is a squared-error distance, so lower is better. Two strategies
//! are available (see [`FitnessType`]): raw pixel-wise error, or error
//! between the diffusion-smoothed target and phenotype.

use rayon::prelude::*;

use crate::compute::{expand, smooth};
use crate::schema::{FitnessType, Grid, Ruleset, SearchConfig, Shade, ShadeGrid};

/// Target grid plus its cached smoothed form.
#[derive(Debug, Clone)]
pub struct TargetRepresentation {
    grid: ShadeGrid,
    smoothed: Grid<f64>,
}

impl TargetRepresentation {
    /// Derive the smoothed form once from a posterized target grid.
    pub fn new(grid: ShadeGrid) -> Self {
        let smoothed = smooth(&grid);
        Self { grid, smoothed }
    }

    /// Restore from a grid and a previously computed smoothed form.
    pub fn from_parts(grid: ShadeGrid, smoothed: Grid<f64>) -> Self {
        Self { grid, smoothed }
    }

    #[inline]
    pub fn grid(&self) -> &ShadeGrid {
        &self.grid
    }

    #[inline]
    pub fn smoothed(&self) -> &Grid<f64> {
        &self.smoothed
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.grid.side()
    }
}

/// Scores rulesets against a fixed target.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    fitness_type: FitnessType,
    start_shade: Shade,
    depth: u32,
    target: TargetRepresentation,
}

impl FitnessEvaluator {
    /// Create an evaluator for the configured strategy and target depth.
    pub fn new(config: &SearchConfig, target: TargetRepresentation) -> Self {
        Self {
            fitness_type: config.fitness_type,
            start_shade: config.start_shade,
            depth: config.target_iteration,
            target,
        }
    }

    pub fn target(&self) -> &TargetRepresentation {
        &self.target
    }

    /// Compute the fitness of a ruleset without storing it.
    pub fn evaluate(&self, ruleset: &Ruleset) -> f64 {
        let phenotype = expand(ruleset, self.start_shade, self.depth);
        match self.fitness_type {
            FitnessType::SquaredDiff => squared_diff(self.target.grid(), &phenotype),
            FitnessType::Average => squared_error(self.target.smoothed(), &smooth(&phenotype)),
        }
    }

    /// Compute the fitness and write it into the ruleset.
    pub fn score(&self, ruleset: &mut Ruleset) -> f64 {
        let fitness = self.evaluate(ruleset);
        ruleset.fitness = fitness;
        fitness
    }

    /// Score every ruleset in parallel.
    pub fn score_population(&self, population: &mut [Ruleset]) {
        population.par_iter_mut().for_each(|ruleset| {
            self.score(ruleset);
        });
    }
}

/// Sum of squared differences between two shade grids.
fn squared_diff(target: &ShadeGrid, phenotype: &ShadeGrid) -> f64 {
    target
        .cells()
        .iter()
        .zip(phenotype.cells())
        .map(|(&t, &p)| {
            let d = i64::from(t) - i64::from(p);
            d * d
        })
        .sum::<i64>() as f64
}

/// Sum of squared differences between two smoothed grids.
fn squared_error(target: &Grid<f64>, phenotype: &Grid<f64>) -> f64 {
    target
        .cells()
        .iter()
        .zip(phenotype.cells())
        .map(|(t, p)| (t - p) * (t - p))
        .sum()
}
