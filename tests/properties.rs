//! Property-based tests for fractal-evo
//!
//! Uses proptest to verify invariants of expansion, smoothing, scoring
//! and generation building.

use fractal_evo::compute::evolution::{
    FitnessEvaluator, GenomeRng, TargetRepresentation, build_next_generation,
};
use fractal_evo::compute::{expand, smooth};
use fractal_evo::schema::{FitnessType, Grid, Ruleset, SearchConfig};
use proptest::prelude::*;

fn random_ruleset(seed: u64, num_shades: usize) -> Ruleset {
    GenomeRng::new(seed).random_ruleset(num_shades)
}

proptest! {
    // ==================== Rule Engine ====================

    #[test]
    fn expand_shape_and_range(
        seed in any::<u64>(),
        num_shades in 2usize..8,
        depth in 0u32..5
    ) {
        let ruleset = random_ruleset(seed, num_shades);
        let grid = expand(&ruleset, 0, depth);

        prop_assert_eq!(grid.side(), 3usize.pow(depth));
        prop_assert_eq!(grid.cells().len(), 9usize.pow(depth));
        prop_assert!(grid.cells().iter().all(|&s| (s as usize) < num_shades));
    }

    #[test]
    fn expand_is_deterministic(seed in any::<u64>(), num_shades in 2usize..8, depth in 0u32..4) {
        let ruleset = random_ruleset(seed, num_shades);
        prop_assert_eq!(expand(&ruleset, 1, depth), expand(&ruleset, 1, depth));
    }

    #[test]
    fn expand_first_level_is_start_rule(seed in any::<u64>(), num_shades in 2usize..8) {
        let ruleset = random_ruleset(seed, num_shades);
        let start = (seed % num_shades as u64) as u8;
        let grid = expand(&ruleset, start, 1);
        prop_assert_eq!(grid.cells(), &ruleset.rule(start)[..]);
    }

    // ==================== Diffusion Smoother ====================

    #[test]
    fn smooth_keeps_nonzero_cells(cells in prop::collection::vec(0u8..4, 81)) {
        let grid = Grid::from_cells(9, cells).unwrap();
        let smoothed = smooth(&grid);

        for (raw, out) in grid.cells().iter().zip(smoothed.cells()) {
            if *raw != 0 {
                prop_assert_eq!(*out, f64::from(*raw));
            } else {
                prop_assert!((0.0..=3.0).contains(out));
            }
        }
    }

    // ==================== Fitness Evaluator ====================

    #[test]
    fn own_phenotype_scores_zero(
        seed in any::<u64>(),
        num_shades in 2usize..6,
        depth in 0u32..4,
        average in any::<bool>()
    ) {
        let ruleset = random_ruleset(seed, num_shades);
        let config = SearchConfig {
            num_shades,
            target_iteration: depth,
            fitness_type: if average { FitnessType::Average } else { FitnessType::SquaredDiff },
            ..Default::default()
        };
        let target = TargetRepresentation::new(expand(&ruleset, 0, depth));
        let evaluator = FitnessEvaluator::new(&config, target);

        prop_assert_eq!(evaluator.evaluate(&ruleset), 0.0);
    }

    #[test]
    fn fitness_is_non_negative(seed in any::<u64>(), num_shades in 2usize..6) {
        let config = SearchConfig {
            num_shades,
            target_iteration: 2,
            ..Default::default()
        };
        let target = TargetRepresentation::new(expand(&random_ruleset(seed, num_shades), 0, 2));
        let evaluator = FitnessEvaluator::new(&config, target);
        let other = random_ruleset(seed.wrapping_add(1), num_shades);

        prop_assert!(evaluator.evaluate(&other) >= 0.0);
    }

    // ==================== Breeder ====================

    #[test]
    fn full_penetration_copies_first_parent(seed in any::<u64>(), num_shades in 2usize..8) {
        let a = random_ruleset(seed, num_shades);
        let b = random_ruleset(seed.wrapping_add(1), num_shades);
        let mut rng = GenomeRng::new(seed);

        prop_assert!(rng.crossover(&a, &b, 1.0).same_rules(&a));
        prop_assert!(rng.crossover(&a, &b, 0.0).same_rules(&b));
    }

    #[test]
    fn shade_swap_stays_in_palette(seed in any::<u64>(), num_shades in 2usize..8) {
        let parent = random_ruleset(seed, num_shades);
        let child = GenomeRng::new(seed).shade_swap(&parent);

        prop_assert_eq!(child.num_shades(), num_shades);
        prop_assert!(child.rules.iter().flatten().all(|&v| (v as usize) < num_shades));
    }

    // ==================== Selector ====================

    #[test]
    fn next_generation_size_and_elites(
        seed in any::<u64>(),
        breeding_size in 1usize..10,
        extra in 0usize..20
    ) {
        let spared = breeding_size / 2;
        let config = SearchConfig {
            num_shades: 3,
            population_size: breeding_size + extra,
            generation_size: breeding_size + extra,
            breeding_size,
            spared_individuals: spared,
            num_new_individuals: extra.min(1),
            ..Default::default()
        };
        let mut rng = GenomeRng::new(seed);
        let population: Vec<Ruleset> = (0..config.population_size)
            .map(|i| {
                let mut r = rng.random_ruleset(3);
                r.fitness = i as f64;
                r
            })
            .collect();

        let next = build_next_generation(population.clone(), &config, &mut rng).unwrap();

        prop_assert_eq!(next.len(), config.generation_size);
        for i in 0..spared {
            prop_assert!(next[i].same_rules(&population[i]));
        }
    }
}
