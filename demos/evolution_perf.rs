//! Quick evolution performance test

use fractal_evo::{
    EvolutionEngine, SearchError, TargetRepresentation,
    compute::{evolution::GenomeRng, expand},
    schema::SearchConfig,
};
use std::time::Instant;

/// Run a fixed number of generations against a synthetic target.
fn run_search(config: SearchConfig) -> Result<(), SearchError> {
    // A phenotype of some random ruleset is guaranteed to be reachable.
    let mut rng = GenomeRng::new(1234);
    let grid = expand(
        &rng.random_ruleset(config.num_shades),
        config.start_shade,
        config.target_iteration,
    );

    let population_size = config.population_size;
    let generation_size = config.generation_size;

    let start = Instant::now();
    let mut engine = EvolutionEngine::new(config, TargetRepresentation::new(grid))?;
    let report = engine.run();
    let elapsed = start.elapsed();

    let total_evals = population_size + report.generations * generation_size;
    let evals_per_sec = total_evals as f64 / elapsed.as_secs_f64();

    println!("  Generations:    {}", report.generations);
    println!("  Evaluations:    {}", total_evals);
    println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
    println!("  Evals/sec:      {:.1}", evals_per_sec);
    println!("  Best fitness:   {:.0}", report.final_fitness.unwrap_or(f64::NAN));
    println!();
    Ok(())
}

fn main() -> Result<(), SearchError> {
    println!("=== Evolution Performance Test ===\n");

    // Any fitness satisfies this threshold, so every run stops at max_generations.
    let base = SearchConfig {
        num_shades: 8,
        population_size: 200,
        generation_size: 100,
        max_generations: 10,
        target_convergence: 1e12,
        random_seed: Some(42),
        ..Default::default()
    };

    // Test different target depths
    for target_iteration in [3, 4, 5] {
        let side = 3usize.pow(target_iteration);
        println!("Target size: {}x{}", side, side);
        run_search(SearchConfig {
            target_iteration,
            ..base.clone()
        })?;
    }

    println!("=== Scalability Test (fixed 81x81 target) ===\n");

    // Test different population sizes
    for generation_size in [50, 100, 200, 400] {
        println!("Generation size {}", generation_size);
        run_search(SearchConfig {
            target_iteration: 4,
            generation_size,
            population_size: generation_size,
            ..base.clone()
        })?;
    }

    Ok(())
}
