//! Truncation selection and generation building.

use crate::schema::{Ruleset, SearchConfig};

use super::genome::GenomeRng;
use super::search::SearchError;

/// Build the next generation from a population sorted ascending by fitness.
///
/// The top `breeding_size` rulesets form the breeding pool. The best
/// `spared_individuals` of the (optionally deduplicated) pool are kept,
/// `num_new_individuals` random rulesets are added, and the remainder is
/// filled with children of parents drawn uniformly from the full pool.
pub fn build_next_generation(
    mut sorted: Vec<Ruleset>,
    config: &SearchConfig,
    rng: &mut GenomeRng,
) -> Result<Vec<Ruleset>, SearchError> {
    sorted.truncate(config.breeding_size);
    let pool = sorted;
    if pool.is_empty() {
        return Err(SearchError::EmptyBreedingPool);
    }

    let mut next_gen = Vec::with_capacity(config.generation_size);

    // Elitism
    if config.discard_clones {
        let mut unique = pool.clone();
        unique.dedup_by(|a, b| a.same_rules(b));
        unique.truncate(config.spared_individuals);
        next_gen.extend(unique);
    } else {
        next_gen.extend(pool.iter().take(config.spared_individuals).cloned());
    }

    for _ in 0..config.num_new_individuals {
        next_gen.push(rng.random_ruleset(config.num_shades));
    }

    // Without two distinct genotypes a clone-free pairing cannot exist.
    let distinct_parents =
        config.allow_cloning || pool.iter().skip(1).any(|r| !r.same_rules(&pool[0]));
    if !distinct_parents {
        log::debug!("Breeding pool holds a single genotype, allowing cloned parents");
    }

    while next_gen.len() < config.generation_size {
        let a = rng.index(pool.len());
        let mut b = rng.index(pool.len());
        if distinct_parents && !config.allow_cloning {
            while pool[b].same_rules(&pool[a]) {
                b = rng.index(pool.len());
            }
        }

        next_gen.push(rng.breed(&pool[a], &pool[b], config));
    }

    Ok(next_gen)
}
