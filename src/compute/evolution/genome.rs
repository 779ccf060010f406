//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, crossover, and mutation of rulesets.

use rand::prelude::*;

use crate::schema::{Rule, Ruleset, SearchConfig, Shade};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Uniformly random shade in `[0, num_shades)`.
    #[inline]
    fn random_shade(&mut self, num_shades: usize) -> Shade {
        self.rng.gen_range(0..num_shades) as Shade
    }

    /// Generate a ruleset with uniformly random rules.
    pub fn random_ruleset(&mut self, num_shades: usize) -> Ruleset {
        let rules = (0..num_shades)
            .map(|_| {
                let mut rule: Rule = [0; 9];
                for entry in &mut rule {
                    *entry = self.random_shade(num_shades);
                }
                rule
            })
            .collect();

        Ruleset {
            rules,
            fitness: 0.0,
        }
    }

    /// Breed a child from two parents: crossover or shade swap, then mutation.
    pub fn breed(
        &mut self,
        parent_a: &Ruleset,
        parent_b: &Ruleset,
        config: &SearchConfig,
    ) -> Ruleset {
        let mut child = if self.rng.gen_bool(config.shade_swap_prob) {
            self.shade_swap(parent_a)
        } else {
            self.crossover(parent_a, parent_b, config.genome_penetration_ratio)
        };

        self.mutate(&mut child, config.mutations_per_child());
        child
    }

    /// Swap two distinct shades of a ruleset.
    ///
    /// Both the rules of the two shades and every occurrence of them as values
    /// are exchanged, so the child is a consistent relabelling of the parent.
    pub fn shade_swap(&mut self, parent: &Ruleset) -> Ruleset {
        let num_shades = parent.num_shades();
        let a = self.random_shade(num_shades);
        let mut b = self.random_shade(num_shades);
        while b == a {
            b = self.random_shade(num_shades);
        }

        relabel(parent, a, b)
    }

    /// Gene-wise crossover: each rule comes from `parent_a` with
    /// probability `penetration`, otherwise from `parent_b`.
    pub fn crossover(
        &mut self,
        parent_a: &Ruleset,
        parent_b: &Ruleset,
        penetration: f64,
    ) -> Ruleset {
        let rules = parent_a
            .rules
            .iter()
            .zip(&parent_b.rules)
            .map(|(a, b)| if self.rng.gen_bool(penetration) { *a } else { *b })
            .collect();

        Ruleset {
            rules,
            fitness: 0.0,
        }
    }

    /// Apply `count` point mutations: each overwrites a random entry of a
    /// random rule with a random shade.
    pub fn mutate(&mut self, ruleset: &mut Ruleset, count: usize) {
        let num_shades = ruleset.num_shades();
        for _ in 0..count {
            let shade = self.rng.gen_range(0..num_shades);
            let position = self.rng.gen_range(0..9);
            ruleset.rules[shade][position] = self.random_shade(num_shades);
        }
    }

    /// Uniformly random index in `[0, len)`.
    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Exchange shades `a` and `b` throughout a ruleset.
fn relabel(parent: &Ruleset, a: Shade, b: Shade) -> Ruleset {
    let swap = |v: Shade| match v {
        v if v == a => b,
        v if v == b => a,
        v => v,
    };

    let mut rules = parent.rules.clone();
    rules.swap(a as usize, b as usize);
    for rule in &mut rules {
        for entry in rule.iter_mut() {
            *entry = swap(*entry);
        }
    }

    Ruleset {
        rules,
        fitness: 0.0,
    }
}
