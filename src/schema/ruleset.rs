//! Genotype types: rulesets mapping each shade to a 3x3 subdivision rule.

use serde::{Deserialize, Serialize};

/// Index into the palette of discrete intensity levels.
pub type Shade = u8;

/// Row-major 3x3 block of child shades.
pub type Rule = [Shade; 9];

/// A ruleset (genotype) and its most recent fitness.
///
/// `rules[s]` describes how a cell of shade `s` subdivides. Fitness is lower
/// for better matches and stays `0.0` until the ruleset has been scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ruleset {
    /// One rule per shade.
    pub rules: Vec<Rule>,
    /// Score from the last evaluation.
    #[serde(default)]
    pub fitness: f64,
}

impl Ruleset {
    /// Build a ruleset, rejecting any entry outside `[0, num_shades)`.
    pub fn new(rules: Vec<Rule>, num_shades: usize) -> Result<Self, RulesetError> {
        if rules.len() != num_shades {
            return Err(RulesetError::RuleCount {
                expected: num_shades,
                found: rules.len(),
            });
        }
        for (shade, rule) in rules.iter().enumerate() {
            if let Some(&value) = rule.iter().find(|&&v| v as usize >= num_shades) {
                return Err(RulesetError::InvalidShade {
                    shade,
                    value,
                    num_shades,
                });
            }
        }
        Ok(Self {
            rules,
            fitness: 0.0,
        })
    }

    /// Number of shades (and rules) in this ruleset.
    #[inline]
    pub fn num_shades(&self) -> usize {
        self.rules.len()
    }

    /// Rule applied to cells of the given shade.
    #[inline]
    pub fn rule(&self, shade: Shade) -> &Rule {
        &self.rules[shade as usize]
    }

    /// Genotype equality; fitness is ignored.
    #[inline]
    pub fn same_rules(&self, other: &Ruleset) -> bool {
        self.rules == other.rules
    }

    /// Number of differing rule entries between two genotypes.
    pub fn distance(&self, other: &Ruleset) -> usize {
        self.rules
            .iter()
            .zip(&other.rules)
            .map(|(a, b)| a.iter().zip(b).filter(|(x, y)| x != y).count())
            .sum()
    }
}

/// Errors raised when constructing a ruleset from untrusted data.
#[derive(Debug, thiserror::Error)]
pub enum RulesetError {
    #[error("Expected {expected} rules, found {found}")]
    RuleCount { expected: usize, found: usize },
    #[error("Rule {shade} references shade {value}, palette has {num_shades} shades")]
    InvalidShade {
        shade: usize,
        value: Shade,
        num_shades: usize,
    },
}
