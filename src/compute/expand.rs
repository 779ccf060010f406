//! Genotype to phenotype expansion.
//!
//! A single cell of the start shade is subdivided `depth` times. At level
//! `i` the grid consists of `9^i` uniform blocks of side `3^(depth - i)`;
//! each block is repainted as a 3x3 arrangement of sub-blocks whose shades
//! come from the rule of the block's current shade.

use crate::schema::{Grid, Ruleset, Shade, ShadeGrid};

/// Expand a ruleset into a `3^depth x 3^depth` shade grid.
///
/// Sub-block `n` of a rule sits at offset `(n % 3, n / 3)` in units of the
/// sub-block side. Depth 0 yields a single cell holding `start_shade`.
pub fn expand(ruleset: &Ruleset, start_shade: Shade, depth: u32) -> ShadeGrid {
    let side = 3usize.pow(depth);
    let mut grid = Grid::filled(side, start_shade);

    for level in 0..depth {
        let block = 3usize.pow(depth - level);
        let sub = block / 3;
        let blocks_per_row = 3usize.pow(level);

        for by in 0..blocks_per_row {
            for bx in 0..blocks_per_row {
                let (x0, y0) = (bx * block, by * block);
                let rule = ruleset.rule(grid.get(x0, y0));

                for (n, &shade) in rule.iter().enumerate() {
                    grid.fill_square(x0 + (n % 3) * sub, y0 + (n / 3) * sub, sub, shade);
                }
            }
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carpet() -> Ruleset {
        Ruleset::new(vec![[0, 0, 0, 0, 1, 0, 0, 0, 0], [1; 9]], 2).unwrap()
    }

    #[test]
    fn test_depth_zero_is_start_shade() {
        let grid = expand(&carpet(), 1, 0);
        assert_eq!(grid.side(), 1);
        assert_eq!(grid.get(0, 0), 1);
    }

    #[test]
    fn test_single_level_is_rule_layout() {
        let mut rules = vec![[0; 9]; 9];
        rules[0] = [0, 1, 2, 3, 4, 5, 6, 7, 8];
        let ruleset = Ruleset::new(rules, 9).unwrap();
        let grid = expand(&ruleset, 0, 1);

        assert_eq!(grid.side(), 3);
        for n in 0..9 {
            assert_eq!(grid.get(n % 3, n / 3), n as Shade);
        }
    }

    #[test]
    fn test_sierpinski_carpet_depth_two() {
        let grid = expand(&carpet(), 0, 2);
        assert_eq!(grid.side(), 9);

        for y in 0..9 {
            for x in 0..9 {
                let in_center_block = (3..6).contains(&x) && (3..6).contains(&y);
                let block_center = x % 3 == 1 && y % 3 == 1;
                let expected = if in_center_block || block_center { 1 } else { 0 };
                assert_eq!(grid.get(x, y), expected, "cell ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_shade_one_is_absorbing() {
        let grid = expand(&carpet(), 1, 3);
        assert!(grid.cells().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_expand_is_deterministic() {
        let ruleset = Ruleset::new(
            vec![[2, 1, 0, 1, 2, 1, 0, 1, 2], [0; 9], [1, 2, 1, 2, 0, 2, 1, 2, 1]],
            3,
        )
        .unwrap();
        let a = expand(&ruleset, 0, 4);
        let b = expand(&ruleset, 0, 4);
        assert_eq!(a, b);
        assert_eq!(a.side(), 81);
    }
}
