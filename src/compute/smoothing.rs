//! Diffusion smoothing of shade grids.
//!
//! Zero cells take the mean of their four direct neighbours, read with
//! toroidal wraparound. Non-zero cells pass through. The pass reads only
//! from the input grid, so neighbouring zeros see each other's raw value.

use crate::schema::{Grid, ShadeGrid};

/// Smooth zero-valued cells against their von Neumann neighbours.
pub fn smooth(grid: &ShadeGrid) -> Grid<f64> {
    let side = grid.side();
    let mut out = grid.map(f64::from);

    for y in 0..side {
        let up = (y + side - 1) % side;
        let down = (y + 1) % side;

        for x in 0..side {
            if grid.get(x, y) != 0 {
                continue;
            }
            let left = (x + side - 1) % side;
            let right = (x + 1) % side;

            let sum = u32::from(grid.get(x, up))
                + u32::from(grid.get(x, down))
                + u32::from(grid.get(left, y))
                + u32::from(grid.get(right, y));
            out.set(x, y, f64::from(sum) / 4.0);
        }
    }

    out
}
