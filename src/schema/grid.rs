//! Square grids of shades and smoothed intensities.

use serde::{Deserialize, Serialize};

use super::Shade;

/// Square grid stored row-major (`y * side + x`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    side: usize,
    cells: Vec<T>,
}

/// Phenotype or target grid of shade indices.
pub type ShadeGrid = Grid<Shade>;

impl<T: Copy> Grid<T> {
    /// Grid of the given side with every cell set to `value`.
    pub fn filled(side: usize, value: T) -> Self {
        Self {
            side,
            cells: vec![value; side * side],
        }
    }

    /// Wrap row-major cells; `None` if the length is not `side * side`.
    pub fn from_cells(side: usize, cells: Vec<T>) -> Option<Self> {
        (cells.len() == side * side).then_some(Self { side, cells })
    }

    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.cells[y * self.side + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.cells[y * self.side + x] = value;
    }

    /// Row-major cell data.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Paint the `size x size` square whose top-left corner is `(x0, y0)`.
    pub fn fill_square(&mut self, x0: usize, y0: usize, size: usize, value: T) {
        for y in y0..y0 + size {
            let row = y * self.side;
            self.cells[row + x0..row + x0 + size].fill(value);
        }
    }

    /// Check that the cell buffer matches the declared side.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.side * self.side
    }

    /// Apply `f` to every cell.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Grid<U> {
        Grid {
            side: self.side,
            cells: self.cells.iter().map(|&v| f(v)).collect(),
        }
    }
}
