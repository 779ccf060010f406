//! Compute module - Expansion, smoothing, and the evolutionary search.

mod expand;
mod smoothing;

pub mod evolution;

pub use expand::*;
pub use smoothing::*;
