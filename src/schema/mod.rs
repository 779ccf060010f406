//! Schema module - Configuration, genotype, and state types for the search.

mod config;
mod grid;
mod ruleset;
mod state;

pub use config::*;
pub use grid::*;
pub use ruleset::*;
pub use state::*;
