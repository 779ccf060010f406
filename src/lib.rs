//! Fractal Evo - Evolutionary search for fractal subdivision rulesets.
//!
//! A ruleset maps every shade to a 3x3 block of shades. Starting from a
//! single cell and applying the ruleset repeatedly yields a self-similar
//! image (the phenotype). This crate searches for the ruleset whose
//! phenotype best matches a grayscale target image using a genetic
//! algorithm.
//!
//! # Architecture
//!
//! The crate is split into three modules:
//!
//! - `schema`: Configuration, genotype, grid and checkpoint types
//! - `compute`: Expansion, diffusion smoothing and the evolutionary search
//! - `imaging`: Target loading and phenotype rendering
//!
//! # Example
//!
//! ```rust,no_run
//! use fractal_evo::{
//!     compute::{evolution::{EvolutionEngine, TargetRepresentation}, expand},
//!     schema::{Ruleset, SearchConfig},
//! };
//!
//! // The Sierpinski carpet: shade 0 keeps a hole in the middle.
//! let carpet = Ruleset {
//!     rules: vec![[1, 1, 1, 1, 0, 1, 1, 1, 1], [1; 9]],
//!     fitness: 0.0,
//! };
//! let target = TargetRepresentation::new(expand(&carpet, 0, 3));
//!
//! let config = SearchConfig {
//!     num_shades: 2,
//!     target_iteration: 3,
//!     population_size: 200,
//!     generation_size: 50,
//!     ..Default::default()
//! };
//!
//! let mut engine = EvolutionEngine::new(config, target)?;
//! let report = engine.run();
//! println!("{report}");
//! # Ok::<(), fractal_evo::compute::evolution::SearchError>(())
//! ```

pub mod compute;
pub mod imaging;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, SearchError, TargetRepresentation};
pub use compute::{expand, smooth};
pub use schema::{Ruleset, SearchConfig, SearchReport, ShadeGrid};
