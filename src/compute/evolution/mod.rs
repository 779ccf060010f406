//! Evolutionary search for fractal subdivision rulesets.
//!
//! # Overview
//!
//! The evolutionary search system consists of:
//!
//! - **Fitness Functions** (`fitness`): Squared-error scoring against the target
//! - **Genome Operations** (`genome`): Random rulesets, crossover, shade swap, mutation
//! - **Selection** (`selection`): Truncation selection with elitism and fresh blood
//! - **Search Loop** (`search`): Score, select, breed until termination
//! - **Checkpoints** (`checkpoint`): JSON persistence of the full search state
//!
//! # Example
//!
//! ```rust,no_run
//! use fractal_evo::compute::evolution::{EvolutionEngine, TargetRepresentation};
//! use fractal_evo::schema::{Grid, SearchConfig};
//!
//! let config = SearchConfig {
//!     num_shades: 4,
//!     target_iteration: 3,
//!     ..Default::default()
//! };
//! let target = TargetRepresentation::new(Grid::filled(27, 0));
//!
//! let mut engine = EvolutionEngine::new(config, target)?;
//! let report = engine.run_with_callback(|progress| {
//!     println!("Generation {}: best fitness = {:.0}",
//!         progress.generation, progress.best_fitness);
//!     Ok(())
//! });
//!
//! println!("{report}");
//! # Ok::<(), fractal_evo::compute::evolution::SearchError>(())
//! ```

mod checkpoint;
mod fitness;
mod genome;
mod search;
mod selection;

pub use checkpoint::{CheckpointError, CheckpointStore, load_checkpoint, save_checkpoint};
pub use fitness::{FitnessEvaluator, TargetRepresentation};
pub use genome::GenomeRng;
pub use search::{CycleOutcome, EvolutionEngine, SearchError};
pub use selection::build_next_generation;
