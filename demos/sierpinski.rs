//! Render the Sierpinski ruleset at depth 6.
//!
//! Writes `sierpinski.png` (729 x 729) into the results folder for the
//! given target name, `results-sierpinski` by default.

use std::fs;
use std::path::Path;

use fractal_evo::{
    imaging::{ImagingError, save_phenotype},
    schema::{Ruleset, SearchConfig},
};

fn main() -> Result<(), ImagingError> {
    env_logger::init();

    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sierpinski.png".to_string());

    let config = SearchConfig {
        num_shades: 2,
        ..Default::default()
    };
    let results_dir = config.results_dir(Path::new(&target));
    fs::create_dir_all(&results_dir)?;

    // Shade 0 places a filled square at its centre; shade 1 stays filled.
    let ruleset = Ruleset {
        rules: vec![[0, 0, 0, 0, 1, 0, 0, 0, 0], [1; 9]],
        fitness: 0.0,
    };

    let path = results_dir.join("sierpinski.png");
    save_phenotype(&path, &ruleset, &config, 6)?;
    println!("Saved {}", path.display());
    Ok(())
}
