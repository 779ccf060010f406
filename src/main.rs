//! Fractal Evo CLI - Evolve a fractal ruleset towards a target image.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;

use fractal_evo::{
    compute::evolution::{
        CheckpointStore, EvolutionEngine, SearchError, TargetRepresentation, load_checkpoint,
    },
    imaging::{load_target, save_phenotype, save_progress},
    schema::SearchConfig,
};

fn print_usage(program: &str) {
    eprintln!("Usage: {} <target.png> [config.json]", program);
    eprintln!("       {} --resume <checkpoint.json>", program);
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Evolve a fractal subdivision ruleset that reproduces a target image.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  target.png   Square grayscale target, 3^target_iteration pixels wide");
    eprintln!("  config.json  Search configuration (default values when omitted)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --resume     Continue a search from a saved checkpoint");
    eprintln!("  --example    Print the default configuration as JSON");
}

/// Report a configuration error and exit with status 2.
fn fail(program: &str, message: impl std::fmt::Display) -> ! {
    eprintln!("Invalid call. {}", message);
    eprintln!();
    print_usage(program);
    std::process::exit(2);
}

fn print_example_config() {
    match serde_json::to_string_pretty(&SearchConfig::default()) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}

fn load_config(program: &str, path: Option<&String>) -> SearchConfig {
    let Some(path) = path else {
        return SearchConfig::default();
    };

    let config_str = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(program, format!("Error reading config file {}: {}", path, e)));
    serde_json::from_str(&config_str)
        .unwrap_or_else(|e| fail(program, format!("Error parsing config: {}", e)))
}

/// Set up a fresh search for a target image.
fn new_search(program: &str, target_file: &Path, config: SearchConfig) -> (EvolutionEngine, PathBuf) {
    if let Err(e) = config.validate() {
        fail(program, e);
    }

    let results_dir = config.results_dir(target_file);
    if let Err(e) = fs::create_dir_all(&results_dir) {
        fail(
            program,
            format!("Cannot create results folder {}: {}", results_dir.display(), e),
        );
    }

    let grid = load_target(target_file, &config, Some(&results_dir))
        .unwrap_or_else(|e| fail(program, e));

    let engine = EvolutionEngine::new(config, TargetRepresentation::new(grid))
        .unwrap_or_else(|e| fail(program, e))
        .with_target_file(target_file);

    (engine, results_dir)
}

/// Rebuild a search from a checkpoint file.
fn resume_search(program: &str, checkpoint_path: &Path) -> (EvolutionEngine, PathBuf) {
    let checkpoint = load_checkpoint(checkpoint_path).unwrap_or_else(|e| {
        fail(
            program,
            format!("Cannot resume from {}: {}", checkpoint_path.display(), e),
        )
    });

    let results_dir = checkpoint.config.results_dir(&checkpoint.target_file);
    let engine = EvolutionEngine::from_checkpoint(checkpoint).unwrap_or_else(|e| fail(program, e));

    (engine, results_dir)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("fractal-evo");

    if args.len() < 2 {
        fail(program, "You need to specify a target file.");
    }

    let (engine, results_dir) = match args[1].as_str() {
        "--example" => {
            print_example_config();
            return;
        }
        "--help" | "-h" => {
            print_usage(program);
            return;
        }
        "--resume" => {
            let Some(path) = args.get(2) else {
                fail(program, "You need to specify a checkpoint file.");
            };
            resume_search(program, Path::new(path))
        }
        target => {
            let config = load_config(program, args.get(2));
            new_search(program, Path::new(target), config)
        }
    };

    let store = CheckpointStore::new(&results_dir).unwrap_or_else(|e| {
        fail(
            program,
            format!("Cannot open results folder {}: {}", results_dir.display(), e),
        )
    });
    let mut engine = engine.with_checkpoint_store(store);

    let cancel = engine.cancel_handle();
    if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
        log::warn!("Could not install Ctrl-C handler: {}", e);
    }

    let config = engine.config().clone();
    log::info!("Writing results to {}", results_dir.display());

    let report = engine.run_with_callback(|progress| {
        save_progress(&results_dir, &progress.best, &config, progress.generation)
            .map(|_| ())
            .map_err(|e| SearchError::Hook(e.to_string()))
    });

    if let Some(best) = &report.best {
        let path = results_dir.join("best.png");
        match save_phenotype(&path, best, &config, config.target_iteration) {
            Ok(()) => log::info!("Best phenotype saved to {}", path.display()),
            Err(e) => log::error!("Failed to save best phenotype: {}", e),
        }
    }

    println!("{}", report);
}
