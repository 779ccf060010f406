//! Checkpoint persistence for resumable searches.
//!
//! Checkpoints are pretty-printed JSON files in the run's results directory:
//! `save-<generation>.json` for autosaves and `save-final.json` at stop.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::schema::{CHECKPOINT_VERSION, Checkpoint, ConfigError};

/// Checkpoint persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("Checkpoint I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("Checkpoint serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Checkpoint holds an invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Checkpoint version {found} is newer than supported version {expected}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Checkpoint is corrupted: {0}")]
    Corrupted(String),
}

/// Directory-backed checkpoint writer.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    /// Open a store, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(dir: P) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the autosave for a generation.
    pub fn autosave_path(&self, generation: usize) -> PathBuf {
        self.dir.join(format!("save-{generation}.json"))
    }

    /// Path of the checkpoint written when the search stops.
    pub fn final_path(&self) -> PathBuf {
        self.dir.join("save-final.json")
    }

    /// Write an autosave named by the checkpoint's generation.
    pub fn autosave(&self, checkpoint: &Checkpoint) -> Result<PathBuf, CheckpointError> {
        let path = self.autosave_path(checkpoint.current_generation);
        save_checkpoint(checkpoint, &path)?;
        Ok(path)
    }

    /// Write the final checkpoint.
    pub fn save_final(&self, checkpoint: &Checkpoint) -> Result<PathBuf, CheckpointError> {
        let path = self.final_path();
        save_checkpoint(checkpoint, &path)?;
        Ok(path)
    }
}

/// Save a checkpoint to a file.
pub fn save_checkpoint(checkpoint: &Checkpoint, path: &Path) -> Result<(), CheckpointError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, checkpoint)?;
    writer.flush()?;
    Ok(())
}

/// Load and sanity-check a checkpoint.
pub fn load_checkpoint<P: AsRef<Path>>(path: P) -> Result<Checkpoint, CheckpointError> {
    let file = File::open(path.as_ref())?;
    let checkpoint: Checkpoint = serde_json::from_reader(BufReader::new(file))?;

    if !checkpoint.is_compatible() {
        return Err(CheckpointError::VersionMismatch {
            expected: CHECKPOINT_VERSION,
            found: checkpoint.version,
        });
    }
    checkpoint.config.validate()?;

    if !checkpoint.target.is_consistent() || !checkpoint.target_smoothed.is_consistent() {
        return Err(CheckpointError::Corrupted(
            "target grid size does not match its side".to_string(),
        ));
    }
    if checkpoint.target_smoothed.side() != checkpoint.target.side() {
        return Err(CheckpointError::Corrupted(format!(
            "smoothed target side {} does not match target side {}",
            checkpoint.target_smoothed.side(),
            checkpoint.target.side()
        )));
    }
    if checkpoint.target.side() != checkpoint.config.grid_side() {
        return Err(CheckpointError::Corrupted(format!(
            "target side {} does not match target iteration {}",
            checkpoint.target.side(),
            checkpoint.config.target_iteration
        )));
    }

    if checkpoint.rulesets.len() < checkpoint.config.breeding_size {
        return Err(CheckpointError::Corrupted(format!(
            "population of {} is smaller than the breeding size {}",
            checkpoint.rulesets.len(),
            checkpoint.config.breeding_size
        )));
    }

    let num_shades = checkpoint.config.num_shades;
    let valid_rulesets = checkpoint.rulesets.iter().all(|r| {
        r.num_shades() == num_shades && r.rules.iter().flatten().all(|&v| (v as usize) < num_shades)
    });
    if !valid_rulesets {
        return Err(CheckpointError::Corrupted(format!(
            "population contains rulesets outside the {num_shades}-shade palette"
        )));
    }

    Ok(checkpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::smooth;
    use crate::schema::{Grid, Ruleset, SearchConfig};
    use tempfile::tempdir;

    fn test_checkpoint(generation: usize) -> Checkpoint {
        let config = SearchConfig {
            num_shades: 2,
            target_iteration: 1,
            breeding_size: 1,
            spared_individuals: 1,
            ..Default::default()
        };
        let target = Grid::from_cells(3, vec![0, 1, 0, 1, 1, 1, 0, 1, 0]).unwrap();
        Checkpoint {
            version: CHECKPOINT_VERSION,
            target_smoothed: smooth(&target),
            target,
            config,
            current_generation: generation,
            current_fitness: Some(4.0),
            start_time: 1_700_000_000,
            target_file: PathBuf::from("cross.png"),
            rulesets: vec![Ruleset {
                rules: vec![[0, 1, 0, 1, 1, 1, 0, 1, 0], [1; 9]],
                fitness: 4.0,
            }],
        }
    }

    #[test]
    fn test_store_roundtrip() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path().join("results-cross")).unwrap();

        let path = store.autosave(&test_checkpoint(100)).unwrap();
        assert_eq!(path.file_name().unwrap(), "save-100.json");

        let loaded = load_checkpoint(&path).unwrap();
        assert_eq!(loaded.current_generation, 100);
        assert_eq!(loaded.current_fitness, Some(4.0));
        assert_eq!(loaded.target.side(), 3);
        assert_eq!(loaded.target_smoothed.get(0, 0), 0.5);
        assert!(loaded.rulesets[0].same_rules(&test_checkpoint(0).rulesets[0]));
    }

    #[test]
    fn test_final_path() {
        let dir = tempdir().unwrap();
        let store = CheckpointStore::new(dir.path()).unwrap();
        let path = store.save_final(&test_checkpoint(7)).unwrap();
        assert_eq!(path, dir.path().join("save-final.json"));
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_newer_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("future.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.version = CHECKPOINT_VERSION + 1;
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_rejects_invalid_rulesets() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.rulesets[0].rules[0][0] = 5;
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::Corrupted(_))
        ));
    }

    #[test]
    fn test_rejects_empty_population() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.rulesets.clear();
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::Corrupted(_))
        ));
    }

    #[test]
    fn test_rejects_population_below_breeding_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("small.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.config.breeding_size = 2;
        checkpoint.config.spared_individuals = 1;
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::Corrupted(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config_before_sizing_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deep.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.config.target_iteration = 50;
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::Config(ConfigError::TargetIterationTooDeep(50)))
        ));
    }

    #[test]
    fn test_rejects_mismatched_smoothed_target() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("smoothed.json");
        let mut checkpoint = test_checkpoint(1);
        checkpoint.target_smoothed = Grid::filled(1, 0.0);
        save_checkpoint(&checkpoint, &path).unwrap();

        assert!(matches!(
            load_checkpoint(&path),
            Err(CheckpointError::Corrupted(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = load_checkpoint("/nonexistent/save-1.json");
        assert!(matches!(result, Err(CheckpointError::Io(_))));
    }
}
