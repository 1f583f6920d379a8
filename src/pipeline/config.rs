//! Collection parameters.
use std::path::PathBuf;

use crate::error::Error;
use crate::io::WriteOptions;
use crate::ngrams;

/// Kind of records a collection produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Paragraphs,
    Ngrams {
        min_n: usize,
        max_n: usize,
        strip_digits: bool,
    },
}

/// Parameters of a collection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    pub mode: Mode,
    /// Bound on the number of collected records. `None` collects the whole source.
    pub max_size: Option<usize>,
    /// Size of the worker pool.
    pub workers: usize,
    /// Shuffle records inside each batch.
    pub random_choice: bool,
    /// Seed of the per-batch shuffling. Thread-local randomness is used if unset.
    pub seed: Option<u64>,
}

impl CollectorConfig {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            max_size: None,
            workers: Self::default_workers(),
            random_choice: false,
            seed: None,
        }
    }

    /// Available parallelism minus one, and at least one.
    pub fn default_workers() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }

    /// Convert a signed size bound, where values `<= 0` mean unbounded.
    pub fn max_size_from(max_size: i64) -> Option<usize> {
        if max_size > 0 {
            Some(max_size as usize)
        } else {
            None
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.workers == 0 {
            return Err(Error::InvalidArgument(
                "worker count must be at least 1".to_string(),
            ));
        }
        if let Mode::Ngrams { min_n, max_n, .. } = self.mode {
            ngrams::check_range(min_n, max_n)?;
        }
        Ok(())
    }
}

/// Where and how to save a collected corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Destination file. A timestamped file in the current directory is used if unset.
    pub dst: Option<PathBuf>,
    pub write: WriteOptions,
}
