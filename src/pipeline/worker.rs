//! Batch processing: fetch, segment and (optionally) build n-grams for one page batch.
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::corpus::OutputUnit;
use crate::error::Error;
use crate::ngrams::{self, ngrams};
use crate::pipeline::config::{CollectorConfig, Mode};
use crate::segmenting::{paragraphs, tokens};
use crate::sources::{PageBatch, RawContent, Source};

/// Unit of parallel work.
///
/// Workers only share a read-only reference on the source,
/// take batches by value and return their records.
pub struct BatchWorker<'a, S: ?Sized> {
    source: &'a S,
    mode: Mode,
    random_choice: bool,
    seed: Option<u64>,
}

impl<'a, S> BatchWorker<'a, S>
where
    S: Source + ?Sized,
{
    pub fn new(source: &'a S, config: &CollectorConfig) -> Self {
        Self {
            source,
            mode: config.mode,
            random_choice: config.random_choice,
            seed: config.seed,
        }
    }

    /// Process the `batch_idx`-th batch.
    ///
    /// Records keep article order and in-article order, unless random choice is enabled,
    /// in which case they are shuffled within the batch.
    pub fn process(&self, batch_idx: usize, batch: PageBatch) -> Result<Vec<OutputUnit>, Error> {
        let contents = self.source.fetch_content(&batch)?;

        let mut units = Vec::new();
        for content in &contents {
            self.process_article(content, &mut units)?;
        }

        debug!(
            "batch {}: {}/{} articles fetched, {} records",
            batch_idx,
            contents.len(),
            batch.len(),
            units.len()
        );

        if self.random_choice {
            match self.seed {
                Some(seed) => {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(batch_idx as u64));
                    units.shuffle(&mut rng);
                }
                None => units.shuffle(&mut rand::thread_rng()),
            }
        }

        Ok(units)
    }

    fn process_article(&self, content: &RawContent, units: &mut Vec<OutputUnit>) -> Result<(), Error> {
        match self.mode {
            Mode::Paragraphs => {
                units.extend(paragraphs(&content.body).into_iter().map(OutputUnit::Paragraph));
            }
            Mode::Ngrams {
                min_n,
                max_n,
                strip_digits,
            } => {
                let tokens = tokens(&content.body, strip_digits);
                units.reserve(ngrams::count(tokens.len(), min_n, max_n));
                units.extend(ngrams(&tokens, min_n, max_n)?.map(OutputUnit::from));
            }
        }
        Ok(())
    }
}
