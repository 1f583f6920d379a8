//! Corpus collection pipeline.
//!
//! Collects records from a [Source] and either saves them (streaming them into a file round after round)
//! or keeps them in memory, only reporting how many were collected.
use std::path::PathBuf;

use log::info;

use crate::error::Error;
use crate::io::CorpusWriter;
use crate::pipeline::collector::Collector;
use crate::pipeline::config::{CollectorConfig, SaveOptions};
use crate::pipeline::pipeline::Pipeline;
use crate::sources::Source;

pub struct CorpusPipeline<S> {
    source: S,
    config: CollectorConfig,
    save: Option<SaveOptions>,
}

impl<S: Source> CorpusPipeline<S> {
    pub fn new(source: S, config: CollectorConfig, save: Option<SaveOptions>) -> Self {
        Self {
            source,
            config,
            save,
        }
    }
}

impl<S: Source> Pipeline<Option<PathBuf>> for CorpusPipeline<S> {
    /// Run the collection, returning the path of the saved corpus if any.
    fn run(&self) -> Result<Option<PathBuf>, Error> {
        let mut collector = Collector::new(&self.source, self.config.clone())?;

        match &self.save {
            Some(save) => {
                // open the file first so that a bad destination fails before any request
                let mut writer = CorpusWriter::new(save.dst.as_deref(), &save.write)?;
                collector.collect_into(&mut writer)?;
                let nb_written = writer.nb_written();
                let path = writer.finish()?;
                info!("saved {} records to {:?}", nb_written, path);
                Ok(Some(path))
            }
            None => {
                collector.collect_data()?;
                info!("collected {} records (not saved)", collector.get_data().size());
                Ok(None)
            }
        }
    }
}
