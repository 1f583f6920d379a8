//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;
use std::time::Duration;

use structopt::StructOpt;
use wikicorpus::error::Error;
use wikicorpus::io::WriteOptions;
use wikicorpus::pipeline::{CollectorConfig, Mode, SaveOptions};
use wikicorpus::sources::{ContentKind, WikiClient, WikiClientBuilder};

#[derive(Debug, StructOpt)]
#[structopt(name = "wikicorpus", about = "Wikipedia corpus collection tool.")]
/// Holds every command that is callable by the `wikicorpus` command.
pub enum WikiCorpus {
    #[structopt(about = "Collect an n-gram corpus")]
    Ngrams(Ngrams),
    #[structopt(about = "Collect a paragraph corpus")]
    Paragraphs(Paragraphs),
}

#[derive(Debug, StructOpt)]
/// N-gram collection command and parameters.
///
/// ```sh
/// wikicorpus-ngrams 0.1.0
/// Collect an n-gram corpus
///
/// USAGE:
///     wikicorpus ngrams [FLAGS] [OPTIONS] <lang> <min-n> <max-n>
/// ```
pub struct Ngrams {
    #[structopt(help = "language for which wikipedia will be parsed")]
    pub lang: String,
    #[structopt(help = "min n (including) for collecting n-grams")]
    pub min_n: usize,
    #[structopt(help = "max n (including) for collecting n-grams")]
    pub max_n: usize,
    #[structopt(long = "strip_digits", help = "remove digits from tokens")]
    pub strip_digits: bool,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
/// Paragraph collection command and parameters.
pub struct Paragraphs {
    #[structopt(help = "language for which wikipedia will be parsed")]
    pub lang: String,
    #[structopt(flatten)]
    pub common: Common,
}

#[derive(Debug, StructOpt)]
pub struct Common {
    #[structopt(
        short = "m",
        long = "max_size",
        help = "limit for corpus records count (<= 0 for no limit)",
        default_value = "-1",
        allow_hyphen_values = true
    )]
    pub max_size: i64,
    #[structopt(
        short = "f",
        long = "file_path",
        parse(from_os_str),
        help = "path to file which will contain desired corpus (default: <timestamp>.tsv)"
    )]
    pub file_path: Option<PathBuf>,
    #[structopt(short = "s", long = "save", help = "save corpus in a .tsv file")]
    pub save: bool,
    #[structopt(
        short = "w",
        long = "write_len",
        alias = "write_n",
        help = "write LEN\\tRECORD instead of RECORD in .tsv file"
    )]
    pub write_len: bool,
    #[structopt(
        short = "r",
        long = "random_choice",
        alias = "random_choise",
        help = "shuffle records within each batch"
    )]
    pub random_choice: bool,
    #[structopt(long = "seed", help = "seed for --random_choice")]
    pub seed: Option<u64>,
    #[structopt(
        short = "e",
        long = "encoding",
        default_value = "utf-8",
        help = "encoding of output file"
    )]
    pub encoding: String,
    #[structopt(
        short = "p",
        long = "num_of_processes",
        help = "number of workers (default: available parallelism minus one)"
    )]
    pub num_of_processes: Option<usize>,
    #[structopt(
        short = "b",
        long = "batch_size",
        default_value = "10",
        help = "number of articles per page batch (1-500)"
    )]
    pub batch_size: usize,
    #[structopt(
        short = "t",
        long = "timeout",
        default_value = "30",
        help = "timeout of each request in seconds (0 for none)"
    )]
    pub timeout: u64,
    #[structopt(long = "endpoint", help = "MediaWiki API endpoint overriding the language one")]
    pub endpoint: Option<String>,
}

impl Common {
    fn client(&self, lang: &str, kind: ContentKind) -> Result<WikiClient, Error> {
        let mut builder = WikiClientBuilder::new(lang);
        builder
            .kind(kind)
            .batch_size(self.batch_size)
            .timeout(match self.timeout {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            });
        if let Some(endpoint) = &self.endpoint {
            builder.endpoint(endpoint.as_str());
        }
        builder.build()
    }

    fn config(&self, mode: Mode) -> CollectorConfig {
        let mut config = CollectorConfig::new(mode);
        config.max_size = CollectorConfig::max_size_from(self.max_size);
        config.random_choice = self.random_choice;
        config.seed = self.seed;
        if let Some(workers) = self.num_of_processes {
            config.workers = workers;
        }
        config
    }

    fn save_options(&self) -> Option<SaveOptions> {
        if !self.save {
            return None;
        }
        Some(SaveOptions {
            dst: self.file_path.clone(),
            write: WriteOptions {
                write_len: self.write_len,
                encoding: self.encoding.clone(),
            },
        })
    }
}

impl WikiCorpus {
    /// Build the client, collection config and save options of the command.
    pub fn into_parts(self) -> Result<(WikiClient, CollectorConfig, Option<SaveOptions>), Error> {
        let (lang, mode, kind, common) = match self {
            WikiCorpus::Ngrams(n) => (
                n.lang,
                Mode::Ngrams {
                    min_n: n.min_n,
                    max_n: n.max_n,
                    strip_digits: n.strip_digits,
                },
                ContentKind::CirrusText,
                n.common,
            ),
            WikiCorpus::Paragraphs(p) => (p.lang, Mode::Paragraphs, ContentKind::Extract, p.common),
        };

        let config = common.config(mode);
        config.validate()?;
        let client = common.client(&lang, kind)?;
        let save = common.save_options();
        if let Some(save) = &save {
            save.write.resolve_encoding()?;
        }
        Ok((client, config, save))
    }
}
