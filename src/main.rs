//! # wikicorpus
//!
//! Wikipedia corpus collection tool.
//!
//! ```sh
//! wikicorpus 0.1.0
//! Wikipedia corpus collection tool.
//!
//! USAGE:
//!     wikicorpus <SUBCOMMAND>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! SUBCOMMANDS:
//!     help          Prints this message or the help of the given subcommand(s)
//!     ngrams        Collect an n-gram corpus
//!     paragraphs    Collect a paragraph corpus
//! ```
//!
//! Logging is configured through `RUST_LOG` (e.g. `RUST_LOG=info`).
use std::path::PathBuf;

use structopt::StructOpt;
use wikicorpus::error::Error;
use wikicorpus::pipeline::{CorpusPipeline, Pipeline};
use wikicorpus::sources::WikiClient;

#[macro_use]
extern crate log;

mod cli;

fn main() -> Result<(), Error> {
    env_logger::init();

    let opt = cli::WikiCorpus::from_args();
    debug!("cli args\n{:#?}", opt);

    let (client, config, save) = opt.into_parts()?;
    info!(
        "wikicorpus {}: collecting from {}",
        <CorpusPipeline<WikiClient> as Pipeline<Option<PathBuf>>>::version(),
        client.endpoint()
    );

    let p = CorpusPipeline::new(client, config, save);
    if let Some(path) = p.run()? {
        info!("corpus written to {:?}", path);
    }
    Ok(())
}
