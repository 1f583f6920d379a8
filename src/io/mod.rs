/*!
# IO utilities

Corpus saving. Records are streamed into a single delimited text file.
!*/
pub mod writer;

pub use writer::{default_path, write_delimited, CorpusWriter, WriteOptions};
