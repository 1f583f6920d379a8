/*! Corpus records and the stream holding them.
!*/
mod stream;
mod unit;

pub use stream::CorpusStream;
pub use unit::OutputUnit;
