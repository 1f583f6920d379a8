//! Corpus records.
use itertools::Itertools;

/// One corpus record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputUnit {
    Paragraph(String),
    Ngram(Vec<String>),
}

impl OutputUnit {
    /// Length written in front of the record:
    /// the number of whitespace-separated tokens of a paragraph, or `n` for an n-gram.
    pub fn len(&self) -> usize {
        match self {
            OutputUnit::Paragraph(p) => p.split_whitespace().count(),
            OutputUnit::Ngram(tokens) => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Textual content: the paragraph itself or the space-joined n-gram.
    pub fn content(&self) -> String {
        match self {
            OutputUnit::Paragraph(p) => p.clone(),
            OutputUnit::Ngram(tokens) => tokens.iter().join(" "),
        }
    }
}

impl From<&[String]> for OutputUnit {
    fn from(ngram: &[String]) -> Self {
        OutputUnit::Ngram(ngram.to_vec())
    }
}
