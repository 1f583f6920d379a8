/*! Segmentation of raw article content.

Raw content is turned either into paragraphs ([paragraphs], for HTML extracts) or into word tokens
([tokens], for plain text) that are later assembled into n-grams.
Segmentation is pure and never fails: empty input gives empty output.
!*/
mod paragraphs;
mod tokens;

pub use paragraphs::paragraphs;
pub use tokens::tokens;
