//! Word tokenization of plain article text.
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `== Section ==` style headers, one per line.
    static ref HEADERS: Regex = Regex::new(r"(?m)^[ \t]*=+[^=\n]+=+[ \t]*$").unwrap();
    static ref PUNCTUATION: Regex = Regex::new(r"[\p{P}=]").unwrap();
    static ref DIGITS: Regex = Regex::new(r"\p{Nd}").unwrap();
}

/// Clean `text` and split it into lowercase word tokens.
///
/// Section headers and punctuation are removed, and so are digits if `strip_digits` is set.
pub fn tokens(text: &str, strip_digits: bool) -> Vec<String> {
    let text = HEADERS.replace_all(text, "");
    let mut text = PUNCTUATION.replace_all(&text, "").into_owned();
    if strip_digits {
        text = DIGITS.replace_all(&text, "").into_owned();
    }

    text.to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect()
}
