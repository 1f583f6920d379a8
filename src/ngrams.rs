//! N-gram construction over token sequences.
use std::ops::RangeInclusive;

use crate::error::Error;

/// Check that `min_n..=max_n` is a usable n-gram length range.
pub fn check_range(min_n: usize, max_n: usize) -> Result<RangeInclusive<usize>, Error> {
    if min_n == 0 {
        return Err(Error::InvalidArgument("min_n must be at least 1".to_string()));
    }
    if min_n > max_n {
        return Err(Error::InvalidArgument(format!(
            "min_n ({}) must not be greater than max_n ({})",
            min_n, max_n
        )));
    }
    Ok(min_n..=max_n)
}

/// Lazily build every n-gram of `tokens` with `min_n <= n <= max_n`.
///
/// N-grams are grouped by length (shortest first) and, for a given length,
/// ordered by start index. Lengths greater than the number of tokens yield nothing.
pub fn ngrams<'a>(
    tokens: &'a [String],
    min_n: usize,
    max_n: usize,
) -> Result<impl Iterator<Item = &'a [String]> + 'a, Error> {
    let range = check_range(min_n, max_n)?;
    Ok(range.flat_map(move |n| tokens.windows(n)))
}

/// Number of n-grams [ngrams] yields, without building them.
pub fn count(nb_tokens: usize, min_n: usize, max_n: usize) -> usize {
    (min_n.max(1)..=max_n)
        .map(|n| (nb_tokens + 1).saturating_sub(n))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn bigrams() {
        let t = toks("hello there world");
        let grams: Vec<&[String]> = ngrams(&t, 2, 2).unwrap().collect();
        assert_eq!(grams, vec![&t[0..2], &t[1..3]]);
    }

    #[test]
    fn ordering_by_length_then_start() {
        let t = toks("a b c");
        let grams: Vec<String> = ngrams(&t, 1, 3)
            .unwrap()
            .map(|g| g.join(" "))
            .collect();
        assert_eq!(grams, vec!["a", "b", "c", "a b", "b c", "a b c"]);
    }

    #[test]
    fn counts() {
        let t = toks("the quick brown fox jumps over the lazy dog");
        for min_n in 1..=t.len() {
            for max_n in min_n..=t.len() {
                let grams: Vec<_> = ngrams(&t, min_n, max_n).unwrap().collect();
                let expected: usize = (min_n..=max_n).map(|n| t.len() - n + 1).sum();
                assert_eq!(grams.len(), expected);
                assert_eq!(count(t.len(), min_n, max_n), expected);
                assert!(grams
                    .iter()
                    .all(|g| (min_n..=max_n).contains(&g.len())));
            }
        }
    }

    #[test]
    fn too_short() {
        let t = toks("lonely");
        assert_eq!(ngrams(&t, 2, 4).unwrap().count(), 0);
        assert_eq!(count(t.len(), 2, 4), 0);
        assert_eq!(ngrams(&[], 1, 2).unwrap().count(), 0);
    }

    #[test]
    fn invalid_range() {
        let t = toks("a b c");
        assert!(matches!(ngrams(&t, 3, 2), Err(Error::InvalidArgument(_))));
        assert!(matches!(ngrams(&t, 0, 2), Err(Error::InvalidArgument(_))));
    }
}
