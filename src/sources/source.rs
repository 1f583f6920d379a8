//! Source trait and the plain data exchanged with it.
use std::fmt;

use log::warn;

use crate::error::Error;

/// Maximum number of article identifiers per page, imposed by the remote API.
pub const MAX_BATCH_SIZE: usize = 500;

/// Opaque handle on a single source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId(pub u64);

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resume point in the article index.
///
/// The default cursor points at the beginning of the index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(String);

impl Cursor {
    pub fn new(from: impl Into<String>) -> Self {
        Self(from.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ordered identifiers of one page of the article index.
pub type PageBatch = Vec<ArticleId>;

/// Unprocessed content of an article (plain text or HTML extract).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub id: ArticleId,
    pub body: String,
}

impl RawContent {
    pub fn new(id: ArticleId, body: impl Into<String>) -> Self {
        Self {
            id,
            body: body.into(),
        }
    }
}

/// Checks that `batch_size` is accepted by the remote API.
pub fn check_batch_size(batch_size: usize) -> Result<(), Error> {
    if (1..=MAX_BATCH_SIZE).contains(&batch_size) {
        Ok(())
    } else {
        Err(Error::InvalidArgument(format!(
            "batch_size must be between 1 and {}, got {}",
            MAX_BATCH_SIZE, batch_size
        )))
    }
}

/// Remote article source.
///
/// Implementors are shared read-only between batch workers,
/// hence the `Sync` bound.
pub trait Source: Sync {
    /// Get the page following `cursor`.
    ///
    /// Returns the page identifiers and the cursor of the next page,
    /// `None` meaning that the index is exhausted.
    fn next_batch(&self, cursor: &Cursor) -> Result<(PageBatch, Option<Cursor>), Error>;

    /// Fetch the content of a single article.
    fn fetch_article(&self, id: ArticleId) -> Result<RawContent, Error>;

    /// Fetch the content of each article of `batch`, in batch order.
    ///
    /// Articles failing with a fetch error are logged and skipped,
    /// other errors are propagated.
    /// Defaults to [fetch_each]; sources able to fetch several articles at once override it.
    fn fetch_content(&self, batch: &[ArticleId]) -> Result<Vec<RawContent>, Error> {
        fetch_each(self, batch)
    }
}

/// Fetch the articles of `batch` one [Source::fetch_article] call at a time.
///
/// Articles failing with a fetch error are logged and skipped,
/// other errors are propagated.
pub fn fetch_each<S: Source + ?Sized>(source: &S, batch: &[ArticleId]) -> Result<Vec<RawContent>, Error> {
    let mut contents = Vec::with_capacity(batch.len());
    for id in batch {
        match source.fetch_article(*id) {
            Ok(content) => contents.push(content),
            Err(e) if e.is_fetch_error() => {
                warn!("skipping article {}: {}", id, e);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(contents)
}

impl<S: Source + ?Sized> Source for &S {
    fn next_batch(&self, cursor: &Cursor) -> Result<(PageBatch, Option<Cursor>), Error> {
        (**self).next_batch(cursor)
    }

    fn fetch_article(&self, id: ArticleId) -> Result<RawContent, Error> {
        (**self).fetch_article(id)
    }

    fn fetch_content(&self, batch: &[ArticleId]) -> Result<Vec<RawContent>, Error> {
        (**self).fetch_content(batch)
    }
}
