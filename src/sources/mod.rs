/*! Article sources.

A [Source] paginates over an article index and fetches article content.
[wikipedia::WikiClient] is the only remote implementation.
!*/
mod source;
pub mod wikipedia;

pub use source::{
    check_batch_size, fetch_each, ArticleId, Cursor, PageBatch, RawContent, Source, MAX_BATCH_SIZE,
};
pub use wikipedia::{ContentKind, WikiClient, WikiClientBuilder};
