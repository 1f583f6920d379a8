/*! Wikipedia source, through the MediaWiki action API.

Article identifiers are obtained by paginating over `list=allpages`,
and each article is then fetched either as an HTML extract (`prop=extracts`, used for paragraph corpora)
or as the plain text of its search index document (`prop=cirrusdoc`, used for n-gram corpora).

Extracts are requested one article at a time. Search index documents are requested for up to
[MAX_PAGEIDS] articles at once, falling back to single requests when a grouped request fails.

All requests are blocking: the client is meant to be shared between the worker threads of a pool.
!*/
use std::collections::HashMap;
use std::time::Duration;

use itertools::Itertools;
use log::{debug, warn};
use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::sources::source::{
    check_batch_size, fetch_each, ArticleId, Cursor, PageBatch, RawContent, Source,
};

/// Maximum number of page identifiers in a single content request, imposed by the remote API.
pub const MAX_PAGEIDS: usize = 50;

/// Form under which article content is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// HTML extract of the article, suitable for paragraph extraction.
    Extract,
    /// Wikitext-free plain text of the article, suitable for tokenization.
    CirrusText,
}

#[derive(Debug, Deserialize)]
struct AllPagesResponse {
    #[serde(rename = "continue")]
    cont: Option<AllPagesContinue>,
    query: AllPagesQuery,
}

#[derive(Debug, Deserialize)]
struct AllPagesContinue {
    apcontinue: String,
}

#[derive(Debug, Deserialize)]
struct AllPagesQuery {
    allpages: Vec<PageEntry>,
}

#[derive(Debug, Deserialize)]
struct PageEntry {
    pageid: u64,
}

#[derive(Debug, Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    pages: Vec<PageContent>,
}

#[derive(Debug, Deserialize)]
struct PageContent {
    pageid: Option<u64>,
    #[serde(default)]
    missing: bool,
    extract: Option<String>,
    cirrusdoc: Option<Vec<CirrusDoc>>,
}

impl PageContent {
    fn text(self, kind: ContentKind) -> Option<String> {
        match kind {
            ContentKind::Extract => self.extract,
            ContentKind::CirrusText => self
                .cirrusdoc
                .and_then(|docs| docs.into_iter().next())
                .and_then(|doc| doc.source.text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CirrusDoc {
    source: CirrusSource,
}

#[derive(Debug, Deserialize)]
struct CirrusSource {
    text: Option<String>,
}

/// Blocking client over a Wikipedia API endpoint.
#[derive(Debug)]
pub struct WikiClient {
    endpoint: Url,
    batch_size: usize,
    kind: ContentKind,
    client: reqwest::blocking::Client,
}

impl WikiClient {
    /// Parse an `allpages` response into identifiers and the next cursor.
    fn parse_allpages(body: &str) -> Result<(PageBatch, Option<Cursor>), Error> {
        let resp: AllPagesResponse = serde_json::from_str(body)?;
        let ids = resp
            .query
            .allpages
            .into_iter()
            .map(|page| ArticleId(page.pageid))
            .collect();
        let next = resp.cont.map(|c| Cursor::new(c.apcontinue));
        Ok((ids, next))
    }

    /// Parse a `pages` response, extracting the content of `id`.
    fn parse_content(body: &str, id: ArticleId, kind: ContentKind) -> Result<RawContent, Error> {
        let resp: PagesResponse = serde_json::from_str(body)?;
        let page = resp
            .query
            .pages
            .into_iter()
            .next()
            .ok_or_else(|| Error::SourceFetch(format!("no page returned for {}", id)))?;

        if page.missing {
            return Err(Error::SourceFetch(format!("page {} is missing", id)));
        }

        page.text(kind)
            .map(|body| RawContent::new(id, body))
            .ok_or_else(|| Error::SourceFetch(format!("page {} has no {:?} content", id, kind)))
    }

    /// Parse a `pages` response for several articles, keeping the order of `ids`.
    ///
    /// Pages that are missing or have no content are logged and skipped.
    fn parse_contents(body: &str, ids: &[ArticleId], kind: ContentKind) -> Result<Vec<RawContent>, Error> {
        let resp: PagesResponse = serde_json::from_str(body)?;
        let mut texts: HashMap<u64, String> = resp
            .query
            .pages
            .into_iter()
            .filter(|page| !page.missing)
            .filter_map(|page| {
                let pageid = page.pageid?;
                page.text(kind).map(|text| (pageid, text))
            })
            .collect();

        let mut contents = Vec::with_capacity(texts.len());
        for id in ids {
            match texts.remove(&id.0) {
                Some(text) => contents.push(RawContent::new(*id, text)),
                None => warn!("skipping article {}: no {:?} content", id, kind),
            }
        }
        Ok(contents)
    }

    /// Fetch the search index documents of up to [MAX_PAGEIDS] articles in one request.
    fn fetch_cirrus_group(&self, ids: &[ArticleId]) -> Result<Vec<RawContent>, Error> {
        let pageids = ids.iter().join("|");
        let body = self.get(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("pageids", pageids.as_str()),
            ("prop", "cirrusdoc"),
        ])?;
        Self::parse_contents(&body, ids, ContentKind::CirrusText)
    }

    fn get(&self, params: &[(&str, &str)]) -> Result<String, Error> {
        let url = Url::parse_with_params(self.endpoint.as_str(), params)?;
        debug!("GET {}", url);
        let resp = self.client.get(url).send()?.error_for_status()?;
        Ok(resp.text()?)
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }
}

impl Source for WikiClient {
    fn next_batch(&self, cursor: &Cursor) -> Result<(PageBatch, Option<Cursor>), Error> {
        let limit = self.batch_size.to_string();
        let body = self.get(&[
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("list", "allpages"),
            ("apfrom", cursor.as_str()),
            ("aplimit", limit.as_str()),
        ])?;
        Self::parse_allpages(&body)
    }

    fn fetch_article(&self, id: ArticleId) -> Result<RawContent, Error> {
        let pageid = id.to_string();
        let mut params = vec![
            ("action", "query"),
            ("format", "json"),
            ("formatversion", "2"),
            ("pageids", pageid.as_str()),
        ];
        match self.kind {
            ContentKind::Extract => {
                params.push(("prop", "extracts"));
                params.push(("exlimit", "1"));
            }
            ContentKind::CirrusText => params.push(("prop", "cirrusdoc")),
        }
        let body = self.get(&params)?;
        Self::parse_content(&body, id, self.kind)
    }

    fn fetch_content(&self, batch: &[ArticleId]) -> Result<Vec<RawContent>, Error> {
        if self.kind != ContentKind::CirrusText {
            return fetch_each(self, batch);
        }

        let mut contents = Vec::with_capacity(batch.len());
        for group in batch.chunks(MAX_PAGEIDS) {
            match self.fetch_cirrus_group(group) {
                Ok(mut fetched) => contents.append(&mut fetched),
                Err(e) if e.is_fetch_error() => {
                    warn!(
                        "grouped request for {} articles failed ({}), fetching them one by one",
                        group.len(),
                        e
                    );
                    contents.extend(fetch_each(self, group)?);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(contents)
    }
}

/// Builder for [WikiClient].
///
/// Defaults:
/// - batch size: 10
/// - timeout: 30 seconds
/// - content kind: [ContentKind::Extract]
/// - endpoint: `https://<lang>.wikipedia.org/w/api.php`
pub struct WikiClientBuilder {
    lang: String,
    endpoint: Option<String>,
    batch_size: usize,
    timeout: Option<Duration>,
    kind: ContentKind,
}

impl WikiClientBuilder {
    pub fn new(lang: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            endpoint: None,
            batch_size: 10,
            timeout: Some(Duration::from_secs(30)),
            kind: ContentKind::Extract,
        }
    }

    pub fn endpoint(&mut self, endpoint: impl Into<String>) -> &mut WikiClientBuilder {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn batch_size(&mut self, batch_size: usize) -> &mut WikiClientBuilder {
        self.batch_size = batch_size;
        self
    }

    /// `None` disables the per-request timeout.
    pub fn timeout(&mut self, timeout: Option<Duration>) -> &mut WikiClientBuilder {
        self.timeout = timeout;
        self
    }

    pub fn kind(&mut self, kind: ContentKind) -> &mut WikiClientBuilder {
        self.kind = kind;
        self
    }

    /// Validate parameters and build the client.
    ///
    /// Fails with [Error::InvalidArgument] on an out of range batch size,
    /// an invalid language code or an unparseable endpoint.
    pub fn build(&self) -> Result<WikiClient, Error> {
        check_batch_size(self.batch_size)?;

        let endpoint = match &self.endpoint {
            Some(endpoint) => Url::parse(endpoint)?,
            None => {
                let valid_lang = !self.lang.is_empty()
                    && self
                        .lang
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-');
                if !valid_lang {
                    return Err(Error::InvalidArgument(format!(
                        "invalid language code: {:?}",
                        self.lang
                    )));
                }
                Url::parse(&format!("https://{}.wikipedia.org/w/api.php", self.lang))?
            }
        };

        let mut client = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }

        Ok(WikiClient {
            endpoint,
            batch_size: self.batch_size,
            kind: self.kind,
            client: client.build()?,
        })
    }
}
