/*! Collection orchestration.

A collection run alternates rounds of:
1. Pagination: up to `2 × workers` page batches are requested from the source.
1. Dispatch: batches are processed in parallel on a worker pool, and the collector waits for the whole round.
1. Bounding: if the round crosses the size bound, its records are cut so that exactly `max_size` are kept.
1. Accumulation: per-batch records are appended, in pagination order, to an [Accumulate] implementor
   (a [CorpusStream] kept in memory, or a [CorpusWriter] streaming to disk).

Bounding comes before accumulation since a [CorpusWriter] cannot take records back.
Runs stop when the source is exhausted, or after the round that reached the size bound.
!*/
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::corpus::{CorpusStream, OutputUnit};
use crate::error::Error;
use crate::io::CorpusWriter;
use crate::pipeline::config::CollectorConfig;
use crate::pipeline::worker::BatchWorker;
use crate::sources::{Cursor, PageBatch, Source};

/// Receiver of the records of a collection run.
pub trait Accumulate {
    fn accumulate(&mut self, segment: Vec<OutputUnit>) -> Result<(), Error>;
}

impl Accumulate for CorpusStream {
    fn accumulate(&mut self, segment: Vec<OutputUnit>) -> Result<(), Error> {
        self.append(segment);
        Ok(())
    }
}

impl Accumulate for CorpusWriter {
    fn accumulate(&mut self, segment: Vec<OutputUnit>) -> Result<(), Error> {
        self.write(segment)
    }
}

/// Collection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Paginating,
    Dispatching,
    Bounding,
    Accumulating,
    Done,
}

pub struct Collector<S> {
    source: S,
    config: CollectorConfig,
    stream: CorpusStream,
    size: usize,
    state: State,
}

impl<S: Source> Collector<S> {
    /// Create an idle collector. Fails if `config` is invalid.
    pub fn new(source: S, config: CollectorConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            stream: CorpusStream::new(),
            size: 0,
            state: State::Idle,
        })
    }

    /// Collect records into an in-memory [CorpusStream], available through [Collector::get_data].
    ///
    /// Data from a previous run is discarded.
    pub fn collect_data(&mut self) -> Result<(), Error> {
        self.restart();
        let mut stream = CorpusStream::new();
        if let Some(max_size) = self.config.max_size {
            stream.truncate(max_size);
        }
        self.run(&mut stream)?;
        self.stream = stream;
        Ok(())
    }

    /// Collect records, handing each batch over to `acc` as soon as its round is done.
    ///
    /// Nothing is kept in the collector's own stream.
    pub fn collect_into<A: Accumulate>(&mut self, acc: &mut A) -> Result<(), Error> {
        self.restart();
        self.run(acc)
    }

    /// Take the collected stream, leaving an empty one in place.
    pub fn get_data(&mut self) -> CorpusStream {
        std::mem::take(&mut self.stream)
    }

    /// Discard collected data and go back to [State::Idle].
    pub fn reset_data(&mut self) {
        self.stream = CorpusStream::new();
        self.size = 0;
        self.state = State::Idle;
    }

    /// Number of records collected by the last run.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> State {
        self.state
    }

    fn restart(&mut self) {
        if self.state != State::Idle {
            warn!("collector used twice without reset, discarding previous data");
            self.reset_data();
        }
    }

    fn is_full(&self) -> bool {
        self.config
            .max_size
            .map_or(false, |max_size| self.size >= max_size)
    }

    /// Cut the segments of a round so that, added to the records already collected,
    /// they do not exceed the size bound.
    ///
    /// Returns `true` if the bound is reached.
    fn bound(&self, segments: &mut [Vec<OutputUnit>]) -> bool {
        let max_size = match self.config.max_size {
            Some(max_size) => max_size,
            None => return false,
        };
        let mut budget = max_size.saturating_sub(self.size);
        for segment in segments.iter_mut() {
            segment.truncate(budget);
            budget -= segment.len();
        }
        budget == 0
    }

    /// Request up to `nb` batches from the source, starting at `cursor`.
    ///
    /// `cursor` is set to `None` once the source is exhausted.
    fn paginate(
        &self,
        cursor: &mut Option<Cursor>,
        nb: usize,
        first_idx: usize,
    ) -> Result<Vec<(usize, PageBatch)>, Error> {
        let mut batches = Vec::with_capacity(nb);
        while batches.len() < nb {
            let current = match cursor.take() {
                Some(current) => current,
                None => break,
            };
            let (batch, next) = self.source.next_batch(&current)?;
            *cursor = next;
            if !batch.is_empty() {
                batches.push((first_idx + batches.len(), batch));
            }
        }
        Ok(batches)
    }

    fn run<A: Accumulate>(&mut self, acc: &mut A) -> Result<(), Error> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .build()?;
        let round_size = 2 * self.config.workers;

        let mut cursor = Some(Cursor::default());
        let mut nb_batches = 0;
        let mut round = 0;

        while cursor.is_some() && !self.is_full() {
            self.state = State::Paginating;
            let batches = self.paginate(&mut cursor, round_size, nb_batches)?;
            if batches.is_empty() {
                break;
            }
            nb_batches += batches.len();

            self.state = State::Dispatching;
            debug!("round {}: dispatching {} batches", round, batches.len());
            let worker = BatchWorker::new(&self.source, &self.config);
            let results: Vec<Result<Vec<OutputUnit>, Error>> = pool.install(|| {
                batches
                    .into_par_iter()
                    .map(|(idx, batch)| worker.process(idx, batch))
                    .collect()
            });

            let mut segments = results.into_iter().collect::<Result<Vec<_>, Error>>()?;

            self.state = State::Bounding;
            if self.bound(&mut segments) {
                debug!("round {}: size bound reached", round);
            }

            self.state = State::Accumulating;
            for segment in segments {
                self.size += segment.len();
                acc.accumulate(segment)?;
            }

            info!("round {}: {} records collected", round, self.size);
            round += 1;
        }

        self.state = State::Done;
        info!(
            "collection done: {} records from {} batches",
            self.size, nb_batches
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::pipeline::config::Mode;
    use crate::sources::{ArticleId, RawContent};

    /// `nb_pages` pages of `page_size` articles, each article being `<p>` paragraphs.
    struct Paged {
        nb_pages: usize,
        page_size: usize,
        paragraphs_per_article: usize,
        calls: AtomicUsize,
    }

    impl Paged {
        fn new(nb_pages: usize, page_size: usize, paragraphs_per_article: usize) -> Self {
            Self {
                nb_pages,
                page_size,
                paragraphs_per_article,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Source for Paged {
        fn next_batch(&self, cursor: &Cursor) -> Result<(PageBatch, Option<Cursor>), Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let page: usize = if cursor.as_str().is_empty() {
                0
            } else {
                cursor.as_str().parse().unwrap()
            };
            let ids = (0..self.page_size)
                .map(|i| ArticleId((page * self.page_size + i) as u64))
                .collect();
            let next = if page + 1 < self.nb_pages {
                Some(Cursor::new((page + 1).to_string()))
            } else {
                None
            };
            Ok((ids, next))
        }

        fn fetch_article(&self, id: ArticleId) -> Result<RawContent, Error> {
            let body: String = (0..self.paragraphs_per_article)
                .map(|p| format!("<p>article {} paragraph {}</p>", id, p))
                .collect();
            Ok(RawContent::new(id, body))
        }
    }

    struct Broken;

    impl Source for Broken {
        fn next_batch(&self, _: &Cursor) -> Result<(PageBatch, Option<Cursor>), Error> {
            Err(Error::SourceFetch("index unavailable".to_string()))
        }

        fn fetch_article(&self, id: ArticleId) -> Result<RawContent, Error> {
            Ok(RawContent::new(id, ""))
        }
    }

    fn config(workers: usize, max_size: Option<usize>) -> CollectorConfig {
        let mut config = CollectorConfig::new(Mode::Paragraphs);
        config.workers = workers;
        config.max_size = max_size;
        config
    }

    #[test]
    fn invalid_config() {
        let res = Collector::new(Paged::new(1, 1, 1), config(0, None));
        assert!(matches!(res, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn unbounded_collects_everything_in_order() {
        let mut collector = Collector::new(Paged::new(5, 3, 2), config(2, None)).unwrap();
        assert_eq!(collector.state(), State::Idle);
        collector.collect_data().unwrap();
        assert_eq!(collector.state(), State::Done);
        assert_eq!(collector.size(), 5 * 3 * 2);

        let stream = collector.get_data();
        assert_eq!(stream.size(), 30);
        let contents: Vec<String> = stream.map(|u| u.content()).collect();
        let expected: Vec<String> = (0..15)
            .flat_map(|a| (0..2).map(move |p| format!("article {} paragraph {}", a, p)))
            .collect();
        assert_eq!(contents, expected);
    }

    #[test]
    fn bounded_stops_early() {
        // 1 worker: rounds of 2 batches of 4 records
        let source = Paged::new(100, 2, 2);
        let mut collector = Collector::new(source, config(1, Some(10))).unwrap();
        collector.collect_data().unwrap();

        assert_eq!(collector.size(), 10);
        // two rounds are needed to reach 10 records
        assert_eq!(collector.source.calls.load(Ordering::SeqCst), 4);
        assert_eq!(collector.get_data().count(), 10);
    }

    #[test]
    fn bounding_cuts_round() {
        let mut collector = Collector::new(Paged::new(1, 1, 1), config(1, Some(5))).unwrap();
        collector.size = 2;
        let unit = |i: usize| OutputUnit::Paragraph(format!("unit {}", i));
        let mut segments = vec![vec![unit(0), unit(1)], vec![unit(2), unit(3)], vec![unit(4)]];

        assert!(collector.bound(&mut segments));
        let lens: Vec<usize> = segments.iter().map(Vec::len).collect();
        assert_eq!(lens, vec![2, 1, 0]);
        assert_eq!(segments[1], vec![unit(2)]);

        // round under the bound is left untouched
        collector.size = 0;
        let mut segments = vec![vec![unit(0)], vec![unit(1)]];
        assert!(!collector.bound(&mut segments));
        assert_eq!(segments.iter().map(Vec::len).sum::<usize>(), 2);

        let unbounded = Collector::new(Paged::new(1, 1, 1), config(1, None)).unwrap();
        let mut segments = vec![vec![unit(0)]];
        assert!(!unbounded.bound(&mut segments));
    }

    #[test]
    fn bound_larger_than_source() {
        let mut collector = Collector::new(Paged::new(2, 2, 1), config(3, Some(100))).unwrap();
        collector.collect_data().unwrap();
        assert_eq!(collector.size(), 4);
        assert_eq!(collector.get_data().count(), 4);
    }

    #[test]
    fn reset() {
        let mut collector = Collector::new(Paged::new(1, 2, 1), config(1, None)).unwrap();
        collector.collect_data().unwrap();
        assert_eq!(collector.size(), 2);

        collector.reset_data();
        assert_eq!(collector.state(), State::Idle);
        assert_eq!(collector.size(), 0);
        assert_eq!(collector.get_data().count(), 0);

        // collecting again gives the same amount of data
        collector.collect_data().unwrap();
        collector.collect_data().unwrap();
        assert_eq!(collector.size(), 2);
    }

    #[test]
    fn pagination_errors_are_fatal() {
        let mut collector = Collector::new(Broken, config(1, None)).unwrap();
        let res = collector.collect_data();
        assert!(matches!(res, Err(Error::SourceFetch(_))));
    }

    #[test]
    fn collect_into_stream() {
        let mut collector = Collector::new(Paged::new(3, 2, 2), config(2, Some(5))).unwrap();
        let mut stream = CorpusStream::new();
        collector.collect_into(&mut stream).unwrap();
        assert_eq!(collector.size(), 5);
        assert_eq!(stream.size(), 5);
        assert_eq!(collector.get_data().count(), 0);
    }
}
