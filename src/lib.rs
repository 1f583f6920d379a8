/*!
# wikicorpus

Collects paragraph or n-gram corpora from Wikipedia.

Article identifiers are paginated from the MediaWiki API, fetched and segmented in parallel,
and the resulting records are either kept in a lazy [corpus::CorpusStream] or streamed into a
`[LEN\t]CONTENT` delimited file.

```no_run
use wikicorpus::pipeline::{Collector, CollectorConfig, Mode};
use wikicorpus::sources::{ContentKind, WikiClientBuilder};

let client = WikiClientBuilder::new("en")
    .kind(ContentKind::CirrusText)
    .batch_size(50)
    .build()?;
let mut config = CollectorConfig::new(Mode::Ngrams { min_n: 1, max_n: 3, strip_digits: false });
config.max_size = Some(10_000);

let mut collector = Collector::new(client, config)?;
collector.collect_data()?;
for ngram in collector.get_data() {
    println!("{}", ngram.content());
}
# Ok::<(), wikicorpus::error::Error>(())
```
!*/
pub mod corpus;
pub mod error;
pub mod io;
pub mod ngrams;
pub mod pipeline;
pub mod segmenting;
pub mod sources;
