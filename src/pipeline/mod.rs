//! Pipelines.
//!
//! The module provides a light [pipeline::Pipeline] trait, the [Collector] that drives collection rounds,
//! the [BatchWorker] each round is dispatched to, and [CorpusPipeline] that ties collection and saving together.
mod collector;
mod config;
mod corpus;
#[allow(clippy::module_inception)]
pub mod pipeline;
mod worker;

pub use collector::{Accumulate, Collector, State};
pub use config::{CollectorConfig, Mode, SaveOptions};
pub use corpus::CorpusPipeline;
pub use pipeline::Pipeline;
pub use worker::BatchWorker;
