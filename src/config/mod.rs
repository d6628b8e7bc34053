//! Configuration module

mod indexer;

pub use indexer::IndexerConfig;
