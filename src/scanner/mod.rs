//! The listing scan engine: walks a target's listing pages cheapest first,
//! probes each row for its hidden attributes, and notifies on hits.

mod address;
mod controller;
mod extractor;
mod probe;
mod scheduler;
mod shard;

#[cfg(test)]
pub(crate) mod testing;

pub use address::{MarketAddress, PAGE_SIZE};
pub use controller::{stop_price, HaltReason, PaginationController, TargetReport};
pub use extractor::{PageExtraction, PageExtractor};
pub use probe::{AttributeProbe, ProbeSettings};
pub use scheduler::{RunSummary, TargetScheduler};
pub use shard::WorkerShard;
