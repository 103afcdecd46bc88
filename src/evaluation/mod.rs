//! Dataset-level evaluation.
//!
//! The [`MetricAggregator`] runs a fixed set of named metrics over batches of
//! (prediction, ground truth) pairs and reduces the per-sample results to an
//! [`AggregateReport`].

pub mod aggregator;
pub mod report;

pub use aggregator::{AggregatorState, MetricAggregator};
pub use report::AggregateReport;
