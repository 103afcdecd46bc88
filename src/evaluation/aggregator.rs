//! Running aggregation of metric results over a dataset.
//!
//! A [`MetricAggregator`] owns one result series per registered metric and a
//! running sample count. Both change only through [`MetricAggregator::apply`]
//! and [`MetricAggregator::merge`], and are cleared by
//! [`MetricAggregator::reset`].
//!
//! Mutation takes `&mut self`, so sharing one aggregator between threads
//! needs a `Mutex`. The alternative is one aggregator per worker, combined
//! afterwards with [`MetricAggregator::merge`].

use crate::config::EvaluationConfig;
use crate::core::error::{Result, SegMetricsError};
use crate::core::types::MetricValue;
use crate::evaluation::report::AggregateReport;
use crate::metrics::{resolve_builtin, NamedMetric};
use ndarray::{ArrayBase, ArrayViewD, Data, Dimension};
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

/// Aggregator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// Nothing applied since construction or the last reset
    Idle,
    /// At least one batch has been applied
    Accumulating,
}

/// Applies registered metrics to sample batches and summarizes the results.
#[derive(Debug)]
pub struct MetricAggregator {
    metrics: Vec<NamedMetric>,
    series: Vec<Vec<MetricValue>>,
    num_samples: usize,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl MetricAggregator {
    /// Create an aggregator for the given metrics.
    ///
    /// # Errors
    ///
    /// [`SegMetricsError::DuplicateMetric`] when two metrics share a name.
    pub fn new(metrics: Vec<NamedMetric>) -> Result<Self> {
        let mut seen = HashSet::new();
        for metric in &metrics {
            if !seen.insert(metric.name()) {
                return Err(SegMetricsError::duplicate_metric(metric.name()));
            }
        }

        let series = vec![Vec::new(); metrics.len()];
        Ok(MetricAggregator {
            metrics,
            series,
            num_samples: 0,
            pool: None,
        })
    }

    /// Create an aggregator from a validated configuration
    pub fn from_config(config: &EvaluationConfig) -> Result<Self> {
        config.validate()?;
        let metrics = resolve_builtin(&config.metrics, config.metric_options())?;
        let aggregator = Self::new(metrics)?;

        if config.parallel {
            aggregator.with_parallelism(config.effective_num_threads())
        } else {
            Ok(aggregator)
        }
    }

    /// Evaluate the samples of each batch on a dedicated rayon pool.
    ///
    /// Results are still appended in sample order, and the first failing
    /// sample stops the batch exactly as in sequential mode.
    pub fn with_parallelism(mut self, num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .map_err(|e| SegMetricsError::config(format!("Failed to build thread pool: {}", e)))?;
        self.pool = Some(Arc::new(pool));
        Ok(self)
    }

    /// Apply every registered metric to every (prediction, ground truth) pair.
    ///
    /// The sample count grows by the batch length before any metric runs.
    /// Metrics run in registration order, one call per pair. If a metric
    /// fails, the error is returned immediately. Results already appended, for
    /// earlier metrics and earlier pairs, are kept.
    ///
    /// # Errors
    ///
    /// [`SegMetricsError::BatchLengthMismatch`] when the two slices differ in
    /// length (nothing is recorded), or the first error raised by a metric.
    pub fn apply<S1, S2, D>(
        &mut self,
        predictions: &[ArrayBase<S1, D>],
        ground_truths: &[ArrayBase<S2, D>],
    ) -> Result<()>
    where
        S1: Data<Elem = f64>,
        S2: Data<Elem = f64>,
        D: Dimension,
    {
        if predictions.len() != ground_truths.len() {
            return Err(SegMetricsError::batch_length_mismatch(
                predictions.len(),
                ground_truths.len(),
            ));
        }

        self.num_samples += predictions.len();
        log::debug!(
            "Applying {} metrics to {} samples ({} total)",
            self.metrics.len(),
            predictions.len(),
            self.num_samples
        );

        let pairs: Vec<(ArrayViewD<'_, f64>, ArrayViewD<'_, f64>)> = predictions
            .iter()
            .zip(ground_truths.iter())
            .map(|(p, g)| (p.view().into_dyn(), g.view().into_dyn()))
            .collect();

        for (metric, series) in self.metrics.iter().zip(self.series.iter_mut()) {
            log::trace!("Evaluating {} on {} samples", metric.name(), pairs.len());

            match &self.pool {
                Some(pool) => {
                    let results: Vec<Result<MetricValue>> = pool.install(|| {
                        pairs
                            .par_iter()
                            .map(|(p, g)| metric.evaluate(p, g))
                            .collect()
                    });
                    for result in results {
                        series.push(result?);
                    }
                }
                None => {
                    for (p, g) in &pairs {
                        series.push(metric.evaluate(p, g)?);
                    }
                }
            }
        }

        Ok(())
    }

    /// Mean of each metric over its defined results.
    ///
    /// A metric whose series is empty, or holds only undefined results, is
    /// reported as "no data".
    pub fn summarize(&self) -> AggregateReport {
        let entries = self
            .metrics
            .iter()
            .zip(self.series.iter())
            .map(|(metric, series)| {
                let summary = defined_mean(series);
                if summary.is_none() && !series.is_empty() {
                    log::warn!(
                        "{} was undefined for all {} samples",
                        metric.name(),
                        series.len()
                    );
                }
                (metric.name().to_string(), summary, metric.direction())
            })
            .collect();

        AggregateReport::new(entries)
    }

    /// Clear the sample count and every series. Registered metrics are kept.
    pub fn reset(&mut self) {
        log::debug!("Resetting aggregator after {} samples", self.num_samples);
        self.num_samples = 0;
        for series in &mut self.series {
            series.clear();
        }
    }

    /// Absorb the state of another aggregator with the same registered names.
    ///
    /// Series from `other` are appended after this aggregator's own, and the
    /// sample counts add up.
    pub fn merge(&mut self, other: &MetricAggregator) -> Result<()> {
        if self.metric_names() != other.metric_names() {
            return Err(crate::config_error!(
                "Cannot merge aggregators with different metrics: {:?} vs {:?}",
                self.metric_names(),
                other.metric_names()
            ));
        }

        for (series, extra) in self.series.iter_mut().zip(other.series.iter()) {
            series.extend_from_slice(extra);
        }
        self.num_samples += other.num_samples;
        Ok(())
    }

    /// Number of samples seen since construction or the last reset
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Registered metric names, in registration order
    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics.iter().map(|m| m.name()).collect()
    }

    /// Registered metrics
    pub fn metrics(&self) -> &[NamedMetric] {
        &self.metrics
    }

    /// Results collected so far for `name`
    pub fn series(&self, name: &str) -> Option<&[MetricValue]> {
        self.metrics
            .iter()
            .position(|m| m.name() == name)
            .map(|idx| self.series[idx].as_slice())
    }

    /// Whether batches are evaluated on a thread pool
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Current lifecycle state
    pub fn state(&self) -> AggregatorState {
        if self.num_samples == 0 && self.series.iter().all(Vec::is_empty) {
            AggregatorState::Idle
        } else {
            AggregatorState::Accumulating
        }
    }
}

/// Mean of the defined values, `None` when there are none.
fn defined_mean(series: &[MetricValue]) -> Option<f64> {
    let (sum, count) = series
        .iter()
        .filter_map(MetricValue::value)
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
