//! Dataset-level summary produced by the aggregator.

use crate::core::error::Result;
use crate::core::types::MetricDirection;
use serde::ser::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
struct ReportEntry {
    name: String,
    value: Option<f64>,
    direction: MetricDirection,
}

/// Mean of every metric over the samples seen so far.
///
/// Entries keep the aggregator's registration order. `None` means "no data":
/// the metric was never evaluated, or was undefined for every sample.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateReport {
    entries: Vec<ReportEntry>,
}

impl AggregateReport {
    pub(crate) fn new(entries: Vec<(String, Option<f64>, MetricDirection)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(name, value, direction)| ReportEntry {
                name,
                value,
                direction,
            })
            .collect();
        AggregateReport { entries }
    }

    fn entry(&self, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Summary value for `name`.
    ///
    /// The outer `Option` is `None` for names that are not in the report; the
    /// inner one is `None` for "no data".
    pub fn get(&self, name: &str) -> Option<Option<f64>> {
        self.entry(name).map(|entry| entry.value)
    }

    /// Summary value for `name`, flattening "missing" and "no data"
    pub fn value(&self, name: &str) -> Option<f64> {
        self.get(name).flatten()
    }

    /// Whether `name` is in the report
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Whether larger or smaller values of `name` are better
    pub fn direction(&self, name: &str) -> Option<MetricDirection> {
        self.entry(name).map(|entry| entry.direction)
    }

    /// Whether this report scores strictly better than `other` on `name`.
    ///
    /// `None` when either report lacks the metric or has no data for it.
    pub fn is_better_than(&self, other: &AggregateReport, name: &str) -> Option<bool> {
        let ours = self.entry(name)?;
        let theirs = other.value(name)?;
        let ours_value = ours.value?;

        Some(match ours.direction {
            MetricDirection::Maximize => ours_value > theirs,
            MetricDirection::Minimize => ours_value < theirs,
        })
    }

    /// Iterate over (name, summary) pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.value))
    }

    /// Metric names in the report
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name.as_str()).collect()
    }

    /// Number of metrics in the report
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every entry is "no data"
    pub fn has_no_data(&self) -> bool {
        self.entries.iter().all(|entry| entry.value.is_none())
    }

    /// Serialize the report as a JSON object, `null` standing for "no data"
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Serialize for AggregateReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|entry| (&entry.name, entry.value)))
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            match entry.value {
                Some(v) => writeln!(f, "{}: {:.6} ({})", entry.name, v, entry.direction)?,
                None => writeln!(f, "{}: no data", entry.name)?,
            }
        }
        Ok(())
    }
}
