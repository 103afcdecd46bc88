//! System constants and default tunables for segmentation metrics.

use crate::core::types::MetricValue;

/// Crate version string.
pub const SEGMENTATION_METRICS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default value returned by ratio metrics when their denominator is zero.
pub const DEFAULT_ERR_VALUE: MetricValue = MetricValue::Defined(0.0);

/// Default value returned by Dice when both arrays sum to zero.
pub const DEFAULT_EMPTY_SCORE: MetricValue = MetricValue::Undefined;

/// Per-class Dice value when prediction and ground truth agree a class is absent.
pub const MULTI_CLASS_EMPTY_SCORE: MetricValue = MetricValue::Defined(1.0);

/// Default number of worker threads for parallel evaluation.
/// 0 means use all available cores.
pub const DEFAULT_NUM_THREADS: usize = 0;

/// Prefix of environment variables read by the configuration loader.
pub const ENV_PREFIX: &str = "SEGMETRICS_";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinels() {
        assert_eq!(DEFAULT_ERR_VALUE.value(), Some(0.0));
        assert!(!DEFAULT_EMPTY_SCORE.is_defined());
        assert_eq!(MULTI_CLASS_EMPTY_SCORE.value(), Some(1.0));
        assert!(!SEGMENTATION_METRICS_VERSION.is_empty());
    }
}
