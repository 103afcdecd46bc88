//! Core infrastructure for segmentation metrics.
//!
//! - [`types`]: metric result and confusion count types
//! - [`constants`]: default tunables and version information
//! - [`error`]: error type and `Result` alias
//!
//! ```rust
//! use segmentation_metrics::core::{
//!     constants::DEFAULT_ERR_VALUE,
//!     error::{Result, SegMetricsError},
//!     types::MetricValue,
//! };
//!
//! let value = MetricValue::new(f64::NAN);
//! assert!(!value.is_defined());
//! assert_eq!(DEFAULT_ERR_VALUE.value(), Some(0.0));
//! ```

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Result, SegMetricsError};
pub use types::*;

use std::sync::atomic::{AtomicBool, Ordering};

/// Runtime capabilities of this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreCapabilities {
    /// Number of worker threads rayon will use by default
    pub available_threads: usize,
    /// Aggregator can evaluate a batch on the rayon pool
    pub parallel_apply: bool,
    /// Reports and configuration serialize through serde
    pub serialization: bool,
}

impl Default for CoreCapabilities {
    fn default() -> Self {
        CoreCapabilities {
            available_threads: num_cpus::get(),
            parallel_apply: true,
            serialization: true,
        }
    }
}

impl CoreCapabilities {
    /// Get current core capabilities
    pub fn current() -> Self {
        Self::default()
    }

    /// Get a summary of available capabilities
    pub fn summary(&self) -> String {
        let mut features = Vec::new();

        if self.parallel_apply {
            features.push(format!("Parallel Apply ({} threads)", self.available_threads));
        }
        if self.serialization {
            features.push("Serialization".to_string());
        }

        format!("Core capabilities: {}", features.join(", "))
    }
}

static CORE_INITIALIZED: AtomicBool = AtomicBool::new(false);
static CORE_INIT: std::sync::Once = std::sync::Once::new();

/// Initialize logging and mark the core as ready. Safe to call repeatedly.
pub fn initialize_core() -> Result<()> {
    CORE_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            std::env::set_var("RUST_LOG", "info");
        }

        // Another logger may already be installed by the host application
        let _ = env_logger::try_init();

        CORE_INITIALIZED.store(true, Ordering::SeqCst);
        log::info!("Segmentation metrics core initialized");
        log::debug!("{}", CoreCapabilities::current().summary());
    });

    Ok(())
}

/// Check if the core has been initialized
pub fn is_core_initialized() -> bool {
    CORE_INITIALIZED.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_capabilities() {
        let caps = CoreCapabilities::current();
        assert!(caps.available_threads >= 1);
        assert!(caps.parallel_apply);
        assert!(caps.summary().contains("Core capabilities"));
    }

    #[test]
    fn test_global_initialization() {
        assert!(initialize_core().is_ok());
        assert!(is_core_initialized());
        // Second call is a no-op
        assert!(initialize_core().is_ok());
    }

    #[test]
    fn test_module_reexports() {
        let _error: SegMetricsError = SegMetricsError::config("test");
        let _value: MetricValue = DEFAULT_ERR_VALUE;
        let _counts = ConfusionCounts::default();
    }
}
