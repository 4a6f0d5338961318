//! Tuning parameters for journey estimation.

/// Configuration for the journey estimator and its uncertainty model.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateConfig {
    /// Maximum origin predictions to request.
    pub origin_limit: usize,

    /// Maximum destination predictions to request.
    pub destination_limit: usize,

    /// Headway assumed when it cannot be measured (seconds).
    pub default_headway_secs: i64,

    /// p80 buffer as a fraction of the headway baseline.
    pub p80_factor: f64,

    /// p90 buffer as a fraction of the headway baseline.
    pub p90_factor: f64,
}

impl EstimateConfig {
    /// Create a new configuration with the given request limits and the
    /// default uncertainty model.
    pub fn new(origin_limit: usize, destination_limit: usize) -> Self {
        Self {
            origin_limit,
            destination_limit,
            ..Self::default()
        }
    }

    /// Set the fallback headway.
    pub fn with_default_headway_secs(mut self, secs: i64) -> Self {
        self.default_headway_secs = secs;
        self
    }

    /// Set the p80 and p90 buffer factors.
    pub fn with_band_factors(mut self, p80: f64, p90: f64) -> Self {
        self.p80_factor = p80;
        self.p90_factor = p90;
        self
    }
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            origin_limit: 5,
            destination_limit: 25,
            default_headway_secs: 600, // 10 minutes
            p80_factor: 0.35,
            p90_factor: 0.60,
        }
    }
}
