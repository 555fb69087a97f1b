//! Sampling decisions
//!
//! Two independent gates: the process-wide [`SAMPLE_RATE`] consulted once at
//! initialization, and the per-pattern [`SampledErrorTable`] consulted on
//! every exception that matches one of its patterns.

use faultgate_core::config::SampledErrorConfig;
use faultgate_core::ports::IRandomSource;
use rand::Rng;
use regex::Regex;

use crate::error::TelemetryError;

/// Probability that a process enables error reporting at all
pub const SAMPLE_RATE: f64 = 0.01;

/// Returns whether a draw selects the process for reporting.
///
/// A draw equal to `rate` is selected.
pub fn is_selected(rate: f64, draw: f64) -> bool {
    draw <= rate
}

/// [`IRandomSource`] backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl IRandomSource for ThreadRandom {
    fn next_f64(&self) -> f64 {
        rand::thread_rng().gen::<f64>()
    }
}

/// An error-message pattern reported only at `rate`
#[derive(Debug, Clone)]
pub struct SampledErrorPattern {
    pub pattern: Regex,
    pub rate: f64,
}

impl SampledErrorPattern {
    /// Compiles a configured entry, rejecting bad patterns and rates
    pub fn compile(config: &SampledErrorConfig) -> Result<Self, TelemetryError> {
        if !(0.0..=1.0).contains(&config.rate) {
            return Err(TelemetryError::InvalidRate {
                pattern: config.pattern.clone(),
                rate: config.rate,
            });
        }
        let pattern = Regex::new(&config.pattern).map_err(|e| TelemetryError::InvalidPattern {
            pattern: config.pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            rate: config.rate,
        })
    }

    /// Whether a matched error is kept for a given draw.
    ///
    /// Kept only when the rate strictly exceeds the draw.
    pub fn keeps(&self, draw: f64) -> bool {
        self.rate > draw
    }
}

/// Ordered list of sampled patterns; the first match wins
#[derive(Debug, Clone, Default)]
pub struct SampledErrorTable {
    patterns: Vec<SampledErrorPattern>,
}

impl SampledErrorTable {
    pub fn compile(configs: &[SampledErrorConfig]) -> Result<Self, TelemetryError> {
        let patterns = configs
            .iter()
            .map(SampledErrorPattern::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// First pattern whose expression matches `message`
    pub fn find(&self, message: &str) -> Option<&SampledErrorPattern> {
        self.patterns.iter().find(|p| p.pattern.is_match(message))
    }

    pub(crate) fn len(&self) -> usize {
        self.patterns.len()
    }
}
