//! Random source port (driven/secondary port)
//!
//! Sampling decisions draw from this port so tests can script the values
//! and hit exact boundaries.

/// Port trait for uniform random draws
pub trait IRandomSource: Send + Sync {
    /// Returns a uniformly distributed value in `[0, 1)`
    fn next_f64(&self) -> f64;
}
