//! Run context captured once when reporting goes live
//!
//! The snapshot describes the run being reported on (which URL, which
//! device emulation, which throttling) and is attached to every event as
//! top-level extras.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

/// Device class the run emulates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Mobile,
    Desktop,
}

impl Default for FormFactor {
    fn default() -> Self {
        FormFactor::Mobile
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormFactor::Mobile => write!(f, "mobile"),
            FormFactor::Desktop => write!(f, "desktop"),
        }
    }
}

impl FromStr for FormFactor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mobile" => Ok(FormFactor::Mobile),
            "desktop" => Ok(FormFactor::Desktop),
            _ => Err(DomainError::InvalidFormFactor(s.to_string())),
        }
    }
}

/// How network and CPU throttling is applied during the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottlingMethod {
    /// Throttling is simulated after the fact
    Simulate,
    /// Throttling is applied by the browser while loading
    Devtools,
    /// The environment is already throttled externally
    Provided,
}

impl Default for ThrottlingMethod {
    fn default() -> Self {
        ThrottlingMethod::Simulate
    }
}

impl fmt::Display for ThrottlingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ThrottlingMethod::Simulate => "simulate",
            ThrottlingMethod::Devtools => "devtools",
            ThrottlingMethod::Provided => "provided",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ThrottlingMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simulate" => Ok(ThrottlingMethod::Simulate),
            "devtools" => Ok(ThrottlingMethod::Devtools),
            "provided" => Ok(ThrottlingMethod::Provided),
            _ => Err(DomainError::InvalidThrottlingMethod(s.to_string())),
        }
    }
}

/// Throttling parameters in effect for the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottlingSettings {
    pub rtt_ms: f64,
    pub throughput_kbps: f64,
    pub request_latency_ms: f64,
    pub download_throughput_kbps: f64,
    pub upload_throughput_kbps: f64,
    pub cpu_slowdown_multiplier: f64,
}

impl Default for ThrottlingSettings {
    /// Slow 4G on a mid-tier phone
    fn default() -> Self {
        Self {
            rtt_ms: 150.0,
            throughput_kbps: 1638.4,
            request_latency_ms: 562.5,
            download_throughput_kbps: 1474.56,
            upload_throughput_kbps: 675.0,
            cpu_slowdown_multiplier: 4.0,
        }
    }
}

/// Immutable description of the run, returned verbatim by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSnapshot {
    pub channel: String,
    pub url: String,
    pub form_factor: FormFactor,
    pub throttling_method: ThrottlingMethod,
    #[serde(flatten)]
    pub throttling: ThrottlingSettings,
}

impl ContextSnapshot {
    /// Flat key/value view used as top-level extras on every event
    pub fn extras(&self) -> BTreeMap<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
            _ => BTreeMap::new(),
        }
    }
}
