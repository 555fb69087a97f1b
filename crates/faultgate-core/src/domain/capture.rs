//! Per-call capture options, report scopes and de-duplication keys

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::severity::Severity;

/// Fingerprint element that stands for the backend's default grouping
pub const DEFAULT_FINGERPRINT: &str = "{{ default }}";

/// Tag naming the audit that raised an error
pub const AUDIT_TAG: &str = "audit";

/// Tag naming the gatherer that raised an error
pub const GATHERER_TAG: &str = "gatherer";

/// Tag added for protocol-layer failures
pub const PROTOCOL_METHOD_TAG: &str = "protocolMethod";

/// Options supplied alongside an exception
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    pub level: Option<Severity>,
    pub tags: BTreeMap<String, String>,
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl CaptureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Tags the error as raised by the named audit
    pub fn audit(name: impl Into<String>) -> Self {
        Self::new().with_tag(AUDIT_TAG, name)
    }

    /// Tags the error as raised by the named gatherer
    pub fn gatherer(name: impl Into<String>) -> Self {
        Self::new().with_tag(GATHERER_TAG, name)
    }

    /// The logical source used for de-duplication; `audit` wins over `gatherer`
    pub fn source(&self) -> Option<ReportSource> {
        if let Some(name) = self.tags.get(AUDIT_TAG) {
            return Some(ReportSource::Audit(name.clone()));
        }
        self.tags
            .get(GATHERER_TAG)
            .map(|name| ReportSource::Gatherer(name.clone()))
    }
}

/// Parses a `key=value` tag argument
pub fn parse_tag(raw: &str) -> Result<(String, String), DomainError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(DomainError::InvalidTag(raw.to_string())),
    }
}

/// Which component raised an error
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum ReportSource {
    Audit(String),
    Gatherer(String),
}

impl fmt::Display for ReportSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportSource::Audit(name) => write!(f, "audit-{}", name),
            ReportSource::Gatherer(name) => write!(f, "gatherer-{}", name),
        }
    }
}

/// Identity of a reported failure for at-most-once reporting
///
/// Structured so that an audit and a gatherer sharing a name never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub source: ReportSource,
    pub message: String,
}

impl DedupKey {
    pub fn new(source: ReportSource, message: impl Into<String>) -> Self {
        Self {
            source,
            message: message.into(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.message)
    }
}

/// Everything applied to the isolated scope of a single exception report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportScope {
    pub level: Option<Severity>,
    pub tags: BTreeMap<String, String>,
    pub extra: BTreeMap<String, serde_json::Value>,
    /// Overrides the backend's grouping when set
    pub fingerprint: Option<Vec<String>>,
}

impl From<&CaptureOptions> for ReportScope {
    fn from(options: &CaptureOptions) -> Self {
        Self {
            level: options.level,
            tags: options.tags.clone(),
            extra: options.extra.clone(),
            fingerprint: None,
        }
    }
}
