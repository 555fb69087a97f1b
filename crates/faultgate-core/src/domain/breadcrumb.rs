//! Breadcrumbs: small structured records of prior events attached to later reports

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::severity::Severity;

/// A breadcrumb describing something that happened before an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Dotted category, e.g. `"gatherer"` or `"navigation"`
    pub category: Option<String>,
    /// Free-form description
    pub message: Option<String>,
    /// Severity of the recorded event
    pub level: Severity,
    /// Arbitrary structured data
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Breadcrumb {
    /// Creates a breadcrumb with the given message, stamped now
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            category: None,
            message: Some(message.into()),
            level: Severity::Info,
            data: BTreeMap::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = level;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
