//! Host-provided box configuration
//!
//! Settings arrive as string key/value pairs and are resolved once, at
//! initialize time. Stimulation labels are resolved against an explicitly
//! injected [`LabelTable`] rather than any global registry.

use crate::error::{EssError, EssResult};
use std::collections::HashMap;

/// String-keyed settings for one stream component
#[derive(Debug, Clone, Default)]
pub struct Settings {
    values: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        let values = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings { values }
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Arity check: a component declares how many settings it takes
    pub fn expect_len(&self, expected: usize) -> EssResult<()> {
        if self.values.len() != expected {
            return Err(EssError::Configuration {
                message: format!(
                    "needs exactly {} settings, got {}",
                    expected,
                    self.values.len()
                ),
            });
        }
        Ok(())
    }

    pub fn get_str(&self, key: &str) -> EssResult<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| EssError::Configuration {
                message: format!("missing setting '{}'", key),
            })
    }

    pub fn get_int(&self, key: &str) -> EssResult<i64> {
        let raw = self.get_str(key)?;
        raw.trim().parse().map_err(|_| EssError::Configuration {
            message: format!("setting '{}' is not an integer: '{}'", key, raw),
        })
    }

    pub fn get_float(&self, key: &str) -> EssResult<f64> {
        let raw = self.get_str(key)?;
        raw.trim().parse().map_err(|_| EssError::Configuration {
            message: format!("setting '{}' is not a number: '{}'", key, raw),
        })
    }
}

/// Injected stimulation label -> numeric code mapping
#[derive(Debug, Clone, Default)]
pub struct LabelTable {
    codes: HashMap<String, u64>,
}

impl LabelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs(pairs: &[(&str, u64)]) -> Self {
        let codes = pairs
            .iter()
            .map(|(label, code)| (label.to_string(), *code))
            .collect();
        LabelTable { codes }
    }

    pub fn insert(&mut self, label: &str, code: u64) {
        self.codes.insert(label.to_string(), code);
    }

    /// Resolve a label to its code; unknown labels are fatal at configure time
    pub fn resolve(&self, label: &str) -> EssResult<u64> {
        self.codes
            .get(label)
            .copied()
            .ok_or_else(|| EssError::UnknownLabel {
                label: label.to_string(),
            })
    }
}
