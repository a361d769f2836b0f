//! Parameters for one sequence-generation call.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::{AdaptError, Result};

/// # GenerationRequest
///
/// Built once per `predict` call and reused for every batch in that call.
///
/// `extra` carries free-form options passed through to the model's
/// `generate` untouched; each model decides which keys it understands.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Number of beams for beam search. `1` means greedy decoding.
    pub num_beams: usize,

    /// Minimum length of the generated sequence.
    pub min_length: usize,

    /// Maximum length of the generated sequence.
    pub max_length: usize,

    /// Stop beam search once `num_beams` sequences have finished.
    pub early_stopping: bool,

    /// Passthrough options for the model's `generate`.
    pub extra: BTreeMap<String, Value>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            num_beams: 1,
            min_length: 0,
            max_length: 128,
            early_stopping: true,
            extra: BTreeMap::new(),
        }
    }
}

impl GenerationRequest {
    /// Greedy decoding bounded by `max_length`.
    pub fn greedy(max_length: usize) -> Self {
        Self {
            max_length,
            ..Default::default()
        }
    }

    pub fn num_beams(mut self, num_beams: usize) -> Self {
        self.num_beams = num_beams;
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn early_stopping(mut self, early_stopping: bool) -> Self {
        self.early_stopping = early_stopping;
        self
    }

    /// Adds a passthrough option.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Reads a numeric passthrough option, falling back to `default` when unset.
    ///
    /// # Errors
    ///
    /// Fails with [`AdaptError::Generation`] when the option is set but not a number.
    pub fn extra_f64(&self, key: &str, default: f64) -> Result<f64> {
        match self.extra.get(key) {
            None => Ok(default),
            Some(value) => value.as_f64().ok_or_else(|| {
                AdaptError::generation(anyhow::anyhow!("`{}` must be a number, got {}", key, value))
            }),
        }
    }

    /// Rejects passthrough options outside `known`.
    pub fn ensure_known_extras(&self, known: &[&str]) -> Result<()> {
        let unknown: Vec<&str> = self
            .extra
            .keys()
            .map(String::as_str)
            .filter(|key| !known.contains(key))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(AdaptError::generation(anyhow::anyhow!(
                "unsupported generation options: {}", unknown.join(", ")
            )))
        }
    }

    /// Checks the parameter combination before any model work happens.
    ///
    /// # Errors
    ///
    /// Fails with [`AdaptError::Generation`] when `num_beams` or `max_length`
    /// is zero, or when `min_length` exceeds `max_length`.
    pub fn validate(&self) -> Result<()> {
        if self.num_beams == 0 {
            return Err(AdaptError::generation(anyhow::anyhow!("`num_beams` must be at least 1")));
        }
        if self.max_length == 0 {
            return Err(AdaptError::generation(anyhow::anyhow!("`max_length` must be at least 1")));
        }
        if self.min_length > self.max_length {
            return Err(AdaptError::generation(anyhow::anyhow!(
                "`min_length` ({}) is greater than `max_length` ({})",
                self.min_length, self.max_length
            )));
        }
        Ok(())
    }
}
