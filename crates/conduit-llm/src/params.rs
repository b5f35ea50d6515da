//! Sampling parameters.
//!
//! The client carries one [`SamplingParams`] value fixed at construction.
//! Individual calls may override any subset of it through
//! [`SamplingOverrides`]; the merged set is what goes on the wire.

use serde::{Deserialize, Serialize};

/// Default sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Sampling temperature.
    pub temperature: f64,
    /// Maximum number of tokens to generate.
    pub length: u32,
    /// Total probability mass of tokens to consider at each step.
    pub top_p: f64,
    /// Number of highest-probability tokens kept for top-k filtering.
    pub top_k: u32,
    /// Penalty applied to repeated tokens.
    pub repetition_penalty: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            length: 256,
            top_p: 1.0,
            top_k: 40,
            repetition_penalty: 1.0,
        }
    }
}

impl SamplingParams {
    /// Apply per-call overrides on top of these defaults.
    #[must_use]
    pub fn merged(&self, overrides: &SamplingOverrides) -> Self {
        Self {
            temperature: overrides.temperature.unwrap_or(self.temperature),
            length: overrides.length.unwrap_or(self.length),
            top_p: overrides.top_p.unwrap_or(self.top_p),
            top_k: overrides.top_k.unwrap_or(self.top_k),
            repetition_penalty: overrides
                .repetition_penalty
                .unwrap_or(self.repetition_penalty),
        }
    }
}

/// Per-call overrides.  `None` keeps the client default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingOverrides {
    pub temperature: Option<f64>,
    pub length: Option<u32>,
    pub top_p: Option<f64>,
    pub top_k: Option<u32>,
    pub repetition_penalty: Option<f64>,
}

impl SamplingOverrides {
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_repetition_penalty(mut self, penalty: f64) -> Self {
        self.repetition_penalty = Some(penalty);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_endpoint_defaults() {
        let p = SamplingParams::default();
        assert_eq!(p.temperature, 0.7);
        assert_eq!(p.length, 256);
        assert_eq!(p.top_p, 1.0);
        assert_eq!(p.top_k, 40);
        assert_eq!(p.repetition_penalty, 1.0);
    }

    #[test]
    fn empty_overrides_keep_defaults() {
        let p = SamplingParams::default();
        assert_eq!(p.merged(&SamplingOverrides::default()), p);
    }

    #[test]
    fn overrides_replace_only_set_fields() {
        let p = SamplingParams::default();
        let merged = p.merged(&SamplingOverrides::default().with_temperature(0.1).with_top_k(5));
        assert_eq!(merged.temperature, 0.1);
        assert_eq!(merged.top_k, 5);
        assert_eq!(merged.length, 256);
        assert_eq!(merged.top_p, 1.0);
    }
}
