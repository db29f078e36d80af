//! Parameter types passed from the mapper to the filter engine.
//!
//! These describe *what* a filter should do, not *how*. The engine reads
//! them by [`ParameterKey`] and decides how to turn them into pixels.
//!
//! ## Types
//!
//! - [`Intensity`]: the slider value, clamped to `0.0..=1.0` on construction.
//! - [`ParamValue`]: a scalar or a point (for `center`).
//! - [`FilterParameters`]: the key → value map for one filter, which only
//!   ever holds keys that filter accepts.

use super::kind::{FilterKind, ParameterKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Normalized filter strength in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intensity(f64);

impl Intensity {
    pub const MIN: Intensity = Intensity(0.0);
    pub const MAX: Intensity = Intensity(1.0);

    /// Clamp into range. NaN maps to zero.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.5)
    }
}

impl From<f64> for Intensity {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// A single parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(f64),
    Point { x: f64, y: f64 },
}

impl ParamValue {
    pub fn as_scalar(self) -> Option<f64> {
        match self {
            ParamValue::Scalar(v) => Some(v),
            ParamValue::Point { .. } => None,
        }
    }

    pub fn as_point(self) -> Option<(f64, f64)> {
        match self {
            ParamValue::Point { x, y } => Some((x, y)),
            ParamValue::Scalar(_) => None,
        }
    }

    pub fn is_finite(self) -> bool {
        match self {
            ParamValue::Scalar(v) => v.is_finite(),
            ParamValue::Point { x, y } => x.is_finite() && y.is_finite(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// The filter does not read this key.
    #[error("{kind} does not accept parameter '{key}'")]
    Unsupported { kind: FilterKind, key: ParameterKey },
}

/// Effective parameters for one filter.
///
/// Always tagged with the filter they were computed for, so a map built for
/// one filter is never mistaken for another's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterParameters {
    kind: FilterKind,
    values: BTreeMap<ParameterKey, ParamValue>,
}

impl FilterParameters {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            values: BTreeMap::new(),
        }
    }

    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Insert a value, rejecting keys the filter does not accept.
    pub fn try_insert(
        &mut self,
        key: ParameterKey,
        value: ParamValue,
    ) -> Result<(), ParameterError> {
        if !self.kind.accepts(key) {
            return Err(ParameterError::Unsupported {
                kind: self.kind,
                key,
            });
        }
        self.values.insert(key, value);
        Ok(())
    }

    /// Insert a value, silently skipping keys the filter does not accept.
    pub fn set(&mut self, key: ParameterKey, value: ParamValue) {
        if let Err(e) = self.try_insert(key, value) {
            log::debug!("skipping parameter: {e}");
        }
    }

    pub fn set_scalar(&mut self, key: ParameterKey, value: f64) {
        self.set(key, ParamValue::Scalar(value));
    }

    pub fn get(&self, key: ParameterKey) -> Option<ParamValue> {
        self.values.get(&key).copied()
    }

    pub fn scalar(&self, key: ParameterKey) -> Option<f64> {
        self.get(key).and_then(ParamValue::as_scalar)
    }

    pub fn point(&self, key: ParameterKey) -> Option<(f64, f64)> {
        self.get(key).and_then(ParamValue::as_point)
    }

    pub fn contains(&self, key: ParameterKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn remove(&mut self, key: ParameterKey) -> Option<ParamValue> {
        self.values.remove(&key)
    }

    /// Drop every key not in `allowed`.
    pub fn retain_keys(&mut self, allowed: &[ParameterKey]) {
        self.values.retain(|key, _| allowed.contains(key));
    }

    pub fn keys(&self) -> impl Iterator<Item = ParameterKey> + '_ {
        self.values.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, ParamValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Required keys of the filter that are absent from this map.
    pub fn missing_required(&self) -> Vec<ParameterKey> {
        self.kind
            .required_keys()
            .iter()
            .copied()
            .filter(|key| !self.contains(*key))
            .collect()
    }
}
