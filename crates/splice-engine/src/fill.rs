//! Gap filling for nullable series.
//!
//! A [`FillPolicy`] is an ordered list of [`FillStep`]s applied to one column
//! at a time. The quarterly table uses forward, backward, then linear fill;
//! the daily table defaults to forward fill only so that no row can receive a
//! value from a quarter reported after it.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One gap-filling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStep {
    /// Carry the last observation forward
    #[display("forward")]
    Forward,
    /// Carry the next observation backward
    #[display("backward")]
    Backward,
    /// Linear interpolation by row position; edges take the nearest observation
    #[display("linear")]
    Linear,
}

/// Ordered fill steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillPolicy {
    /// Steps applied in order
    pub steps: Vec<FillStep>,
}

impl FillPolicy {
    /// Policy from explicit steps.
    pub const fn new(steps: Vec<FillStep>) -> Self {
        Self { steps }
    }

    /// Forward, backward, then linear: the quarterly gap-filling policy.
    pub fn quarterly() -> Self {
        Self::new(vec![FillStep::Forward, FillStep::Backward, FillStep::Linear])
    }

    /// Forward only: residual fill for daily rows without look-ahead.
    pub fn daily() -> Self {
        Self::new(vec![FillStep::Forward])
    }

    /// Forward then backward on daily rows.
    ///
    /// Backward fill lets the pre-coverage row and first-period change cells
    /// take values from later quarters.
    pub fn legacy_daily() -> Self {
        Self::new(vec![FillStep::Forward, FillStep::Backward])
    }

    /// Whether any step propagates values backwards in time.
    pub fn looks_ahead(&self) -> bool {
        self.steps
            .iter()
            .any(|s| matches!(s, FillStep::Backward | FillStep::Linear))
    }

    /// Apply every step to `values` in place.
    pub fn apply(&self, values: &mut [Option<f64>]) {
        for step in &self.steps {
            match step {
                FillStep::Forward => forward_fill(values),
                FillStep::Backward => backward_fill(values),
                FillStep::Linear => interpolate_linear(values),
            }
        }
    }
}

/// Propagate the last non-null value downward.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last = None;
    for value in values.iter_mut() {
        if value.is_some() {
            last = *value;
        } else {
            *value = last;
        }
    }
}

/// Propagate the next non-null value upward.
pub fn backward_fill(values: &mut [Option<f64>]) {
    let mut next = None;
    for value in values.iter_mut().rev() {
        if value.is_some() {
            next = *value;
        } else {
            *value = next;
        }
    }
}

/// Linearly interpolate interior gaps by position and clamp the edges to the
/// nearest observation. A series with no observations is left untouched.
pub fn interpolate_linear(values: &mut [Option<f64>]) {
    let known: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i, v)))
        .collect();
    let (Some(&(first_idx, first_val)), Some(&(last_idx, last_val))) = (known.first(), known.last())
    else {
        return;
    };

    for value in &mut values[..first_idx] {
        *value = Some(first_val);
    }
    for value in &mut values[last_idx + 1..] {
        *value = Some(last_val);
    }
    for pair in known.windows(2) {
        let (i0, v0) = pair[0];
        let (i1, v1) = pair[1];
        let span = (i1 - i0) as f64;
        for (offset, value) in values[i0 + 1..i1].iter_mut().enumerate() {
            let t = (offset + 1) as f64 / span;
            *value = Some(v0 + (v1 - v0) * t);
        }
    }
}
