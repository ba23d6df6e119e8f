//! Gordon growth present value of operating cash flow.

use crate::ratios::fields::OPERATING_CASH_FLOW;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use splice_data::Frame;

/// Output column name.
pub const PV_COLUMN: &str = "Present Value of Future Cash Flows";

/// Perpetuity parameters, per reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationConfig {
    /// Discount rate `r`
    pub discount_rate: f64,
    /// Growth rate `g`
    pub growth_rate: f64,
}

impl Default for ValuationConfig {
    fn default() -> Self {
        Self {
            discount_rate: 0.025,
            growth_rate: 0.005,
        }
    }
}

impl ValuationConfig {
    /// `cf * (1 + g) / (r - g)`.
    pub fn present_value(&self, cash_flow: Option<f64>) -> PresentValue {
        let Some(cash_flow) = cash_flow else {
            return PresentValue::Missing;
        };
        let spread = self.discount_rate - self.growth_rate;
        if spread == 0.0 {
            return PresentValue::NotApplicable;
        }
        let value = cash_flow * (1.0 + self.growth_rate) / spread;
        if value.is_finite() {
            PresentValue::Estimate(value)
        } else {
            PresentValue::NotApplicable
        }
    }
}

/// A present value, or why there is none.
#[derive(Debug, Clone, Copy, PartialEq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentValue {
    /// Computed value
    #[display("{_0}")]
    Estimate(f64),
    /// Incomputable for these parameters (`r == g`, or overflow)
    #[display("N/A")]
    NotApplicable,
    /// No operating cash flow to value
    #[display("N/A")]
    Missing,
}

impl PresentValue {
    /// The estimate, if any.
    pub const fn value(&self) -> Option<f64> {
        match self {
            Self::Estimate(v) => Some(*v),
            Self::NotApplicable | Self::Missing => None,
        }
    }
}

/// Present value for every row of `frame`.
///
/// Every row is [`PresentValue::Missing`] when the frame has no operating
/// cash flow column.
pub fn present_values(frame: &Frame, config: &ValuationConfig) -> Vec<PresentValue> {
    match frame.column(OPERATING_CASH_FLOW) {
        Some(column) => column
            .values
            .iter()
            .map(|cf| config.present_value(*cf))
            .collect(),
        None => vec![PresentValue::Missing; frame.height()],
    }
}
