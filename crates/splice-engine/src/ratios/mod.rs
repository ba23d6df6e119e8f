//! Financial ratio recomputation.
//!
//! Ratios are data: a [`RatioSet`] is an ordered list of named [`Expr`]s that
//! is evaluated against the daily frame after alignment. Each result replaces
//! a same-named column in place or is appended. A definition may read the
//! output of any definition before it.

mod expr;
mod presets;

pub use expr::{Expr, safe_divide};
pub use presets::{RatioPreset, fields};

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use splice_data::{Frame, NumericColumn};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// One derived column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioDefinition {
    /// Output column name
    pub name: String,
    /// Formula
    pub expr: Expr,
}

impl RatioDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, expr: Expr) -> Self {
        Self {
            name: name.into(),
            expr,
        }
    }
}

/// Ordered ratio definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatioSet {
    ratios: Vec<RatioDefinition>,
}

impl Default for RatioSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RatioSet {
    /// Set from explicit definitions.
    pub const fn new(ratios: Vec<RatioDefinition>) -> Self {
        Self { ratios }
    }

    /// Append a definition.
    pub fn push(&mut self, ratio: RatioDefinition) {
        self.ratios.push(ratio);
    }

    /// Number of definitions.
    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    /// Definitions in evaluation order.
    pub fn definitions(&self) -> &[RatioDefinition] {
        &self.ratios
    }

    /// Output names in evaluation order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.ratios.iter().map(|r| r.name.as_str())
    }

    /// `(ratio, field)` pairs whose field is neither in `frame` nor produced by
    /// an earlier definition.
    pub fn missing_fields(&self, frame: &Frame) -> Vec<(String, String)> {
        let mut produced: BTreeSet<&str> = BTreeSet::new();
        let mut missing = Vec::new();
        for ratio in &self.ratios {
            for field in ratio.expr.fields() {
                if !frame.contains(field) && !produced.contains(field) {
                    missing.push((ratio.name.clone(), field.to_string()));
                }
            }
            produced.insert(ratio.name.as_str());
        }
        missing
    }

    /// Evaluate every definition against `frame` in order, upserting results.
    ///
    /// Fields are checked before anything is written. With `strict` a missing
    /// field is an error; otherwise it reads as null and is logged.
    ///
    /// # Errors
    ///
    /// [`EngineError::MissingField`] for the first missing field when `strict`.
    pub fn apply(&self, frame: &mut Frame, strict: bool) -> Result<()> {
        let missing = self.missing_fields(frame);
        if let Some((ratio, field)) = missing.first() {
            if strict {
                return Err(EngineError::MissingField {
                    ratio: ratio.clone(),
                    field: field.clone(),
                });
            }
            for (ratio, field) in &missing {
                warn!(%ratio, %field, "ratio field missing, treating as null");
            }
        }

        for ratio in &self.ratios {
            let values = ratio.expr.evaluate(frame);
            frame.upsert_column(NumericColumn::new(ratio.name.clone(), values))?;
        }
        debug!(count = self.len(), "recomputed ratios");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn frame(columns: &[(&str, &[Option<f64>])]) -> Frame {
        let height = columns.first().map_or(0, |(_, v)| v.len());
        let dates = (0..height)
            .map(|i| NaiveDate::from_ymd_opt(2024, 2, 1 + i as u32).unwrap())
            .collect();
        Frame::with_columns(
            dates,
            columns
                .iter()
                .map(|(n, v)| NumericColumn::new(*n, v.to_vec()))
                .collect(),
        )
        .unwrap()
    }

    fn full_frame() -> Frame {
        use fields::*;
        let one = |v: f64| vec![Some(v), Some(v)];
        let columns: Vec<(&str, Vec<Option<f64>>)> = vec![
            (CLOSE, one(50.0)),
            ("PE Ratio", vec![Some(999.0), None]),
            (MARKET_CAP, vec![Some(1000.0), Some(1200.0)]),
            (NET_INCOME, vec![Some(50.0), Some(0.0)]),
            (REVENUE, one(400.0)),
            (EQUITY, one(200.0)),
            (TOTAL_DEBT, one(100.0)),
            (CURRENT_ASSETS, one(300.0)),
            (INVENTORY, one(60.0)),
            (CURRENT_LIABILITIES, one(120.0)),
            (TOTAL_ASSETS, one(800.0)),
            (INCOME_TAX, vec![Some(20.0), None]),
            (PRETAX_INCOME, vec![Some(80.0), Some(0.0)]),
            (OPERATING_INCOME, one(90.0)),
            (CASH, one(40.0)),
            (DIVIDEND_PER_SHARE, one(1.0)),
            (DIVIDENDS_PAID, one(-10.0)),
            (SHARE_ISSUANCE, one(-30.0)),
        ];
        let named: Vec<(&str, &[Option<f64>])> =
            columns.iter().map(|(n, v)| (*n, v.as_slice())).collect();
        frame(&named)
    }

    #[test]
    fn test_standard_set_values() {
        let mut f = full_frame();
        RatioSet::standard().apply(&mut f, true).unwrap();

        let value = |name: &str, row: usize| f.column(name).unwrap().values[row];
        assert_relative_eq!(value("PE Ratio", 0).unwrap(), 20.0);
        assert_eq!(value("PE Ratio", 1), None);
        assert_relative_eq!(value("Quick Ratio", 0).unwrap(), 2.0);
        assert_relative_eq!(value("Tax Rate", 0).unwrap(), 0.25);
        assert_eq!(value("Tax Rate", 1), Some(0.0));
        assert_relative_eq!(value("NOPAT", 0).unwrap(), 67.5);
        assert_relative_eq!(value("NOPAT", 1).unwrap(), 90.0);
        assert_relative_eq!(value("Invested Capital", 0).unwrap(), 260.0);
        assert_relative_eq!(
            value("Return on Invested Capital (ROIC)", 0).unwrap(),
            67.5 / 260.0
        );
        assert_relative_eq!(value("Dividend Yield", 0).unwrap(), 0.02);
        assert_relative_eq!(value("Payout Ratio", 0).unwrap(), 0.2);
        assert_relative_eq!(value("Buyback Yield", 0).unwrap(), -0.03);
    }

    #[test]
    fn test_existing_ratio_column_is_overwritten_in_place() {
        let mut f = full_frame();
        RatioSet::standard().apply(&mut f, true).unwrap();

        let names: Vec<&str> = f.column_names().collect();
        assert_eq!(names[1], "PE Ratio");
        assert_eq!(names.iter().filter(|n| **n == "PE Ratio").count(), 1);
        assert_eq!(names.last(), Some(&"Buyback Yield"));
    }

    #[test]
    fn test_pe_self_consistency() {
        let mut f = full_frame();
        RatioSet::standard().apply(&mut f, true).unwrap();
        let mcap = &f.column(fields::MARKET_CAP).unwrap().values;
        let ni = &f.column(fields::NET_INCOME).unwrap().values;
        let pe = &f.column("PE Ratio").unwrap().values;
        for ((m, n), p) in mcap.iter().zip(ni).zip(pe) {
            if let (Some(m), Some(n)) = (m, n)
                && *n != 0.0
            {
                assert_relative_eq!(p.unwrap(), m / n);
            }
        }
    }

    #[test]
    fn test_strict_missing_field_fails_before_writing() {
        let mut f = frame(&[(fields::MARKET_CAP, &[Some(1.0)])]);
        let err = RatioSet::standard().apply(&mut f, true).unwrap_err();
        assert!(matches!(
            err,
            EngineError::MissingField { ref ratio, ref field }
                if ratio == "PE Ratio" && field == fields::NET_INCOME
        ));
        assert_eq!(f.width(), 1);
    }

    #[test]
    fn test_lenient_missing_field_reads_null() {
        let mut f = frame(&[(fields::MARKET_CAP, &[Some(1.0)])]);
        RatioSet::standard().apply(&mut f, false).unwrap();
        assert_eq!(f.column("PE Ratio").unwrap().values, vec![None]);
        assert_eq!(f.column("Tax Rate").unwrap().values, vec![Some(0.0)]);
    }

    #[test]
    fn test_earlier_outputs_count_as_available() {
        let set = RatioSet::new(vec![
            RatioDefinition::new("a", Expr::constant(2.0)),
            RatioDefinition::new("b", Expr::field("a") * Expr::constant(3.0)),
        ]);
        let mut f = frame(&[("x", &[Some(1.0)])]);
        assert!(set.missing_fields(&f).is_empty());
        set.apply(&mut f, true).unwrap();
        assert_eq!(f.column("b").unwrap().values, vec![Some(6.0)]);
    }

    #[test]
    fn test_ratio_set_from_json() {
        let json = r#"[{"name": "Margin", "expr": {"div": [{"field": "Net Income"}, {"field": "Revenue"}]}}]"#;
        let set: RatioSet = serde_json::from_str(json).unwrap();
        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Margin"]);
    }
}
