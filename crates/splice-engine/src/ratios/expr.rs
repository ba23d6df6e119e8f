//! Column expressions with null-propagating, division-safe arithmetic.

use serde::{Deserialize, Serialize};
use splice_data::Frame;
use std::ops::{Add, Div, Mul, Sub};

/// Divide, yielding null when the denominator is zero or either side is null.
///
/// Non-finite quotients are null as well.
pub fn safe_divide(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(_), Some(d)) if d == 0.0 => None,
        (Some(n), Some(d)) => finite(n / d),
        _ => None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// An arithmetic expression over frame columns.
///
/// Every node propagates nulls and turns infinities into nulls; `Div` is
/// [`safe_divide`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    /// A column by name
    Field(String),
    /// A constant broadcast to every row
    Constant(f64),
    /// `a + b`
    Add(Box<Expr>, Box<Expr>),
    /// `a - b`
    Sub(Box<Expr>, Box<Expr>),
    /// `a * b`
    Mul(Box<Expr>, Box<Expr>),
    /// `a / b`, null where `b == 0`
    Div(Box<Expr>, Box<Expr>),
    /// `|a|`
    Abs(Box<Expr>),
    /// `a`, with nulls replaced by a constant
    FillNull(Box<Expr>, f64),
}

impl Expr {
    /// Reference a column.
    pub fn field(name: impl Into<String>) -> Self {
        Self::Field(name.into())
    }

    /// A constant.
    pub const fn constant(value: f64) -> Self {
        Self::Constant(value)
    }

    /// Absolute value.
    pub fn abs(self) -> Self {
        Self::Abs(Box::new(self))
    }

    /// Replace nulls with `value`.
    pub fn fill_null(self, value: f64) -> Self {
        Self::FillNull(Box::new(self), value)
    }

    /// Column names referenced by the expression, in first-use order.
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Field(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name);
                }
            }
            Self::Constant(_) => {}
            Self::Add(a, b) | Self::Sub(a, b) | Self::Mul(a, b) | Self::Div(a, b) => {
                a.collect_fields(out);
                b.collect_fields(out);
            }
            Self::Abs(a) | Self::FillNull(a, _) => a.collect_fields(out),
        }
    }

    /// Evaluate row by row against `frame`. Absent columns evaluate to null.
    pub fn evaluate(&self, frame: &Frame) -> Vec<Option<f64>> {
        let height = frame.height();
        match self {
            Self::Field(name) => frame
                .column(name)
                .map_or_else(|| vec![None; height], |c| c.values.clone()),
            Self::Constant(v) => vec![finite(*v); height],
            Self::Add(a, b) => zip_with(a.evaluate(frame), b.evaluate(frame), |x, y| finite(x + y)),
            Self::Sub(a, b) => zip_with(a.evaluate(frame), b.evaluate(frame), |x, y| finite(x - y)),
            Self::Mul(a, b) => zip_with(a.evaluate(frame), b.evaluate(frame), |x, y| finite(x * y)),
            Self::Div(a, b) => zip_with(a.evaluate(frame), b.evaluate(frame), |x, y| {
                safe_divide(Some(x), Some(y))
            }),
            Self::Abs(a) => a
                .evaluate(frame)
                .into_iter()
                .map(|v| v.map(f64::abs))
                .collect(),
            Self::FillNull(a, fill) => a
                .evaluate(frame)
                .into_iter()
                .map(|v| v.or(finite(*fill)))
                .collect(),
        }
    }
}

fn zip_with(
    left: Vec<Option<f64>>,
    right: Vec<Option<f64>>,
    op: impl Fn(f64, f64) -> Option<f64>,
) -> Vec<Option<f64>> {
    left.into_iter()
        .zip(right)
        .map(|pair| match pair {
            (Some(x), Some(y)) => op(x, y),
            _ => None,
        })
        .collect()
}

impl Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::Add(Box::new(self), Box::new(rhs))
    }
}

impl Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::Sub(Box::new(self), Box::new(rhs))
    }
}

impl Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::Mul(Box::new(self), Box::new(rhs))
    }
}

impl Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::Div(Box::new(self), Box::new(rhs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use splice_data::NumericColumn;

    fn frame(columns: &[(&str, &[Option<f64>])]) -> Frame {
        let height = columns.first().map_or(0, |(_, v)| v.len());
        let dates = (0..height)
            .map(|i| NaiveDate::from_ymd_opt(2024, 1, 1 + i as u32).unwrap())
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

    #[test]
    fn test_safe_divide() {
        assert_eq!(safe_divide(Some(100.0), Some(0.0)), None);
        assert_eq!(safe_divide(Some(100.0), Some(-0.0)), None);
        assert_eq!(safe_divide(Some(100.0), Some(0.0)).or(Some(0.0)), Some(0.0));
        assert_eq!(safe_divide(None, Some(2.0)), None);
        assert_eq!(safe_divide(Some(1.0), None), None);
        assert_eq!(safe_divide(Some(1.0), Some(4.0)), Some(0.25));
        assert_eq!(safe_divide(Some(f64::MAX), Some(1e-300)), None);
    }

    #[test]
    fn test_division_by_zero_propagates_null() {
        let f = frame(&[
            ("a", &[Some(10.0), Some(10.0), None]),
            ("b", &[Some(2.0), Some(0.0), Some(1.0)]),
        ]);
        let expr = (Expr::field("a") / Expr::field("b")) * Expr::constant(3.0);
        assert_eq!(expr.evaluate(&f), vec![Some(15.0), None, None]);

        let filled = (Expr::field("a") / Expr::field("b")).fill_null(0.0);
        assert_eq!(filled.evaluate(&f), vec![Some(5.0), Some(0.0), Some(0.0)]);
    }

    #[test]
    fn test_abs_and_missing_field() {
        let f = frame(&[("a", &[Some(-4.0), None])]);
        assert_eq!(Expr::field("a").abs().evaluate(&f), vec![Some(4.0), None]);
        assert_eq!(Expr::field("zzz").evaluate(&f), vec![None, None]);
    }

    #[test]
    fn test_fields_deduplicated_in_order() {
        let expr = (Expr::field("x") - Expr::field("y")) / Expr::field("x");
        assert_eq!(expr.fields(), vec!["x", "y"]);
    }

    #[test]
    fn test_serde_shape() {
        let expr = Expr::field("Market Capitalization") / Expr::field("Net Income");
        let json = serde_json::to_string(&expr).unwrap();
        assert_eq!(
            json,
            r#"{"div":[{"field":"Market Capitalization"},{"field":"Net Income"}]}"#
        );
        let back: Expr = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
