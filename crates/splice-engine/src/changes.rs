//! Period-over-period percentage changes of quarterly columns.

use crate::fusion::FusedQuarterlyTable;
use crate::ratios::safe_divide;
use splice_data::NumericColumn;

/// Suffix of change column names, e.g. `Revenue Pct Change`.
pub const PCT_CHANGE_SUFFIX: &str = " Pct Change";

/// `(x[t] - x[t-1]) / x[t-1]` for each row; the first row is null.
///
/// Nulls are not skipped over: a null on either side gives a null, as does a
/// zero previous value.
pub fn percent_change(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(prev), Some(curr)) => safe_divide(Some(curr - prev), Some(prev)),
        _ => None,
    }));
    out
}

/// One change column per fused quarterly column, in fused order and on the
/// quarterly date index.
pub fn change_series(fused: &FusedQuarterlyTable) -> Vec<NumericColumn> {
    fused
        .frame
        .columns()
        .iter()
        .map(|column| {
            NumericColumn::new(
                format!("{}{PCT_CHANGE_SUFFIX}", column.name),
                percent_change(&column.values),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::{fuse, statement};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use splice_data::StatementKind;

    #[test]
    fn test_percent_change() {
        let out = percent_change(&[Some(100.0), Some(110.0), None, Some(50.0), Some(0.0), Some(5.0)]);
        assert_eq!(out[0], None);
        assert_relative_eq!(out[1].unwrap(), 0.1);
        assert_eq!(out[2], None);
        assert_eq!(out[3], None);
        assert_relative_eq!(out[4].unwrap(), -1.0);
        assert_eq!(out[5], None);
        assert!(percent_change(&[]).is_empty());
    }

    #[test]
    fn test_change_series_names() {
        let q1 = NaiveDate::from_ymd_opt(2023, 3, 31).unwrap();
        let q2 = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let fused = fuse(&[
            statement(StatementKind::Income, &[q1, q2], &[("Revenue", &[Some(10.0), Some(15.0)])]),
            statement(StatementKind::Ratios, &[q1, q2], &[("PE Ratio", &[Some(20.0), Some(10.0)])]),
        ])
        .unwrap();

        let changes = change_series(&fused);
        let names: Vec<&str> = changes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Revenue Pct Change", "PE Ratio Pct Change"]);
        assert_eq!(changes[0].values, vec![None, Some(0.5)]);
        assert_eq!(changes[1].values, vec![None, Some(-0.5)]);
    }
}
