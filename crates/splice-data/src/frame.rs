//! Date-indexed numeric frames.
//!
//! A [`Frame`] is the tabular value passed between pipeline stages: one
//! ascending date index and any number of uniquely named nullable `f64`
//! columns. Uniqueness and length are checked whenever a column is added, so
//! a frame can never hold two columns with the same name.

use crate::error::{DataError, Result};
use chrono::NaiveDate;

/// A named column of nullable values.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericColumn {
    /// Column name
    pub name: String,
    /// One value per frame row
    pub values: Vec<Option<f64>>,
}

impl NumericColumn {
    /// Create a new column.
    pub fn new(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Create an all-null column of the given length.
    pub fn nulls(name: impl Into<String>, len: usize) -> Self {
        Self::new(name, vec![None; len])
    }

    /// Number of non-null values.
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Whether every value is null.
    pub fn is_all_null(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    /// Gather values by row index; `None` indices yield nulls.
    pub fn gather(&self, indices: &[Option<usize>]) -> Self {
        let values = indices
            .iter()
            .map(|idx| idx.and_then(|i| self.values.get(i).copied().flatten()))
            .collect();
        Self::new(self.name.clone(), values)
    }
}

/// Date-indexed table of numeric columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    dates: Vec<NaiveDate>,
    columns: Vec<NumericColumn>,
}

impl Frame {
    /// Create a frame with a date index and no columns.
    pub const fn new(dates: Vec<NaiveDate>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Create a frame from a date index and columns, validating names and lengths.
    pub fn with_columns(dates: Vec<NaiveDate>, columns: Vec<NumericColumn>) -> Result<Self> {
        let mut frame = Self::new(dates);
        for column in columns {
            frame.push_column(column)?;
        }
        Ok(frame)
    }

    /// The date index.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.dates.len()
    }

    /// Number of columns, excluding the date index.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// All columns in order.
    pub fn columns(&self) -> &[NumericColumn] {
        &self.columns
    }

    /// Consume the frame, returning its index and columns.
    pub fn into_parts(self) -> (Vec<NaiveDate>, Vec<NumericColumn>) {
        (self.dates, self.columns)
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&NumericColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Look up a column by name for mutation.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut NumericColumn> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Whether a column with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::DuplicateColumn`] if the name is taken and
    /// [`DataError::LengthMismatch`] if the column length differs from the
    /// frame height.
    pub fn push_column(&mut self, column: NumericColumn) -> Result<()> {
        self.check_length(&column)?;
        if self.contains(&column.name) {
            return Err(DataError::DuplicateColumn(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replace a same-named column in place, or append it if absent.
    pub fn upsert_column(&mut self, column: NumericColumn) -> Result<()> {
        self.check_length(&column)?;
        match self.column_mut(&column.name) {
            Some(existing) => existing.values = column.values,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Keep only rows from `start` onwards.
    pub fn slice_from(&self, start: usize) -> Self {
        let start = start.min(self.height());
        Self {
            dates: self.dates[start..].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|c| NumericColumn::new(c.name.clone(), c.values[start..].to_vec()))
                .collect(),
        }
    }

    fn check_length(&self, column: &NumericColumn) -> Result<()> {
        if column.values.len() != self.height() {
            return Err(DataError::LengthMismatch {
                column: column.name.clone(),
                expected: self.height(),
                actual: column.values.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(n: u32) -> Vec<NaiveDate> {
        (1..=n)
            .map(|d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap())
            .collect()
    }

    #[test]
    fn test_push_rejects_duplicate_name() {
        let mut frame = Frame::new(dates(2));
        frame
            .push_column(NumericColumn::new("Revenue", vec![Some(1.0), None]))
            .unwrap();
        let err = frame
            .push_column(NumericColumn::new("Revenue", vec![None, None]))
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateColumn(name) if name == "Revenue"));
        assert_eq!(frame.width(), 1);
    }

    #[test]
    fn test_push_rejects_length_mismatch() {
        let mut frame = Frame::new(dates(3));
        let err = frame
            .push_column(NumericColumn::new("Revenue", vec![Some(1.0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            DataError::LengthMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_upsert_overwrites_in_place() {
        let mut frame = Frame::with_columns(
            dates(2),
            vec![
                NumericColumn::new("a", vec![Some(1.0), Some(2.0)]),
                NumericColumn::new("b", vec![Some(3.0), Some(4.0)]),
            ],
        )
        .unwrap();

        frame
            .upsert_column(NumericColumn::new("a", vec![None, Some(9.0)]))
            .unwrap();
        frame
            .upsert_column(NumericColumn::new("c", vec![Some(5.0), None]))
            .unwrap();

        let names: Vec<_> = frame.column_names().collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(frame.column("a").unwrap().values, vec![None, Some(9.0)]);
    }

    #[test]
    fn test_gather_and_slice() {
        let column = NumericColumn::new("x", vec![Some(1.0), None, Some(3.0)]);
        let gathered = column.gather(&[Some(2), None, Some(1), Some(0)]);
        assert_eq!(gathered.values, vec![Some(3.0), None, None, Some(1.0)]);

        let frame = Frame::with_columns(dates(3), vec![column]).unwrap();
        let tail = frame.slice_from(1);
        assert_eq!(tail.height(), 2);
        assert_eq!(tail.column("x").unwrap().values, vec![None, Some(3.0)]);
        assert_eq!(tail.dates()[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
    }
}
