//! Labeled tabular datasets.
//!
//! All values are kept as text. Column types are detected, not parsed: a
//! column is [`ColumnType::Numeric`] when every value parses as a number and
//! [`ColumnType::Nominal`] otherwise. The label column is always nominal.

pub mod csv;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{InfoBaseError, Result};

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    /// Every value parses as a number.
    Numeric,
    /// Categorical text.
    Nominal,
}

impl ColumnType {
    /// Infer the type of a column from its values.
    ///
    /// Values for which `is_missing` returns true are ignored. A column with
    /// no remaining values is numeric.
    pub fn infer<'a, I, F>(values: I, is_missing: F) -> ColumnType
    where
        I: IntoIterator<Item = &'a str>,
        F: Fn(&str) -> bool,
    {
        let numeric = values
            .into_iter()
            .filter(|value| !is_missing(value))
            .all(|value| value.trim().parse::<f64>().is_ok());

        if numeric {
            ColumnType::Numeric
        } else {
            ColumnType::Nominal
        }
    }

    /// Single-byte tag used by the binary format.
    pub fn as_u8(self) -> u8 {
        match self {
            ColumnType::Numeric => 0,
            ColumnType::Nominal => 1,
        }
    }

    /// Inverse of [`ColumnType::as_u8`].
    pub fn from_u8(tag: u8) -> Option<ColumnType> {
        match tag {
            0 => Some(ColumnType::Numeric),
            1 => Some(ColumnType::Nominal),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Numeric => write!(f, "NUMERIC"),
            ColumnType::Nominal => write!(f, "NOMINAL"),
        }
    }
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
}

/// Feature rows plus a parallel label sequence, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    feature_names: Vec<String>,
    label_name: String,
    rows: Vec<Vec<String>>,
    labels: Vec<String>,
}

impl Dataset {
    /// Create a dataset, checking that there is one label per row and that
    /// every row has one value per feature.
    pub fn new(
        feature_names: Vec<String>,
        label_name: impl Into<String>,
        rows: Vec<Vec<String>>,
        labels: Vec<String>,
    ) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(InfoBaseError::invalid_input(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != feature_names.len())
        {
            return Err(InfoBaseError::invalid_input(format!(
                "row {index} has {} values, expected {}",
                row.len(),
                feature_names.len()
            )));
        }

        Ok(Dataset {
            feature_names,
            label_name: label_name.into(),
            rows,
            labels,
        })
    }

    /// Build a dataset from string slices; convenient for tests and demos.
    pub fn from_strs(
        feature_names: &[&str],
        label_name: &str,
        rows: &[&[&str]],
        labels: &[&str],
    ) -> Result<Self> {
        Dataset::new(
            feature_names.iter().map(|name| name.to_string()).collect(),
            label_name,
            rows.iter()
                .map(|row| row.iter().map(|value| value.to_string()).collect())
                .collect(),
            labels.iter().map(|label| label.to_string()).collect(),
        )
    }

    /// Feature column names.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Label column name.
    pub fn label_name(&self) -> &str {
        &self.label_name
    }

    /// Number of feature columns.
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Feature rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Labels, parallel to [`Dataset::rows`].
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Iterate over `(features, label)` pairs.
    pub fn records(&self) -> impl Iterator<Item = (&[String], &str)> {
        self.rows
            .iter()
            .zip(self.labels.iter())
            .map(|(row, label)| (row.as_slice(), label.as_str()))
    }

    /// Infer column types; the label column is appended last as nominal.
    pub fn infer_columns<F>(&self, is_missing: F) -> Vec<Column>
    where
        F: Fn(&str) -> bool,
    {
        let mut columns: Vec<Column> = self
            .feature_names
            .iter()
            .enumerate()
            .map(|(index, name)| Column {
                name: name.clone(),
                column_type: ColumnType::infer(
                    self.rows.iter().map(|row| row[index].as_str()),
                    &is_missing,
                ),
            })
            .collect();

        columns.push(Column {
            name: self.label_name.clone(),
            column_type: ColumnType::Nominal,
        });
        columns
    }
}
