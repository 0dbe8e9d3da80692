//! CSV dataset reader.
//!
//! The first row is the header. Every value is kept as text:
//! ```csv
//! outlook,temperature,windy,play
//! sunny,85,FALSE,no
//! overcast,83,FALSE,yes
//! ```

use std::fs::File;
use std::io::Read;
use std::path::Path;

use ::csv::{ReaderBuilder, Trim};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{InfoBaseError, Result};

/// Which column holds the label.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelColumn {
    /// The last column.
    #[default]
    Last,
    /// A column selected by header name.
    Named(String),
    /// A column selected by zero-based position.
    Index(usize),
}

impl LabelColumn {
    fn resolve(&self, headers: &[String]) -> Result<usize> {
        match self {
            LabelColumn::Last => headers
                .len()
                .checked_sub(1)
                .ok_or_else(|| InfoBaseError::parse("CSV header is empty")),
            LabelColumn::Named(name) => headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| {
                    InfoBaseError::invalid_input(format!("label column {name:?} not in header"))
                }),
            LabelColumn::Index(index) if *index < headers.len() => Ok(*index),
            LabelColumn::Index(index) => Err(InfoBaseError::invalid_input(format!(
                "label column {index} out of range for {} columns",
                headers.len()
            ))),
        }
    }
}

/// Reads a labeled [`Dataset`] from CSV text.
#[derive(Debug, Clone)]
pub struct CsvDatasetReader {
    /// CSV delimiter character (default: ',')
    delimiter: u8,
    /// Label column selection (default: last column)
    label_column: LabelColumn,
    /// Whether to trim whitespace from fields
    trim: bool,
}

impl Default for CsvDatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvDatasetReader {
    /// Create a reader with comma delimiter and the label in the last column.
    pub fn new() -> Self {
        CsvDatasetReader {
            delimiter: b',',
            label_column: LabelColumn::Last,
            trim: false,
        }
    }

    /// Set a custom delimiter character.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set the label column.
    pub fn with_label_column(mut self, label_column: LabelColumn) -> Self {
        self.label_column = label_column;
        self
    }

    /// Set whether to trim whitespace from fields.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Read a dataset from a file.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<Dataset> {
        let path = path.as_ref();
        debug!("Reading dataset from {}", path.display());
        let file = File::open(path)?;
        self.read(file)
    }

    /// Read a dataset from in-memory CSV text.
    pub fn read_str(&self, input: &str) -> Result<Dataset> {
        self.read(input.as_bytes())
    }

    /// Read a dataset from any reader.
    pub fn read<R: Read>(&self, input: R) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(if self.trim { Trim::All } else { Trim::None })
            .has_headers(true)
            .flexible(false)
            .from_reader(input);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| InfoBaseError::parse(format!("Failed to read CSV headers: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(InfoBaseError::parse("CSV header is empty"));
        }

        let label_index = self.label_column.resolve(&headers)?;
        let label_name = headers[label_index].clone();
        let feature_names: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != label_index)
            .map(|(_, name)| name.clone())
            .collect();

        let mut rows = Vec::new();
        let mut labels = Vec::new();

        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                InfoBaseError::parse(format!("Failed to read CSV record {}: {e}", line + 1))
            })?;

            let mut row = Vec::with_capacity(feature_names.len());
            for (index, value) in record.iter().enumerate() {
                if index == label_index {
                    labels.push(value.to_string());
                } else {
                    row.push(value.to_string());
                }
            }
            rows.push(row);
        }

        debug!(
            "Read {} rows with {} features, label column {:?}",
            rows.len(),
            feature_names.len(),
            label_name
        );

        Dataset::new(feature_names, label_name, rows, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER: &str = "outlook,temperature,windy,play\n\
                           sunny,85,FALSE,no\n\
                           overcast,83,FALSE,yes\n\
                           rainy,70,TRUE,no\n";

    #[test]
    fn test_read_label_last() {
        let dataset = CsvDatasetReader::new().read_str(WEATHER).unwrap();

        assert_eq!(dataset.feature_names(), &["outlook", "temperature", "windy"]);
        assert_eq!(dataset.label_name(), "play");
        assert_eq!(dataset.row_count(), 3);
        assert_eq!(dataset.rows()[1], vec!["overcast", "83", "FALSE"]);
        assert_eq!(dataset.labels(), &["no", "yes", "no"]);
    }

    #[test]
    fn test_read_named_label() {
        let dataset = CsvDatasetReader::new()
            .with_label_column(LabelColumn::Named("outlook".to_string()))
            .read_str(WEATHER)
            .unwrap();

        assert_eq!(dataset.feature_names(), &["temperature", "windy", "play"]);
        assert_eq!(dataset.labels(), &["sunny", "overcast", "rainy"]);
        assert_eq!(dataset.rows()[2], vec!["70", "TRUE", "no"]);
    }

    #[test]
    fn test_missing_label_column() {
        let err = CsvDatasetReader::new()
            .with_label_column(LabelColumn::Named("humidity".to_string()))
            .read_str(WEATHER)
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = CsvDatasetReader::new()
            .with_label_column(LabelColumn::Index(4))
            .read_str(WEATHER)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = CsvDatasetReader::new()
            .read_str("a,b,class\n1,2,x\n3,y\n")
            .unwrap_err();
        assert!(matches!(err, InfoBaseError::Parse(_)));
    }

    #[test]
    fn test_delimiter_and_trim() {
        let dataset = CsvDatasetReader::new()
            .with_delimiter(b';')
            .with_trim(true)
            .read_str("color ; class\n red ; x\nblue;y\n")
            .unwrap();

        assert_eq!(dataset.feature_names(), &["color"]);
        assert_eq!(dataset.rows()[0], vec!["red"]);
        assert_eq!(dataset.labels(), &["x", "y"]);
    }

    #[test]
    fn test_values_kept_as_text() {
        let dataset = CsvDatasetReader::new()
            .read_str("size,class\n120,a\n120.0,b\n")
            .unwrap();
        assert_eq!(dataset.rows()[0][0], "120");
        assert_eq!(dataset.rows()[1][0], "120.0");
    }
}
