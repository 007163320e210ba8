use anyhow::{anyhow, Result};
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use std::collections::BTreeMap;
use std::fmt;

use crate::ingest::{clean_str, column_index, utf8_column};

pub const PRODUCT_COLUMN: &str = "Product";
pub const REGION_COLUMN: &str = "Region";
pub const SALES_COLUMN: &str = "Sales";

/// Sorted mapping from a group key to its summed sales.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    entries: BTreeMap<String, f64>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `value` to the running sum for `key`.
    pub fn add(&mut self, key: String, value: f64) {
        *self.entries.entry(key).or_insert(0.0) += value;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Sum over all group values.
    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Group keys in sorted order.
    pub fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Summed values, ordered to match `labels()`.
    pub fn values(&self) -> Vec<f64> {
        self.entries.values().copied().collect()
    }

    pub fn max_value(&self) -> f64 {
        self.entries.values().fold(0.0_f64, |acc, &v| acc.max(v))
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.keys().map(String::len).max().unwrap_or(0);
        for (key, value) in &self.entries {
            writeln!(f, "{:<width$}  {}", key, value, width = width)?;
        }
        Ok(())
    }
}

/// Sum `value_col` grouped by the distinct values of `group_col`.
///
/// Rows with a null or empty group key are excluded. A key whose every value
/// is null or unparsable still appears, summing to zero.
pub fn sum_by(batch: &RecordBatch, group_col: &str, value_col: &str) -> Result<Summary> {
    let group_idx = column_index(batch, group_col)
        .ok_or_else(|| anyhow!("missing column '{}'", group_col))?;
    let value_idx = column_index(batch, value_col)
        .ok_or_else(|| anyhow!("missing column '{}'", value_col))?;

    let groups = utf8_column(batch, group_idx)?;
    let values = utf8_column(batch, value_idx)?;

    let mut summary = Summary::new();
    for row in 0..batch.num_rows() {
        if groups.is_null(row) {
            continue;
        }
        let key = clean_str(groups.value(row));
        if key.is_empty() {
            continue;
        }

        let value = if values.is_null(row) {
            None
        } else {
            clean_str(values.value(row)).parse::<f64>().ok()
        };
        summary.add(key, value.unwrap_or(0.0));
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_csv;
    use std::fs;
    use tempfile::tempdir;

    fn batch_from(contents: &str) -> RecordBatch {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales_data.csv");
        fs::write(&path, contents).unwrap();
        load_csv(&path).unwrap()
    }

    #[test]
    fn sums_by_distinct_key() {
        let batch = batch_from(
            "Product,Sales\nAlpha,100\nBeta,250\nAlpha,150\nGamma,50\n",
        );
        let summary = sum_by(&batch, "Product", "Sales").unwrap();

        assert_eq!(summary.len(), 3);
        assert_eq!(summary.get("Alpha"), Some(250.0));
        assert_eq!(summary.get("Beta"), Some(250.0));
        assert_eq!(summary.get("Gamma"), Some(50.0));
        assert_eq!(summary.total(), 550.0);
    }

    #[test]
    fn labels_are_sorted() {
        let batch = batch_from("Product,Sales\nZeta,1\nAlpha,2\nMid,3\n");
        let summary = sum_by(&batch, "Product", "Sales").unwrap();
        assert_eq!(summary.labels(), vec!["Alpha", "Mid", "Zeta"]);
        assert_eq!(summary.values(), vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn empty_keys_are_excluded() {
        let batch = batch_from("Product,Sales\nAlpha,100\n,250\nAlpha,50\n");
        let summary = sum_by(&batch, "Product", "Sales").unwrap();

        assert_eq!(summary.len(), 1);
        assert_eq!(summary.get("Alpha"), Some(150.0));
    }

    #[test]
    fn unparsable_values_contribute_zero_but_keep_the_key() {
        let batch = batch_from("Product,Sales\nAlpha,abc\nBeta,10\n");
        let summary = sum_by(&batch, "Product", "Sales").unwrap();

        assert_eq!(summary.get("Alpha"), Some(0.0));
        assert_eq!(summary.get("Beta"), Some(10.0));
    }

    #[test]
    fn missing_column_is_an_error() {
        let batch = batch_from("Product,Sales\nAlpha,100\n");
        let err = sum_by(&batch, "Region", "Sales").unwrap_err();
        assert!(err.to_string().contains("Region"));
    }

    #[test]
    fn display_lists_keys_and_sums() {
        let batch = batch_from("Product,Sales\nAlpha,100\nBeta,250\n");
        let summary = sum_by(&batch, "Product", "Sales").unwrap();
        let text = summary.to_string();
        assert!(text.contains("Alpha"));
        assert!(text.contains("100"));
        assert!(text.contains("Beta"));
        assert!(text.contains("250"));
    }
}
