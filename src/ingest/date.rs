use anyhow::Result;
use arrow::{
    array::{ArrayRef, StringBuilder},
    datatypes::{DataType, Field, FieldRef, Schema},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::warn;

use crate::ingest::{clean_str, column_index, utf8_column};

pub const DATE_COLUMN: &str = "Date";
pub const MONTH_COLUMN: &str = "Month";

/// Accepted date cell formats, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Lenient parse of a date cell. Unrecognized values are `None`, never an error.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Year-month period bucket, e.g. `2024-03`.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

/// Append (or overwrite) a Utf8 `Month` column derived from `Date`.
///
/// Each parsable date becomes its `YYYY-MM` bucket; unparsable or missing
/// values become null. Without a `Date` column the whole column is null and
/// a warning is logged so the monthly aggregation can be skipped downstream.
pub fn derive_month_column(batch: &RecordBatch) -> Result<RecordBatch> {
    let rows = batch.num_rows();
    let mut builder = StringBuilder::new();

    match column_index(batch, DATE_COLUMN) {
        Some(idx) => {
            let dates = utf8_column(batch, idx)?;
            for opt in dates.iter() {
                let month = opt
                    .and_then(|s| parse_date(&clean_str(s)))
                    .map(month_key);
                builder.append_option(month);
            }
        }
        None => {
            warn!("'{}' column not found, continuing without date parsing", DATE_COLUMN);
            for _ in 0..rows {
                builder.append_null();
            }
        }
    }
    let months = Arc::new(builder.finish()) as ArrayRef;

    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    let mut columns = batch.columns().to_vec();
    let month_field = Arc::new(Field::new(MONTH_COLUMN, DataType::Utf8, true));

    match column_index(batch, MONTH_COLUMN) {
        Some(idx) => {
            fields[idx] = month_field;
            columns[idx] = months;
        }
        None => {
            fields.push(month_field);
            columns.push(months);
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::load_csv;
    use arrow::array::Array;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_supported_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(parse_date("2024-03-09"), Some(expected));
        assert_eq!(parse_date("2024/03/09"), Some(expected));
        assert_eq!(parse_date("03/09/2024"), Some(expected));
        assert_eq!(parse_date(" 2024-03-09 "), Some(expected));
    }

    #[test]
    fn rejects_garbage_dates() {
        assert_eq!(parse_date("not-a-date"), None);
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn month_key_is_year_dash_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(month_key(date), "2024-01");
    }

    #[test]
    fn derives_months_with_null_for_bad_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales_data.csv");
        fs::write(
            &path,
            "Date,Sales\n2024-01-05,100\nnot-a-date,250\n2024-02-03,150\n",
        )
        .unwrap();

        let batch = load_csv(&path).unwrap();
        let batch = derive_month_column(&batch).unwrap();

        let idx = column_index(&batch, MONTH_COLUMN).unwrap();
        let months = utf8_column(&batch, idx).unwrap();
        assert_eq!(months.value(0), "2024-01");
        assert!(months.is_null(1));
        assert_eq!(months.value(2), "2024-02");
    }

    #[test]
    fn missing_date_column_yields_all_null_months() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sales_data.csv");
        fs::write(&path, "Product,Sales\nAlpha,100\nBeta,250\n").unwrap();

        let batch = load_csv(&path).unwrap();
        let batch = derive_month_column(&batch).unwrap();

        let idx = column_index(&batch, MONTH_COLUMN).unwrap();
        let months = utf8_column(&batch, idx).unwrap();
        assert_eq!(months.len(), 2);
        assert_eq!(months.null_count(), 2);
    }
}
