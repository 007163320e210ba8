use anyhow::Result;
use arrow::array::Array;
use arrow::record_batch::RecordBatch;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::chart;
use crate::ingest::{self, date};
use crate::summary::{self, Summary, PRODUCT_COLUMN, REGION_COLUMN, SALES_COLUMN};

pub const PRODUCT_CHART: &str = "product_sales.png";
pub const REGION_CHART: &str = "region_sales.png";
pub const MONTHLY_CHART: &str = "monthly_sales.png";

const PREVIEW_ROWS: usize = 5;

/// What a report run produced: each summary (possibly empty) and the chart
/// files actually written.
#[derive(Debug, Default)]
pub struct ReportOutcome {
    pub product: Summary,
    pub region: Summary,
    pub monthly: Summary,
    pub charts: Vec<PathBuf>,
}

/// Run the full pipeline: load the CSV, derive months, print the summaries,
/// and render one chart per non-empty summary into `out_dir`.
///
/// A missing input file is fatal; missing data columns only degrade the
/// output (empty summary, no chart, console notice).
pub fn run(csv_path: &Path, out_dir: &Path) -> Result<ReportOutcome> {
    let batch = ingest::load_csv(csv_path)?;
    println!(
        "First {} rows:\n{}",
        PREVIEW_ROWS,
        ingest::head(&batch, PREVIEW_ROWS)
    );

    let batch = date::derive_month_column(&batch)?;
    let have_sales = ingest::column_index(&batch, SALES_COLUMN).is_some();

    let product = if ingest::column_index(&batch, PRODUCT_COLUMN).is_some() && have_sales {
        let s = summary::sum_by(&batch, PRODUCT_COLUMN, SALES_COLUMN)?;
        println!("Sales by Product:\n{}", s);
        s
    } else {
        println!("Product or Sales column missing.");
        Summary::new()
    };

    let region = if ingest::column_index(&batch, REGION_COLUMN).is_some() && have_sales {
        let s = summary::sum_by(&batch, REGION_COLUMN, SALES_COLUMN)?;
        println!("Sales by Region:\n{}", s);
        s
    } else {
        println!("Region or Sales column missing.");
        Summary::new()
    };

    let monthly = if have_sales && month_has_values(&batch)? {
        let s = summary::sum_by(&batch, date::MONTH_COLUMN, SALES_COLUMN)?;
        println!("Monthly Sales:\n{}", s);
        s
    } else {
        debug!("no usable month values, skipping monthly summary");
        Summary::new()
    };

    let mut charts = Vec::new();
    if !product.is_empty() {
        let path = out_dir.join(PRODUCT_CHART);
        chart::render_bar_chart(&product, "Sales by Product", "Sales", &path)?;
        charts.push(path);
    }
    if !region.is_empty() {
        let path = out_dir.join(REGION_CHART);
        chart::render_pie_chart(&region, "Sales by Region", &path)?;
        charts.push(path);
    }
    if !monthly.is_empty() {
        let path = out_dir.join(MONTHLY_CHART);
        chart::render_line_chart(&monthly, "Monthly Sales Trend", "Month", "Sales", &path)?;
        charts.push(path);
    }

    println!(
        "Plots saved ({}, {}, {} if available).",
        PRODUCT_CHART, REGION_CHART, MONTHLY_CHART
    );
    info!(charts = charts.len(), "report complete");

    Ok(ReportOutcome {
        product,
        region,
        monthly,
        charts,
    })
}

/// True when the derived `Month` column holds at least one non-null value.
fn month_has_values(batch: &RecordBatch) -> Result<bool> {
    match ingest::column_index(batch, date::MONTH_COLUMN) {
        Some(idx) => {
            let months = ingest::utf8_column(batch, idx)?;
            Ok(months.null_count() < months.len())
        }
        None => Ok(false),
    }
}
