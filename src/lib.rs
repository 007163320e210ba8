//! Sales CSV report generator.
//!
//! Loads `sales_data.csv`, derives a `Month` column from `Date`, computes
//! grouped sales sums by product, region, and month, and renders one chart
//! image per non-empty summary.

pub mod chart;
pub mod ingest;
pub mod report;
pub mod summary;
