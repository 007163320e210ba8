use anyhow::Result;
use sales_report::report;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

/// Input is expected in the working directory; use a full path if elsewhere.
const CSV_PATH: &str = "sales_data.csv";

fn main() -> Result<()> {
    // ─── init logging ────────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── run the report pipeline ─────────────────────────────────────
    report::run(Path::new(CSV_PATH), Path::new("."))?;
    Ok(())
}
