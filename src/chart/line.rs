use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::chart::padded_range;
use crate::summary::Summary;

const SIZE: (u32, u32) = (1200, 600);
const LINE_COLOR: RGBColor = RGBColor(15, 97, 199);

/// Line chart of a summary with point markers, keys along the x-axis.
pub fn render_line_chart(
    summary: &Summary,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    path: &Path,
) -> Result<()> {
    if summary.is_empty() {
        bail!("cannot render line chart from an empty summary");
    }
    let labels = summary.labels();
    let values = summary.values();
    let (y_min, y_max) = padded_range(&values);
    let x_max = labels.len().saturating_sub(1).max(1);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0..x_max, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(labels.len().min(12).max(1))
        .x_label_formatter(&|x| labels.get(*x).cloned().unwrap_or_default())
        .draw()?;

    chart.draw_series(LineSeries::new(
        values.iter().enumerate().map(|(i, &v)| (i, v)),
        ShapeStyle::from(&LINE_COLOR).stroke_width(3),
    ))?;
    chart.draw_series(
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| Circle::new((i, v), 5, LINE_COLOR.filled())),
    )?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "line chart saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn renders_png_for_non_empty_summary() {
        let mut summary = Summary::new();
        summary.add("2024-01".into(), 350.0);
        summary.add("2024-02".into(), 200.0);
        summary.add("2024-03".into(), 410.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("monthly_sales.png");
        render_line_chart(&summary, "Monthly Sales Trend", "Month", "Sales", &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn single_point_still_renders() {
        let mut summary = Summary::new();
        summary.add("2024-01".into(), 350.0);

        let dir = tempdir().unwrap();
        let path = dir.path().join("monthly_sales.png");
        render_line_chart(&summary, "Monthly Sales Trend", "Month", "Sales", &path).unwrap();
        assert!(path.exists());
    }
}
