use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::summary::Summary;

const SIZE: (u32, u32) = (1000, 600);
const BAR_COLOR: RGBColor = RGBColor(66, 133, 244);

/// Vertical bar chart of a summary, one segment per group key.
pub fn render_bar_chart(summary: &Summary, title: &str, y_desc: &str, path: &Path) -> Result<()> {
    if summary.is_empty() {
        bail!("cannot render bar chart from an empty summary");
    }
    let labels = summary.labels();
    let values = summary.values();
    let y_max = (summary.max_value() * 1.1).max(1.0);

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(labels.len().max(1))
        .x_label_formatter(&|seg| match seg {
            SegmentValue::CenterOf(i) if *i < labels.len() => labels[*i].clone(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), v)],
            BAR_COLOR.filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "bar chart saved");
    Ok(())
}
