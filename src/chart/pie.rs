use anyhow::{bail, Context, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

use crate::summary::Summary;

const SIZE: (u32, u32) = (800, 800);

const SLICE_COLORS: &[RGBColor] = &[
    RGBColor(66, 133, 244),
    RGBColor(219, 68, 55),
    RGBColor(244, 180, 0),
    RGBColor(15, 157, 88),
    RGBColor(171, 71, 188),
    RGBColor(255, 112, 67),
    RGBColor(0, 172, 193),
    RGBColor(158, 157, 36),
];

/// Pie chart of a summary with per-slice percentage labels.
pub fn render_pie_chart(summary: &Summary, title: &str, path: &Path) -> Result<()> {
    if summary.is_empty() {
        bail!("cannot render pie chart from an empty summary");
    }
    let sizes = summary.values();
    if summary.total() <= 0.0 {
        bail!("cannot render pie chart with a non-positive total");
    }
    let labels = summary.labels();
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|i| SLICE_COLORS[i % SLICE_COLORS.len()])
        .collect();

    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled(title, ("sans-serif", 36))?;

    let (w, h) = root.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 22).into_font());
    pie.percentages(("sans-serif", 18).into_font().color(&BLACK));
    root.draw(&pie)?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "pie chart saved");
    Ok(())
}
