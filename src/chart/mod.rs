pub mod bar;
pub mod line;
pub mod pie;

pub use bar::render_bar_chart;
pub use line::render_line_chart;
pub use pie::render_pie_chart;

/// Y-axis range with headroom so lines and bars never touch the frame.
/// Clamped at zero below; sales are non-negative in practice.
pub(crate) fn padded_range(values: &[f64]) -> (f64, f64) {
    let max = values.iter().fold(f64::MIN, |a, &b| a.max(b));
    let min = values.iter().fold(f64::MAX, |a, &b| a.min(b));
    if !max.is_finite() || !min.is_finite() {
        return (0.0, 1.0);
    }

    let padding = ((max - min) * 0.1).max(1.0);
    ((min - padding).max(0.0), max + padding)
}
