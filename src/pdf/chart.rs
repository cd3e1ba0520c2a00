use crate::layout::Chart;
use crate::model::format_number;

use super::layout::{BLACK, Canvas, GREY, LIGHT};

const AXIS_SIZE: f32 = 8.0;
const LEGEND_ROW: f32 = 16.0;

/// Data bounds padded so flat series still get a visible range.
fn bounds(chart: &Chart) -> Option<(f32, f32, f32, f32)> {
    let mut points = chart.series.iter().flat_map(|s| s.points.iter());
    let &(x, y) = points.next()?;
    let (mut x0, mut x1, mut y0, mut y1) = (x, x, y, y);
    for &(x, y) in points {
        x0 = x0.min(x);
        x1 = x1.max(x);
        y0 = y0.min(y);
        y1 = y1.max(y);
    }
    if x1 - x0 <= f32::EPSILON {
        x1 = x0 + 1.0;
    }
    if y1 - y0 <= f32::EPSILON {
        y0 -= 1.0;
        y1 += 1.0;
    }
    let pad = (y1 - y0) * 0.05;
    Some((x0, x1, y0 - pad, y1 + pad))
}

/// Line chart with labelled axes and a legend below the plot area.
pub(super) fn render_chart(canvas: &mut Canvas, chart: &Chart, x: f32, top: f32, width: f32, height: f32) {
    canvas.text(x, top + 8.0, 11.0, true, BLACK, &chart.title);

    let legend_rows = chart.series.len().div_ceil(3) as f32;
    let plot_left = x + 50.0;
    let plot_top = top + 34.0;
    let plot_w = width - 60.0;
    let plot_h = height - 34.0 - 40.0 - legend_rows * LEGEND_ROW;

    let Some((x0, x1, y0, y1)) = bounds(chart) else {
        return;
    };
    let px = |v: f32| plot_left + (v - x0) / (x1 - x0) * plot_w;
    let py = |v: f32| plot_top + plot_h - (v - y0) / (y1 - y0) * plot_h;

    const TICKS: usize = 4;
    for i in 0..=TICKS {
        let t = i as f32 / TICKS as f32;
        let gy = plot_top + plot_h * (1.0 - t);
        canvas.line(plot_left, gy, plot_left + plot_w, gy, LIGHT, 0.5);
        let label = format_number((y0 + (y1 - y0) * t) as f64);
        canvas.text_right(plot_left - 4.0, gy - AXIS_SIZE / 2.0, AXIS_SIZE, false, GREY, &label);

        let gx = plot_left + plot_w * t;
        let label = format_number((x0 + (x1 - x0) * t) as f64);
        canvas.text_centered(gx, plot_top + plot_h + 4.0, AXIS_SIZE, false, GREY, &label);
    }
    canvas.stroke_rect(plot_left, plot_top, plot_w, plot_h, GREY, 0.8);

    canvas.text_centered(
        plot_left + plot_w / 2.0,
        plot_top + plot_h + 16.0,
        AXIS_SIZE,
        true,
        GREY,
        &chart.x_label,
    );
    canvas.text(x, top + 22.0, AXIS_SIZE, true, GREY, &chart.y_label);

    for series in &chart.series {
        let points: Vec<(f32, f32)> = series.points.iter().map(|&(vx, vy)| (px(vx), py(vy))).collect();
        canvas.polyline(&points, series.color, 1.5);
    }

    let legend_top = plot_top + plot_h + 32.0;
    let slot = width / 3.0;
    for (i, series) in chart.series.iter().enumerate() {
        let lx = x + (i % 3) as f32 * slot;
        let ly = legend_top + (i / 3) as f32 * LEGEND_ROW;
        canvas.fill_rect(lx, ly + 2.0, 14.0, 4.0, series.color);
        let label = canvas.fit(&series.label, slot - 24.0, AXIS_SIZE, false);
        canvas.text(lx + 20.0, ly, AXIS_SIZE, false, BLACK, &label);
    }
}
