use crate::layout::{HeightConstants, ParameterTable, TableSlice};

use super::layout::{BLACK, Canvas, GREY, LIGHT, PALE, Rgb, WHITE};

const TITLE_SIZE: f32 = 11.0;
const CELL_SIZE: f32 = 9.0;
const CELL_PAD: f32 = 6.0;
const COLUMN_HEADER_H: f32 = 30.0;

/// Draw one slice of `table` in the box starting at `top`. The column header
/// is repeated on every slice; the summary row only closes the last one.
pub(super) fn render_table_slice(
    canvas: &mut Canvas,
    table: &ParameterTable,
    slice: &TableSlice,
    heights: &HeightConstants,
    accent: Rgb,
    x: f32,
    top: f32,
    width: f32,
) {
    let metrics = heights.tables.get(table.kind);
    let ncols = table.columns.len().max(1);
    let col_w = width / ncols as f32;

    let title = if slice.is_continuation() {
        format!("{} (continued)", table.title)
    } else {
        table.title.clone()
    };
    canvas.text(x, top + 8.0, TITLE_SIZE, true, BLACK, &title);
    if slice.is_partial() || slice.is_continuation() {
        let range = format!("Rows {}-{} of {}", slice.start + 1, slice.end, slice.total);
        canvas.text_right(x + width, top + 10.0, 8.0, false, GREY, &range);
    }

    // The column header sits at the bottom of the table header band.
    let header_top = top + (metrics.header - COLUMN_HEADER_H).max(TITLE_SIZE + 16.0);
    canvas.fill_rect(x, header_top, width, COLUMN_HEADER_H, accent);
    for (ci, column) in table.columns.iter().enumerate() {
        let cx = x + ci as f32 * col_w;
        let label = canvas.fit(column, col_w - 2.0 * CELL_PAD, CELL_SIZE, true);
        canvas.text(cx + CELL_PAD, header_top + 10.0, CELL_SIZE, true, WHITE, &label);
    }

    let mut row_top = top + metrics.header;
    for (ri, row) in slice.rows(table).iter().enumerate() {
        let shade = if (slice.start + ri) % 2 == 0 { WHITE } else { PALE };
        draw_row(canvas, row, shade, false, x, row_top, width, col_w, metrics.row);
        row_top += metrics.row;
    }

    if slice.carries_summary()
        && let Some(summary) = &table.summary
    {
        draw_row(canvas, summary, LIGHT, true, x, row_top, width, col_w, heights.summary_row);
        row_top += heights.summary_row;
    }

    canvas.stroke_rect(x, header_top, width, row_top - header_top, LIGHT, 0.8);
}

fn draw_row(
    canvas: &mut Canvas,
    cells: &[String],
    shade: Rgb,
    bold: bool,
    x: f32,
    top: f32,
    width: f32,
    col_w: f32,
    height: f32,
) {
    canvas.fill_rect(x, top, width, height, shade);
    canvas.line(x, top + height, x + width, top + height, LIGHT, 0.5);
    let text_top = top + (height - CELL_SIZE) / 2.0;
    for (ci, cell) in cells.iter().enumerate() {
        let cx = x + ci as f32 * col_w;
        let text = canvas.fit(cell, col_w - 2.0 * CELL_PAD, CELL_SIZE, bold);
        canvas.text(cx + CELL_PAD, text_top, CELL_SIZE, bold, BLACK, &text);
    }
}
