use std::ops::Range;

use super::block::ParameterTable;
use super::{HeightConstants, LayoutConfig};

/// Half-open row range `[start, end)` of a table with `total` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableSlice {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl TableSlice {
    pub fn new(start: usize, end: usize, total: usize) -> Self {
        debug_assert!(start <= end && end <= total);
        Self { start, end, total }
    }

    pub fn whole(total: usize) -> Self {
        Self::new(0, total, total)
    }

    pub fn is_continuation(&self) -> bool {
        self.start > 0
    }

    /// More rows remain for a later page.
    pub fn is_partial(&self) -> bool {
        self.end < self.total
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Totals are only meaningful once every row is visible.
    pub fn carries_summary(&self) -> bool {
        !self.is_partial()
    }

    pub fn rows<'t>(&self, table: &'t ParameterTable) -> &'t [Vec<String>] {
        &table.rows[self.range()]
    }
}

/// Outcome of fitting a table against a height budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Split {
    /// Rows to place on the current page; empty means "start a fresh page".
    pub fitting: TableSlice,
    pub remainder: Option<TableSlice>,
}

impl Split {
    fn whole(start: usize, total: usize) -> Self {
        Self {
            fitting: TableSlice::new(start, total, total),
            remainder: None,
        }
    }

    fn deferred(start: usize, total: usize) -> Self {
        Self {
            fitting: TableSlice::new(start, start, total),
            remainder: Some(TableSlice::new(start, total, total)),
        }
    }

    fn at(start: usize, cut: usize, total: usize) -> Self {
        Self {
            fitting: TableSlice::new(start, cut, total),
            remainder: Some(TableSlice::new(cut, total, total)),
        }
    }
}

/// Height of a slice: repeated column header, its rows, and the summary row
/// when the slice is the final one of a table that has a summary.
pub fn slice_height(table: &ParameterTable, slice: &TableSlice, heights: &HeightConstants) -> f32 {
    let metrics = heights.tables.get(table.kind);
    let summary = if table.summary.is_some() && slice.carries_summary() {
        heights.summary_row
    } else {
        0.0
    };
    metrics.header + slice.len() as f32 * metrics.row + summary
}

fn rows_fitting(height: f32, row_h: f32, cap: usize) -> usize {
    if row_h <= 0.0 {
        return cap;
    }
    if height <= 0.0 {
        return 0;
    }
    ((height / row_h).floor() as usize).min(cap)
}

/// Fit the rows of `table` starting at `start` into `available` height.
///
/// On a page that already holds other blocks, fewer than `min_rows_to_split`
/// fitting rows defer the whole remainder to a fresh page. On an otherwise
/// empty page at least one row is always taken, so callers that retry on a
/// fresh page always make progress. When a split would leave a remainder
/// shorter than `min_rows_to_split`, rows move from the fitting slice to the
/// remainder as long as the fitting slice keeps its own minimum.
pub fn split(
    table: &ParameterTable,
    start: usize,
    available: f32,
    page_has_blocks: bool,
    config: &LayoutConfig,
) -> Split {
    let total = table.rows.len();
    let start = start.min(total);
    let remaining = total - start;
    let rest = TableSlice::new(start, total, total);

    if remaining == 0 || slice_height(table, &rest, &config.heights) <= available {
        return Split::whole(start, total);
    }

    let metrics = config.heights.tables.get(table.kind);
    let min_rows = config.min_rows_to_split.max(1);

    // The slice is partial from here on, so no summary row is reserved.
    let mut take = rows_fitting(available - metrics.header, metrics.row, remaining - 1);

    if page_has_blocks {
        if take < min_rows {
            return Split::deferred(start, total);
        }
    } else if take == 0 {
        // Oversize: nothing fits even on an empty page.
        if remaining == 1 {
            return Split::whole(start, total);
        }
        take = 1;
    }

    if remaining - take < min_rows {
        let floor = if page_has_blocks { min_rows } else { 1 };
        let balanced = remaining.saturating_sub(min_rows);
        if balanced >= floor {
            take = balanced;
        }
    }

    Split::at(start, start + take, total)
}
