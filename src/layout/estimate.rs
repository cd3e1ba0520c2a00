use super::block::{BlockKind, ContentSection};
use super::photo_grid;
use super::table::{TableSlice, slice_height};
use super::HeightConstants;

type Estimator = fn(&ContentSection, &HeightConstants) -> f32;

/// One small pure function per block kind.
fn strategy(kind: BlockKind) -> Estimator {
    match kind {
        BlockKind::TextPanel => text_panel,
        BlockKind::ParameterTable => parameter_table,
        BlockKind::PhotoGrid => photo_grid,
        BlockKind::Chart => chart,
        BlockKind::EmptyState => empty_state,
    }
}

/// Estimated rendered height of a block in page-local units. Zero means the
/// block has no visible content and must not be placed.
pub fn estimate_height(section: &ContentSection, heights: &HeightConstants) -> f32 {
    strategy(section.kind())(section, heights)
}

fn text_panel(section: &ContentSection, heights: &HeightConstants) -> f32 {
    let ContentSection::TextPanel(panel) = section else {
        return 0.0;
    };
    let base = heights.panels.get(panel.kind);
    if panel.has_comment() {
        base + heights.comment_increment
    } else {
        base
    }
}

fn parameter_table(section: &ContentSection, heights: &HeightConstants) -> f32 {
    let ContentSection::ParameterTable(table) = section else {
        return 0.0;
    };
    if table.rows.is_empty() {
        return 0.0;
    }
    slice_height(table, &TableSlice::whole(table.rows.len()), heights)
}

fn photo_grid(section: &ContentSection, heights: &HeightConstants) -> f32 {
    let ContentSection::PhotoGrid(grid) = section else {
        return 0.0;
    };
    photo_group_height(grid.photos.len(), heights)
}

fn chart(section: &ContentSection, heights: &HeightConstants) -> f32 {
    match section {
        ContentSection::Chart(c) if c.has_data() => heights.chart,
        _ => 0.0,
    }
}

fn empty_state(_section: &ContentSection, heights: &HeightConstants) -> f32 {
    heights.empty_state
}

pub(super) fn photo_group_height(photo_count: usize, heights: &HeightConstants) -> f32 {
    if photo_count == 0 {
        return 0.0;
    }
    let grid = photo_grid::layout(photo_count);
    let row_h = grid.photo_height + heights.photo_row_padding;
    heights.photo_grid_header + grid.rows(photo_count) as f32 * row_h
}
