//! Pagination engine: packs variable-height content blocks into fixed-height pages.
//!
//! Heights are expressed in page-local units. A page is `max_page_height` units
//! tall; the renderer maps units to points with a single uniform scale, so the
//! estimates made here are exactly what gets drawn.

mod block;
mod budget;
mod estimate;
mod paginate;
mod photo_grid;
mod table;

use serde::Deserialize;

pub use block::{
    BlockKind, Chart, ContentSection, EmptyState, Field, ParameterTable, PanelKind, PhotoGrid,
    PhotoRef, Series, TableKind, TextPanel,
};
pub use budget::PageBudget;
pub use estimate::estimate_height;
pub use paginate::{Block, Page, PlacedBlock, paginate};
pub use photo_grid::{GridLayout, layout as photo_grid_layout};
pub use table::{Split, TableSlice, slice_height, split};

/// Header and row height of one table kind.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct TableMetrics {
    pub header: f32,
    pub row: f32,
}

impl TableMetrics {
    const fn new(header: f32, row: f32) -> Self {
        Self { header, row }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PanelHeights {
    pub cover: f32,
    pub part_details: f32,
    pub general_parameters: f32,
    pub load: f32,
    pub quench: f32,
    pub result_header: f32,
    pub sample_header: f32,
    pub specification: f32,
    pub note: f32,
}

impl Default for PanelHeights {
    fn default() -> Self {
        Self {
            cover: 560.0,
            part_details: 250.0,
            general_parameters: 200.0,
            load: 220.0,
            quench: 200.0,
            result_header: 100.0,
            sample_header: 80.0,
            specification: 150.0,
            note: 150.0,
        }
    }
}

impl PanelHeights {
    pub fn get(&self, kind: PanelKind) -> f32 {
        match kind {
            PanelKind::Cover => self.cover,
            PanelKind::PartDetails => self.part_details,
            PanelKind::GeneralParameters => self.general_parameters,
            PanelKind::Load => self.load,
            PanelKind::Quench => self.quench,
            PanelKind::ResultHeader => self.result_header,
            PanelKind::SampleHeader => self.sample_header,
            PanelKind::Specification => self.specification,
            PanelKind::Note => self.note,
        }
    }
}

/// Thermal and chemical rows differ because their column counts differ.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TableHeights {
    pub thermal_cycle: TableMetrics,
    pub chemical_cycle: TableMetrics,
    pub quench_parameters: TableMetrics,
    pub hardness: TableMetrics,
    pub generic: TableMetrics,
}

impl Default for TableHeights {
    fn default() -> Self {
        Self {
            thermal_cycle: TableMetrics::new(120.0, 35.0),
            chemical_cycle: TableMetrics::new(120.0, 40.0),
            quench_parameters: TableMetrics::new(100.0, 30.0),
            hardness: TableMetrics::new(90.0, 28.0),
            generic: TableMetrics::new(90.0, 30.0),
        }
    }
}

impl TableHeights {
    pub fn get(&self, kind: TableKind) -> TableMetrics {
        match kind {
            TableKind::ThermalCycle => self.thermal_cycle,
            TableKind::ChemicalCycle => self.chemical_cycle,
            TableKind::QuenchParameters => self.quench_parameters,
            TableKind::Hardness => self.hardness,
            TableKind::Generic => self.generic,
        }
    }
}

/// Per-kind height constants consumed by the estimator.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeightConstants {
    pub panels: PanelHeights,
    /// Added to a panel only when its comment is non-empty.
    pub comment_increment: f32,
    pub tables: TableHeights,
    pub summary_row: f32,
    pub photo_grid_header: f32,
    pub photo_row_padding: f32,
    pub chart: f32,
    pub empty_state: f32,
}

impl Default for HeightConstants {
    fn default() -> Self {
        Self {
            panels: PanelHeights::default(),
            comment_increment: 120.0,
            tables: TableHeights::default(),
            summary_row: 35.0,
            photo_grid_header: 100.0,
            photo_row_padding: 20.0,
            chart: 500.0,
            empty_state: 200.0,
        }
    }
}

/// Page geometry and packing rules for one pagination run.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub max_page_height: f32,
    pub header_overhead: f32,
    pub footer_overhead: f32,
    /// Gap charged between two blocks on the same page (not before the first).
    pub block_spacing: f32,
    pub max_photos_per_page: usize,
    pub min_rows_to_split: usize,
    pub heights: HeightConstants,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_page_height: 800.0,
            header_overhead: 120.0,
            footer_overhead: 60.0,
            block_spacing: 30.0,
            max_photos_per_page: 6,
            min_rows_to_split: 2,
            heights: HeightConstants::default(),
        }
    }
}

impl LayoutConfig {
    /// Height left for content once the page header and footer are drawn.
    pub fn available_height(&self) -> f32 {
        (self.max_page_height - self.header_overhead - self.footer_overhead).max(0.0)
    }
}
