use super::LayoutConfig;
use super::block::{ContentSection, ParameterTable, PhotoGrid, PhotoRef};
use super::budget::PageBudget;
use super::estimate::{estimate_height, photo_group_height};
use super::table::{TableSlice, slice_height, split};

/// What a page slot holds. Borrows from the sections passed to [`paginate`].
#[derive(Clone, Debug, PartialEq)]
pub enum Block<'a> {
    /// A text panel, chart or empty state placed whole.
    Section(&'a ContentSection),
    TableSlice {
        table: &'a ParameterTable,
        slice: TableSlice,
    },
    /// Photos `part` of `parts` of a grid, count-split by the per-page maximum.
    PhotoGroup {
        grid: &'a PhotoGrid,
        photos: &'a [PhotoRef],
        part: usize,
        parts: usize,
    },
    /// Placeholder used when the whole input had nothing to show.
    EmptyState,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock<'a> {
    pub block: Block<'a>,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page<'a> {
    pub index: usize,
    /// Only known once the whole run has completed.
    pub total_pages: usize,
    pub blocks: Vec<PlacedBlock<'a>>,
    pub used_height: f32,
    pub available_height: f32,
}

impl Page<'_> {
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total_pages
    }

    /// A page may only exceed its budget when it holds a single block that
    /// alone is taller than the page.
    pub fn is_oversize(&self) -> bool {
        self.used_height > self.available_height
    }
}

struct Paginator<'a, 'c> {
    config: &'c LayoutConfig,
    pages: Vec<Page<'a>>,
    current: Vec<PlacedBlock<'a>>,
    budget: PageBudget,
}

impl<'a, 'c> Paginator<'a, 'c> {
    fn new(config: &'c LayoutConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Vec::new(),
            budget: PageBudget::new(config),
        }
    }

    fn close_page(&mut self) {
        if self.current.is_empty() {
            return;
        }
        log::debug!(
            "close page {}: {} blocks, used {:.1}/{:.1}",
            self.pages.len(),
            self.current.len(),
            self.budget.used(),
            self.budget.available(),
        );
        self.pages.push(Page {
            index: self.pages.len(),
            total_pages: 0,
            blocks: std::mem::take(&mut self.current),
            used_height: self.budget.used(),
            available_height: self.budget.available(),
        });
        self.budget = PageBudget::new(self.config);
    }

    fn push(&mut self, block: Block<'a>, height: f32) {
        self.budget.place(height, self.config.block_spacing);
        self.current.push(PlacedBlock { block, height });
    }

    /// Whole-block placement; an oversize block gets a page of its own.
    fn place(&mut self, block: Block<'a>, height: f32) {
        if !self.budget.would_fit(height, self.config.block_spacing) {
            self.close_page();
        }
        if height > self.budget.available() {
            log::debug!(
                "oversize block on page {}: {:.1} > {:.1}",
                self.pages.len(),
                height,
                self.budget.available()
            );
        }
        self.push(block, height);
    }

    fn place_table(&mut self, table: &'a ParameterTable) {
        let total = table.rows.len();
        let mut start = 0;
        while start < total {
            let page_has_blocks = !self.budget.is_empty();
            let available = self.budget.remaining_for_next(self.config.block_spacing);
            let outcome = split(table, start, available, page_has_blocks, self.config);

            if outcome.fitting.is_empty() {
                // split() always takes a row on an empty page, so this only
                // happens with other blocks present and cannot repeat.
                debug_assert!(page_has_blocks);
                log::debug!(
                    "defer table '{}' rows {}..{} to a new page",
                    table.title,
                    start,
                    total
                );
                self.close_page();
                continue;
            }

            let height = slice_height(table, &outcome.fitting, &self.config.heights);
            log::debug!(
                "table '{}' rows {}..{} of {} on page {} ({:.1})",
                table.title,
                outcome.fitting.start,
                outcome.fitting.end,
                total,
                self.pages.len(),
                height
            );
            self.push(
                Block::TableSlice {
                    table,
                    slice: outcome.fitting,
                },
                height,
            );

            match outcome.remainder {
                Some(rest) => {
                    self.close_page();
                    start = rest.start;
                }
                None => break,
            }
        }
    }

    fn place_photos(&mut self, grid: &'a PhotoGrid) {
        let per_group = self.config.max_photos_per_page.max(1);
        let parts = grid.photos.len().div_ceil(per_group);
        for (part, photos) in grid.photos.chunks(per_group).enumerate() {
            let height = photo_group_height(photos.len(), &self.config.heights);
            self.place(
                Block::PhotoGroup {
                    grid,
                    photos,
                    part,
                    parts,
                },
                height,
            );
        }
    }

    fn finish(mut self) -> Vec<Page<'a>> {
        self.close_page();
        if self.pages.is_empty() {
            let height = self.config.heights.empty_state;
            self.push(Block::EmptyState, height);
            self.close_page();
        }
        let total = self.pages.len();
        for page in &mut self.pages {
            page.total_pages = total;
        }
        self.pages
    }
}

/// Greedy single-pass packing of `sections` into pages, in input order.
///
/// Blocks with an estimated height of zero are dropped. Tables are split
/// across pages, photo grids are count-split by `max_photos_per_page`, and a
/// block taller than a page is placed alone on its own page. The result
/// always holds at least one page and depends only on the arguments.
pub fn paginate<'a>(sections: &'a [ContentSection], config: &LayoutConfig) -> Vec<Page<'a>> {
    let mut paginator = Paginator::new(config);

    for section in sections {
        let height = estimate_height(section, &config.heights);
        if height <= 0.0 {
            log::debug!("skip empty {:?} '{}'", section.kind(), section.title());
            continue;
        }
        match section {
            ContentSection::ParameterTable(table) => paginator.place_table(table),
            ContentSection::PhotoGrid(grid) => paginator.place_photos(grid),
            _ => paginator.place(Block::Section(section), height),
        }
    }

    paginator.finish()
}
