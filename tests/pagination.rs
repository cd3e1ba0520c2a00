mod common;

use rayon::prelude::*;

use common::{chart, config, config_with_available, grid, panel, table, table_data};
use trial_report_pdf::layout::{
    Block, ContentSection, EmptyState, LayoutConfig, Page, PageBudget, PanelKind, TableKind,
    TableMetrics, TableSlice, estimate_height, paginate, photo_grid_layout, split,
};

fn table_slices<'a>(pages: &[Page<'a>]) -> Vec<TableSlice> {
    pages
        .iter()
        .flat_map(|p| p.blocks.iter())
        .filter_map(|b| match b.block {
            Block::TableSlice { slice, .. } => Some(slice),
            _ => None,
        })
        .collect()
}

fn photo_groups(pages: &[Page]) -> Vec<(usize, usize, usize, usize)> {
    pages
        .iter()
        .flat_map(|p| p.blocks.iter().map(move |b| (p.index, &b.block)))
        .filter_map(|(page, block)| match block {
            Block::PhotoGroup {
                photos, part, parts, ..
            } => Some((page, photos.len(), *part, *parts)),
            _ => None,
        })
        .collect()
}

#[test]
fn estimates_follow_block_kind() {
    let h = config().heights;

    assert_eq!(estimate_height(&panel(PanelKind::PartDetails, None), &h), 250.0);
    assert_eq!(
        estimate_height(&panel(PanelKind::PartDetails, Some("Masked teeth")), &h),
        370.0
    );
    assert_eq!(estimate_height(&panel(PanelKind::PartDetails, Some("  \n ")), &h), 250.0);
    assert_eq!(estimate_height(&panel(PanelKind::SampleHeader, None), &h), 80.0);

    assert_eq!(estimate_height(&table(TableKind::ThermalCycle, 3, false), &h), 225.0);
    assert_eq!(estimate_height(&table(TableKind::ThermalCycle, 3, true), &h), 260.0);
    assert_eq!(estimate_height(&table(TableKind::ChemicalCycle, 2, false), &h), 200.0);
    assert_eq!(estimate_height(&table(TableKind::ThermalCycle, 0, true), &h), 0.0);

    assert_eq!(estimate_height(&grid("g", 0), &h), 0.0);
    assert_eq!(estimate_height(&grid("g", 1), &h), 420.0);
    assert_eq!(estimate_height(&grid("g", 2), &h), 370.0);
    assert_eq!(estimate_height(&grid("g", 4), &h), 540.0);
    assert_eq!(estimate_height(&grid("g", 6), &h), 440.0);
    assert_eq!(estimate_height(&grid("g", 7), &h), 610.0);

    assert_eq!(estimate_height(&chart(5), &h), 500.0);
    assert_eq!(estimate_height(&chart(0), &h), 0.0);

    let empty = ContentSection::EmptyState(EmptyState {
        message: "Nothing here".to_string(),
    });
    assert_eq!(estimate_height(&empty, &h), 200.0);
}

#[test]
fn photo_grid_shape_by_count() {
    let shape = |n| {
        let l = photo_grid_layout(n);
        (l.columns, l.photo_height)
    };
    assert_eq!(shape(1), (1, 300.0));
    assert_eq!(shape(2), (2, 250.0));
    assert_eq!(shape(3), (2, 200.0));
    assert_eq!(shape(4), (2, 200.0));
    assert_eq!(shape(5), (3, 150.0));
    assert_eq!(shape(9), (3, 150.0));
    assert_eq!(photo_grid_layout(7).rows(7), 3);
}

#[test]
fn budget_charges_spacing_between_blocks_only() {
    let mut budget = PageBudget::with_available(620.0);
    assert!(budget.is_empty());
    assert!(budget.would_fit(620.0, 30.0));
    assert_eq!(budget.remaining_for_next(30.0), 620.0);

    budget.place(300.0, 30.0);
    assert_eq!(budget.used(), 300.0);
    assert_eq!(budget.remaining_for_next(30.0), 290.0);
    assert!(budget.would_fit(290.0, 30.0));
    assert!(!budget.would_fit(291.0, 30.0));

    budget.place(100.0, 30.0);
    assert_eq!(budget.used(), 430.0);
}

#[test]
fn twelve_rows_split_ten_and_two() {
    let mut config = config_with_available(400.0);
    config.heights.tables.generic = TableMetrics {
        header: 120.0,
        row: 25.0,
    };
    let sections = vec![table(TableKind::Generic, 12, false)];
    let pages = paginate(&sections, &config);

    assert_eq!(pages.len(), 2);
    let slices = table_slices(&pages);
    assert_eq!(slices, vec![TableSlice::new(0, 10, 12), TableSlice::new(10, 12, 12)]);
    assert_eq!(pages[0].used_height, 370.0);
    assert_eq!(pages[1].used_height, 170.0);
    assert!(!slices[0].is_continuation());
    assert!(slices[1].is_continuation());
}

#[test]
fn split_never_leaves_a_lone_trailing_row() {
    let mut config = config_with_available(400.0);
    config.heights.tables.generic = TableMetrics {
        header: 120.0,
        row: 25.0,
    };
    let t = table_data(TableKind::Generic, 12, false);

    let outcome = split(&t, 0, 400.0, false, &config);
    assert_eq!(outcome.fitting, TableSlice::new(0, 10, 12));
    assert_eq!(outcome.remainder, Some(TableSlice::new(10, 12, 12)));

    let rest = split(&t, 10, 400.0, false, &config);
    assert_eq!(rest.fitting, TableSlice::new(10, 12, 12));
    assert_eq!(rest.remainder, None);
}

#[test]
fn seven_photos_split_six_and_one() {
    let sections = vec![grid("Front view", 7)];
    let pages = paginate(&sections, &config());

    assert_eq!(pages.len(), 2);
    assert_eq!(photo_groups(&pages), vec![(0, 6, 0, 2), (1, 1, 1, 2)]);

    let first = photo_grid_layout(6);
    assert_eq!((first.columns, first.rows(6)), (3, 2));
    assert_eq!(photo_grid_layout(1).columns, 1);

    assert_eq!(pages[0].blocks[0].height, 440.0);
    assert_eq!(pages[1].blocks[0].height, 420.0);
}

#[test]
fn photo_groups_respect_configured_maximum() {
    let config = LayoutConfig {
        max_photos_per_page: 4,
        ..config()
    };
    let sections = vec![grid("Load", 10)];
    let pages = paginate(&sections, &config);
    let groups = photo_groups(&pages);
    assert_eq!(
        groups.iter().map(|g| g.1).collect::<Vec<_>>(),
        vec![4, 4, 2]
    );
    assert!(groups.iter().all(|g| g.3 == 3));
}

#[test]
fn empty_input_yields_one_empty_state_page() {
    let pages = paginate(&[], &config());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].blocks.len(), 1);
    assert_eq!(pages[0].blocks[0].block, Block::EmptyState);
    assert_eq!(pages[0].blocks[0].height, 200.0);
    assert!(pages[0].is_first() && pages[0].is_last());
}

#[test]
fn zero_height_blocks_are_dropped() {
    let sections = vec![
        table(TableKind::Hardness, 0, true),
        grid("None", 0),
        chart(0),
    ];
    let pages = paginate(&sections, &config());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].blocks[0].block, Block::EmptyState);

    let sections = vec![
        panel(PanelKind::ResultHeader, None),
        table(TableKind::Hardness, 0, false),
        panel(PanelKind::SampleHeader, None),
    ];
    let pages = paginate(&sections, &config());
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].blocks.len(), 2);
    assert_eq!(pages[0].used_height, 100.0 + 30.0 + 80.0);
}

#[test]
fn oversize_block_gets_a_page_of_its_own() {
    let mut config = config();
    config.heights.chart = 700.0;
    let sections = vec![
        panel(PanelKind::SampleHeader, None),
        chart(3),
        panel(PanelKind::SampleHeader, None),
    ];
    let pages = paginate(&sections, &config);

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[1].blocks.len(), 1);
    assert!(pages[1].is_oversize());
    assert!(!pages[0].is_oversize());
    assert!(!pages[2].is_oversize());
}

#[test]
fn table_is_deferred_when_too_few_rows_fit() {
    let sections = vec![
        panel(PanelKind::Cover, None),
        table(TableKind::ThermalCycle, 5, false),
    ];
    let pages = paginate(&sections, &config());

    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].blocks.len(), 1);
    assert_eq!(table_slices(&pages), vec![TableSlice::whole(5)]);
    assert_eq!(pages[1].used_height, 295.0);
}

#[test]
fn min_rows_to_split_controls_deferral() {
    // After a 425-unit chart, 165 units are left: header plus one row.
    let mut config = config();
    config.heights.chart = 425.0;
    let sections = vec![chart(4), table(TableKind::ThermalCycle, 5, false)];

    let pages = paginate(&sections, &config);
    assert_eq!(table_slices(&pages), vec![TableSlice::whole(5)]);
    assert_eq!(pages[0].blocks.len(), 1);

    config.min_rows_to_split = 1;
    let pages = paginate(&sections, &config);
    assert_eq!(
        table_slices(&pages),
        vec![TableSlice::new(0, 1, 5), TableSlice::new(1, 5, 5)]
    );
    assert_eq!(pages[0].blocks.len(), 2);
}

#[test]
fn summary_row_only_closes_the_final_slice() {
    let sections = vec![table(TableKind::ThermalCycle, 20, true)];
    let pages = paginate(&sections, &config());

    let slices = table_slices(&pages);
    assert_eq!(slices, vec![TableSlice::new(0, 14, 20), TableSlice::new(14, 20, 20)]);
    assert!(!slices[0].carries_summary());
    assert!(slices[1].carries_summary());
    assert_eq!(pages[0].blocks[0].height, 610.0);
    assert_eq!(pages[1].blocks[0].height, 365.0);
}

/// Slices of the `kind` table with the index of the block within its page.
fn slices_of(pages: &[Page], kind: TableKind) -> Vec<(usize, TableSlice)> {
    pages
        .iter()
        .flat_map(|p| p.blocks.iter().enumerate())
        .filter_map(|(i, b)| match b.block {
            Block::TableSlice { table, slice } if table.kind == kind => Some((i, slice)),
            _ => None,
        })
        .collect()
}

#[test]
fn table_rows_are_complete_and_ordered() {
    let mut seed = 0usize;
    for min_rows in 1..=3 {
        for available in [200.0, 300.0, 450.0, 620.0, 1000.0] {
            for rows in 0..40 {
                for lead in [false, true] {
                    seed += 1;
                    let config = LayoutConfig {
                        min_rows_to_split: min_rows,
                        ..config_with_available(available)
                    };
                    let second_rows = (rows * 7 + seed) % 25;
                    let photos = seed % 8;
                    let mut sections = Vec::new();
                    if lead {
                        sections.push(panel(PanelKind::SampleHeader, None));
                    }
                    sections.push(table(TableKind::ThermalCycle, rows, true));
                    match seed % 3 {
                        0 => sections.push(grid("Load", photos)),
                        1 => sections.push(chart(seed % 4)),
                        _ => {}
                    }
                    sections.push(table(TableKind::ChemicalCycle, second_rows, seed % 2 == 0));
                    let pages = paginate(&sections, &config);
                    let case = format!(
                        "{rows}+{second_rows} rows, {available} available, min {min_rows}, seed {seed}"
                    );

                    for (kind, total) in [
                        (TableKind::ThermalCycle, rows),
                        (TableKind::ChemicalCycle, second_rows),
                    ] {
                        let mut next = 0;
                        for (index, slice) in slices_of(&pages, kind) {
                            assert!(!slice.is_empty(), "empty slice placed: {case}");
                            assert_eq!(slice.start, next, "rows out of order: {case}");
                            assert_eq!(slice.total, total);
                            if slice.is_partial() && index > 0 {
                                assert!(
                                    slice.len() >= min_rows,
                                    "{kind:?} split into {} rows after other blocks: {case}",
                                    slice.len()
                                );
                            }
                            next = slice.end;
                        }
                        assert_eq!(next, total, "{kind:?} rows lost: {case}");
                    }

                    let groups = photo_groups(&pages);
                    let placed: usize = groups.iter().map(|g| g.1).sum();
                    assert_eq!(placed, if seed % 3 == 0 { photos } else { 0 }, "{case}");
                    for (i, (_, count, part, parts)) in groups.iter().enumerate() {
                        assert!(*count <= config.max_photos_per_page);
                        assert_eq!((*part, *parts), (i, groups.len()));
                    }

                    for page in &pages {
                        assert!(
                            page.used_height <= page.available_height || page.blocks.len() == 1,
                            "overflow on a shared page: {case}"
                        );
                    }
                    assert!(!pages.is_empty());
                    for (i, page) in pages.iter().enumerate() {
                        assert_eq!(page.index, i);
                        assert_eq!(page.total_pages, pages.len());
                    }
                }
            }
        }
    }
}

fn mixed_document() -> Vec<ContentSection> {
    vec![
        panel(PanelKind::PartDetails, Some("Teeth masked on the drive side.")),
        grid("Front view", 8),
        panel(PanelKind::GeneralParameters, None),
        table(TableKind::ThermalCycle, 17, true),
        table(TableKind::ChemicalCycle, 23, true),
        chart(12),
        panel(PanelKind::Quench, None),
        table(TableKind::QuenchParameters, 4, false),
        grid("Load", 3),
    ]
}

#[test]
fn pagination_is_deterministic_across_threads() {
    let sections = mixed_document();
    let config = config();
    let first = paginate(&sections, &config);

    let all_equal = (0..64)
        .into_par_iter()
        .map(|_| paginate(&sections, &config))
        .all(|pages| pages == first);
    assert!(all_equal);
}

#[test]
fn mixed_document_fits_its_pages() {
    let sections = mixed_document();
    let config = config();
    let pages = paginate(&sections, &config);

    for page in &pages {
        assert!(!page.blocks.is_empty());
        assert!(page.used_height <= page.available_height || page.blocks.len() == 1);
        let spacing = config.block_spacing * (page.blocks.len() - 1) as f32;
        let heights: f32 = page.blocks.iter().map(|b| b.height).sum();
        assert_eq!(page.used_height, heights + spacing);
    }
    assert!(pages.last().is_some_and(|p| p.is_last()));
}
