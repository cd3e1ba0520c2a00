mod chart;
mod layout;
mod table;

use std::collections::{HashMap, HashSet};
use std::io::Cursor;

use image::ImageDecoder;
use pdf_writer::{Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::fonts::register_fonts;
use crate::layout::{
    Block, ContentSection, HeightConstants, LayoutConfig, Page, PanelKind, PhotoGrid, PhotoRef,
    TableSlice, TextPanel, paginate, photo_grid_layout,
};
use crate::model::Report;
use crate::report::{ReportSection, SectionPlan};
use crate::storage::FileStore;

use chart::render_chart;
use layout::{BLACK, Canvas, GREY, LIGHT, PALE, Rgb, WHITE};
use table::render_table_slice;

/// A4 portrait, in points.
const PAGE_WIDTH_PT: f32 = 595.28;
const PAGE_HEIGHT_PT: f32 = 841.89;
const MARGIN_X: f32 = 30.0;

struct SectionPages<'a> {
    section: ReportSection,
    pages: Vec<Page<'a>>,
}

struct EmbeddedPhoto {
    pdf_name: String,
    xobj_ref: Ref,
    width: u32,
    height: u32,
}

/// Everything a block needs besides its own data.
struct PageContext<'r> {
    config: &'r LayoutConfig,
    accent: Rgb,
    photos: &'r HashMap<&'r str, EmbeddedPhoto>,
    x: f32,
    width: f32,
}

fn embed_photo(
    pdf: &mut Pdf,
    alloc: &mut impl FnMut() -> Ref,
    data: &[u8],
    pdf_name: String,
) -> image::ImageResult<EmbeddedPhoto> {
    let format = image::guess_format(data)?;

    // Baseline JPEGs go in as-is; anything else is decoded and re-encoded.
    if format == image::ImageFormat::Jpeg {
        let decoder = image::codecs::jpeg::JpegDecoder::new(Cursor::new(data))?;
        let (w, h) = decoder.dimensions();
        let gray = match decoder.color_type() {
            image::ColorType::L8 => Some(true),
            image::ColorType::Rgb8 => Some(false),
            _ => None,
        };
        if let Some(gray) = gray {
            let xobj_ref = alloc();
            let mut xobj = pdf.image_xobject(xobj_ref, data);
            xobj.filter(Filter::DctDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            if gray {
                xobj.color_space().device_gray();
            } else {
                xobj.color_space().device_rgb();
            }
            xobj.bits_per_component(8);
            return Ok(EmbeddedPhoto {
                pdf_name,
                xobj_ref,
                width: w,
                height: h,
            });
        }
    }

    let rgba = image::load_from_memory_with_format(data, format)?.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }

    Ok(EmbeddedPhoto {
        pdf_name,
        xobj_ref,
        width: w,
        height: h,
    })
}

fn collect_text(section: &ContentSection, chars: &mut HashSet<char>) {
    chars.extend(section.title().chars());
    match section {
        ContentSection::TextPanel(panel) => {
            for field in &panel.fields {
                chars.extend(field.label.to_uppercase().chars());
                chars.extend(field.value.chars());
            }
            if let Some(comment) = &panel.comment {
                chars.extend(comment.chars());
            }
        }
        ContentSection::ParameterTable(table) => {
            let cells = table
                .columns
                .iter()
                .chain(table.rows.iter().flatten())
                .chain(table.summary.iter().flatten());
            for cell in cells {
                chars.extend(cell.chars());
            }
        }
        ContentSection::PhotoGrid(grid) => {
            for photo in &grid.photos {
                chars.extend(photo.id.chars());
                if let Some(caption) = &photo.caption {
                    chars.extend(caption.chars());
                }
            }
        }
        ContentSection::Chart(chart) => {
            chars.extend(chart.x_label.chars());
            chars.extend(chart.y_label.chars());
            for series in &chart.series {
                chars.extend(series.label.chars());
            }
        }
        ContentSection::EmptyState(empty) => chars.extend(empty.message.chars()),
    }
}

/// Characters the report font has to cover: printable ASCII plus every
/// character of the report text.
fn used_chars(report: &Report, plans: &[SectionPlan]) -> HashSet<char> {
    let mut chars: HashSet<char> = (' '..='~').collect();
    for text in [
        &report.trial.code,
        &report.trial.name,
        &report.client.name,
    ] {
        chars.extend(text.chars());
    }
    if let Some(date) = &report.trial.date {
        chars.extend(date.chars());
    }
    for plan in plans {
        chars.extend(plan.section.title().chars());
        for block in &plan.blocks {
            collect_text(block, &mut chars);
        }
    }
    chars
}

fn draw_section_header(canvas: &mut Canvas, report: &Report, section: ReportSection, page: &Page) {
    let accent = section.accent();
    let right = canvas.width - MARGIN_X;
    if page.is_first() {
        canvas.fill_rect(0.0, 0.0, canvas.width, 70.0, accent);
        canvas.text(MARGIN_X, 22.0, 22.0, true, WHITE, section.title());
        if !report.trial.code.is_empty() {
            let code = format!("Trial {}", report.trial.code);
            canvas.text_right(right, 28.0, 11.0, true, WHITE, &code);
        }
        let subtitle = [report.client.name.as_str(), report.trial.name.as_str()]
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" | ");
        canvas.text(MARGIN_X, 84.0, 10.0, false, GREY, &subtitle);
    } else {
        canvas.fill_rect(0.0, 0.0, canvas.width, 40.0, accent);
        let title = format!("{} (continued)", section.title());
        canvas.text(MARGIN_X, 13.0, 14.0, true, WHITE, &title);
        let number = format!("Page {}", page.index + 1);
        canvas.text_right(right, 15.0, 10.0, false, WHITE, &number);
    }
}

fn draw_footer(
    canvas: &mut Canvas,
    report: &Report,
    section: ReportSection,
    page: &Page,
    config: &LayoutConfig,
) {
    let top = config.max_page_height - config.footer_overhead + 14.0;
    let right = canvas.width - MARGIN_X;
    canvas.line(MARGIN_X, top, right, top, LIGHT, 0.8);

    canvas.text(MARGIN_X, top + 12.0, 8.0, true, GREY, section.title());
    let date = report.trial.date.as_deref().unwrap_or("Not specified");
    canvas.text_centered(canvas.width / 2.0, top + 12.0, 8.0, false, GREY, date);
    let number = format!("Page {} of {}", page.index + 1, page.total_pages);
    canvas.text_right(right, top + 12.0, 8.0, false, GREY, &number);
}

fn draw_panel(canvas: &mut Canvas, panel: &TextPanel, ctx: &PageContext, top: f32, height: f32) {
    let (x, width) = (ctx.x, ctx.width);
    let cover = panel.kind == PanelKind::Cover;
    let title_size = if cover { 20.0 } else { 12.0 };
    let value_size = if cover { 13.0 } else { 10.0 };
    let row_h = if cover { 44.0 } else { 30.0 };
    let bottom = top + height - 8.0;

    canvas.fill_rect(x, top, width, height, PALE);
    canvas.fill_rect(x, top, 4.0, height, ctx.accent);
    canvas.text(x + 14.0, top + 10.0, title_size, true, BLACK, &panel.title);

    let col_w = (width - 28.0) / 2.0;
    let mut y = top + 10.0 + title_size + 12.0;
    let mut drawn = 0;
    for pair in panel.fields.chunks(2) {
        if y + row_h > bottom {
            break;
        }
        for (i, field) in pair.iter().enumerate() {
            let fx = x + 14.0 + i as f32 * col_w;
            canvas.text(fx, y, 7.5, true, GREY, &field.label.to_uppercase());
            let value = canvas.fit(&field.value, col_w - 10.0, value_size, false);
            canvas.text(fx, y + 11.0, value_size, false, BLACK, &value);
        }
        drawn += pair.len();
        y += row_h;
    }
    if drawn < panel.fields.len() {
        log::debug!(
            "panel '{}': {} of {} fields cut off",
            panel.title,
            panel.fields.len() - drawn,
            panel.fields.len()
        );
    }

    let Some(comment) = panel.comment.as_deref().filter(|_| panel.has_comment()) else {
        return;
    };
    // A note is all comment; other panels label it.
    if panel.kind != PanelKind::Note {
        y += 4.0;
        if y + 24.0 > bottom {
            log::debug!("panel '{}': comment cut off", panel.title);
            return;
        }
        canvas.text(x + 14.0, y, 7.5, true, GREY, "COMMENTS");
        y += 12.0;
    }
    let max_lines = ((bottom - y) / 12.0).floor().max(0.0) as usize;
    let (lines, cut) = canvas.wrap_clipped(comment, width - 28.0, 9.0, false, max_lines);
    for line in &lines {
        canvas.text(x + 14.0, y, 9.0, false, BLACK, line);
        y += 12.0;
    }
    if cut > 0 {
        log::debug!("panel '{}': {cut} comment lines cut off", panel.title);
    }
}

fn draw_photo_group(
    canvas: &mut Canvas,
    grid: &PhotoGrid,
    photos: &[PhotoRef],
    (part, parts): (usize, usize),
    ctx: &PageContext,
    top: f32,
) {
    let (x, width) = (ctx.x, ctx.width);
    let heights: &HeightConstants = &ctx.config.heights;

    let title = if parts > 1 {
        format!("{} ({} of {})", grid.title, part + 1, parts)
    } else {
        grid.title.clone()
    };
    canvas.text(x, top + 8.0, 11.0, true, BLACK, &title);
    let count = match grid.photos.len() {
        1 => "1 photo".to_string(),
        n => format!("{n} photos"),
    };
    canvas.text_right(x + width, top + 10.0, 8.0, false, GREY, &count);
    canvas.line(x, top + 26.0, x + width, top + 26.0, ctx.accent, 1.0);

    let grid_layout = photo_grid_layout(photos.len());
    let cell_w = width / grid_layout.columns as f32;
    let row_h = grid_layout.photo_height + heights.photo_row_padding;
    let grid_top = top + heights.photo_grid_header;

    for (i, photo) in photos.iter().enumerate() {
        let cx = x + (i % grid_layout.columns) as f32 * cell_w + 5.0;
        let cy = grid_top + (i / grid_layout.columns) as f32 * row_h;
        let box_w = cell_w - 10.0;
        let caption_h = if photo.caption.is_some() { 14.0 } else { 0.0 };
        let box_h = grid_layout.photo_height - caption_h;

        match ctx.photos.get(photo.id.as_str()) {
            Some(img) if img.width > 0 && img.height > 0 => {
                let fit = (box_w / img.width as f32).min(box_h / img.height as f32);
                let (w, h) = (img.width as f32 * fit, img.height as f32 * fit);
                canvas.image(&img.pdf_name, cx + (box_w - w) / 2.0, cy + (box_h - h) / 2.0, w, h);
            }
            _ => {
                canvas.fill_rect(cx, cy, box_w, box_h, LIGHT);
                canvas.stroke_rect(cx, cy, box_w, box_h, GREY, 0.5);
                let mid = cy + box_h / 2.0;
                canvas.text_centered(cx + box_w / 2.0, mid - 10.0, 9.0, true, GREY, "Photo unavailable");
                let id = canvas.fit(&photo.id, box_w - 10.0, 7.0, false);
                canvas.text_centered(cx + box_w / 2.0, mid + 4.0, 7.0, false, GREY, &id);
            }
        }

        if let Some(caption) = &photo.caption {
            let caption = canvas.fit(caption, box_w, 8.0, false);
            canvas.text_centered(cx + box_w / 2.0, cy + box_h + 3.0, 8.0, false, BLACK, &caption);
        }
    }
}

fn draw_empty_state(canvas: &mut Canvas, message: &str, ctx: &PageContext, top: f32, height: f32) {
    let (x, width) = (ctx.x, ctx.width);
    canvas.fill_rect(x, top, width, height, PALE);
    canvas.stroke_rect(x, top, width, height, LIGHT, 1.0);
    canvas.text_centered(x + width / 2.0, top + height / 2.0 - 6.0, 11.0, false, GREY, message);
}

fn draw_block(canvas: &mut Canvas, block: &Block, ctx: &PageContext, top: f32, height: f32) {
    let heights = &ctx.config.heights;
    match block {
        Block::Section(ContentSection::TextPanel(panel)) => {
            draw_panel(canvas, panel, ctx, top, height)
        }
        Block::Section(ContentSection::Chart(chart)) => {
            render_chart(canvas, chart, ctx.x, top, ctx.width, height)
        }
        Block::Section(ContentSection::EmptyState(empty)) => {
            draw_empty_state(canvas, &empty.message, ctx, top, height)
        }
        Block::Section(ContentSection::ParameterTable(table)) => {
            let slice = TableSlice::whole(table.rows.len());
            render_table_slice(canvas, table, &slice, heights, ctx.accent, ctx.x, top, ctx.width)
        }
        Block::Section(ContentSection::PhotoGrid(grid)) => {
            draw_photo_group(canvas, grid, &grid.photos, (0, 1), ctx, top)
        }
        Block::TableSlice { table, slice } => {
            render_table_slice(canvas, table, slice, heights, ctx.accent, ctx.x, top, ctx.width)
        }
        Block::PhotoGroup {
            grid,
            photos,
            part,
            parts,
        } => draw_photo_group(canvas, grid, photos, (*part, *parts), ctx, top),
        Block::EmptyState => {
            draw_empty_state(canvas, "No data available for this section", ctx, top, height)
        }
    }
}

/// Paginate every section plan and draw the pages into one PDF.
pub(crate) fn render(
    report: &Report,
    plans: &[SectionPlan],
    config: &LayoutConfig,
    store: Option<&dyn FileStore>,
    report_font: Option<&[u8]>,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();

    let fallback = [SectionPlan {
        section: ReportSection::Cover,
        blocks: Vec::new(),
    }];
    let plans = if plans.is_empty() { &fallback[..] } else { plans };

    let sections: Vec<SectionPages> = plans
        .iter()
        .map(|plan| {
            let pages = paginate(&plan.blocks, config);
            log::debug!("section {}: {} page(s)", plan.section.name(), pages.len());
            SectionPages {
                section: plan.section,
                pages,
            }
        })
        .collect();
    let t_paginate = t0.elapsed();

    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();

    let chars = used_chars(report, plans);
    let fonts = register_fonts(&mut pdf, &mut alloc, report_font, &chars)?;
    let t_fonts = t0.elapsed();

    // Each distinct photo is embedded once and shared by every page.
    let mut photos: HashMap<&str, EmbeddedPhoto> = HashMap::new();
    let mut unavailable: HashSet<&str> = HashSet::new();
    let placed_photos = sections
        .iter()
        .flat_map(|s| s.pages.iter())
        .flat_map(|p| p.blocks.iter())
        .flat_map(|b| match &b.block {
            Block::PhotoGroup { photos: group, .. } => *group,
            _ => &[][..],
        });
    for photo in placed_photos {
        let id = photo.id.as_str();
        if photos.contains_key(id) || unavailable.contains(id) {
            continue;
        }
        let Some(bytes) = store.and_then(|s| s.fetch(id)) else {
            log::warn!("Photo {id} not found, drawing a placeholder");
            unavailable.insert(id);
            continue;
        };
        let pdf_name = format!("Im{}", photos.len() + 1);
        match embed_photo(&mut pdf, &mut alloc, &bytes, pdf_name) {
            Ok(embedded) => {
                photos.insert(id, embedded);
            }
            Err(e) => {
                log::warn!("Photo {id} could not be decoded ({e}), drawing a placeholder");
                unavailable.insert(id);
            }
        }
    }
    let t_images = t0.elapsed();

    let page_height = config.max_page_height.max(1.0);
    let scale = PAGE_HEIGHT_PT / page_height;
    let page_width = PAGE_WIDTH_PT / scale;

    let mut contents: Vec<Vec<u8>> = Vec::new();
    for section in &sections {
        let ctx = PageContext {
            config,
            accent: section.section.accent(),
            photos: &photos,
            x: MARGIN_X,
            width: page_width - 2.0 * MARGIN_X,
        };
        for page in &section.pages {
            let mut canvas = Canvas::new(&fonts, page_width, page_height, scale);
            draw_section_header(&mut canvas, report, section.section, page);
            let mut top = config.header_overhead;
            for (i, placed) in page.blocks.iter().enumerate() {
                if i > 0 {
                    top += config.block_spacing;
                }
                draw_block(&mut canvas, &placed.block, &ctx, top, placed.height);
                top += placed.height;
            }
            draw_footer(&mut canvas, report, section.section, page, config);
            contents.push(canvas.finish());
        }
    }
    let t_draw = t0.elapsed();

    let n = contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, raw) in contents.into_iter().enumerate() {
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    let title = match report.trial.code.trim() {
        "" => "Trial report".to_string(),
        code => format!("Trial report {code}"),
    };
    pdf.document_info(info_id)
        .title(TextStr(&title))
        .producer(TextStr("trial-report-pdf"));

    let font_pairs = fonts.resources();
    let mut image_xobjects: Vec<(&str, Ref)> = photos
        .values()
        .map(|p| (p.pdf_name.as_str(), p.xobj_ref))
        .collect();
    image_xobjects.sort_by_key(|&(_, r)| r.get());

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH_PT, PAGE_HEIGHT_PT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in &font_pairs {
                font_dict.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: paginate={:.1}ms, fonts={:.1}ms, images={:.1}ms ({} embedded, {} missing), draw={:.1}ms, assembly={:.1}ms, {} pages",
        t_paginate.as_secs_f64() * 1000.0,
        (t_fonts - t_paginate).as_secs_f64() * 1000.0,
        (t_images - t_fonts).as_secs_f64() * 1000.0,
        photos.len(),
        unavailable.len(),
        (t_draw - t_images).as_secs_f64() * 1000.0,
        (t_assembly - t_draw).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
