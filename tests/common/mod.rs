#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use trial_report_pdf::Report;
use trial_report_pdf::layout::{
    Chart, ContentSection, LayoutConfig, PanelKind, ParameterTable, PhotoGrid, PhotoRef, Series,
    TableKind, TextPanel,
};

/// Fresh scratch directory: tests/output/<name>/
pub fn output_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from("tests/output").join(name);
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create output dir");
    dir
}

pub fn config() -> LayoutConfig {
    LayoutConfig::default()
}

/// Config whose content area is exactly `available` units tall.
pub fn config_with_available(available: f32) -> LayoutConfig {
    let config = LayoutConfig::default();
    LayoutConfig {
        max_page_height: available + config.header_overhead + config.footer_overhead,
        ..config
    }
}

pub fn panel(kind: PanelKind, comment: Option<&str>) -> ContentSection {
    ContentSection::TextPanel(
        TextPanel::new(kind, format!("{kind:?}"))
            .field("Label", "Value")
            .with_comment(comment.map(str::to_string)),
    )
}

pub fn table_data(kind: TableKind, rows: usize, summary: bool) -> ParameterTable {
    let mut table = ParameterTable::new(
        kind,
        format!("{kind:?} table"),
        vec!["Step".to_string(), "Value".to_string()],
    );
    table.rows = (0..rows)
        .map(|i| vec![(i + 1).to_string(), format!("{}", i * 10)])
        .collect();
    if summary {
        table.summary = Some(vec!["Total".to_string(), "42".to_string()]);
    }
    table
}

pub fn table(kind: TableKind, rows: usize, summary: bool) -> ContentSection {
    ContentSection::ParameterTable(table_data(kind, rows, summary))
}

pub fn photo_refs(prefix: &str, count: usize) -> Vec<PhotoRef> {
    (0..count)
        .map(|i| PhotoRef {
            id: format!("{prefix}-{i}.jpg"),
            caption: Some(format!("Photo {}", i + 1)),
        })
        .collect()
}

pub fn grid(title: &str, count: usize) -> ContentSection {
    ContentSection::PhotoGrid(PhotoGrid {
        title: title.to_string(),
        photos: photo_refs(title, count),
    })
}

pub fn chart(points: usize) -> ContentSection {
    ContentSection::Chart(Chart {
        title: "Temperature".to_string(),
        x_label: "Time (min)".to_string(),
        y_label: "°C".to_string(),
        series: vec![Series {
            label: "Zone 1".to_string(),
            color: [220, 53, 69],
            points: (0..points).map(|i| (i as f32, 20.0 + i as f32 * 10.0)).collect(),
        }],
    })
}

pub fn fixture_path() -> &'static Path {
    Path::new("tests/fixtures/report.json")
}

pub fn sample_report() -> Report {
    let data = fs::read(fixture_path()).expect("read report fixture");
    serde_json::from_slice(&data).expect("parse report fixture")
}

pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) {
    let img = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128])
    });
    img.save_with_format(dir.join(name), image::ImageFormat::Jpeg)
        .expect("write jpeg");
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    let img = image::RgbaImage::from_fn(width, height, |x, _| {
        image::Rgba([40, 90, 160, if x % 2 == 0 { 255 } else { 128 }])
    });
    img.save_with_format(dir.join(name), image::ImageFormat::Png)
        .expect("write png");
}

/// Photos referenced by the report fixture.
pub fn write_fixture_photos(dir: &Path) {
    write_jpeg(dir, "part-front.jpg", 64, 48);
    write_png(dir, "part-side.png", 32, 32);
    write_jpeg(dir, "load-1.jpg", 48, 64);
    write_jpeg(dir, "micro-100.jpg", 40, 40);
    write_jpeg(dir, "micro-500.jpg", 40, 40);
    write_jpeg(dir, "datapaq-1.jpg", 80, 40);
    write_jpeg(dir, "post-1.jpg", 48, 48);
    write_png(dir, "location-1.png", 24, 24);
}

fn count(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}

/// Number of page objects in a PDF written without object streams.
pub fn page_count(pdf: &[u8]) -> usize {
    count(pdf, b"/Type /Page") - count(pdf, b"/Type /Pages")
}

/// Image XObjects, not counting the soft masks of transparent images.
pub fn image_count(pdf: &[u8]) -> usize {
    count(pdf, b"/Subtype /Image") - count(pdf, b"/SMask ")
}
