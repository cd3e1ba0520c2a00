use crate::layout::{Chart, ContentSection, PhotoGrid, Series};
use crate::model::Report;

use super::identification::photo_refs;
use super::{empty_state, non_empty, series_color};

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let mut blocks: Vec<ContentSection> = report
        .curves
        .iter()
        .enumerate()
        .map(|(ci, curve)| {
            let series = curve
                .series
                .iter()
                .enumerate()
                .map(|(si, s)| Series {
                    label: s.label.clone(),
                    color: series_color(si),
                    points: s.points.iter().map(|p| (p[0] as f32, p[1] as f32)).collect(),
                })
                .collect();
            ContentSection::Chart(Chart {
                title: non_empty(&curve.name)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Furnace curve {}", ci + 1)),
                x_label: non_empty(&curve.x_label).unwrap_or("Time (min)").to_string(),
                y_label: non_empty(&curve.y_label).unwrap_or("Temperature (°C)").to_string(),
                series,
            })
        })
        .collect();

    if !report.photos.curves.is_empty() {
        blocks.push(ContentSection::PhotoGrid(PhotoGrid {
            title: "Curve photos".to_string(),
            photos: photo_refs(&report.photos.curves),
        }));
    }

    if blocks.is_empty() {
        blocks.push(empty_state("No furnace curves available"));
    }
    blocks
}
