use crate::layout::{ContentSection, PanelKind, PhotoGrid, TextPanel};
use crate::model::{LoadData, Report, format_number};

use super::identification::photo_refs;

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let default_load = LoadData::default();
    let load = report.load.as_ref().unwrap_or(&default_load);

    let count = |v: Option<u32>| {
        v.map(|n| n.to_string())
            .unwrap_or_else(|| "Not specified".to_string())
    };

    let panel = TextPanel::new(PanelKind::Load, "Load design")
        .field("Dimensions", load_size(load))
        .field("Floors", count(load.floor_count))
        .field("Parts", count(load.part_count))
        .field(
            "Weight",
            load.weight
                .as_ref()
                .map(|w| w.display("kg"))
                .unwrap_or_else(|| "Not specified".to_string()),
        )
        .with_comment(load.comments.clone());

    vec![
        ContentSection::TextPanel(panel),
        ContentSection::PhotoGrid(PhotoGrid {
            title: "Load photos".to_string(),
            photos: photo_refs(&report.photos.load),
        }),
    ]
}

fn load_size(load: &LoadData) -> String {
    let dims: Vec<String> = [load.length, load.width, load.height]
        .into_iter()
        .flatten()
        .map(format_number)
        .collect();
    if dims.is_empty() {
        return "Not specified".to_string();
    }
    format!(
        "{} {}",
        dims.join(" x "),
        load.size_unit.as_deref().unwrap_or("mm")
    )
}
