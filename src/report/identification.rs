use crate::layout::{ContentSection, PanelKind, PhotoGrid, PhotoRef, TextPanel};
use crate::model::{Part, Photo, Report, format_number};

use super::{non_empty, or_unspecified};

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let default_part = Part::default();
    let part = report.part.as_ref().unwrap_or(&default_part);

    // Part comments win; the load comments are the historical fallback.
    let comment = part
        .comments
        .clone()
        .filter(|c| !c.trim().is_empty())
        .or_else(|| report.load.as_ref().and_then(|l| l.comments.clone()));

    let panel = TextPanel::new(PanelKind::PartDetails, "Part details")
        .field("Designation", or_unspecified(&part.designation))
        .field("Reference", or_unspecified(&part.reference))
        .field(
            "Quantity",
            part.quantity
                .map(|q| q.to_string())
                .unwrap_or_else(|| "Not specified".to_string()),
        )
        .field("Steel", or_unspecified(&part.steel))
        .field("Dimensions", or_unspecified(&dimensions(part)))
        .with_comment(comment);

    let mut blocks = vec![ContentSection::TextPanel(panel)];

    for category in &report.photos.identification {
        let title = match non_empty(&category.name) {
            Some(name) => format!("Photos - {name}"),
            None => "Photos".to_string(),
        };
        blocks.push(ContentSection::PhotoGrid(PhotoGrid {
            title,
            photos: photo_refs(&category.photos),
        }));
    }

    blocks
}

fn dimensions(part: &Part) -> String {
    part.dimensions
        .iter()
        .map(|d| {
            format!(
                "{}: {} {}",
                d.label,
                format_number(d.value),
                d.unit.as_deref().unwrap_or("mm")
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub(super) fn photo_refs(photos: &[Photo]) -> Vec<PhotoRef> {
    photos
        .iter()
        .map(|p| PhotoRef {
            id: p.id.clone(),
            caption: p.caption.clone(),
        })
        .collect()
}
