use crate::layout::{ContentSection, PanelKind, PhotoGrid, TextPanel};
use crate::model::Report;

use super::identification::photo_refs;
use super::non_empty;

pub(super) fn observation_text(report: &Report) -> Option<&str> {
    report.trial.observation.as_deref().and_then(non_empty)
}

/// Observation note first, then the observation photos.
pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let mut blocks = Vec::new();
    if let Some(text) = observation_text(report) {
        let note = TextPanel::new(PanelKind::Note, "Observations")
            .with_comment(Some(text.to_string()));
        blocks.push(ContentSection::TextPanel(note));
    }
    blocks.push(ContentSection::PhotoGrid(PhotoGrid {
        title: "Observation photos".to_string(),
        photos: photo_refs(&report.photos.observations),
    }));
    blocks
}
