use crate::layout::{ContentSection, PhotoGrid};
use crate::model::Report;

use super::empty_state;
use super::identification::photo_refs;

/// Datapaq logger reports and graphs, exported as images.
pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    if report.photos.datapaq.is_empty() {
        return vec![empty_state("No Datapaq reports available")];
    }
    vec![ContentSection::PhotoGrid(PhotoGrid {
        title: "Datapaq reports".to_string(),
        photos: photo_refs(&report.photos.datapaq),
    })]
}
