use crate::layout::{ContentSection, PhotoGrid};
use crate::model::Report;

use super::identification::photo_refs;

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    vec![ContentSection::PhotoGrid(PhotoGrid {
        title: "Post-treatment photos".to_string(),
        photos: photo_refs(&report.photos.post_treatment),
    })]
}
