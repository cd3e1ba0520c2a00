use std::collections::BTreeMap;

use crate::layout::{ContentSection, PanelKind, PhotoGrid, PhotoRef, TextPanel};
use crate::model::{Micrograph, Report};

use super::{empty_state, non_empty};

/// result index -> sample index -> magnification -> photos. Magnifications
/// are sorted by name; photos keep their input order.
type Hierarchy<'a> = BTreeMap<usize, BTreeMap<usize, BTreeMap<&'a str, Vec<&'a Micrograph>>>>;

fn organize(micrographs: &[Micrograph]) -> Hierarchy<'_> {
    let mut tree: Hierarchy = BTreeMap::new();
    for m in micrographs {
        tree.entry(m.result_index)
            .or_default()
            .entry(m.sample_index)
            .or_default()
            .entry(m.magnification.as_str())
            .or_default()
            .push(m);
    }
    tree
}

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let tree = organize(&report.photos.micrography);
    if tree.is_empty() {
        return vec![empty_state("No micrography photos available")];
    }

    let mut blocks = Vec::new();
    for (ri, samples) in &tree {
        let result = report.results.get(*ri);
        let mut header = TextPanel::new(PanelKind::ResultHeader, format!("Result #{}", ri + 1));
        if let Some(desc) = result.and_then(|r| non_empty(&r.description)) {
            header = header.field("Description", desc);
        }
        blocks.push(ContentSection::TextPanel(header));

        for (si, magnifications) in samples {
            let sample = result.and_then(|r| r.samples.get(*si));
            let mut header =
                TextPanel::new(PanelKind::SampleHeader, format!("Sample #{}", si + 1));
            if let Some(desc) = sample.and_then(|s| non_empty(&s.description)) {
                header = header.field("Description", desc);
            }
            blocks.push(ContentSection::TextPanel(header));

            for (magnification, photos) in magnifications {
                blocks.push(ContentSection::PhotoGrid(PhotoGrid {
                    title: format!("Magnification {magnification}"),
                    photos: photos
                        .iter()
                        .map(|m| PhotoRef {
                            id: m.photo.id.clone(),
                            caption: m.photo.caption.clone(),
                        })
                        .collect(),
                }));
            }
        }
    }
    blocks
}
