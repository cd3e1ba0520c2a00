use crate::layout::{
    Chart, ContentSection, PanelKind, ParameterTable, PhotoGrid, PhotoRef, Series, TableKind,
    TextPanel,
};
use crate::model::{Report, Sample, Specifications, format_number};

use super::{non_empty, series_color};

pub(super) fn assemble(report: &Report) -> Vec<ContentSection> {
    let specs = report.part.as_ref().and_then(|p| p.specifications.as_ref());

    let mut blocks = Vec::new();
    if let Some(panel) = specs.and_then(specification_panel) {
        blocks.push(ContentSection::TextPanel(panel));
    }

    for (ri, result) in report.results.iter().enumerate() {
        let number = if result.step > 0 { result.step as usize } else { ri + 1 };
        let mut header = TextPanel::new(PanelKind::ResultHeader, format!("Result #{number}"))
            .field("Samples", result.samples.len().to_string());
        if let Some(desc) = non_empty(&result.description) {
            header = header.field("Description", desc);
        }
        blocks.push(ContentSection::TextPanel(header));

        for (si, sample) in result.samples.iter().enumerate() {
            let number = if sample.step > 0 { sample.step as usize } else { si + 1 };
            let mut header =
                TextPanel::new(PanelKind::SampleHeader, format!("Sample #{number}"));
            if let Some(desc) = non_empty(&sample.description) {
                header = header.field("Description", desc);
            }
            blocks.push(ContentSection::TextPanel(header));
            blocks.push(ContentSection::ParameterTable(hardness_table(sample)));
            if let Some(grid) = location_photo(report, ri, si, sample) {
                blocks.push(ContentSection::PhotoGrid(grid));
            }
            if let Some(chart) = hardness_profile(sample, specs) {
                blocks.push(ContentSection::Chart(chart));
            }
        }
    }
    blocks
}

fn range(min: Option<f64>, max: Option<f64>, unit: &str) -> Option<String> {
    match (min, max) {
        (Some(lo), Some(hi)) => Some(format!(
            "{}-{} {unit}",
            format_number(lo),
            format_number(hi)
        )),
        (Some(lo), None) => Some(format!(">= {} {unit}", format_number(lo))),
        (None, Some(hi)) => Some(format!("<= {} {unit}", format_number(hi))),
        (None, None) => None,
    }
}

fn specification_panel(specs: &Specifications) -> Option<TextPanel> {
    let unit = specs.hardness_unit.as_deref().unwrap_or("HV");
    let mut panel = TextPanel::new(PanelKind::Specification, "Specifications");
    if let Some(s) = range(specs.surface_hardness_min, specs.surface_hardness_max, unit) {
        panel = panel.field("Surface hardness", s);
    }
    if let Some(s) = range(specs.core_hardness_min, specs.core_hardness_max, unit) {
        panel = panel.field("Core hardness", s);
    }
    if let Some(ecd) = &specs.ecd {
        panel = panel.field(
            "ECD",
            format!(
                "{}-{} mm at {} {}",
                format_number(ecd.depth_min),
                format_number(ecd.depth_max),
                format_number(ecd.hardness),
                ecd.unit.as_deref().unwrap_or("HV")
            ),
        );
    }
    if panel.fields.is_empty() { None } else { Some(panel) }
}

fn location_label(location: &str) -> String {
    match location {
        "surface" => "Surface".to_string(),
        "core" => "Core".to_string(),
        "pdd" => "PDD".to_string(),
        other => other.to_string(),
    }
}

fn hardness_table(sample: &Sample) -> ParameterTable {
    let mut table = ParameterTable::new(
        TableKind::Hardness,
        "Hardness",
        ["Location", "Value", "Unit"].map(String::from).to_vec(),
    );
    let default_unit = sample
        .ecd
        .as_ref()
        .and_then(|e| e.hardness_unit.as_deref())
        .unwrap_or("HV");
    table.rows = sample
        .hardness_points
        .iter()
        .map(|p| {
            vec![
                location_label(&p.location),
                format_number(p.value),
                p.unit.as_deref().unwrap_or(default_unit).to_string(),
            ]
        })
        .collect();
    table
}

/// First location photo of a sample. Only shown next to measurements.
fn location_photo(
    report: &Report,
    result_index: usize,
    sample_index: usize,
    sample: &Sample,
) -> Option<PhotoGrid> {
    let measured = !sample.hardness_points.is_empty()
        || sample.ecd.as_ref().is_some_and(|e| !e.points.is_empty());
    if !measured {
        return None;
    }
    let location = report
        .photos
        .control_location
        .iter()
        .find(|l| l.result_index == result_index && l.sample_index == sample_index)?;
    Some(PhotoGrid {
        title: "Control location".to_string(),
        photos: vec![PhotoRef {
            id: location.photo.id.clone(),
            caption: location.photo.caption.clone(),
        }],
    })
}

/// Hardness against depth from the ECD points, with the specified ECD
/// hardness drawn as a flat reference line.
fn hardness_profile(sample: &Sample, specs: Option<&Specifications>) -> Option<Chart> {
    let ecd = sample.ecd.as_ref().filter(|e| !e.points.is_empty())?;
    let unit = ecd.hardness_unit.as_deref().unwrap_or("HV");

    let mut points: Vec<(f32, f32)> = ecd
        .points
        .iter()
        .map(|p| (p.distance as f32, p.hardness as f32))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut series = vec![Series {
        label: format!("Hardness ({unit})"),
        color: series_color(1),
        points,
    }];

    if let Some(target) = specs.and_then(|s| s.ecd.as_ref()) {
        let first = series[0].points.first().map(|p| p.0).unwrap_or(0.0);
        let last = series[0].points.last().map(|p| p.0).unwrap_or(0.0);
        series.push(Series {
            label: format!("ECD target {}", format_number(target.hardness)),
            color: series_color(0),
            points: vec![(first, target.hardness as f32), (last, target.hardness as f32)],
        });
    }

    Some(Chart {
        title: "Hardness profile".to_string(),
        x_label: "Distance (mm)".to_string(),
        y_label: format!("Hardness ({unit})"),
        series,
    })
}
