//! Report sections: each assembler turns fetched trial data into the ordered
//! block list handed to the pagination engine.

mod control;
mod cover;
mod curves;
mod datapaq;
mod identification;
mod load;
mod micrography;
mod observations;
mod post_treatment;
mod recipe;

use crate::layout::{ContentSection, EmptyState};
use crate::model::{Report, SectionSelection};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportSection {
    Cover,
    Identification,
    Recipe,
    Load,
    Curves,
    Datapaq,
    PostTreatment,
    Micrography,
    Control,
    Observations,
}

impl ReportSection {
    /// Document order.
    pub const ALL: [ReportSection; 10] = [
        ReportSection::Cover,
        ReportSection::Identification,
        ReportSection::Recipe,
        ReportSection::Load,
        ReportSection::Curves,
        ReportSection::Datapaq,
        ReportSection::PostTreatment,
        ReportSection::Micrography,
        ReportSection::Control,
        ReportSection::Observations,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ReportSection::Cover => "cover",
            ReportSection::Identification => "identification",
            ReportSection::Recipe => "recipe",
            ReportSection::Load => "load",
            ReportSection::Curves => "curves",
            ReportSection::Datapaq => "datapaq",
            ReportSection::PostTreatment => "post-treatment",
            ReportSection::Micrography => "micrography",
            ReportSection::Control => "control",
            ReportSection::Observations => "observations",
        }
    }

    /// Case-insensitive; `post_treatment` is accepted for `post-treatment`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Heading drawn on the first page of the section.
    pub fn title(self) -> &'static str {
        match self {
            ReportSection::Cover => "TRIAL REPORT",
            ReportSection::Identification => "IDENTIFICATION",
            ReportSection::Recipe => "RECIPE",
            ReportSection::Load => "LOAD",
            ReportSection::Curves => "CURVES",
            ReportSection::Datapaq => "DATAPAQ REPORTS",
            ReportSection::PostTreatment => "POST-TREATMENT",
            ReportSection::Micrography => "MICROGRAPHY",
            ReportSection::Control => "CONTROL",
            ReportSection::Observations => "OBSERVATIONS",
        }
    }

    /// Accent colour of the section header band.
    pub fn accent(self) -> [u8; 3] {
        match self {
            ReportSection::Cover => [33, 37, 41],
            ReportSection::Identification => [25, 118, 210],
            ReportSection::Recipe => [244, 67, 54],
            ReportSection::Load => [56, 142, 60],
            ReportSection::Curves => [123, 31, 162],
            ReportSection::Datapaq => [94, 53, 177],
            ReportSection::PostTreatment => [121, 85, 72],
            ReportSection::Micrography => [0, 131, 143],
            ReportSection::Control => [230, 81, 0],
            ReportSection::Observations => [84, 110, 122],
        }
    }

    fn is_selected(self, selection: &SectionSelection) -> bool {
        match self {
            ReportSection::Cover => selection.cover,
            ReportSection::Identification => selection.identification,
            ReportSection::Recipe => selection.recipe,
            ReportSection::Load => selection.load,
            ReportSection::Curves => selection.curves,
            ReportSection::Datapaq => selection.datapaq,
            ReportSection::PostTreatment => selection.post_treatment,
            ReportSection::Micrography => selection.micrography,
            ReportSection::Control => selection.control,
            ReportSection::Observations => selection.observations,
        }
    }

    /// Sections after the load only exist when the trial has something for
    /// them; curves and micrography fall back to an empty state instead.
    fn has_source_data(self, report: &Report) -> bool {
        match self {
            ReportSection::Recipe => report.recipe.is_some(),
            ReportSection::Datapaq => !report.photos.datapaq.is_empty(),
            ReportSection::PostTreatment => !report.photos.post_treatment.is_empty(),
            ReportSection::Control => !report.results.is_empty(),
            ReportSection::Observations => {
                observations::observation_text(report).is_some()
                    || !report.photos.observations.is_empty()
            }
            _ => true,
        }
    }
}

/// Block list of one report section, ready for pagination.
#[derive(Clone, Debug)]
pub struct SectionPlan {
    pub section: ReportSection,
    pub blocks: Vec<ContentSection>,
}

pub fn assemble(report: &Report, section: ReportSection) -> Vec<ContentSection> {
    match section {
        ReportSection::Cover => cover::assemble(report),
        ReportSection::Identification => identification::assemble(report),
        ReportSection::Recipe => recipe::assemble(report),
        ReportSection::Load => load::assemble(report),
        ReportSection::Curves => curves::assemble(report),
        ReportSection::Datapaq => datapaq::assemble(report),
        ReportSection::PostTreatment => post_treatment::assemble(report),
        ReportSection::Micrography => micrography::assemble(report),
        ReportSection::Control => control::assemble(report),
        ReportSection::Observations => observations::assemble(report),
    }
}

/// Block lists for every section that is selected in the report and, when
/// given, in `only`. Sections come out in document order.
pub fn plan_report(report: &Report, only: Option<&[ReportSection]>) -> Vec<SectionPlan> {
    ReportSection::ALL
        .into_iter()
        .filter(|s| s.is_selected(&report.sections))
        .filter(|s| only.is_none_or(|only| only.contains(s)))
        .filter(|s| s.has_source_data(report))
        .map(|section| SectionPlan {
            section,
            blocks: assemble(report, section),
        })
        .collect()
}

fn empty_state(message: &str) -> ContentSection {
    ContentSection::EmptyState(EmptyState {
        message: message.to_string(),
    })
}

const SERIES_COLORS: [[u8; 3]; 6] = [
    [220, 53, 69],
    [54, 162, 235],
    [255, 99, 132],
    [153, 0, 255],
    [255, 100, 0],
    [46, 125, 50],
];

fn series_color(index: usize) -> [u8; 3] {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    if s.is_empty() { None } else { Some(s) }
}

fn or_unspecified(s: &str) -> String {
    non_empty(s).unwrap_or("Not specified").to_string()
}
