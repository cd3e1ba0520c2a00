mod error;
mod fonts;
pub mod layout;
pub mod model;
mod pdf;
pub mod report;
pub mod storage;

pub use error::Error;
pub use layout::LayoutConfig;
pub use model::Report;
pub use report::{ReportSection, SectionPlan, plan_report};
pub use storage::{DirStore, FileStore, StoredFile};

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Knobs for one export. Anything left `None` falls back to the report.
#[derive(Default)]
pub struct RenderOptions {
    /// Where photos are fetched from; without a store every photo is drawn
    /// as a placeholder.
    pub store: Option<Box<dyn FileStore>>,
    /// TrueType/OpenType font embedded instead of Helvetica.
    pub font: Option<PathBuf>,
    /// Only export these sections.
    pub sections: Option<Vec<ReportSection>>,
    pub max_photos_per_page: Option<usize>,
    pub min_rows_to_split: Option<usize>,
}

impl RenderOptions {
    /// The report's layout configuration with these options applied.
    pub fn layout_for(&self, report: &Report) -> LayoutConfig {
        let mut config = report.layout.clone();
        if let Some(n) = self.max_photos_per_page {
            config.max_photos_per_page = n;
        }
        if let Some(n) = self.min_rows_to_split {
            config.min_rows_to_split = n;
        }
        config
    }
}

pub fn load_report(path: &Path) -> Result<Report, Error> {
    let data = std::fs::read(path).map_err(|e| {
        Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
    })?;
    Ok(serde_json::from_slice(&data)?)
}

pub fn render_report(report: &Report, options: &RenderOptions) -> Result<Vec<u8>, Error> {
    let config = options.layout_for(report);
    let plans = plan_report(report, options.sections.as_deref());
    let font = options.font.as_deref().map(fonts::load_font).transpose()?;
    pdf::render(
        report,
        &plans,
        &config,
        options.store.as_deref(),
        font.as_deref(),
    )
}

pub fn convert_report_to_pdf(
    input: &Path,
    output: &Path,
    options: &RenderOptions,
) -> Result<(), Error> {
    let t0 = Instant::now();

    let report = load_report(input)?;
    let t_parse = t0.elapsed();

    let bytes = render_report(&report, options)?;
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms (output {} bytes)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        bytes.len(),
    );

    Ok(())
}
