use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use trial_report_pdf::layout::{Block, paginate};
use trial_report_pdf::{
    DirStore, RenderOptions, ReportSection, convert_report_to_pdf, load_report, plan_report,
};

#[derive(Parser)]
#[command(name = "trial-report-pdf")]
#[command(version, about = "Export a heat-treatment trial report as a paginated A4 PDF")]
struct Cli {
    /// Report JSON exported from the trial database
    input: PathBuf,

    /// Output PDF (defaults to INPUT with a .pdf extension)
    output: Option<PathBuf>,

    /// Directory holding the report photos (defaults to the input's directory)
    #[arg(long)]
    photos: Option<PathBuf>,

    /// TrueType/OpenType font to embed instead of Helvetica
    #[arg(long, env = "TRIAL_REPORT_FONT")]
    font: Option<PathBuf>,

    /// Comma-separated sections to export: cover, identification, recipe,
    /// load, curves, datapaq, post-treatment, micrography, control, observations
    #[arg(long, value_delimiter = ',', value_parser = parse_section)]
    sections: Option<Vec<ReportSection>>,

    #[arg(long)]
    max_photos_per_page: Option<usize>,

    #[arg(long)]
    min_rows_to_split: Option<usize>,

    /// Print the page plan instead of writing a PDF
    #[arg(long)]
    plan: bool,
}

fn parse_section(name: &str) -> Result<ReportSection, String> {
    ReportSection::from_name(name).ok_or_else(|| format!("unknown section '{name}'"))
}

fn print_plan(input: &Path, options: &RenderOptions) -> Result<(), trial_report_pdf::Error> {
    let report = load_report(input)?;
    let config = options.layout_for(&report);
    for plan in plan_report(&report, options.sections.as_deref()) {
        let pages = paginate(&plan.blocks, &config);
        println!("{} ({} pages)", plan.section.title(), pages.len());
        for page in &pages {
            println!(
                "  page {}/{}: {:.0}/{:.0}",
                page.index + 1,
                page.total_pages,
                page.used_height,
                page.available_height
            );
            for placed in &page.blocks {
                let what = match &placed.block {
                    Block::Section(section) => format!("{:?} '{}'", section.kind(), section.title()),
                    Block::TableSlice { table, slice } => format!(
                        "Table '{}' rows {}..{} of {}",
                        table.title, slice.start, slice.end, slice.total
                    ),
                    Block::PhotoGroup {
                        grid,
                        photos,
                        part,
                        parts,
                    } => format!(
                        "Photos '{}' part {}/{} ({} photos)",
                        grid.title,
                        part + 1,
                        parts,
                        photos.len()
                    ),
                    Block::EmptyState => "Empty state".to_string(),
                };
                println!("    {:>6.0}  {what}", placed.height);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let photo_dir = cli.photos.clone().unwrap_or_else(|| {
        cli.input
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    });
    let options = RenderOptions {
        store: Some(Box::new(DirStore::new(photo_dir))),
        font: cli.font.clone(),
        sections: cli.sections.clone(),
        max_photos_per_page: cli.max_photos_per_page,
        min_rows_to_split: cli.min_rows_to_split,
    };

    let result = if cli.plan {
        print_plan(&cli.input, &options)
    } else {
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| cli.input.with_extension("pdf"));
        convert_report_to_pdf(&cli.input, &output, &options)
            .map(|()| println!("Wrote {}", output.display()))
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
