mod common;

use std::fs;

use common::{image_count, output_dir, page_count, sample_report, write_fixture_photos};
use trial_report_pdf::layout::paginate;
use trial_report_pdf::{
    DirStore, Error, RenderOptions, Report, ReportSection, convert_report_to_pdf, load_report,
    plan_report, render_report,
};

fn expected_pages(report: &Report, options: &RenderOptions) -> usize {
    let config = options.layout_for(report);
    plan_report(report, options.sections.as_deref())
        .iter()
        .map(|plan| paginate(&plan.blocks, &config).len())
        .sum()
}

fn options_with_photos(name: &str) -> RenderOptions {
    let dir = output_dir(name);
    write_fixture_photos(&dir);
    RenderOptions {
        store: Some(Box::new(DirStore::new(dir))),
        ..RenderOptions::default()
    }
}

#[test]
fn page_count_is_the_sum_of_section_pages() {
    let _ = env_logger::try_init();
    let report = sample_report();
    let options = options_with_photos("page_count");

    let pdf = render_report(&report, &options).expect("render");
    assert!(pdf.starts_with(b"%PDF-"));
    let expected = expected_pages(&report, &options);
    assert!(expected >= ReportSection::ALL.len());
    assert_eq!(page_count(&pdf), expected);
}

#[test]
fn photos_are_embedded_once_each() {
    let report = sample_report();
    let options = options_with_photos("photos_embedded");
    let pdf = render_report(&report, &options).expect("render");
    assert_eq!(image_count(&pdf), 8);
}

#[test]
fn missing_photos_become_placeholders() {
    let report = sample_report();

    let pdf = render_report(&report, &RenderOptions::default()).expect("render without store");
    assert_eq!(image_count(&pdf), 0);
    assert_eq!(page_count(&pdf), expected_pages(&report, &RenderOptions::default()));

    let dir = output_dir("photos_broken");
    write_fixture_photos(&dir);
    fs::write(dir.join("part-front.jpg"), b"not an image").expect("overwrite photo");
    fs::remove_file(dir.join("load-1.jpg")).expect("remove photo");
    let options = RenderOptions {
        store: Some(Box::new(DirStore::new(dir))),
        ..RenderOptions::default()
    };
    let pdf = render_report(&report, &options).expect("render with broken photos");
    assert_eq!(image_count(&pdf), 6);
}

#[test]
fn section_filter_limits_the_export() {
    let report = sample_report();
    let options = RenderOptions {
        sections: Some(vec![ReportSection::Cover]),
        ..RenderOptions::default()
    };
    let pdf = render_report(&report, &options).expect("render cover");
    assert_eq!(page_count(&pdf), 1);

    let options = RenderOptions {
        sections: Some(Vec::new()),
        ..RenderOptions::default()
    };
    let pdf = render_report(&report, &options).expect("render nothing");
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn long_observation_stays_inside_its_panel() {
    let _ = env_logger::try_init();
    let mut report = sample_report();
    report.trial.observation = Some(
        "Scaling was found on the upper tray and traced to a leaking door seal. ".repeat(60),
    );
    let options = RenderOptions {
        sections: Some(vec![ReportSection::Observations]),
        ..RenderOptions::default()
    };
    let plans = plan_report(&report, options.sections.as_deref());
    assert_eq!(plans.len(), 1);

    let pdf = render_report(&report, &options).expect("render long observation");
    assert_eq!(page_count(&pdf), expected_pages(&report, &options));
    assert_eq!(page_count(&pdf), 1);
}

#[test]
fn empty_report_still_renders() {
    let report = Report::default();
    let options = RenderOptions::default();
    let pdf = render_report(&report, &options).expect("render empty report");
    assert_eq!(page_count(&pdf), expected_pages(&report, &options));
}

#[test]
fn layout_overrides_apply() {
    let report = sample_report();
    let options = RenderOptions {
        max_photos_per_page: Some(1),
        min_rows_to_split: Some(3),
        ..RenderOptions::default()
    };
    let config = options.layout_for(&report);
    assert_eq!(config.max_photos_per_page, 1);
    assert_eq!(config.min_rows_to_split, 3);
    assert_eq!(config.max_page_height, report.layout.max_page_height);

    let pdf = render_report(&report, &options).expect("render");
    assert_eq!(page_count(&pdf), expected_pages(&report, &options));
}

#[test]
fn layout_config_is_read_from_the_report() {
    let report: Report = serde_json::from_str(
        r#"{ "trial": { "code": "T-1" }, "layout": { "max_photos_per_page": 2, "heights": { "chart": 300 } } }"#,
    )
    .expect("parse");
    assert_eq!(report.layout.max_photos_per_page, 2);
    assert_eq!(report.layout.heights.chart, 300.0);
    assert_eq!(report.layout.block_spacing, 30.0);
    assert_eq!(report.layout.available_height(), 620.0);
}

#[test]
fn convert_writes_a_pdf_file() {
    let dir = output_dir("convert");
    let output = dir.join("report.pdf");
    convert_report_to_pdf(common::fixture_path(), &output, &RenderOptions::default())
        .expect("convert");
    let bytes = fs::read(&output).expect("read output");
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(page_count(&bytes) > 0);
}

#[test]
fn bad_input_is_reported() {
    let dir = output_dir("bad_input");
    let input = dir.join("broken.json");
    fs::write(&input, "{ \"trial\": ").expect("write input");
    assert!(matches!(load_report(&input), Err(Error::Json(_))));
    assert!(matches!(load_report(&dir.join("absent.json")), Err(Error::Io(_))));

    let options = RenderOptions {
        font: Some(dir.join("absent.ttf")),
        ..RenderOptions::default()
    };
    let err = render_report(&sample_report(), &options).expect_err("missing font");
    assert!(matches!(err, Error::Font(_)));
    assert!(err.to_string().contains("absent.ttf"));
}
