#![cfg(feature = "cli")]

mod common;

use std::process::Command;

use common::{fixture_path, output_dir, write_fixture_photos};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trial-report-pdf"));
    cmd.env_remove("TRIAL_REPORT_FONT");
    cmd
}

#[test]
fn font_comes_from_the_environment() {
    let dir = output_dir("cli_font_env");
    write_fixture_photos(&dir);
    let output = dir.join("report.pdf");

    let run = cli()
        .arg(fixture_path())
        .arg(&output)
        .arg("--photos")
        .arg(&dir)
        .env("TRIAL_REPORT_FONT", dir.join("no-such-font.ttf"))
        .output()
        .expect("run cli");
    assert!(!run.status.success());
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.contains("no-such-font.ttf"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn font_flag_beats_the_environment() {
    let dir = output_dir("cli_font_flag");
    write_fixture_photos(&dir);

    let run = cli()
        .arg(fixture_path())
        .arg(dir.join("report.pdf"))
        .arg("--font")
        .arg(dir.join("flag-font.ttf"))
        .env("TRIAL_REPORT_FONT", dir.join("env-font.ttf"))
        .output()
        .expect("run cli");
    assert!(!run.status.success());
    let stderr = String::from_utf8_lossy(&run.stderr);
    assert!(stderr.contains("flag-font.ttf"), "stderr: {stderr}");
    assert!(!stderr.contains("env-font.ttf"), "stderr: {stderr}");
}

#[test]
fn renders_with_the_builtin_font_when_unset() {
    let dir = output_dir("cli_font_unset");
    write_fixture_photos(&dir);
    let output = dir.join("report.pdf");

    let run = cli()
        .arg(fixture_path())
        .arg(&output)
        .arg("--photos")
        .arg(&dir)
        .output()
        .expect("run cli");
    assert!(run.status.success(), "stderr: {}", String::from_utf8_lossy(&run.stderr));
    assert!(output.exists());
}
