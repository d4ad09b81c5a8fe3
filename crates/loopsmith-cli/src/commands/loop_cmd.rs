//! Loop command implementation
//!
//! Reads a WAV capture, makes a seamless loop and writes it back out,
//! optionally with a JSON report.

use anyhow::{Context, Result};
use colored::Colorize;
use loopsmith_audio::wav::read_wav;
use loopsmith_audio::{make_loop, Exporter, WavExporter};
use loopsmith_spec::{LoopParams, LoopReport, SeamKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_to_json, report_warnings, CommandOutput, LoopResult};

/// Inputs of the loop command.
#[derive(Debug, Clone, Default)]
pub struct LoopArgs {
    /// Captured note to loop.
    pub input: PathBuf,
    /// Where the loop is written.
    pub output: PathBuf,
    /// Optional JSON file with loop parameters.
    pub params: Option<PathBuf>,
    /// Overrides `loop_ms`.
    pub loop_ms: Option<f64>,
    /// Overrides `crossfade_ms`.
    pub crossfade_ms: Option<f64>,
    /// Overrides `db_threshold`.
    pub db_threshold: Option<f64>,
    /// Overrides `max_phase_shift_ms`.
    pub max_phase_shift_ms: Option<f64>,
    /// Overrides `zero_crossing_tolerance`.
    pub tolerance: Option<u32>,
    /// Where the JSON report is written, if anywhere.
    pub report: Option<PathBuf>,
}

/// Run the loop command
///
/// # Returns
/// Exit code: 0 when a loop (or the untouched input) was written, 1 on error.
/// Quality flags never change the exit code.
pub fn run(args: &LoopArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

fn run_human(args: &LoopArgs) -> Result<ExitCode> {
    println!("{} {}", "Looping:".cyan().bold(), args.input.display());
    let start = Instant::now();
    let report = execute(args)?;

    print_report(&report);
    println!(
        "{} {} ({} ms)",
        "Wrote:".green().bold(),
        args.output.display(),
        start.elapsed().as_millis()
    );
    if let Some(path) = &args.report {
        println!("{} {}", "Report:".dimmed(), path.display());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_json(args: &LoopArgs) -> Result<ExitCode> {
    let start = Instant::now();
    let (output, code) = match execute(args) {
        Ok(report) => {
            let warnings = report_warnings(&report);
            let result = LoopResult {
                output: args.output.display().to_string(),
                report_path: args.report.as_ref().map(|p| p.display().to_string()),
                report,
                duration_ms: start.elapsed().as_millis() as u64,
            };
            (CommandOutput::success(result, warnings), ExitCode::SUCCESS)
        }
        Err(e) => (CommandOutput::failure(vec![error_to_json(&e)]), ExitCode::from(1)),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Loads parameters from `path`, or the defaults when there is none.
pub fn load_params(path: Option<&Path>) -> Result<LoopParams> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read params file: {}", path.display()))?;
            LoopParams::from_json(&text)
                .with_context(|| format!("Failed to parse params file: {}", path.display()))
        }
        None => Ok(LoopParams::default()),
    }
}

/// Applies command-line overrides on top of file or default parameters.
pub fn resolve_params(args: &LoopArgs) -> Result<LoopParams> {
    let mut params = load_params(args.params.as_deref())?;
    if let Some(ms) = args.loop_ms {
        params.loop_ms = ms;
    }
    if let Some(ms) = args.crossfade_ms {
        params.crossfade_ms = ms;
    }
    if let Some(db) = args.db_threshold {
        params.db_threshold = db;
    }
    if let Some(ms) = args.max_phase_shift_ms {
        params.max_phase_shift_ms = ms;
    }
    if let Some(tolerance) = args.tolerance {
        params.zero_crossing_tolerance = tolerance;
    }
    params.validate()?;
    Ok(params)
}

/// Makes the loop and writes every requested file. Returns the report.
pub fn execute(args: &LoopArgs) -> Result<LoopReport> {
    let params = resolve_params(args)?;
    let input = read_wav(&args.input)
        .with_context(|| format!("Failed to read input: {}", args.input.display()))?;

    let outcome = make_loop(&input, &params)?;
    let hash = WavExporter
        .export(&outcome.buffer, &args.output)
        .with_context(|| format!("Failed to write loop: {}", args.output.display()))?;

    let mut report = outcome.report;
    report.pcm_hash = Some(hash);

    if let Some(path) = &args.report {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create report directory: {}", parent.display())
                })?;
            }
        }
        fs::write(path, report.to_json_pretty()?)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }
    Ok(report)
}

fn print_report(report: &LoopReport) {
    let seam = match report.seam {
        SeamKind::Natural { start, end } => format!("natural ({}..{})", start, end),
        SeamKind::Synthetic => "synthetic crossfade".to_string(),
        SeamKind::Untouched => "untouched".to_string(),
    };
    println!(
        "{} {} -> {} frames, {} Hz, {} ch",
        "Frames:".dimmed(),
        report.input_frames,
        report.output_frames,
        report.sample_rate,
        report.channels
    );
    if let (Some(start), Some(db)) = (report.region_start, report.stability_db) {
        println!(
            "{} start {} ({:.2} dB spread)",
            "Region:".dimmed(),
            start,
            db
        );
    }
    println!(
        "{} {}, phase shift {}",
        "Seam:".dimmed(),
        seam,
        report.phase_shift
    );
    for flag in &report.flags {
        println!("  {} {}", "!".yellow(), flag);
    }
}
