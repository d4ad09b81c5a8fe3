//! Loopsmith CLI - seamless loops for sustained instrument tones
//!
//! This binary loops single captures and renders whole looped sound packs.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use loopsmith_cli::commands::loop_cmd::LoopArgs;
use loopsmith_cli::commands::pack::PackArgs;
use loopsmith_cli::{commands, logging};

/// Loopsmith - Seamless Loop Synthesis
#[derive(Parser)]
#[command(name = "loopsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug; RUST_LOG overrides)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Make a seamless loop from a captured WAV note
    Loop {
        /// Input WAV (16-bit PCM, mono or stereo)
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV path
        #[arg(short, long)]
        output: PathBuf,

        /// Loop parameters file (JSON)
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// Loop length in milliseconds
        #[arg(long)]
        loop_ms: Option<f64>,

        /// Crossfade length in milliseconds
        #[arg(long)]
        crossfade_ms: Option<f64>,

        /// Acceptable loudness spread in dB
        #[arg(long)]
        db_threshold: Option<f64>,

        /// Upper bound on the phase alignment search in milliseconds
        #[arg(long)]
        max_phase_shift_ms: Option<f64>,

        /// Zero-crossing amplitude tolerance
        #[arg(long = "zero-tolerance")]
        tolerance: Option<u32>,

        /// Write the loop report (JSON) to this path
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Render a looped sound pack with the built-in synthesizer
    Pack {
        /// Output root directory
        #[arg(short, long = "out", default_value = "pack")]
        out_dir: PathBuf,

        /// Pack configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Render only this instrument (repeatable)
        #[arg(long = "instrument")]
        instruments: Vec<String>,

        /// Render only this note key (repeatable)
        #[arg(long = "note", allow_hyphen_values = true)]
        notes: Vec<String>,

        /// Base seed for the synthesizer
        #[arg(long)]
        seed: Option<u32>,

        /// Capture sample rate in Hz
        #[arg(long)]
        sample_rate: Option<u32>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Loop {
            input,
            output,
            params,
            loop_ms,
            crossfade_ms,
            db_threshold,
            max_phase_shift_ms,
            tolerance,
            report,
            json,
        } => commands::loop_cmd::run(
            &LoopArgs {
                input,
                output,
                params,
                loop_ms,
                crossfade_ms,
                db_threshold,
                max_phase_shift_ms,
                tolerance,
                report,
            },
            json,
        ),
        Commands::Pack {
            out_dir,
            config,
            instruments,
            notes,
            seed,
            sample_rate,
            json,
        } => commands::pack::run(
            &PackArgs {
                config,
                out_dir,
                instruments,
                notes,
                seed,
                sample_rate,
            },
            json,
        ),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
