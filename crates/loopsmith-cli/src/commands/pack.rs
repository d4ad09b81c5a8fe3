//! Pack command implementation
//!
//! Renders every configured instrument and note through a tone source into a
//! resource pack: four WAV files per note, a `sounds.json` catalog and a
//! `pack.mcmeta`.

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::info;
use loopsmith_audio::loop_processing::{fade_in, fade_out};
use loopsmith_audio::{
    make_loop, CaptureTiming, Exporter, PcmBuffer, SynthToneSource, ToneSource, WavExporter,
};
use loopsmith_spec::{InstrumentEntry, NotePart, PackConfig, PackMeta, SoundCatalog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_to_json, CommandOutput, JsonWarning};

/// Velocity used for every capture.
pub const CAPTURE_VELOCITY: u8 = 100;

/// Inputs of the pack command.
#[derive(Debug, Clone, Default)]
pub struct PackArgs {
    /// Optional JSON pack configuration.
    pub config: Option<PathBuf>,
    /// Output root of the pack.
    pub out_dir: PathBuf,
    /// Instruments to render; all when empty.
    pub instruments: Vec<String>,
    /// Note keys to render; the configured ones when empty.
    pub notes: Vec<String>,
    /// Overrides the base seed.
    pub seed: Option<u32>,
    /// Overrides the sample rate.
    pub sample_rate: Option<u32>,
}

/// Outcome for one rendered note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteSummary {
    /// Instrument name.
    pub instrument: String,
    /// Note key as configured.
    pub note: String,
    /// MIDI note number.
    pub midi: u8,
    /// Quality flag codes raised while looping the sustain.
    pub flags: Vec<String>,
}

/// Outcome of a pack render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSummary {
    /// Output root.
    pub out_dir: String,
    /// Audio files written.
    pub files_written: usize,
    /// Catalog events written.
    pub events: usize,
    /// Per-note results, in render order.
    pub notes: Vec<NoteSummary>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PackSummary {
    /// Notes whose loop raised at least one flag.
    pub fn flagged(&self) -> impl Iterator<Item = &NoteSummary> {
        self.notes.iter().filter(|n| !n.flags.is_empty())
    }
}

/// Run the pack command
///
/// # Returns
/// Exit code: 0 if the pack was written, 1 on error.
pub fn run(args: &PackArgs, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(args)
    } else {
        run_human(args)
    }
}

fn run_human(args: &PackArgs) -> Result<ExitCode> {
    let (config, instruments) = resolve_config(args)?;
    println!(
        "{} {} instruments x {} notes -> {}",
        "Rendering:".cyan().bold(),
        instruments.len(),
        config.notes.len(),
        args.out_dir.display()
    );

    let summary = render_with_synth(&config, &instruments, &args.out_dir)?;
    for note in summary.flagged() {
        println!(
            "  {} {} {} [{}]",
            "!".yellow(),
            note.instrument,
            note.note,
            note.flags.join(", ")
        );
    }
    println!(
        "{} {} files, {} events ({} ms)",
        "Done:".green().bold(),
        summary.files_written,
        summary.events,
        summary.duration_ms
    );
    Ok(ExitCode::SUCCESS)
}

fn run_json(args: &PackArgs) -> Result<ExitCode> {
    let rendered = resolve_config(args)
        .and_then(|(config, instruments)| render_with_synth(&config, &instruments, &args.out_dir));
    let (output, code) = match rendered {
        Ok(summary) => {
            let warnings = summary
                .flagged()
                .flat_map(|n| {
                    n.flags.iter().map(move |code| {
                        JsonWarning::new(code.clone(), format!("{} {}", n.instrument, n.note))
                    })
                })
                .collect();
            (CommandOutput::success(summary, warnings), ExitCode::SUCCESS)
        }
        Err(e) => (
            CommandOutput::<PackSummary>::failure(vec![error_to_json(&e)]),
            ExitCode::from(1),
        ),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(code)
}

/// Loads the configuration, applies overrides and picks instruments.
pub fn resolve_config(args: &PackArgs) -> Result<(PackConfig, Vec<InstrumentEntry>)> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read pack config: {}", path.display()))?;
            PackConfig::from_json(&text)
                .with_context(|| format!("Failed to parse pack config: {}", path.display()))?
        }
        None => PackConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rate) = args.sample_rate {
        config.sample_rate = rate;
    }
    if !args.notes.is_empty() {
        config.notes = args.notes.clone();
    }
    config.validate()?;
    let instruments = config.select_instruments(&args.instruments)?;
    Ok((config, instruments))
}

fn render_with_synth(
    config: &PackConfig,
    instruments: &[InstrumentEntry],
    out_dir: &Path,
) -> Result<PackSummary> {
    let mut source = SynthToneSource::new(config.sample_rate, config.gain, config.seed)?;
    render_pack(config, instruments, &mut source, &WavExporter, out_dir)
}

/// Sound directory of one instrument inside the pack.
pub fn instrument_dir(out_dir: &Path, namespace: &str, instrument: &str) -> PathBuf {
    out_dir
        .join("assets")
        .join(namespace)
        .join("sounds")
        .join(instrument)
}

/// Renders a pack with any tone source and exporter.
pub fn render_pack<S: ToneSource, E: Exporter>(
    config: &PackConfig,
    instruments: &[InstrumentEntry],
    source: &mut S,
    exporter: &E,
    out_dir: &Path,
) -> Result<PackSummary> {
    let start = Instant::now();
    config.validate()?;
    let keys = config.note_keys()?;
    if source.sample_rate() != config.sample_rate {
        bail!(
            "tone source runs at {} Hz but the pack is configured for {} Hz",
            source.sample_rate(),
            config.sample_rate
        );
    }

    for instrument in instruments {
        let dir = instrument_dir(out_dir, &config.namespace, &instrument.name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let loop_params = config.effective_loop_params();
    let timing = CaptureTiming {
        attack_s: config.attack_s(),
        sustain_s: config.sustain_s,
        release_s: config.release_s(),
        velocity: CAPTURE_VELOCITY,
        use_pedal: true,
    };
    let full_timing = CaptureTiming {
        sustain_s: config.attack_s(),
        ..timing
    };

    let mut catalog = SoundCatalog::new();
    let mut notes = Vec::new();
    let mut files_written = 0;

    for instrument in instruments {
        source
            .select_program(instrument.bank, instrument.preset)
            .with_context(|| format!("Failed to select program for {}", instrument.name))?;
        let dir = instrument_dir(out_dir, &config.namespace, &instrument.name);

        for (name, key) in config.notes.iter().zip(&keys) {
            let note_start = Instant::now();
            let midi = key.midi();
            let slug = key.slug();

            let capture = source
                .capture(midi, &timing)
                .with_context(|| format!("Failed to capture {} {}", instrument.name, name))?;
            let mut attack = capture.attack;
            fade_in(&mut attack, config.edge_fade_ms);
            let outcome = make_loop(&capture.sustain, &loop_params)
                .with_context(|| format!("Failed to loop {} {}", instrument.name, name))?;
            let mut release = capture.release;
            fade_out(&mut release, config.edge_fade_ms);

            let take = source
                .capture(midi, &full_timing)
                .with_context(|| format!("Failed to capture {} {}", instrument.name, name))?;
            let mut full = take.joined()?;
            fade_out(&mut full, config.edge_fade_ms);

            let parts: [(NotePart, &PcmBuffer); 4] = [
                (NotePart::Attack, &attack),
                (NotePart::Loop, &outcome.buffer),
                (NotePart::Release, &release),
                (NotePart::Full, &full),
            ];
            for (part, buffer) in parts {
                let path = dir.join(format!(
                    "{}.{}",
                    part.file_stem(&slug),
                    exporter.extension()
                ));
                exporter
                    .export(buffer, &path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                files_written += 1;
            }
            catalog.insert_note(&config.namespace, &config.event_prefix, &instrument.name, &slug);

            info!(
                "{} {} (midi {}) rendered in {:.2?}",
                instrument.name,
                name,
                midi,
                note_start.elapsed()
            );
            notes.push(NoteSummary {
                instrument: instrument.name.clone(),
                note: name.clone(),
                midi,
                flags: outcome
                    .report
                    .flag_codes()
                    .into_iter()
                    .map(String::from)
                    .collect(),
            });
        }
    }

    write_catalog(out_dir, config, &catalog)?;

    Ok(PackSummary {
        out_dir: out_dir.display().to_string(),
        files_written,
        events: catalog.len(),
        notes,
        duration_ms: start.elapsed().as_millis() as u64,
    })
}

fn write_catalog(out_dir: &Path, config: &PackConfig, catalog: &SoundCatalog) -> Result<()> {
    let sounds_json = out_dir
        .join("assets")
        .join(&config.namespace)
        .join("sounds.json");
    if let Some(parent) = sounds_json.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(&sounds_json, catalog.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", sounds_json.display()))?;

    let meta_path = out_dir.join("pack.mcmeta");
    let meta = PackMeta::new(config.pack_format, config.description.clone());
    fs::write(&meta_path, meta.to_json_pretty()?)
        .with_context(|| format!("Failed to write {}", meta_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use loopsmith_audio::{AudioResult, NoteCapture};
    use pretty_assertions::assert_eq;

    fn small_config() -> PackConfig {
        PackConfig {
            sample_rate: 8000,
            segment_ms: 100.0,
            crossfade_ms: 20.0,
            sustain_s: 0.5,
            notes: vec!["C".to_string(), "A#".to_string()],
            instruments: vec![InstrumentEntry::new("flute", 0, 73)],
            ..PackConfig::default()
        }
    }

    /// Silent source that records what it was asked to play.
    struct RecordingSource {
        sample_rate: u32,
        programs: Vec<(u16, u8)>,
        captures: Vec<(u8, CaptureTiming)>,
    }

    impl RecordingSource {
        fn new(sample_rate: u32) -> Self {
            Self {
                sample_rate,
                programs: Vec::new(),
                captures: Vec::new(),
            }
        }
    }

    impl ToneSource for RecordingSource {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn select_program(&mut self, bank: u16, preset: u8) -> AudioResult<()> {
            self.programs.push((bank, preset));
            Ok(())
        }

        fn capture(&mut self, note: u8, timing: &CaptureTiming) -> AudioResult<NoteCapture> {
            self.captures.push((note, *timing));
            let frames = |s: f64| (s * self.sample_rate as f64) as usize;
            Ok(NoteCapture {
                attack: PcmBuffer::silent(self.sample_rate, 2, frames(timing.attack_s))?,
                sustain: PcmBuffer::silent(self.sample_rate, 2, frames(timing.sustain_s))?,
                release: PcmBuffer::silent(self.sample_rate, 2, frames(timing.release_s))?,
            })
        }
    }

    #[test]
    fn test_render_pack_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config();
        let mut source = SynthToneSource::new(8000, 0.6, 0).unwrap();

        let summary =
            render_pack(&config, &config.instruments, &mut source, &WavExporter, dir.path())
                .unwrap();

        assert_eq!(summary.files_written, 8);
        assert_eq!(summary.events, 8);
        assert_eq!(summary.notes.len(), 2);
        assert_eq!(summary.notes[0].midi, 36);
        assert_eq!(summary.notes[1].midi, 46);

        let flute = dir.path().join("assets/loopsmith/sounds/flute");
        for name in [
            "c_in.wav",
            "c_main.wav",
            "c_out.wav",
            "c.wav",
            "a_sharp_in.wav",
            "a_sharp_main.wav",
            "a_sharp_out.wav",
            "a_sharp.wav",
        ] {
            assert!(flute.join(name).exists(), "missing {}", name);
        }

        let main = loopsmith_audio::wav::read_wav(flute.join("c_main.wav")).unwrap();
        assert_eq!(main.frame_count(), 800);
        let full = loopsmith_audio::wav::read_wav(flute.join("c.wav")).unwrap();
        assert_eq!(full.frame_count(), 2400);

        let catalog: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("assets/loopsmith/sounds.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(
            catalog["note_flute_c_2"]["sounds"][0],
            "loopsmith:flute/c_main"
        );
        assert_eq!(catalog["note_flute_a_sharp"]["sounds"][0], "loopsmith:flute/a_sharp");

        let meta: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join("pack.mcmeta")).unwrap())
                .unwrap();
        assert_eq!(meta["pack"]["pack_format"], 12);
    }

    #[test]
    fn test_capture_sequence() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config();
        config.instruments = vec![
            InstrumentEntry::new("piano", 0, 0),
            InstrumentEntry::new("cello", 0, 42),
        ];
        config.notes = vec!["C".to_string()];
        let mut source = RecordingSource::new(8000);

        let summary =
            render_pack(&config, &config.instruments, &mut source, &WavExporter, dir.path())
                .unwrap();

        assert_eq!(source.programs, vec![(0, 0), (0, 42)]);
        assert_eq!(source.captures.len(), 4);
        let (note, main_take) = source.captures[0];
        let (_, full_take) = source.captures[1];
        assert_eq!(note, 36);
        assert!((main_take.attack_s - 0.1).abs() < 1e-9);
        assert!((main_take.sustain_s - 0.5).abs() < 1e-9);
        assert!((full_take.sustain_s - 0.1).abs() < 1e-9);
        assert_eq!(main_take.velocity, CAPTURE_VELOCITY);

        // Silent captures still loop, flagged as weak.
        assert!(summary.notes.iter().all(|n| n.flags.contains(&"Q002".to_string())));
        assert_eq!(summary.flagged().count(), 2);
    }

    #[test]
    fn test_sample_rate_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config();
        let mut source = RecordingSource::new(44100);
        let err = render_pack(&config, &config.instruments, &mut source, &WavExporter, dir.path())
            .unwrap_err();
        assert!(err.to_string().contains("44100 Hz"));
        assert!(source.captures.is_empty());
    }

    #[test]
    fn test_resolve_config_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pack.json");
        fs::write(&path, r#"{"sample_rate": 22050, "notes": ["C", "D"]}"#).unwrap();
        let args = PackArgs {
            config: Some(path),
            out_dir: dir.path().to_path_buf(),
            instruments: vec!["flute".to_string(), "cello".to_string()],
            notes: vec!["E+".to_string()],
            seed: Some(9),
            sample_rate: None,
        };

        let (config, instruments) = resolve_config(&args).unwrap();
        assert_eq!(config.sample_rate, 22050);
        assert_eq!(config.seed, 9);
        assert_eq!(config.notes, vec!["E+".to_string()]);
        let names: Vec<&str> = instruments.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["flute", "cello"]);
    }

    #[test]
    fn test_resolve_config_unknown_instrument() {
        let args = PackArgs {
            instruments: vec!["kazoo".to_string()],
            ..PackArgs::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("kazoo"));
    }

    #[test]
    fn test_resolve_config_bad_note() {
        let args = PackArgs {
            notes: vec!["H".to_string()],
            ..PackArgs::default()
        };
        assert!(resolve_config(&args).is_err());
    }
}
