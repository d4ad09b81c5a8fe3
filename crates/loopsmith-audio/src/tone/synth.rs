//! Additive tone source.

use std::f64::consts::{FRAC_PI_4, PI};

use log::debug;
use rand::Rng;

use super::timbre::{Timbre, TimbreProfile};
use super::{midi_to_frequency, seconds_to_frames, CaptureTiming, NoteCapture, ToneSource};
use crate::envelope::AdsrEnvelope;
use crate::error::{AudioError, AudioResult};
use crate::pcm::{to_i16, PcmBuffer};
use crate::rng::{create_rng, derive_component_seed, derive_note_seed};

/// Harmonics above this fraction of Nyquist are dropped.
const NYQUIST_MARGIN: f64 = 0.9;

/// One-pole smoothing applied to breath noise.
const BREATH_SMOOTHING: f64 = 0.85;

/// Width of the note-dependent stereo spread (0 = mono, 1 = hard pan at the extremes).
const STEREO_SPREAD: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
struct Program {
    preset: u8,
    timbre: Timbre,
}

/// Built-in additive synthesizer producing stereo 16-bit captures.
///
/// Only bank 0 exists. Output is fully determined by the base seed, the
/// selected program and the note.
#[derive(Debug, Clone)]
pub struct SynthToneSource {
    sample_rate: u32,
    gain: f64,
    seed: u32,
    program: Option<Program>,
}

impl SynthToneSource {
    /// Creates a synthesizer. `gain` is clamped to `0.0..=1.0`.
    pub fn new(sample_rate: u32, gain: f64, seed: u32) -> AudioResult<Self> {
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate { rate: sample_rate });
        }
        Ok(Self {
            sample_rate,
            gain: if gain.is_finite() {
                gain.clamp(0.0, 1.0)
            } else {
                0.0
            },
            seed,
            program: None,
        })
    }

    /// Output gain.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Family of the selected program, if any.
    pub fn timbre(&self) -> Option<Timbre> {
        self.program.map(|p| p.timbre)
    }

    fn render(
        &self,
        program: Program,
        note: u8,
        timing: &CaptureTiming,
    ) -> AudioResult<PcmBuffer> {
        let sr = self.sample_rate as f64;
        let attack = seconds_to_frames(timing.attack_s, self.sample_rate);
        let sustain = seconds_to_frames(timing.sustain_s, self.sample_rate);
        let release = seconds_to_frames(timing.release_s, self.sample_rate);
        let total = attack + sustain + release;
        let release_at = attack + sustain;

        let profile = program.timbre.profile();
        let note_seed = derive_note_seed(self.seed, program.preset, note);
        let partials = partials(&profile, midi_to_frequency(note), sr, note_seed);
        let norm: f64 = partials.iter().map(|p| p.amplitude).sum::<f64>() + profile.breath;
        let scale = if norm > 0.0 {
            self.gain * (timing.velocity as f64 / 127.0) * i16::MAX as f64 / norm
        } else {
            0.0
        };

        let pan = ((note as f64 - 64.0) / 64.0 * STEREO_SPREAD).clamp(-1.0, 1.0);
        let angle = (pan + 1.0) * FRAC_PI_4;
        let (left_gain, right_gain) = (angle.cos(), angle.sin());

        let mut breath_rng = create_rng(derive_component_seed(note_seed, "breath"));
        let mut breath_state = 0.0;

        let mut envelope = AdsrEnvelope::new(profile.envelope, self.sample_rate);
        let mut key_down = true;
        let mut pedal_down = timing.use_pedal;
        envelope.note_on();

        let mut samples = Vec::with_capacity(total * 2);
        for frame in 0..total {
            if frame == release_at {
                key_down = false;
                pedal_down = false;
            }
            if !key_down && !pedal_down {
                envelope.note_off();
            }

            let t = frame as f64 / sr;
            let mut value: f64 = partials
                .iter()
                .map(|p| p.amplitude * (2.0 * PI * p.frequency * t + p.phase).sin())
                .sum();
            if profile.breath > 0.0 {
                let white = breath_rng.gen::<f64>() * 2.0 - 1.0;
                breath_state = BREATH_SMOOTHING * breath_state + (1.0 - BREATH_SMOOTHING) * white;
                value += profile.breath * breath_state;
            }

            let level = envelope.next_level() * value * scale;
            samples.push(to_i16(level * left_gain));
            samples.push(to_i16(level * right_gain));
        }

        PcmBuffer::new(self.sample_rate, 2, samples)
    }
}

#[derive(Debug, Clone, Copy)]
struct Partial {
    frequency: f64,
    amplitude: f64,
    phase: f64,
}

fn partials(profile: &TimbreProfile, fundamental: f64, sample_rate: f64, seed: u32) -> Vec<Partial> {
    let limit = NYQUIST_MARGIN * sample_rate / 2.0;
    let mut rng = create_rng(derive_component_seed(seed, "phases"));
    profile
        .harmonics
        .iter()
        .enumerate()
        .map(|(i, &amplitude)| Partial {
            frequency: fundamental * (i + 1) as f64,
            amplitude,
            phase: rng.gen::<f64>() * 2.0 * PI,
        })
        .filter(|p| p.amplitude > 0.0 && p.frequency < limit)
        .collect()
}

impl ToneSource for SynthToneSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn select_program(&mut self, bank: u16, preset: u8) -> AudioResult<()> {
        if bank != 0 {
            return Err(AudioError::tone_source(format!(
                "bank {} not available (only bank 0)",
                bank
            )));
        }
        if preset > 127 {
            return Err(AudioError::tone_source(format!(
                "program {} out of range 0-127",
                preset
            )));
        }
        let timbre = Timbre::from_program(preset);
        debug!("program {} -> {} timbre", preset, timbre.name());
        self.program = Some(Program { preset, timbre });
        Ok(())
    }

    fn capture(&mut self, note: u8, timing: &CaptureTiming) -> AudioResult<NoteCapture> {
        let program = self
            .program
            .ok_or_else(|| AudioError::tone_source("no program selected"))?;
        if note > 127 {
            return Err(AudioError::tone_source(format!(
                "note {} out of range 0-127",
                note
            )));
        }
        if timing.velocity == 0 || timing.velocity > 127 {
            return Err(AudioError::tone_source(format!(
                "velocity {} out of range 1-127",
                timing.velocity
            )));
        }

        let rendered = self.render(program, note, timing)?;
        let attack = seconds_to_frames(timing.attack_s, self.sample_rate);
        let sustain = seconds_to_frames(timing.sustain_s, self.sample_rate);
        let release = seconds_to_frames(timing.release_s, self.sample_rate);
        Ok(NoteCapture {
            attack: rendered.slice_frames(0, attack),
            sustain: rendered.slice_frames(attack, sustain),
            release: rendered.slice_frames(attack + sustain, release),
        })
    }
}
