//! Captures from the built-in synthesizer fed through the loop maker.

use loopsmith_audio::loop_processing::{fade_in, fade_out};
use loopsmith_audio::{make_loop, CaptureTiming, SynthToneSource, ToneSource};
use loopsmith_spec::{LoopParams, QualityKind};

fn capture(preset: u8, note: u8) -> loopsmith_audio::NoteCapture {
    let mut synth = SynthToneSource::new(22050, 0.6, 0).unwrap();
    synth.select_program(0, preset).unwrap();
    synth
        .capture(
            note,
            &CaptureTiming {
                attack_s: 0.45,
                sustain_s: 1.0,
                release_s: 0.45,
                velocity: 100,
                use_pedal: true,
            },
        )
        .unwrap()
}

#[test]
fn test_sustained_strings_loop_cleanly() {
    let capture = capture(48, 57);
    let outcome = make_loop(&capture.sustain, &LoopParams::new(450.0, 100.0)).unwrap();

    assert_eq!(outcome.buffer.frame_count(), 9922);
    assert_eq!(outcome.buffer.channels(), 2);
    assert!(!outcome.report.has_flag(QualityKind::InsufficientLength));
    assert!(!outcome.report.has_flag(QualityKind::WeakSignal));
    assert!(!outcome.report.has_flag(QualityKind::UnstableLoudness));
}

#[test]
fn test_every_default_family_produces_a_loop() {
    for preset in [0u8, 4, 19, 24, 29, 40, 56, 65, 73, 83] {
        let capture = capture(preset, 60);
        let outcome = make_loop(&capture.sustain, &LoopParams::new(450.0, 100.0)).unwrap();
        assert_eq!(outcome.buffer.frame_count(), 9922, "preset {}", preset);
        assert!(
            !outcome.report.has_flag(QualityKind::WeakSignal),
            "preset {}",
            preset
        );
    }
}

#[test]
fn test_attack_and_release_fades() {
    let mut capture = capture(73, 72);
    assert_eq!(fade_in(&mut capture.attack, 10.0), 220);
    assert_eq!(fade_out(&mut capture.release, 10.0), 220);
    assert_eq!(&capture.attack.samples()[..2], &[0, 0]);
    let release = capture.release.samples();
    assert_eq!(&release[release.len() - 2..], &[0, 0]);
}
