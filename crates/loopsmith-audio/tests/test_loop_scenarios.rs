//! End-to-end loop scenarios through the public API.

use loopsmith_audio::wav::{read_wav_bytes, write_wav_to_vec};
use loopsmith_audio::{make_loop, PcmBuffer};
use loopsmith_spec::{LoopParams, QualityKind, SeamKind};
use pretty_assertions::assert_eq;

fn stereo_sine(sample_rate: u32, freq: f64, amp: f64, seconds: f64) -> PcmBuffer {
    let frames = (sample_rate as f64 * seconds) as usize;
    let mut samples = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let s = (amp * (2.0 * std::f64::consts::PI * freq * t).sin()).round() as i16;
        samples.push(s);
        samples.push(s);
    }
    PcmBuffer::new(sample_rate, 2, samples).unwrap()
}

#[test]
fn test_sine_440_stereo_natural_seam() {
    let input = stereo_sine(44100, 440.0, 16000.0, 2.0);
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();

    assert_eq!(outcome.buffer.samples().len(), 19845 * 2);
    assert_eq!(outcome.buffer.channels(), 2);
    assert_eq!(outcome.buffer.sample_rate(), 44100);
    assert!(outcome.report.is_clean(), "flags: {:?}", outcome.report.flags);
    assert!(!outcome.report.has_flag(QualityKind::SyntheticSeam));
    assert_eq!(
        outcome.report.seam,
        SeamKind::Natural {
            start: 0,
            end: 19845
        }
    );
    assert_eq!(outcome.report.phase_shift, 0);
    assert_eq!(outcome.report.edge_fade_frames, 882);
}

#[test]
fn test_natural_seam_indices_are_one_loop_apart() {
    let input = stereo_sine(44100, 440.0, 16000.0, 2.0);
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();
    match outcome.report.seam {
        SeamKind::Natural { start, end } => assert_eq!(end - start, 19845),
        other => panic!("expected a natural seam, got {:?}", other),
    }
}

#[test]
fn test_silence_scenario() {
    let input = PcmBuffer::silent(44100, 2, 44100).unwrap();
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();

    assert_eq!(outcome.report.region_start, Some(0));
    assert_eq!(
        outcome.report.seam,
        SeamKind::Natural {
            start: 0,
            end: 19845
        }
    );
    assert!(outcome.report.has_flag(QualityKind::WeakSignal));
    assert_eq!(outcome.buffer.frame_count(), 19845);
}

#[test]
fn test_short_input_scenario() {
    // 0.5 s is shorter than 450 ms + 100 ms.
    let input = stereo_sine(44100, 440.0, 16000.0, 0.5);
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();

    assert_eq!(outcome.buffer, input);
    assert_eq!(outcome.report.flag_codes(), vec!["Q001"]);
}

#[test]
fn test_weak_signal_scenario() {
    let input = stereo_sine(44100, 440.0, 100.0, 2.0);
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();

    assert!(outcome.report.has_flag(QualityKind::WeakSignal));
    assert_eq!(outcome.report.reference_peak, 100);
    assert_eq!(outcome.buffer.frame_count(), 19845);
}

#[test]
fn test_loop_survives_wav_roundtrip() {
    let input = stereo_sine(22050, 330.0, 12000.0, 1.5);
    let wav = write_wav_to_vec(&input);
    let decoded = read_wav_bytes(&wav).unwrap();
    assert_eq!(decoded, input);

    let outcome = make_loop(&decoded, &LoopParams::default()).unwrap();
    let looped = read_wav_bytes(&write_wav_to_vec(&outcome.buffer)).unwrap();
    assert_eq!(looped, outcome.buffer);
    assert_eq!(looped.frame_count(), 8820);
}

#[test]
fn test_report_serializes() {
    let input = stereo_sine(44100, 440.0, 16000.0, 2.0);
    let outcome = make_loop(&input, &LoopParams::new(450.0, 100.0)).unwrap();
    let json = outcome.report.to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["seam"]["kind"], "natural");
    assert_eq!(value["output_frames"], 19845);
}
