use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_builder_defaults_to_untouched() {
    let report = LoopReport::builder(1000, 44100, 2).build();
    assert_eq!(report.report_version, REPORT_VERSION);
    assert_eq!(report.input_frames, 1000);
    assert_eq!(report.output_frames, 1000);
    assert_eq!(report.seam, SeamKind::Untouched);
    assert!(report.is_clean());
}

#[test]
fn test_flags_keep_order_and_codes() {
    let report = LoopReport::builder(10, 8000, 1)
        .flag(QualityKind::WeakSignal, "peak 100 below floor 500")
        .flag(QualityKind::SyntheticSeam, "no matching crossings")
        .build();

    assert_eq!(report.flag_codes(), vec!["Q002", "Q004"]);
    assert!(report.has_flag(QualityKind::WeakSignal));
    assert!(!report.has_flag(QualityKind::InsufficientLength));
    assert!(!report.is_clean());
}

#[test]
fn test_quality_codes_are_stable() {
    assert_eq!(QualityKind::InsufficientLength.code(), "Q001");
    assert_eq!(QualityKind::WeakSignal.code(), "Q002");
    assert_eq!(QualityKind::UnstableLoudness.code(), "Q003");
    assert_eq!(QualityKind::SyntheticSeam.code(), "Q004");
    assert_eq!(QualityKind::UnstableLoudness.to_string(), "Q003");
}

#[test]
fn test_report_json_roundtrip() {
    let report = LoopReport::builder(88200, 44100, 2)
        .reference_peak(16000)
        .region(4410, 0.25)
        .phase_shift(-3)
        .seam(SeamKind::Natural {
            start: 12,
            end: 19857,
        })
        .edge_fade_frames(882)
        .output_frames(19845)
        .pcm_hash("abc123")
        .build();

    let json = report.to_json_pretty().unwrap();
    assert!(json.contains("\"kind\": \"natural\""));
    let parsed = LoopReport::from_json(&json).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_untouched_report_omits_optional_fields() {
    let report = LoopReport::builder(100, 44100, 1)
        .flag(QualityKind::InsufficientLength, "too short")
        .build();
    let json = report.to_json().unwrap();
    assert!(!json.contains("region_start"));
    assert!(!json.contains("pcm_hash"));
    assert!(json.contains("\"insufficient_length\""));
}

#[test]
fn test_flag_display() {
    let flag = QualityFlag::new(QualityKind::UnstableLoudness, "spread 3.2 dB");
    assert_eq!(flag.to_string(), "Q003: spread 3.2 dB");
}
