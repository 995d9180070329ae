//! Timeline Normalization Tests
//!
//! Tests for:
//! - Start/end derivation from partial timing (start, time, successor onset)
//! - Millisecond detection (all-or-nothing) and rescaling
//! - Stable ordering and end clamping
//! - Idempotence and empty input
//! - JSON cue payloads and settings files

use lipsync::core::{EngineSettings, RawCue, Timeline, Viseme, cues_from_json};

const EPSILON: f64 = 1e-9;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn normalize(raw: &[RawCue]) -> Timeline {
    Timeline::normalize(raw, &EngineSettings::default())
}

/// Feeds a normalized timeline back in as explicit intervals.
fn renormalize(timeline: &Timeline) -> Timeline {
    let raw: Vec<RawCue> = timeline
        .cues()
        .iter()
        .map(|c| RawCue::interval(c.value, c.start, c.end))
        .collect();
    normalize(&raw)
}

// ============================================================================
// Start / End Derivation
// ============================================================================

#[test]
fn explicit_intervals_pass_through() {
    let timeline = normalize(&[
        RawCue::interval(Viseme::X, 0.0, 0.3),
        RawCue::interval(Viseme::D, 0.3, 0.6),
        RawCue::interval(Viseme::X, 0.6, 0.9),
    ]);

    assert_eq!(timeline.len(), 3);
    assert!(!timeline.from_milliseconds());
    assert_eq!(timeline.cues()[1].value, Viseme::D);
    assert!(approx(timeline.cues()[1].start, 0.3));
    assert!(approx(timeline.cues()[1].end, 0.6));
    assert!(approx(timeline.last_end(), 0.9));
}

#[test]
fn point_cues_end_at_next_onset() {
    let timeline = normalize(&[
        RawCue::at(Viseme::B, 0.1),
        RawCue::at(Viseme::C, 0.25),
        RawCue::at(Viseme::X, 0.4),
    ]);

    let cues = timeline.cues();
    assert!(approx(cues[0].end, 0.25), "got {}", cues[0].end);
    assert!(approx(cues[1].end, 0.4), "got {}", cues[1].end);
    // Last cue has no successor: default length.
    assert!(approx(cues[2].end, 0.48), "got {}", cues[2].end);
}

#[test]
fn start_takes_precedence_over_time() {
    let raw = RawCue {
        time: Some(5.0),
        start: Some(1.0),
        end: None,
        value: Viseme::E,
    };
    let timeline = normalize(&[raw]);
    assert!(approx(timeline.cues()[0].start, 1.0));
    assert!(approx(timeline.cues()[0].end, 1.08));
}

#[test]
fn untimed_cue_starts_at_zero() {
    let timeline = normalize(&[RawCue::new(Viseme::F)]);
    let cue = timeline.cues()[0];
    assert!(approx(cue.start, 0.0));
    assert!(approx(cue.end, 0.08));
}

#[test]
fn non_finite_values_count_as_absent() {
    let timeline = normalize(&[
        RawCue {
            time: None,
            start: Some(f64::NAN),
            end: Some(f64::INFINITY),
            value: Viseme::G,
        },
        RawCue::at(Viseme::X, 0.5),
    ]);
    let cues = timeline.cues();
    assert!(approx(cues[0].start, 0.0));
    assert!(approx(cues[0].end, 0.5));
}

// ============================================================================
// Unit Detection
// ============================================================================

#[test]
fn milliseconds_detected_and_rescaled() {
    let timeline = normalize(&[
        RawCue::interval(Viseme::X, 0.0, 300.0),
        RawCue::interval(Viseme::D, 300.0, 1200.0),
    ]);

    assert!(timeline.from_milliseconds());
    assert!(approx(timeline.cues()[0].end, 0.3));
    assert!(approx(timeline.cues()[1].start, 0.3));
    assert!(approx(timeline.cues()[1].end, 1.2));
}

#[test]
fn unit_detection_is_all_or_nothing() {
    // One large value rescales every cue, including the small ones.
    let timeline = normalize(&[
        RawCue::interval(Viseme::B, 0.0, 2.0),
        RawCue::interval(Viseme::C, 2.0, 1500.0),
    ]);
    assert!(timeline.from_milliseconds());
    assert!(approx(timeline.cues()[0].end, 0.002));
}

#[test]
fn threshold_itself_is_seconds() {
    let timeline = normalize(&[RawCue::interval(Viseme::D, 999.0, 1000.0)]);
    assert!(!timeline.from_milliseconds());
    assert!(approx(timeline.last_end(), 1000.0));
}

#[test]
fn default_fill_counts_toward_detection() {
    // The fill is added before unit detection.
    let timeline = Timeline::normalize_with(&[RawCue::at(Viseme::A, 999.95)], 0.08, 1000.0);
    assert!(timeline.from_milliseconds());
    assert!(approx(timeline.cues()[0].start, 0.99995));
}

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn cues_sorted_by_start() {
    let timeline = normalize(&[
        RawCue::interval(Viseme::C, 0.6, 0.9),
        RawCue::interval(Viseme::A, 0.0, 0.3),
        RawCue::interval(Viseme::B, 0.3, 0.6),
    ]);
    let values: Vec<Viseme> = timeline.cues().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![Viseme::A, Viseme::B, Viseme::C]);
}

#[test]
fn identical_starts_keep_input_order() {
    let timeline = normalize(&[
        RawCue::interval(Viseme::E, 0.5, 0.7),
        RawCue::interval(Viseme::A, 0.1, 0.2),
        RawCue::interval(Viseme::F, 0.5, 0.6),
    ]);
    let values: Vec<Viseme> = timeline.cues().iter().map(|c| c.value).collect();
    assert_eq!(values, vec![Viseme::A, Viseme::E, Viseme::F]);
}

#[test]
fn end_clamped_to_start() {
    let timeline = normalize(&[RawCue::interval(Viseme::D, 0.5, 0.2)]);
    let cue = timeline.cues()[0];
    assert!(approx(cue.end, 0.5));
    assert!(cue.duration() >= 0.0);
}

#[test]
fn every_cue_is_well_formed() {
    let timeline = normalize(&[
        RawCue::at(Viseme::H, 2.0),
        RawCue::interval(Viseme::B, 1.0, 0.5),
        RawCue::new(Viseme::X),
        RawCue::at(Viseme::G, 0.75),
    ]);
    for pair in timeline.cues().windows(2) {
        assert!(pair[0].start <= pair[1].start, "{pair:?}");
    }
    for cue in timeline.cues() {
        assert!(cue.start <= cue.end, "{cue:?}");
    }
}

// ============================================================================
// Idempotence / Empty
// ============================================================================

#[test]
fn normalization_is_idempotent() {
    let once = normalize(&[
        RawCue::at(Viseme::B, 100.0),
        RawCue::at(Viseme::D, 400.0),
        RawCue::at(Viseme::X, 1100.0),
    ]);
    let twice = renormalize(&once);

    assert_eq!(once.len(), twice.len());
    assert!(!twice.from_milliseconds());
    for (a, b) in once.cues().iter().zip(twice.cues()) {
        assert_eq!(a.value, b.value);
        assert!(approx(a.start, b.start));
        assert!(approx(a.end, b.end));
    }
}

#[test]
fn empty_input_gives_empty_timeline() {
    let timeline = normalize(&[]);
    assert!(timeline.is_empty());
    assert!(!timeline.from_milliseconds());
    assert_eq!(timeline.last_end(), 0.0);
}

#[test]
fn negative_timeline_reports_zero_last_end() {
    let timeline = normalize(&[RawCue::interval(Viseme::D, -1.0, -0.5)]);
    assert_eq!(timeline.last_end(), 0.0);
}

// ============================================================================
// JSON Input
// ============================================================================

#[test]
fn json_payload_normalizes() {
    let raw = cues_from_json(
        r#"[
            {"value": "X", "time": 0},
            {"value": "D", "time": 300},
            {"value": "x", "start": 600, "end": 1100}
        ]"#,
    )
    .unwrap();
    let timeline = normalize(&raw);

    assert!(timeline.from_milliseconds());
    assert_eq!(timeline.cues()[2].value, Viseme::X);
    assert!(approx(timeline.cues()[0].end, 0.3));
    assert!(approx(timeline.last_end(), 1.1));
}

#[test]
fn unknown_symbols_become_silence() {
    let raw = cues_from_json(r#"[{"value": "Q", "start": 0.0, "end": 0.2}]"#).unwrap();
    assert_eq!(raw[0].value, Viseme::X);
}

#[test]
fn settings_from_file() {
    let dir = std::env::temp_dir().join(format!("lipsync-settings-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    std::fs::write(&path, r#"{ "default_cue_length": 0.1 }"#).unwrap();

    let settings = EngineSettings::from_file(&path).unwrap();
    let timeline = Timeline::normalize(&[RawCue::new(Viseme::C)], &settings);
    assert!(approx(timeline.cues()[0].end, 0.1));

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_settings_file_is_io_error() {
    let err = EngineSettings::from_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, lipsync::LipSyncError::IoError(_)), "{err}");
}
