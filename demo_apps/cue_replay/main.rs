//! Cue Replay
//!
//! Replays a viseme cue list at a fixed 60 Hz against a synthetic
//! avatar rig and prints a meter of the main mouth influences.
//!
//! ```text
//! cue_replay [CUES.json] [SETTINGS.json]
//! ```
//!
//! Without arguments a short built-in phrase is played. Set `RUST_LOG=debug`
//! to see the engine's tick log.

use anyhow::Context;
use lipsync::prelude::*;
use lipsync::scene::MeshKey;

const FPS: f64 = 60.0;
const METER_WIDTH: usize = 16;
const TAIL_SECONDS: f64 = 1.0;
const METERED: [&str; 4] = ["mouthOpen", "jawOpen", "viseme_aa", "viseme_PP"];

/// Stand-in for an audio element that starts with the replay and stops at
/// the end of the cue timeline.
struct ScriptedAudio {
    clock: ManualClock,
    duration: f64,
}

impl AudioSource for ScriptedAudio {
    fn current_time(&self) -> f64 {
        self.clock.now().min(self.duration)
    }

    fn paused(&self) -> bool {
        self.clock.now() >= self.duration
    }
}

fn demo_cues() -> Vec<RawCue> {
    vec![
        RawCue::at(Viseme::X, 0.0),
        RawCue::at(Viseme::C, 0.12),
        RawCue::at(Viseme::E, 0.24),
        RawCue::at(Viseme::B, 0.38),
        RawCue::at(Viseme::G, 0.5),
        RawCue::at(Viseme::A, 0.72),
        RawCue::at(Viseme::D, 0.8),
        RawCue::at(Viseme::X, 1.05),
    ]
}

fn load_cues(path: &str) -> anyhow::Result<Vec<RawCue>> {
    let payload =
        std::fs::read_to_string(path).with_context(|| format!("reading cues from {path}"))?;
    lipsync::cues_from_json(&payload).with_context(|| format!("parsing cues in {path}"))
}

fn build_avatar() -> anyhow::Result<(Scene, MeshKey)> {
    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Armature");

    scene.add_morph_mesh_to_parent(MorphMesh::static_mesh("Wolf3D_Body"), root)?;
    scene.add_morph_mesh_to_parent(
        MorphMesh::new(
            "Wolf3D_Head",
            [
                "viseme_sil",
                "viseme_PP",
                "viseme_FF",
                "viseme_aa",
                "viseme_E",
                "viseme_I",
                "viseme_O",
                "viseme_U",
                "mouthOpen",
                "mouthSmile",
                "jawOpen",
                "eyeBlinkLeft",
                "eyeBlinkRight",
            ],
        ),
        root,
    )?;
    scene.add_morph_mesh_to_parent(MorphMesh::new("Wolf3D_Teeth", ["mouthOpen", "jawOpen"]), root)?;

    let head = scene
        .find_mesh_by_name("Wolf3D_Head")
        .context("head mesh missing from synthetic rig")?;
    Ok((scene, head))
}

fn meter(value: f32) -> String {
    let filled = ((value.clamp(0.0, 1.0) * METER_WIDTH as f32).round() as usize).min(METER_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(METER_WIDTH - filled))
}

fn print_row(time: f64, outcome: FrameOutcome, scene: &Scene, head: MeshKey) {
    let state = match outcome {
        FrameOutcome::Active { blend, .. } => format!(
            "{}>{} {:.2}",
            blend.prev,
            blend.next.map_or("-", Viseme::as_str),
            blend.blend
        ),
        FrameOutcome::Idle => "idle".to_string(),
        FrameOutcome::Skipped => "skipped".to_string(),
    };

    let Some(mesh) = scene.get_mesh(head) else {
        return;
    };
    let meters: Vec<String> = METERED
        .iter()
        .map(|name| meter(mesh.influence(name).unwrap_or(0.0)))
        .collect();
    println!("{time:6.3}s  {state:<10}  {}", meters.join(" "));
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let cues = match args.next() {
        Some(path) => load_cues(&path)?,
        None => demo_cues(),
    };
    let settings = match args.next() {
        Some(path) => EngineSettings::from_file(&path)
            .with_context(|| format!("reading settings from {path}"))?,
        None => EngineSettings::default(),
    };

    let (mut scene, head) = build_avatar()?;
    let clock = ManualClock::new(0.0);
    let mut engine = LipSyncEngine::with_time_source(settings, clock.clone());
    engine.attach_scene(&mut scene);
    engine.set_cue_list(cues);

    let duration = engine.timeline().last_end();
    let audio = ScriptedAudio {
        clock: clock.clone(),
        duration,
    };
    engine.handle_audio_event(AudioEvent::Play);

    println!("time     state       {}", METERED.map(|n| format!("{n:<METER_WIDTH$}")).join(" "));

    let total_frames = ((duration + TAIL_SECONDS) * FPS).ceil() as u32;
    let mut was_playing = true;
    for frame in 0..total_frames {
        let now = f64::from(frame) / FPS;
        clock.set(now);

        let playing = audio.is_playing();
        if was_playing && !playing {
            engine.handle_audio_event(AudioEvent::Ended);
        }
        was_playing = playing;

        let outcome = engine.update(&mut scene, Some(&audio));
        if frame % 3 == 0 {
            print_row(now, outcome, &scene, head);
        }
    }

    log::info!(
        "Replayed {:.2}s of cues, final head pitch {:.4} rad",
        duration,
        engine.head_pitch()
    );
    Ok(())
}
