//! Benchmarks for the per-frame lip-sync update.
//!
//! Run:
//! - cargo bench --bench frame_update_bench

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use lipsync::animation::{LipSyncEngine, locate};
use lipsync::core::{EngineSettings, ManualClock, RawCue, Timeline, Viseme};
use lipsync::scene::{MorphMesh, Scene};

const CUE_COUNTS: [usize; 3] = [16, 128, 512];
const FRAME: f64 = 1.0 / 60.0;

/// A head with the full RPM-style viseme rig plus unrelated expression
/// targets, and a teeth mesh.
fn build_scene() -> Scene {
    let mut head_targets: Vec<String> = [
        "viseme_sil", "viseme_PP", "viseme_FF", "viseme_TH", "viseme_DD", "viseme_kk",
        "viseme_CH", "viseme_SS", "viseme_nn", "viseme_RR", "viseme_aa", "viseme_E",
        "viseme_I", "viseme_O", "viseme_U", "mouthOpen", "mouthSmile", "jawOpen",
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    head_targets.extend((0..32).map(|i| format!("expression_{i}")));

    let mut scene = Scene::new();
    let root = scene.create_node_with_name("Armature");
    scene
        .add_morph_mesh_to_parent(MorphMesh::new("Wolf3D_Head", head_targets), root)
        .expect("valid mesh");
    scene
        .add_morph_mesh_to_parent(MorphMesh::new("Wolf3D_Teeth", ["mouthOpen", "jawOpen"]), root)
        .expect("valid mesh");
    scene
}

fn build_cues(count: usize) -> Vec<RawCue> {
    (0..count)
        .map(|i| RawCue::at(Viseme::ALL[i % Viseme::ALL.len()], i as f64 * 0.07))
        .collect()
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");

    for &count in &CUE_COUNTS {
        let timeline = Timeline::normalize(&build_cues(count), &EngineSettings::default());
        let midpoint = timeline.last_end() * 0.5;

        group.bench_with_input(BenchmarkId::new("cues", count), &timeline, |b, timeline| {
            b.iter(|| black_box(locate(timeline.cues(), black_box(midpoint), 1e-4)));
        });
    }

    group.finish();
}

fn bench_frame_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_update");
    group.sample_size(50);

    for &count in &CUE_COUNTS {
        let mut scene = build_scene();
        let clock = ManualClock::new(0.0);
        let mut engine =
            LipSyncEngine::with_time_source(EngineSettings::default(), clock.clone());
        engine.attach_scene(&mut scene);

        let cues = build_cues(count);
        let span = count as f64 * 0.07;

        group.bench_function(BenchmarkId::new("cues", count), |b| {
            b.iter(|| {
                engine.set_cue_list(cues.clone());
                let mut t = 0.0;
                while t < span.min(2.0) {
                    clock.set(t);
                    black_box(engine.update(&mut scene, None));
                    t += FRAME;
                }
            });
        });
    }

    group.finish();
}

fn bench_idle_decay(c: &mut Criterion) {
    let mut scene = build_scene();
    let mut engine =
        LipSyncEngine::with_time_source(EngineSettings::default(), ManualClock::new(0.0));
    engine.attach_scene(&mut scene);

    c.bench_function("idle_frame", |b| {
        b.iter(|| black_box(engine.update(&mut scene, None)));
    });
}

criterion_group!(benches, bench_locate, bench_frame_update, bench_idle_decay);
criterion_main!(benches);
