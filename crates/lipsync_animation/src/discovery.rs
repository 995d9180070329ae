//! One-time mesh discovery per scene.
//!
//! Collects every mesh exposing morph targets, resets their influences, and
//! narrows the set to meshes carrying at least one mouth marker name
//! (`mouthOpen`, `mouthSmile`, `JawOpen`). If no mesh has a marker, every
//! morph mesh is animated. Name resolution for each slot is done here once.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use lipsync_scene::{MeshKey, MorphTargetMesh, Scene};

use crate::profile::SemanticKey;
use crate::resolver::{MorphBinding, bind_mesh};

/// A mesh selected for animation, with its resolved slots.
#[derive(Debug, Clone)]
pub struct AnimatedMesh {
    pub key: MeshKey,
    pub bindings: Vec<MorphBinding>,
}

/// The result of a discovery pass, valid for the lifetime of one scene.
#[derive(Debug, Clone, Default)]
pub struct MeshDiscovery {
    scene_id: u32,
    meshes: SmallVec<[AnimatedMesh; 4]>,
    discovered: usize,
    available_keys: Vec<String>,
    preferred_keys: Vec<String>,
}

impl MeshDiscovery {
    pub fn discover(scene: &mut Scene) -> Self {
        let found = scene.collect_morph_meshes();

        if found.is_empty() {
            log::warn!("No meshes with morph targets found in scene {}", scene.id);
            return Self {
                scene_id: scene.id,
                ..Default::default()
            };
        }

        for &key in &found {
            if let Some(mesh) = scene.get_mesh_mut(key) {
                mesh.morph_target_influences_mut().fill(0.0);
            }
        }

        let mouth: Vec<MeshKey> = found
            .iter()
            .copied()
            .filter(|&key| {
                scene.get_mesh(key).is_some_and(|mesh| {
                    SemanticKey::MOUTH_MARKERS
                        .iter()
                        .any(|marker| mesh.has_morph_target(marker.name()))
                })
            })
            .collect();
        let selected = if mouth.is_empty() { &found } else { &mouth };

        let meshes: SmallVec<[AnimatedMesh; 4]> = selected
            .iter()
            .filter_map(|&key| {
                let mesh = scene.get_mesh(key)?;
                Some(AnimatedMesh {
                    key,
                    bindings: bind_mesh(mesh),
                })
            })
            .collect();

        let available_keys = unique_names(scene, &found);
        let preferred_keys = preferred_order(&available_keys);

        log::info!("Found {} mesh(es) with morphs", found.len());
        log::info!("Using {} mesh(es) for animation", meshes.len());
        log::info!("Available morph keys: {available_keys:?}");
        for animated in &meshes {
            if let Some(mesh) = scene.get_mesh(animated.key) {
                let drivable = animated
                    .bindings
                    .iter()
                    .filter(|b| b.resolution.is_drivable())
                    .count();
                log::info!(
                    "Target mesh '{}': {} morph(s), {drivable} drivable",
                    mesh.name,
                    animated.bindings.len()
                );
            }
        }

        Self {
            scene_id: scene.id,
            meshes,
            discovered: found.len(),
            available_keys,
            preferred_keys,
        }
    }

    #[inline]
    #[must_use]
    pub fn scene_id(&self) -> u32 {
        self.scene_id
    }

    #[inline]
    #[must_use]
    pub fn meshes(&self) -> &[AnimatedMesh] {
        &self.meshes
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Number of morph meshes found before narrowing.
    #[inline]
    #[must_use]
    pub fn discovered_count(&self) -> usize {
        self.discovered
    }

    /// Every distinct morph-target name across discovered meshes, in
    /// traversal and slot order.
    #[must_use]
    pub fn available_keys(&self) -> &[String] {
        &self.available_keys
    }

    /// [`available_keys`](Self::available_keys) reordered with the most
    /// mouth-like names first.
    #[must_use]
    pub fn preferred_keys(&self) -> &[String] {
        &self.preferred_keys
    }
}

fn unique_names(scene: &Scene, keys: &[MeshKey]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut names = Vec::new();
    for &key in keys {
        let Some(mesh) = scene.get_mesh(key) else {
            continue;
        };
        let mut entries: Vec<(&String, usize)> = mesh
            .morph_target_dictionary()
            .iter()
            .map(|(name, &slot)| (name, slot))
            .collect();
        entries.sort_by_key(|&(_, slot)| slot);
        for (name, _) in entries {
            if seen.insert(name.as_str()) {
                names.push(name.clone());
            }
        }
    }
    names
}

/// `aa` followed by a non-word character or the end of the name.
fn ends_word_with_aa(lowered: &str) -> bool {
    lowered.match_indices("aa").any(|(i, _)| {
        lowered[i + 2..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
    })
}

/// Groups names by how mouth-like they look: `jaw`, `open`, `aa` at a word
/// end, `mouth`, `viseme_`, then everything else. Order within a group
/// follows the input.
pub fn preferred_order(names: &[String]) -> Vec<String> {
    let predicates: [fn(&str) -> bool; 5] = [
        |n| n.contains("jaw"),
        |n| n.contains("open"),
        ends_word_with_aa,
        |n| n.contains("mouth"),
        |n| n.contains("viseme_"),
    ];

    let lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    let mut taken = vec![false; names.len()];
    let mut ordered = Vec::with_capacity(names.len());

    for predicate in predicates {
        for (i, name) in lowered.iter().enumerate() {
            if !taken[i] && predicate(name.as_str()) {
                taken[i] = true;
                ordered.push(names[i].clone());
            }
        }
    }
    for (i, name) in names.iter().enumerate() {
        if !taken[i] {
            ordered.push(name.clone());
        }
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_order_groups() {
        let names: Vec<String> = [
            "eyeBlink",
            "viseme_sil",
            "mouthSmile",
            "viseme_aa",
            "JawOpen",
            "mouthOpen",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();
        assert_eq!(
            preferred_order(&names),
            vec!["JawOpen", "mouthOpen", "viseme_aa", "mouthSmile", "viseme_sil", "eyeBlink"]
        );
    }

    #[test]
    fn test_aa_word_end() {
        assert!(ends_word_with_aa("viseme_aa"));
        assert!(ends_word_with_aa("aa.l"));
        assert!(!ends_word_with_aa("aah"));
        assert!(!ends_word_with_aa("aa_l"));
    }
}
