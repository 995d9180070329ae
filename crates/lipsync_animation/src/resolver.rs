//! Morph-target name resolution.
//!
//! Models name their mouth shapes however their authoring tool did. A name is
//! resolved in two stages:
//!
//! 1. **Direct**: an exact match against the [`SemanticKey`] vocabulary.
//! 2. **Alias**: when the direct weight is exactly zero (including names with
//!    no direct match), the first rule in [`ALIAS_RULES`] whose pattern matches
//!    the lowercased name supplies the weight. A rule lists targets in
//!    priority order; the first non-zero one wins.
//!
//! Names matching nothing resolve to zero and the slot simply relaxes to rest.
//! Everything that depends only on the name is computed once, in
//! [`Resolution::for_name`], so the frame loop does no string work.

use lipsync_core::Viseme;
use lipsync_scene::MorphTargetMesh;

use crate::locator::CueBlend;
use crate::profile::SemanticKey;

/// How an alias rule recognises a lowercased morph-target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasPattern {
    /// Plain substring.
    Contains(&'static str),
    /// `viseme`, an optional `_`, then the given class letter.
    VisemeClass(char),
}

impl AliasPattern {
    /// `name` must already be lowercase.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match *self {
            AliasPattern::Contains(needle) => name.contains(needle),
            AliasPattern::VisemeClass(class) => name.match_indices("viseme").any(|(i, m)| {
                let rest = &name[i + m.len()..];
                rest.strip_prefix('_').unwrap_or(rest).starts_with(class)
            }),
        }
    }
}

/// A weight source an alias rule can fall back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTarget {
    /// A blended profile weight.
    Key(SemanticKey),
    /// The coarse symbol's own entry: its blended presence.
    Symbol(Viseme),
}

impl AliasTarget {
    #[inline]
    #[must_use]
    pub fn weight(self, blend: &CueBlend) -> f32 {
        match self {
            AliasTarget::Key(key) => blend.weight(key),
            AliasTarget::Symbol(viseme) => blend.presence(viseme),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasRule {
    pub pattern: AliasPattern,
    pub targets: &'static [AliasTarget],
}

impl AliasRule {
    /// First non-zero target weight, or zero.
    #[must_use]
    pub fn weight(&self, blend: &CueBlend) -> f32 {
        self.targets
            .iter()
            .map(|target| target.weight(blend))
            .find(|&w| w != 0.0)
            .unwrap_or(0.0)
    }
}

use AliasTarget::{Key, Symbol};

/// Alias rules in priority order. The first matching rule is the only one
/// consulted.
pub static ALIAS_RULES: [AliasRule; 7] = [
    AliasRule {
        pattern: AliasPattern::Contains("jaw"),
        targets: &[Key(SemanticKey::JawOpen)],
    },
    AliasRule {
        pattern: AliasPattern::Contains("open"),
        targets: &[Key(SemanticKey::MouthOpen), Key(SemanticKey::JawOpen)],
    },
    AliasRule {
        pattern: AliasPattern::Contains("close"),
        targets: &[Key(SemanticKey::MouthClose)],
    },
    AliasRule {
        pattern: AliasPattern::VisemeClass('a'),
        targets: &[Key(SemanticKey::VisemeAA), Symbol(Viseme::D)],
    },
    AliasRule {
        pattern: AliasPattern::VisemeClass('o'),
        targets: &[Key(SemanticKey::VisemeO), Symbol(Viseme::G)],
    },
    AliasRule {
        pattern: AliasPattern::VisemeClass('u'),
        targets: &[Key(SemanticKey::VisemeU), Symbol(Viseme::H)],
    },
    AliasRule {
        pattern: AliasPattern::Contains("p"),
        targets: &[Key(SemanticKey::VisemePP), Symbol(Viseme::A)],
    },
];

/// The first rule matching `name`, compared case-insensitively.
#[must_use]
pub fn find_alias_rule(name: &str) -> Option<&'static AliasRule> {
    let lowered = name.to_lowercase();
    ALIAS_RULES.iter().find(|rule| rule.pattern.matches(&lowered))
}

/// Precomputed resolution of one morph-target name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    pub direct: Option<SemanticKey>,
    pub alias: Option<&'static AliasRule>,
}

impl Resolution {
    #[must_use]
    pub fn for_name(name: &str) -> Self {
        Self {
            direct: SemanticKey::from_name(name),
            alias: find_alias_rule(name),
        }
    }

    /// Whether any frame could drive this name.
    #[inline]
    #[must_use]
    pub fn is_drivable(&self) -> bool {
        self.direct.is_some() || self.alias.is_some()
    }

    /// Raw target weight for this frame.
    #[inline]
    #[must_use]
    pub fn raw_target(&self, blend: &CueBlend) -> f32 {
        let direct = self.direct.map_or(0.0, |key| blend.weight(key));
        if direct != 0.0 {
            return direct;
        }
        self.alias.map_or(0.0, |rule| rule.weight(blend))
    }
}

/// A morph slot paired with the resolution of its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorphBinding {
    pub slot: usize,
    pub resolution: Resolution,
}

/// Resolves every dictionary entry of `mesh`, ordered by slot.
pub fn bind_mesh<M: MorphTargetMesh + ?Sized>(mesh: &M) -> Vec<MorphBinding> {
    let mut bindings: Vec<MorphBinding> = mesh
        .morph_target_dictionary()
        .iter()
        .map(|(name, &slot)| MorphBinding {
            slot,
            resolution: Resolution::for_name(name),
        })
        .collect();
    bindings.sort_by_key(|b| b.slot);
    bindings
}

/// One-shot resolution of `name` against `blend`.
///
/// Rebuilds the [`Resolution`] on every call, so it is meant for tooling and
/// inspection. The frame loop uses the bindings from [`bind_mesh`] instead.
#[must_use]
pub fn resolve(name: &str, blend: &CueBlend) -> f32 {
    Resolution::for_name(name).raw_target(blend)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viseme_class_pattern() {
        let a = AliasPattern::VisemeClass('a');
        assert!(a.matches("viseme_aa"));
        assert!(a.matches("visemeaa"));
        assert!(a.matches("head.viseme_a"));
        assert!(!a.matches("viseme_o"));
        assert!(!a.matches("viseme__a"));
    }

    #[test]
    fn test_rule_priority_is_first_match() {
        // Contains both "jaw" and "open": the jaw rule is earlier.
        let rule = find_alias_rule("JAW_OPEN_L").unwrap();
        assert_eq!(rule.pattern, AliasPattern::Contains("jaw"));

        let rule = find_alias_rule("mouthOpenWide").unwrap();
        assert_eq!(rule.pattern, AliasPattern::Contains("open"));

        assert!(find_alias_rule("eyeBlinkLeft").is_none());
    }

    #[test]
    fn test_one_shot_matches_bound_resolution() {
        let mesh = lipsync_scene::MorphMesh::new("Head", ["viseme_aa", "jawOpen", "browInnerUp"]);
        let blend = CueBlend {
            prev: Viseme::D,
            next: Some(Viseme::G),
            blend: 0.3,
        };
        for binding in bind_mesh(&mesh) {
            let name = mesh
                .morph_target_dictionary()
                .iter()
                .find(|&(_, &slot)| slot == binding.slot)
                .map(|(name, _)| name.as_str())
                .unwrap();
            assert_eq!(resolve(name, &blend), binding.resolution.raw_target(&blend), "{name}");
        }
    }
}
