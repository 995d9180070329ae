//! Semantic mouth-shape keys and the per-viseme weight profiles.
//!
//! Profiles are static data. Each one is a dense weight array indexed by
//! [`SemanticKey`]; keys a profile does not mention hold zero.

use lipsync_core::Viseme;

/// The closed vocabulary of mouth shapes the profiles are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SemanticKey {
    MouthOpen,
    MouthSmile,
    JawOpen,
    MouthClose,
    VisemeAA,
    VisemeO,
    VisemeU,
    VisemeI,
    VisemePP,
    VisemeB,
    VisemeF,
}

impl SemanticKey {
    pub const COUNT: usize = 11;

    pub const ALL: [SemanticKey; Self::COUNT] = [
        SemanticKey::MouthOpen,
        SemanticKey::MouthSmile,
        SemanticKey::JawOpen,
        SemanticKey::MouthClose,
        SemanticKey::VisemeAA,
        SemanticKey::VisemeO,
        SemanticKey::VisemeU,
        SemanticKey::VisemeI,
        SemanticKey::VisemePP,
        SemanticKey::VisemeB,
        SemanticKey::VisemeF,
    ];

    /// Names whose presence marks a mesh as a mouth mesh during discovery.
    pub const MOUTH_MARKERS: [SemanticKey; 3] = [
        SemanticKey::MouthOpen,
        SemanticKey::MouthSmile,
        SemanticKey::JawOpen,
    ];

    /// Morph-target name exactly as it appears on conforming models.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SemanticKey::MouthOpen => "mouthOpen",
            SemanticKey::MouthSmile => "mouthSmile",
            SemanticKey::JawOpen => "JawOpen",
            SemanticKey::MouthClose => "MouthClose",
            SemanticKey::VisemeAA => "viseme_AA",
            SemanticKey::VisemeO => "viseme_O",
            SemanticKey::VisemeU => "viseme_U",
            SemanticKey::VisemeI => "viseme_I",
            SemanticKey::VisemePP => "viseme_PP",
            SemanticKey::VisemeB => "viseme_B",
            SemanticKey::VisemeF => "viseme_F",
        }
    }

    /// Exact, case-sensitive lookup.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.name() == name)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Target weights of one viseme, in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightProfile {
    weights: [f32; SemanticKey::COUNT],
}

impl WeightProfile {
    const fn from_entries(entries: &[(SemanticKey, f32)]) -> Self {
        let mut weights = [0.0; SemanticKey::COUNT];
        let mut i = 0;
        while i < entries.len() {
            weights[entries[i].0.index()] = entries[i].1;
            i += 1;
        }
        Self { weights }
    }

    /// The profile of `viseme`.
    #[inline]
    #[must_use]
    pub fn of(viseme: Viseme) -> &'static WeightProfile {
        &PROFILES[viseme.index()]
    }

    #[inline]
    #[must_use]
    pub fn weight(&self, key: SemanticKey) -> f32 {
        self.weights[key.index()]
    }

    /// Non-zero entries, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (SemanticKey, f32)> + '_ {
        SemanticKey::ALL
            .into_iter()
            .map(|key| (key, self.weight(key)))
            .filter(|&(_, w)| w != 0.0)
    }
}

use SemanticKey as K;

/// Indexed by [`Viseme::index`].
static PROFILES: [WeightProfile; 9] = [
    // A: lips closed
    WeightProfile::from_entries(&[(K::MouthClose, 1.0), (K::VisemePP, 1.0)]),
    // B: light open
    WeightProfile::from_entries(&[(K::MouthSmile, 0.2), (K::MouthOpen, 0.9), (K::VisemeB, 1.0)]),
    // C: mid open
    WeightProfile::from_entries(&[(K::MouthOpen, 0.55), (K::VisemeO, 0.45)]),
    // D: full "AAH"
    WeightProfile::from_entries(&[(K::MouthOpen, 1.0), (K::JawOpen, 0.85), (K::VisemeAA, 1.0)]),
    // E: "EH/EE"
    WeightProfile::from_entries(&[(K::MouthOpen, 0.5), (K::VisemeI, 0.6), (K::MouthSmile, 0.3)]),
    // F: "F/V" teeth
    WeightProfile::from_entries(&[(K::MouthSmile, 0.7), (K::VisemeF, 1.0)]),
    // G: strong "O"
    WeightProfile::from_entries(&[(K::MouthOpen, 0.85), (K::VisemeO, 1.0), (K::JawOpen, 0.6)]),
    // H: strong "U"
    WeightProfile::from_entries(&[(K::MouthOpen, 0.4), (K::VisemeU, 0.6), (K::JawOpen, 0.3)]),
    // X: silence
    WeightProfile::from_entries(&[(K::MouthClose, 1.0)]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_round_trip() {
        for key in SemanticKey::ALL {
            assert_eq!(SemanticKey::from_name(key.name()), Some(key));
        }
        assert_eq!(SemanticKey::from_name("jawopen"), None);
    }

    #[test]
    fn test_profiles_stay_in_unit_range() {
        for viseme in Viseme::ALL {
            for (key, weight) in WeightProfile::of(viseme).entries() {
                assert!(
                    (0.0..=1.0).contains(&weight),
                    "{viseme}: {} = {weight}",
                    key.name()
                );
            }
        }
    }

    #[test]
    fn test_silence_only_closes_mouth() {
        let silence: Vec<_> = WeightProfile::of(Viseme::X).entries().collect();
        assert_eq!(silence, vec![(SemanticKey::MouthClose, 1.0)]);
        assert_eq!(WeightProfile::of(Viseme::D).weight(SemanticKey::JawOpen), 0.85);
    }
}
