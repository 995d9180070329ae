use rustc_hash::FxHashMap;

/// Access to a mesh's morph targets.
///
/// The dictionary maps a model-specific morph-target name to a slot in the
/// influence array. Implementors guarantee every slot in the dictionary is in
/// bounds; animation code indexes the influence slice directly.
pub trait MorphTargetMesh {
    fn name(&self) -> &str;

    fn morph_target_dictionary(&self) -> &FxHashMap<String, usize>;

    fn morph_target_influences(&self) -> &[f32];

    /// Influences are writable but never resized.
    fn morph_target_influences_mut(&mut self) -> &mut [f32];

    #[inline]
    fn has_morph_targets(&self) -> bool {
        !self.morph_target_dictionary().is_empty()
    }

    #[inline]
    fn has_morph_target(&self, name: &str) -> bool {
        self.morph_target_dictionary().contains_key(name)
    }

    /// Current influence of a named target, if present.
    fn influence(&self, name: &str) -> Option<f32> {
        let slot = *self.morph_target_dictionary().get(name)?;
        self.morph_target_influences().get(slot).copied()
    }
}

/// A mesh instance carrying morph-target state.
#[derive(Debug, Clone, Default)]
pub struct MorphMesh {
    pub name: String,

    morph_target_dictionary: FxHashMap<String, usize>,
    morph_target_influences: Vec<f32>,
}

impl MorphMesh {
    /// Creates a mesh whose targets occupy consecutive slots in the given
    /// order, all at zero influence. Duplicate names keep their first slot.
    pub fn new<I, S>(name: impl Into<String>, target_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut dictionary = FxHashMap::default();
        let mut count = 0;
        for target in target_names {
            dictionary.entry(target.into()).or_insert_with(|| {
                count += 1;
                count - 1
            });
        }

        Self {
            name: name.into(),
            morph_target_dictionary: dictionary,
            morph_target_influences: vec![0.0; count],
        }
    }

    /// Builds a mesh from an explicit dictionary and influence array, as a
    /// model loader would. Slots are not validated here; see
    /// [`Scene::add_morph_mesh`](crate::Scene::add_morph_mesh).
    #[must_use]
    pub fn from_parts(
        name: impl Into<String>,
        dictionary: FxHashMap<String, usize>,
        influences: Vec<f32>,
    ) -> Self {
        Self {
            name: name.into(),
            morph_target_dictionary: dictionary,
            morph_target_influences: influences,
        }
    }

    /// A mesh without morph targets (body, hair, clothing).
    #[must_use]
    pub fn static_mesh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets a named influence. Returns `false` if the target does not exist.
    pub fn set_influence(&mut self, name: &str, value: f32) -> bool {
        match self.morph_target_dictionary.get(name) {
            Some(&slot) => {
                self.morph_target_influences[slot] = value;
                true
            }
            None => false,
        }
    }

    /// Returns the first dictionary entry whose slot is outside the influence
    /// array, if any.
    #[must_use]
    pub fn find_out_of_bounds_slot(&self) -> Option<(&str, usize)> {
        let len = self.morph_target_influences.len();
        self.morph_target_dictionary
            .iter()
            .find(|&(_, &slot)| slot >= len)
            .map(|(key, &slot)| (key.as_str(), slot))
    }
}

impl MorphTargetMesh for MorphMesh {
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn morph_target_dictionary(&self) -> &FxHashMap<String, usize> {
        &self.morph_target_dictionary
    }

    #[inline]
    fn morph_target_influences(&self) -> &[f32] {
        &self.morph_target_influences
    }

    #[inline]
    fn morph_target_influences_mut(&mut self) -> &mut [f32] {
        &mut self.morph_target_influences
    }
}
