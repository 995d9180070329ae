use crate::{MeshKey, NodeHandle};

/// A minimal scene node: hierarchy, a name, and an optional mesh component.
///
/// Mesh data lives in the owning [`Scene`](crate::Scene)'s mesh pool; the
/// node only holds its key.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,

    // === Core Hierarchy ===
    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    // === Components ===
    pub mesh: Option<MeshKey>,

    pub visible: bool,
}

impl Node {
    #[must_use]
    pub fn new() -> Self {
        Self {
            visible: true,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }
}
