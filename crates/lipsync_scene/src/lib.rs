//! Scene graph module
//!
//! The smallest scene model the lip-sync engine needs from its rendering
//! collaborator:
//! - [`Node`]: hierarchy plus an optional mesh component
//! - [`MorphMesh`]: a mesh's morph-target dictionary and influence array
//! - [`MorphTargetMesh`]: the access trait animation code is written against
//! - [`Scene`]: node and mesh pools with depth-first traversal

pub mod mesh;
pub mod node;
pub mod scene;

pub use mesh::{MorphMesh, MorphTargetMesh};
pub use node::Node;
pub use scene::Scene;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshKey;
}
