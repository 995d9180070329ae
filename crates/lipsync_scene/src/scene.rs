use std::sync::atomic::{AtomicU32, Ordering};

use slotmap::SlotMap;

use lipsync_core::errors::{LipSyncError, Result};

use crate::mesh::{MorphMesh, MorphTargetMesh};
use crate::node::Node;
use crate::{MeshKey, NodeHandle};

static NEXT_SCENE_ID: AtomicU32 = AtomicU32::new(1);

/// Scene graph container.
///
/// Pure data: a node hierarchy plus a pool of morph meshes referenced by
/// nodes. Every scene gets a process-unique `id`, which animation code uses
/// to notice that the model it was bound to has been replaced.
pub struct Scene {
    pub id: u32,

    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, MorphMesh>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed),
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
        }
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Adds a node at the root level.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        self.add_node(Node::with_name(name))
    }

    pub fn add_to_parent(&mut self, child: Node, parent: NodeHandle) -> NodeHandle {
        let handle = self.nodes.insert(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(handle);
            self.nodes[handle].parent = Some(parent);
        } else {
            log::error!("Parent node not found, adding child at root level");
            self.root_nodes.push(handle);
        }
        handle
    }

    /// Moves `child` (and its subtree) under `parent`.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        if !self.nodes.contains_key(parent) {
            log::error!("Parent node not found during attach!");
            return;
        }

        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(n) = self.nodes.get_mut(p)
                && let Some(i) = n.children.iter().position(|&x| x == child)
            {
                n.children.remove(i);
            }
        } else if let Some(i) = self.root_nodes.iter().position(|&x| x == child) {
            self.root_nodes.remove(i);
        }

        self.nodes[parent].children.push(child);
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Removes a node, its subtree, and their mesh components.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        let Some(node) = self.nodes.get(handle) else {
            return;
        };
        let children = node.children.clone();
        for child in children {
            self.remove_node(child);
        }

        let parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(p) = parent {
            if let Some(parent) = self.nodes.get_mut(p)
                && let Some(pos) = parent.children.iter().position(|&x| x == handle)
            {
                parent.children.remove(pos);
            }
        } else if let Some(pos) = self.root_nodes.iter().position(|&x| x == handle) {
            self.root_nodes.remove(pos);
        }

        if let Some(node) = self.nodes.remove(handle)
            && let Some(mesh) = node.mesh
        {
            self.meshes.remove(mesh);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    // ========================================================================
    // Mesh Components
    // ========================================================================

    /// Adds a mesh on a new root node named after the mesh.
    ///
    /// Rejects meshes whose morph dictionary points outside the influence
    /// array; the animation frame loop indexes slots without bounds checks of
    /// its own.
    pub fn add_morph_mesh(&mut self, mesh: MorphMesh) -> Result<NodeHandle> {
        let key = self.insert_mesh(mesh)?;
        let name = self.meshes[key].name.clone();
        let handle = self.add_node(Node {
            mesh: Some(key),
            ..Node::with_name(name)
        });
        Ok(handle)
    }

    /// Like [`add_morph_mesh`](Self::add_morph_mesh), under `parent`.
    pub fn add_morph_mesh_to_parent(
        &mut self,
        mesh: MorphMesh,
        parent: NodeHandle,
    ) -> Result<NodeHandle> {
        let key = self.insert_mesh(mesh)?;
        let name = self.meshes[key].name.clone();
        let handle = self.add_to_parent(
            Node {
                mesh: Some(key),
                ..Node::with_name(name)
            },
            parent,
        );
        Ok(handle)
    }

    fn insert_mesh(&mut self, mesh: MorphMesh) -> Result<MeshKey> {
        if let Some((key, index)) = mesh.find_out_of_bounds_slot() {
            return Err(LipSyncError::MorphSlotOutOfBounds {
                mesh: mesh.name.clone(),
                key: key.to_string(),
                index,
                len: mesh.morph_target_influences().len(),
            });
        }
        Ok(self.meshes.insert(mesh))
    }

    #[inline]
    #[must_use]
    pub fn get_mesh(&self, key: MeshKey) -> Option<&MorphMesh> {
        self.meshes.get(key)
    }

    #[inline]
    pub fn get_mesh_mut(&mut self, key: MeshKey) -> Option<&mut MorphMesh> {
        self.meshes.get_mut(key)
    }

    /// Finds the first mesh with the given name, in traversal order.
    #[must_use]
    pub fn find_mesh_by_name(&self, name: &str) -> Option<MeshKey> {
        let mut found = None;
        self.traverse(|_, node| {
            if found.is_none()
                && let Some(key) = node.mesh
                && self.meshes.get(key).is_some_and(|m| m.name == name)
            {
                found = Some(key);
            }
        });
        found
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Visits every node depth-first, roots in insertion order, parents
    /// before children.
    pub fn traverse<F>(&self, mut visit: F)
    where
        F: FnMut(NodeHandle, &Node),
    {
        let mut stack: Vec<NodeHandle> = self.root_nodes.iter().rev().copied().collect();
        while let Some(handle) = stack.pop() {
            let Some(node) = self.nodes.get(handle) else {
                continue;
            };
            visit(handle, node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// Mesh keys of every node whose mesh has at least one morph target, in
    /// traversal order.
    #[must_use]
    pub fn collect_morph_meshes(&self) -> Vec<MeshKey> {
        let mut keys = Vec::new();
        self.traverse(|_, node| {
            if let Some(key) = node.mesh
                && self.meshes.get(key).is_some_and(MorphTargetMesh::has_morph_targets)
            {
                keys.push(key);
            }
        });
        keys
    }
}
