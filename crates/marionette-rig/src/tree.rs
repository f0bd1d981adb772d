//! Drawable tree arena.
//!
//! The tree owns every [`DrawableNode`] in a slot map. Ownership runs one
//! way: a node's child list decides what gets removed with it, while the
//! `parent` handle is only an observation. Handles to removed nodes go stale
//! instead of dangling; lookups through them return `None`.

use std::collections::HashSet;

use slotmap::{new_key_type, SlotMap};

use marionette_core::{AngleWrap, MarionetteError, MarionetteResult, Point2D};

use crate::actor::ActorId;
use crate::drawable::DrawableNode;
use crate::placement;

new_key_type! {
    /// Handle to a drawable inside a [`DrawableTree`].
    pub struct DrawableId;
}

#[derive(Debug, Clone, Default)]
pub struct DrawableTree {
    pub(crate) nodes: SlotMap<DrawableId, DrawableNode>,
    roots: Vec<DrawableId>,
    actor: Option<ActorId>,
    angle_wrap: AngleWrap,
}

impl DrawableTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: DrawableId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: DrawableId) -> Option<&DrawableNode> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: DrawableId) -> Option<&mut DrawableNode> {
        self.nodes.get_mut(id)
    }

    /// Top-level drawables in insertion order.
    pub fn roots(&self) -> &[DrawableId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrawableId, &DrawableNode)> {
        self.nodes.iter()
    }

    /// First drawable with the given name. Names are unique only by convention.
    pub fn find(&self, name: &str) -> Option<DrawableId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name() == name)
            .map(|(id, _)| id)
    }

    /// Insert a new top-level drawable.
    pub fn add_root(&mut self, node: DrawableNode) -> MarionetteResult<DrawableId> {
        let id = self.insert(node, None)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Take ownership of `node` and append it to `parent`'s children.
    pub fn add_child(
        &mut self,
        parent: DrawableId,
        node: DrawableNode,
    ) -> MarionetteResult<DrawableId> {
        if !self.contains(parent) {
            return Err(MarionetteError::invalid_child(format!(
                "cannot add '{}': parent {parent:?} is not in this tree",
                node.name()
            )));
        }
        let id = self.insert(node, Some(parent))?;
        self.nodes[parent].children.push(id);
        Ok(id)
    }

    fn insert(
        &mut self,
        mut node: DrawableNode,
        parent: Option<DrawableId>,
    ) -> MarionetteResult<DrawableId> {
        node.check_transform()?;
        node.parent = parent;
        node.children.clear();
        node.actor = self.actor;
        node.angle_channel_mut().set_wrap(self.angle_wrap);
        tracing::debug!(drawable = %node.name(), ?parent, "add drawable");
        Ok(self.nodes.insert(node))
    }

    /// Move the existing subtree rooted at `child` under `parent`.
    ///
    /// Rejects unknown handles, attaching a node to itself and attaching a
    /// node below one of its own descendants. On error the tree is unchanged.
    pub fn attach(&mut self, parent: DrawableId, child: DrawableId) -> MarionetteResult<()> {
        if !self.contains(parent) || !self.contains(child) {
            return Err(MarionetteError::invalid_child(format!(
                "cannot attach {child:?} to {parent:?}: unknown drawable"
            )));
        }
        // Walk the owning child lists; parent handles may have been edited.
        if self.descendants(child).contains(&parent) {
            let err = MarionetteError::invalid_child(format!(
                "'{}' is an ancestor of '{}'; attaching would create a cycle",
                self.nodes[child].name(),
                self.nodes[parent].name()
            ));
            tracing::warn!("{err}");
            return Err(err);
        }

        self.unlink(child);
        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        Ok(())
    }

    /// Make the subtree rooted at `id` a top-level subtree. Detaching a root
    /// leaves it where it is.
    pub fn detach(&mut self, id: DrawableId) -> MarionetteResult<()> {
        if !self.contains(id) {
            return Err(MarionetteError::invalid_child(format!(
                "cannot detach {id:?}: unknown drawable"
            )));
        }
        if self.roots.contains(&id) {
            self.nodes[id].parent = None;
            return Ok(());
        }
        self.unlink(id);
        self.nodes[id].parent = None;
        self.roots.push(id);
        Ok(())
    }

    /// Destroy the subtree rooted at `id`, returning the removed handles in
    /// depth-first order.
    pub fn remove(&mut self, id: DrawableId) -> MarionetteResult<Vec<DrawableId>> {
        if !self.contains(id) {
            return Err(MarionetteError::invalid_child(format!(
                "cannot remove {id:?}: unknown drawable"
            )));
        }
        self.unlink(id);
        let removed = self.descendants(id);
        for &gone in &removed {
            self.nodes.remove(gone);
        }
        tracing::debug!(count = removed.len(), "removed subtree");
        Ok(removed)
    }

    /// Drop `id` from whichever child list or root list holds it.
    fn unlink(&mut self, id: DrawableId) {
        let parent = self.nodes[id].parent;
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(p)) {
            if parent.children.contains(&id) {
                parent.children.retain(|&c| c != id);
                return;
            }
        }
        // The parent handle is out of date; search every owner.
        self.roots.retain(|&r| r != id);
        for node in self.nodes.values_mut() {
            node.children.retain(|&c| c != id);
        }
    }

    /// `id` and everything below it, depth-first in child order.
    pub fn descendants(&self, id: DrawableId) -> Vec<DrawableId> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Every drawable, depth-first from each root in order.
    pub fn depth_first(&self) -> Vec<DrawableId> {
        self.roots
            .iter()
            .flat_map(|&root| self.descendants(root))
            .collect()
    }

    /// Parent chain of `id`, nearest first.
    pub fn ancestors(&self, id: DrawableId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.nodes.get(id).and_then(|n| n.parent),
        }
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    /// Record the owning actor and hand it down to every drawable, root first.
    pub fn set_actor(&mut self, actor: Option<ActorId>) {
        self.actor = actor;
        for i in 0..self.roots.len() {
            let root = self.roots[i];
            self.propagate_actor(root, actor);
        }
    }

    fn propagate_actor(&mut self, id: DrawableId, actor: Option<ActorId>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.actor = actor;
        for i in 0..node.children.len() {
            let child = self.nodes[id].children[i];
            self.propagate_actor(child, actor);
        }
    }

    pub fn angle_wrap(&self) -> AngleWrap {
        self.angle_wrap
    }

    /// Set the interpolation policy of every angle channel in the tree,
    /// including drawables added later.
    pub fn set_angle_wrap(&mut self, wrap: AngleWrap) {
        self.angle_wrap = wrap;
        for node in self.nodes.values_mut() {
            node.angle_channel_mut().set_wrap(wrap);
        }
    }

    /// Run the placement pass over every root.
    pub fn place(&mut self, offset: Point2D, rotate: f64) {
        placement::place_roots(self, offset, rotate);
    }

    /// Move a drawable by a screen-space delta.
    ///
    /// The delta is rotated into the parent's placed frame first, so the
    /// drawable follows the pointer however its ancestors are turned.
    pub fn drag(&mut self, id: DrawableId, screen_delta: Point2D) -> MarionetteResult<()> {
        let parent_rotation = self
            .nodes
            .get(id)
            .ok_or_else(|| {
                MarionetteError::invalid_child(format!("cannot drag {id:?}: unknown drawable"))
            })?
            .parent
            .and_then(|p| self.nodes.get(p))
            .map_or(0.0, |p| p.placed_rotation());

        self.nodes[id].move_by(screen_delta.rotate(-parent_rotation))
    }
}

/// Iterator over a drawable's ancestors.
pub struct Ancestors<'a> {
    tree: &'a DrawableTree,
    next: Option<DrawableId>,
}

impl Iterator for Ancestors<'_> {
    type Item = DrawableId;

    fn next(&mut self) -> Option<DrawableId> {
        let current = self.next?;
        self.next = self.tree.nodes.get(current).and_then(|n| n.parent);
        Some(current)
    }
}
