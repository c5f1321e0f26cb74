// crates/sprig-core/src/tree.rs
use std::collections::HashMap;

use crate::{Node, NodeId, NodeKind, Result, SprigError};

/// Arena owning every node of one UI tree.
///
/// Nodes refer to each other by [`NodeId`] only. The root is created with the tree and
/// lives as long as it does; it only accepts capture nodes as children, and at most one
/// of those is the room.
#[derive(Debug)]
pub struct NodeTree {
    nodes: HashMap<NodeId, Node>,
    next_id: u32,
    root: NodeId,
    room: Option<NodeId>,
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeTree {
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: HashMap::new(),
            next_id: 0,
            root: NodeId(0),
            room: None,
        };
        tree.root = tree.insert(Node::new(NodeKind::Root, "0p+", "0p+"));
        tree
    }

    fn insert(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        node.id = id;
        self.nodes.insert(id, node);
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn room(&self) -> Option<NodeId> {
        self.room
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(SprigError::UnknownNode(id))
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(SprigError::UnknownNode(id))
    }

    /// Live children of `id` in slot order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| node.children().collect())
            .unwrap_or_default()
    }

    /// The root's capture children other than the room, in slot order.
    pub fn nooks(&self) -> Vec<NodeId> {
        self.children(self.root)
            .into_iter()
            .filter(|id| Some(*id) != self.room)
            .collect()
    }

    /// Move `node` into the arena and hang it under `parent`.
    pub fn attach(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.node(parent)?;
        let id = self.insert(node);
        if let Err(err) = self.add_child(parent, id) {
            self.nodes.remove(&id);
            return Err(err);
        }
        Ok(id)
    }

    /// Put `child` into the first free slot of `parent` and return the slot index.
    ///
    /// Adding a child that is already there returns its current slot. A child that
    /// belongs to another parent is moved.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.node(parent)?;
        let kind = self.node(child)?.kind.name();

        if let Some(slot) = self
            .node(parent)?
            .children
            .iter()
            .position(|slot| *slot == Some(child))
        {
            return Ok(slot);
        }

        if child == self.root || self.is_ancestor(child, parent) {
            return Err(SprigError::Cycle { parent, child });
        }

        let is_room = self.node(child)?.kind.is_room();
        if parent == self.root && !self.node(child)?.kind.is_capture() {
            return Err(SprigError::InvalidRootChild(kind.to_string()));
        }

        // Detach first: the child may live inside the room it is about to replace
        if let Some(old_parent) = self.node(child)?.parent {
            self.rip_child(old_parent, child);
        }

        if parent == self.root && is_room {
            if let Some(previous) = self.room.take() {
                tracing::debug!("Replacing room {} with {}", previous, child);
                self.destroy(previous);
            }
        }

        let parent_node = self.node_mut(parent)?;
        let slot = match parent_node.children.iter().position(Option::is_none) {
            Some(free) => {
                parent_node.children[free] = Some(child);
                free
            }
            None => {
                parent_node.children.push(Some(child));
                parent_node.children.len() - 1
            }
        };

        let child_node = self.node_mut(child)?;
        child_node.parent = Some(parent);
        child_node.slot = Some(slot);

        if parent == self.root && is_room {
            self.room = Some(child);
        }

        tracing::debug!("Attached {} {} to {} at slot {}", kind, child, parent, slot);
        Ok(slot)
    }

    /// Alias of [`NodeTree::add_child`] from the child's point of view.
    pub fn set_parent(&mut self, child: NodeId, parent: NodeId) -> Result<usize> {
        self.add_child(parent, child)
    }

    /// Clear `child`'s slot in `parent` without compacting the list.
    ///
    /// # Panics
    ///
    /// Panics if the slot recorded on the child holds anything else: the tree's
    /// bookkeeping is already corrupt at that point.
    pub fn rip_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(slot) = self.nodes.get(&child).and_then(|node| node.slot) else {
            return;
        };
        let Some(parent_node) = self.nodes.get_mut(&parent) else {
            return;
        };

        let removed = parent_node.children[slot].take();
        if removed != Some(child) {
            panic!(
                "tree corrupted: slot {} of {} held {:?}, expected {}",
                slot, parent, removed, child
            );
        }

        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
            node.slot = None;
        }
        if self.room == Some(child) {
            self.room = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.nodes.get(&id).and_then(|node| node.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Destroy `id` and its subtree, children first.
    ///
    /// Returns false if the node was already gone. Destroying the root empties the tree
    /// but keeps the root itself.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(&id) {
            return false;
        }

        for child in self.children(id) {
            self.destroy(child);
        }

        if id == self.root {
            return true;
        }

        if let Some(parent) = self.nodes.get(&id).and_then(|node| node.parent) {
            self.rip_child(parent, id);
        }
        if self.room == Some(id) {
            self.room = None;
        }
        if let Some(node) = self.nodes.remove(&id) {
            tracing::debug!("Destroyed {} {}", node.kind.name(), id);
        }
        true
    }

    pub fn hide(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.hide();
        Ok(())
    }

    pub fn show(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.show();
        Ok(())
    }

    /// Check parent/slot bookkeeping for every node in the arena.
    pub fn check_integrity(&self) -> Result<()> {
        for (id, node) in &self.nodes {
            for (slot, child) in node.children.iter().enumerate() {
                let Some(child) = child else { continue };
                let child_node = self.nodes.get(child).ok_or_else(|| {
                    SprigError::Integrity(format!("{} lists missing child {}", id, child))
                })?;
                if child_node.parent != Some(*id) || child_node.slot != Some(slot) {
                    return Err(SprigError::Integrity(format!(
                        "{} at slot {} of {} records parent {:?} slot {:?}",
                        child, slot, id, child_node.parent, child_node.slot
                    )));
                }
            }

            if *id == self.root {
                continue;
            }
            let parent = node
                .parent
                .ok_or_else(|| SprigError::Integrity(format!("{} is detached", id)))?;
            let listed = node
                .slot
                .and_then(|slot| self.nodes.get(&parent)?.children.get(slot).copied().flatten());
            if listed != Some(*id) {
                return Err(SprigError::Integrity(format!(
                    "{} is not listed by its parent {}",
                    id, parent
                )));
            }
        }

        if let Some(room) = self.room {
            let parent = self.node(room)?.parent;
            if parent != Some(self.root) {
                return Err(SprigError::Integrity(format!("room {} is not under the root", room)));
            }
        }
        Ok(())
    }
}
