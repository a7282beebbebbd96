use indexmap::IndexMap;

use crate::{AssignmentData, AssignmentField, Node, NodeId, NodeKind, NodePayload, TreeError};

/// An ordered forest of course-content nodes, stored as a flat arena keyed
/// by id. Each folder keeps an ordered list of child ids; `roots` keeps the
/// order of the top-level nodes. Insertion order is display order and is
/// preserved across serialization.
///
/// Every operation validates before it mutates, so a failed call leaves the
/// forest untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentTree {
    pub(crate) nodes: IndexMap<NodeId, Node>,
    pub(crate) roots: Vec<NodeId>,
}

impl ContentTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ordered ids of the top-level nodes.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Ordered child ids of a folder. Fails on leaves.
    pub fn children(&self, id: &NodeId) -> Result<&[NodeId], TreeError> {
        let node = self.get(id)?;
        match &node.payload {
            NodePayload::Folder { children } => Ok(children),
            _ => Err(TreeError::InvalidOperation {
                id: id.clone(),
                kind: node.kind(),
            }),
        }
    }

    /// Appends a new node to the target folder (or to the roots when
    /// `parent` is absent) and returns its freshly generated id.
    pub fn add_node(
        &mut self,
        parent: Option<&NodeId>,
        kind: NodeKind,
        label: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        if let Some(parent_id) = parent {
            let parent_node = self.get(parent_id)?;
            if !parent_node.is_folder() {
                return Err(TreeError::InvalidOperation {
                    id: parent_id.clone(),
                    kind: parent_node.kind(),
                });
            }
        }

        let id = NodeId::generate();
        let payload = match kind {
            NodeKind::Folder => NodePayload::Folder {
                children: Vec::new(),
            },
            NodeKind::Section => NodePayload::Section {
                content: String::new(),
            },
            NodeKind::Assignment => NodePayload::Assignment(AssignmentData::due_today()),
        };
        let node = Node {
            id: id.clone(),
            label: label.into(),
            parent: parent.cloned(),
            payload,
        };

        self.nodes.insert(id.clone(), node);
        match parent {
            Some(parent_id) => {
                if let Some(Node {
                    payload: NodePayload::Folder { children },
                    ..
                }) = self.nodes.get_mut(parent_id)
                {
                    children.push(id.clone());
                }
            }
            None => self.roots.push(id.clone()),
        }

        Ok(id)
    }

    /// Removes a node and, for folders, its entire subtree. Remaining
    /// siblings keep their relative order.
    pub fn remove_node(&mut self, id: &NodeId) -> Result<(), TreeError> {
        let parent = self.get(id)?.parent.clone();

        match parent {
            Some(parent_id) => {
                if let Some(Node {
                    payload: NodePayload::Folder { children },
                    ..
                }) = self.nodes.get_mut(&parent_id)
                {
                    children.retain(|child| child != id);
                }
            }
            None => self.roots.retain(|root| root != id),
        }

        let mut pending = vec![id.clone()];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.shift_remove(&next) {
                if let NodePayload::Folder { children } = node.payload {
                    pending.extend(children);
                }
            }
        }

        Ok(())
    }

    /// Overwrites the label unconditionally; an empty label is permitted.
    pub fn rename_node(&mut self, id: &NodeId, label: impl Into<String>) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        node.label = label.into();
        Ok(())
    }

    pub fn update_section_content(
        &mut self,
        id: &NodeId,
        content: impl Into<String>,
    ) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        let kind = node.kind();
        match &mut node.payload {
            NodePayload::Section { content: current } => {
                *current = content.into();
                Ok(())
            }
            _ => Err(TreeError::InvalidOperation {
                id: id.clone(),
                kind,
            }),
        }
    }

    pub fn update_assignment_field(
        &mut self,
        id: &NodeId,
        field: AssignmentField,
    ) -> Result<(), TreeError> {
        let node = self.get_mut(id)?;
        let kind = node.kind();
        let NodePayload::Assignment(data) = &mut node.payload else {
            return Err(TreeError::InvalidOperation {
                id: id.clone(),
                kind,
            });
        };

        match field {
            AssignmentField::DueDate(due_date) => data.due_date = due_date,
            AssignmentField::Points(points) => {
                data.points = u32::try_from(points).map_err(|_| {
                    TreeError::Validation(format!("points must be a non-negative integer, got {points}"))
                })?;
            }
            AssignmentField::Description(text) => data.description = text,
            AssignmentField::Instructions(text) => data.instructions = text,
        }

        Ok(())
    }

    /// Depth-first pre-order traversal over the whole forest, roots in
    /// display order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            pending: self.roots.iter().rev().collect(),
        }
    }

    /// All assignments in traversal order, for due-date aggregation.
    pub fn assignments(&self) -> impl Iterator<Item = (&Node, &AssignmentData)> {
        self.iter().filter_map(|node| match &node.payload {
            NodePayload::Assignment(data) => Some((node, data)),
            _ => None,
        })
    }

    fn get(&self, id: &NodeId) -> Result<&Node, TreeError> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }

    fn get_mut(&mut self, id: &NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NotFound(id.clone()))
    }
}

pub struct Iter<'a> {
    tree: &'a ContentTree,
    pending: Vec<&'a NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.pending.pop()?;
        let node = self.tree.nodes.get(id)?;
        if let NodePayload::Folder { children } = &node.payload {
            self.pending.extend(children.iter().rev());
        }
        Some(node)
    }
}
