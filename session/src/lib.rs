//! One course-editing session: load the content forest wholesale, mutate it
//! in memory, save it wholesale on request.
//!
//! The session holds the store behind `&mut self`, so a caller awaits one
//! persistence operation before issuing the next for the same tree. Mutation
//! is gated on the edit-access decision computed by the identity layer; the
//! tree itself performs no authorization.

use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use classflow_identity::EditAccess;
use classflow_store::{CourseId, StoreError, TreeStore};
use classflow_tree::{
    AssignmentField, CodecError, ContentTree, Node, NodeId, NodeKind, TreeError,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("caller may not edit this course")]
    ReadOnly,

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
pub struct CourseSession<S> {
    course: CourseId,
    access: EditAccess,
    store: S,
    tree: ContentTree,
}

/// One assignment in the calendar feed: everything the calendar shows for a
/// due date, collected across the whole forest.
#[derive(Debug, Clone, PartialEq)]
pub struct DueAssignment {
    pub node: NodeId,
    pub label: String,
    pub due_date: NaiveDate,
    pub points: u32,
    pub description: String,
}

impl<S: TreeStore> CourseSession<S> {
    /// Loads the saved forest for the course; absent content yields an
    /// empty forest.
    #[tracing::instrument(skip(store))]
    pub async fn open(
        store: S,
        course: CourseId,
        access: EditAccess,
    ) -> Result<Self, SessionError> {
        let tree = match store.load_tree(&course).await? {
            Some(records) => ContentTree::from_records(records)?,
            None => ContentTree::new(),
        };
        debug!(course = %course, nodes = tree.len(), "opened course session");
        Ok(Self {
            course,
            access,
            store,
            tree,
        })
    }

    /// Full-forest overwrite of the stored content.
    #[tracing::instrument(skip(self))]
    pub async fn save(&mut self) -> Result<(), SessionError> {
        let records = self.tree.to_records();
        self.store.save_tree(&self.course, &records).await?;
        debug!(course = %self.course, nodes = self.tree.len(), "saved course content");
        Ok(())
    }

    pub fn course(&self) -> &CourseId {
        &self.course
    }

    pub fn tree(&self) -> &ContentTree {
        &self.tree
    }

    pub fn find_node(&self, id: &NodeId) -> Option<&Node> {
        self.tree.find_node(id)
    }

    pub fn add_node(
        &mut self,
        parent: Option<&NodeId>,
        kind: NodeKind,
        label: impl Into<String>,
    ) -> Result<NodeId, SessionError> {
        self.check_access()?;
        Ok(self.tree.add_node(parent, kind, label)?)
    }

    pub fn remove_node(&mut self, id: &NodeId) -> Result<(), SessionError> {
        self.check_access()?;
        Ok(self.tree.remove_node(id)?)
    }

    pub fn rename_node(
        &mut self,
        id: &NodeId,
        label: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.check_access()?;
        Ok(self.tree.rename_node(id, label)?)
    }

    pub fn update_section_content(
        &mut self,
        id: &NodeId,
        content: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.check_access()?;
        Ok(self.tree.update_section_content(id, content)?)
    }

    pub fn update_assignment_field(
        &mut self,
        id: &NodeId,
        field: AssignmentField,
    ) -> Result<(), SessionError> {
        self.check_access()?;
        Ok(self.tree.update_assignment_field(id, field)?)
    }

    /// Assignments across the whole forest, in display order, for the
    /// calendar view.
    pub fn due_assignments(&self) -> Vec<DueAssignment> {
        self.tree
            .assignments()
            .map(|(node, data)| DueAssignment {
                node: node.id.clone(),
                label: node.label.clone(),
                due_date: data.due_date,
                points: data.points,
                description: data.description.clone(),
            })
            .collect()
    }

    fn check_access(&self) -> Result<(), SessionError> {
        if self.access.may_mutate() {
            Ok(())
        } else {
            Err(SessionError::ReadOnly)
        }
    }
}
