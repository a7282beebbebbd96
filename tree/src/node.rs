use std::fmt::{self, Display};

use chrono::{Local, NaiveDate};

use crate::NodeId;

/// One element of the content forest: a folder, a text section, or an
/// assignment. The payload variant decides what the node can hold; only
/// folders have children.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub label: String,
    pub parent: Option<NodeId>,
    pub payload: NodePayload,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodePayload {
    Folder { children: Vec<NodeId> },
    Section { content: String },
    Assignment(AssignmentData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentData {
    pub due_date: NaiveDate,
    pub points: u32,
    pub description: String,
    pub instructions: String,
}

impl AssignmentData {
    /// Defaults for a freshly added assignment: due today, zero points,
    /// empty description and instructions.
    pub fn due_today() -> Self {
        Self {
            due_date: Local::now().date_naive(),
            points: 0,
            description: String::new(),
            instructions: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    Section,
    Assignment,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Folder => "folder",
            NodeKind::Section => "section",
            NodeKind::Assignment => "assignment",
        };
        write!(f, "{name}")
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::Folder { .. } => NodeKind::Folder,
            NodePayload::Section { .. } => NodeKind::Section,
            NodePayload::Assignment(_) => NodeKind::Assignment,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.payload, NodePayload::Folder { .. })
    }
}

/// A single assignment field edit, carrying the new value. Points arrive as
/// a signed integer so that out-of-range input can be rejected instead of
/// silently wrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignmentField {
    DueDate(NaiveDate),
    Points(i64),
    Description(String),
    Instructions(String),
}
