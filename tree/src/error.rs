use thiserror::Error;

use crate::{NodeId, NodeKind};

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("no node with id {0}")]
    NotFound(NodeId),

    #[error("operation not valid for {kind} node {id}")]
    InvalidOperation { id: NodeId, kind: NodeKind },

    #[error("invalid value: {0}")]
    Validation(String),
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode content forest")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode content forest")]
    Decode(#[source] serde_json::Error),

    #[error("duplicate node id {0}")]
    DuplicateId(NodeId),

    #[error("parentId of node {0} contradicts its nesting")]
    ParentMismatch(NodeId),
}
