//! Error types for the mind-map engine.
//!
//! Layout, measurement and curve generation are total functions; only
//! structural edits of the tree can fail.

use thiserror::Error;

use crate::types::{NodeId, ReferenceId};

/// Errors raised by structural edits of a [`MindMap`](crate::MindMap).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Unknown node: {0}")]
    NodeNotFound(NodeId),

    #[error("Unknown reference: {0}")]
    ReferenceNotFound(ReferenceId),

    #[error("The root node cannot be {operation}")]
    RootImmutable { operation: &'static str },

    #[error("Cannot move {node} under its own descendant {target}")]
    CycleDetected { node: NodeId, target: NodeId },

    #[error("A reference cannot connect {0} to itself")]
    SelfReference(NodeId),

    #[error("Cannot choose a side at {0}: it follows its branch's root child")]
    SideFollowsBranch(NodeId),
}

/// Result alias for tree edits.
pub type TreeResult<T> = Result<T, TreeError>;
