//! Handles pairing each `start_*` call with its `finish_*` call.
//!
//! A handle remembers the identity its session was opened under, so the
//! scheduler never has to re-derive it at finish time. Handles are handed out
//! even when recording is disabled; finishing them is then a no-op.

use crate::records::{ApplicationId, NodeId};

/// One heartbeat evaluation pass of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a node update session must be finished"]
pub struct NodeUpdateSession {
    node_id: NodeId,
}

impl NodeUpdateSession {
    pub(crate) fn new(node_id: NodeId) -> Self {
        Self { node_id }
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }
}

/// One evaluation of an application within a node pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an app allocation session must be finished"]
pub struct AppAllocationSession {
    application_id: ApplicationId,
    node_id: Option<NodeId>,
    started_at: i64,
}

impl AppAllocationSession {
    pub(crate) fn new(
        application_id: ApplicationId,
        node_id: Option<NodeId>,
        started_at: i64,
    ) -> Self {
        Self {
            application_id,
            node_id,
            started_at,
        }
    }

    pub fn application_id(&self) -> &ApplicationId {
        &self.application_id
    }

    /// The recording key the session was opened under, if one resolved.
    pub fn node_id(&self) -> Option<&NodeId> {
        self.node_id.as_ref()
    }

    pub fn started_at(&self) -> i64 {
        self.started_at
    }
}
