//! Activity records and the hierarchy rebuilt from them.
//!
//! A record names its enclosing entity (`parent_name`) and the entity it
//! describes (`child_name`). Within one node allocation the scheduler reports
//! children before their parents (container, request, app, leaf queue, parent
//! queues), which is what [`build_activity_tree`] relies on.

use super::ids::{ApplicationId, ContainerId, NodeId};
use super::state::{ActivityState, RecordKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One observed fact within a node-pass session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub node_id: NodeId,
    pub parent_name: Option<String>,
    pub child_name: Option<String>,
    pub priority: Option<String>,
    pub state: ActivityState,
    pub diagnostic: String,
    /// `None` for queue-level records.
    pub kind: Option<RecordKind>,
    pub allocation_request_id: Option<String>,
}

impl fmt::Display for ActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} -> {} [{}]",
            self.kind.unwrap_or(RecordKind::Queue),
            self.parent_name.as_deref().unwrap_or("-"),
            self.child_name.as_deref().unwrap_or("-"),
            self.state
        )?;
        if let Some(priority) = &self.priority {
            write!(f, " priority={}", priority)?;
        }
        if let Some(id) = &self.allocation_request_id {
            write!(f, " allocationRequestId={}", id)?;
        }
        if !self.diagnostic.is_empty() {
            write!(f, " ({})", self.diagnostic)?;
        }
        Ok(())
    }
}

/// One observed fact within an application's nested session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppActivityRecord {
    pub application_id: ApplicationId,
    /// Present only when a container was allocated or reserved.
    pub container_id: Option<ContainerId>,
    pub priority: Option<String>,
    pub state: ActivityState,
    pub diagnostic: String,
    pub kind: RecordKind,
    pub node_id: Option<NodeId>,
    pub allocation_request_id: Option<String>,
}

impl fmt::Display for AppActivityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} [{}]", self.kind, self.application_id, self.state)?;
        if let Some(container_id) = &self.container_id {
            write!(f, " container={}", container_id)?;
        }
        if let Some(node_id) = &self.node_id {
            write!(f, " node={}", node_id)?;
        }
        if !self.diagnostic.is_empty() {
            write!(f, " ({})", self.diagnostic)?;
        }
        Ok(())
    }
}

/// A node of the queue → app → request → container hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityNode {
    pub name: Option<String>,
    pub parent_name: Option<String>,
    pub kind: RecordKind,
    pub priority: Option<String>,
    pub state: ActivityState,
    pub diagnostic: String,
    pub allocation_request_id: Option<String>,
    pub children: Vec<ActivityNode>,
}

impl ActivityNode {
    fn from_record(record: &ActivityRecord) -> Self {
        Self {
            name: record.child_name.clone(),
            parent_name: record.parent_name.clone(),
            kind: record.kind.unwrap_or(RecordKind::Queue),
            priority: record.priority.clone(),
            state: record.state,
            diagnostic: record.diagnostic.clone(),
            allocation_request_id: record.allocation_request_id.clone(),
            children: Vec::new(),
        }
    }

    /// Total number of nodes in this subtree, including itself.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ActivityNode::size).sum::<usize>()
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let label = self.name.as_deref().or(self.parent_name.as_deref()).unwrap_or("-");
        write!(f, "{:indent$}{} {} [{}]", "", self.kind, label, self.state, indent = depth * 2)?;
        if !self.diagnostic.is_empty() {
            write!(f, " ({})", self.diagnostic)?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for ActivityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Rebuild the hierarchy from records in emission order.
///
/// Each record adopts every pending node whose parent is the entity it
/// describes. Whatever is still pending at the end has no reported parent and
/// becomes a root, in emission order.
pub fn build_activity_tree(records: &[ActivityRecord]) -> Vec<ActivityNode> {
    let mut pending: Vec<ActivityNode> = Vec::new();

    for record in records {
        let mut node = ActivityNode::from_record(record);
        if let Some(name) = node.name.as_deref() {
            let (children, rest): (Vec<_>, Vec<_>) = pending
                .into_iter()
                .partition(|candidate| candidate.parent_name.as_deref() == Some(name));
            node.children = children;
            pending = rest;
        }
        pending.push(node);
    }

    pending
}
