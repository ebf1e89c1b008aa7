//! Session containers that accumulate records until they are finalized.

use super::activity::{build_activity_tree, ActivityNode, ActivityRecord, AppActivityRecord};
use super::ids::{ApplicationId, ContainerId, NodeId, Priority};
use super::state::{ActivityState, AllocationState};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Format a millisecond Unix timestamp for summaries.
pub(crate) fn format_timestamp(timestamp_ms: i64) -> String {
    let dt = DateTime::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .with_timezone(&Local);
    dt.format("%H:%M:%S%.3f").to_string()
}

/// One allocation attempt within a node's heartbeat pass.
///
/// A pass opens with an empty allocation; every final-state update closes the
/// current allocation and the store opens a fresh one for whatever follows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeAllocation {
    pub node_id: NodeId,
    /// Unix timestamp in milliseconds when the allocation was opened.
    pub timestamp: i64,
    pub records: Vec<ActivityRecord>,
    pub container_id: Option<ContainerId>,
    pub final_state: Option<AllocationState>,
}

impl NodeAllocation {
    pub fn new(node_id: NodeId, timestamp: i64) -> Self {
        Self {
            node_id,
            timestamp,
            records: Vec::new(),
            container_id: None,
            final_state: None,
        }
    }

    pub fn add_record(&mut self, record: ActivityRecord) {
        self.records.push(record);
    }

    pub fn finalize(&mut self, container_id: Option<ContainerId>, state: AllocationState) {
        self.container_id = container_id;
        self.final_state = Some(state);
    }

    pub fn is_finalized(&self) -> bool {
        self.final_state.is_some()
    }

    /// An allocation with neither records nor an outcome carries no information.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() && self.final_state.is_none()
    }

    pub fn activity_tree(&self) -> Vec<ActivityNode> {
        build_activity_tree(&self.records)
    }

    pub fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] NodeAllocation (node: {})\n   Final State: {}",
            format_timestamp(self.timestamp),
            self.node_id,
            self.final_state.map_or("OPEN", |s| s.as_str())
        );

        if let Some(container_id) = &self.container_id {
            summary.push_str(&format!("\n   Container: {}", container_id));
        }

        if !self.records.is_empty() {
            let count = self.records.len();
            let plural = if count != 1 { "s" } else { "" };
            summary.push_str(&format!("\n   Activities: {} record{}", count, plural));
        }

        summary
    }
}

/// One evaluation of an application nested inside a node pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppAllocation {
    pub application_id: ApplicationId,
    pub node_id: Option<NodeId>,
    pub queue_name: String,
    pub priority: Priority,
    /// Unix timestamp in milliseconds supplied by the scheduler at start.
    pub timestamp: i64,
    pub records: Vec<AppActivityRecord>,
    pub container_id: Option<ContainerId>,
    pub final_state: Option<ActivityState>,
    pub diagnostic: Option<String>,
}

impl AppAllocation {
    pub fn new(
        application_id: ApplicationId,
        node_id: Option<NodeId>,
        queue_name: impl Into<String>,
        priority: Priority,
        timestamp: i64,
    ) -> Self {
        Self {
            application_id,
            node_id,
            queue_name: queue_name.into(),
            priority,
            timestamp,
            records: Vec::new(),
            container_id: None,
            final_state: None,
            diagnostic: None,
        }
    }

    pub fn add_record(&mut self, record: AppActivityRecord) {
        self.records.push(record);
    }

    pub fn finish(
        &mut self,
        container_id: Option<ContainerId>,
        state: ActivityState,
        diagnostic: impl Into<String>,
    ) {
        self.container_id = container_id;
        self.final_state = Some(state);
        self.diagnostic = Some(diagnostic.into());
    }

    pub fn is_finished(&self) -> bool {
        self.final_state.is_some()
    }

    pub fn printable_summary(&self) -> String {
        let mut summary = format!(
            "[{}] AppAllocation (application: {})\n   Queue: {}\n   Final State: {}",
            format_timestamp(self.timestamp),
            self.application_id,
            self.queue_name,
            self.final_state.map_or("OPEN", |s| s.as_str())
        );

        if let Some(node_id) = &self.node_id {
            summary.push_str(&format!("\n   Node: {}", node_id));
        }

        if let Some(container_id) = &self.container_id {
            summary.push_str(&format!("\n   Container: {}", container_id));
        }

        if let Some(diagnostic) = self.diagnostic.as_deref().filter(|d| !d.is_empty()) {
            summary.push_str(&format!("\n   Diagnostic: {}", diagnostic));
        }

        summary
    }
}
