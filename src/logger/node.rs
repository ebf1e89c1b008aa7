//! Recording the overall activities of one node heartbeat.

use super::session::NodeUpdateSession;
use super::traced_node_id;
use crate::manager::ActivitiesManager;
use crate::records::{AllocationState, ContainerId, NodeId};
use crate::scheduler::SchedulerNode;

/// Node-level operations of an [`ActivitiesLogger`](super::ActivitiesLogger)
#[derive(Clone, Copy)]
pub struct NodeActivities<'a> {
    manager: Option<&'a dyn ActivitiesManager>,
}

impl<'a> NodeActivities<'a> {
    pub(crate) fn new(manager: Option<&'a dyn ActivitiesManager>) -> Self {
        Self { manager }
    }

    /// Open a node's heartbeat pass. Always forwarded to the manager, which
    /// decides on its own whether the pass is captured.
    pub fn start_node_update_recording(&self, node_id: &NodeId) -> NodeUpdateSession {
        if let Some(manager) = self.manager {
            manager.start_node_update_recording(node_id);
        }
        NodeUpdateSession::new(node_id.clone())
    }

    /// Close a node's heartbeat pass.
    pub fn finish_node_update_recording(&self, session: NodeUpdateSession) {
        if let Some(manager) = self.manager {
            manager.finish_node_update_recording(session.node_id());
        }
    }

    /// Close the current allocation with no container allocated or reserved.
    pub fn finish_skipped_node_allocation(&self, node: Option<&dyn SchedulerNode>) {
        self.finish_allocated_node_allocation(node, None, AllocationState::Skipped);
    }

    /// Close the current allocation with the container allocated or reserved
    /// during it. Nothing happens if the node resolves to no identity.
    pub fn finish_allocated_node_allocation(
        &self,
        node: Option<&dyn SchedulerNode>,
        container_id: Option<&ContainerId>,
        container_state: AllocationState,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        if let Some(node_id) = traced_node_id(manager, node) {
            manager.update_allocation_final_state(&node_id, container_id, container_state);
        }
    }
}
