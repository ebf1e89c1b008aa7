//! Recording activities of a queue during a node pass.

use super::traced_node_id;
use crate::manager::ActivitiesManager;
use crate::records::{ActivityRecord, ActivityState};
use crate::scheduler::SchedulerNode;

/// Queue-level operations of an [`ActivitiesLogger`](super::ActivitiesLogger)
#[derive(Clone, Copy)]
pub struct QueueActivities<'a> {
    manager: Option<&'a dyn ActivitiesManager>,
}

impl<'a> QueueActivities<'a> {
    pub(crate) fn new(manager: Option<&'a dyn ActivitiesManager>) -> Self {
        Self { manager }
    }

    /// Record the outcome of a queue. Queues have no session of their own, so
    /// this only ever reaches a traced node pass.
    pub fn record_queue_activity(
        &self,
        node: Option<&dyn SchedulerNode>,
        parent_queue_name: Option<&str>,
        queue_name: &str,
        state: ActivityState,
        diagnostic: &str,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        if let Some(node_id) = traced_node_id(manager, node) {
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id,
                parent_name: parent_queue_name.map(str::to_string),
                child_name: Some(queue_name.to_string()),
                priority: None,
                state,
                diagnostic: diagnostic.to_string(),
                kind: None,
                allocation_request_id: None,
            });
        }
    }
}
