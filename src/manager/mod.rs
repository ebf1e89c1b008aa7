//! Trace store and selective filter
//!
//! [`ActivitiesManager`] is the collaborator the recorder facade talks to. It
//! answers the two filter questions (is this node traced, is this application
//! traced), resolves scheduler nodes to recording keys, and accepts records and
//! session boundaries.
//!
//! Implementations must be safe to call from several allocation threads at once
//! and must never block the caller for longer than a short critical section.
//! Records reported for the same node pass have to be kept in emission order.
//!
//! [`InMemoryActivitiesManager`] is a complete implementation that traces nodes
//! and applications on request and retains the results for diagnostic queries.

pub mod in_memory;

#[cfg(test)]
pub(crate) mod spy;

pub use in_memory::InMemoryActivitiesManager;

use crate::records::{
    ActivityRecord, ActivityState, AllocationState, AppActivityRecord, ApplicationId, ContainerId,
    NodeId,
};
use crate::scheduler::{SchedulerApplicationAttempt, SchedulerNode};

pub trait ActivitiesManager: Send + Sync {
    /// Whether records for this node's current pass should be captured.
    fn should_record_this_node(&self, node_id: &NodeId) -> bool;

    /// Whether records for this application's current session should be captured.
    fn should_record_this_app(&self, application_id: &ApplicationId) -> bool;

    /// Resolve a scheduler node to the key used for filtering.
    ///
    /// Returns [`NodeId::empty`] when there is no concrete node (the scheduler is
    /// evaluating a candidate set) and `None` when no key can be derived at all.
    fn recording_node_id(&self, node: Option<&dyn SchedulerNode>) -> Option<NodeId>;

    fn add_scheduling_activity_for_node(&self, record: ActivityRecord);

    fn add_scheduling_activity_for_app(&self, record: AppActivityRecord);

    fn start_app_allocation_recording(
        &self,
        node_id: Option<&NodeId>,
        timestamp: i64,
        application: &dyn SchedulerApplicationAttempt,
    );

    fn finish_app_allocation_recording(
        &self,
        application_id: &ApplicationId,
        container_id: Option<&ContainerId>,
        state: ActivityState,
        diagnostic: &str,
    );

    fn start_node_update_recording(&self, node_id: &NodeId);

    fn finish_node_update_recording(&self, node_id: &NodeId);

    /// Close the current allocation of a node pass with its outcome.
    fn update_allocation_final_state(
        &self,
        node_id: &NodeId,
        container_id: Option<&ContainerId>,
        state: AllocationState,
    );
}
