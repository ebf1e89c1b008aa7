//! Scheduler-side context handed to the recorder.
//!
//! The recorder never owns scheduler objects. It reads the few facts it needs
//! through [`SchedulerNode`] and [`SchedulerApplicationAttempt`], implemented by
//! the scheduler's own node and application types, and takes request keys and
//! containers as plain values.

use crate::records::{ApplicationId, ContainerId, NodeId, Priority};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A node the scheduler is evaluating during a heartbeat.
pub trait SchedulerNode {
    fn node_id(&self) -> &NodeId;
}

/// An application attempt under consideration within a leaf queue.
pub trait SchedulerApplicationAttempt {
    fn application_id(&self) -> &ApplicationId;

    fn queue_name(&self) -> &str;

    /// The application's own priority, as opposed to a request's priority.
    fn priority(&self) -> Priority;
}

/// Identifies one outstanding resource request of an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchedulerRequestKey {
    pub priority: Option<Priority>,
    pub allocation_request_id: i64,
}

impl SchedulerRequestKey {
    pub fn new(priority: Option<Priority>, allocation_request_id: i64) -> Self {
        Self {
            priority,
            allocation_request_id,
        }
    }
}

/// A container the scheduler allocated or reserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub id: ContainerId,
    /// The node the container was placed on, which may differ from the node
    /// whose heartbeat triggered the allocation.
    pub node_id: NodeId,
    pub priority: Priority,
    pub allocation_request_id: i64,
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Container: [ContainerId: {}, AllocationRequestId: {}, NodeId: {}, Priority: {}]",
            self.id, self.allocation_request_id, self.node_id, self.priority
        )
    }
}
