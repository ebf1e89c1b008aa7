//! Recorder facade for scheduler activities
//!
//! The scheduler reports every decision of an allocation pass through
//! [`ActivitiesLogger`], grouped the way the scheduler walks its hierarchy:
//!
//! - [`ActivitiesLogger::app`]: applications, their requests and containers
//! - [`ActivitiesLogger::queue`]: queues
//! - [`ActivitiesLogger::node`]: node heartbeat passes and their outcomes
//!
//! The logger holds no state of its own. A logger built without a manager
//! ([`ActivitiesLogger::disabled`]) turns every call into an immediate return
//! that touches nothing, so the scheduler calls it unconditionally. With a
//! manager, each call consults the manager's filter and only builds records for
//! the nodes and applications being traced.
//!
//! # Usage Example
//!
//! ```rust
//! use sched_activities::prelude::*;
//! use std::sync::Arc;
//!
//! let manager = Arc::new(InMemoryActivitiesManager::default());
//! let node_id = NodeId::new("worker-1", 8041);
//! manager.record_next_node_update_activities(Some(node_id.clone()));
//!
//! let logger = ActivitiesLogger::new(manager.clone());
//! let session = logger.node().start_node_update_recording(&node_id);
//! // ... allocation pass reports queue and app activities ...
//! logger.node().finish_node_update_recording(session);
//!
//! assert!(manager.node_allocations(&node_id).is_empty());
//! ```

pub mod app;
pub mod naming;
pub mod node;
pub mod queue;
pub mod session;

pub use app::AppActivities;
pub use node::NodeActivities;
pub use queue::QueueActivities;
pub use session::{AppAllocationSession, NodeUpdateSession};

use crate::manager::ActivitiesManager;
use crate::records::NodeId;
use crate::scheduler::SchedulerNode;
use std::sync::Arc;

#[derive(Clone, Default)]
enum Recorder {
    #[default]
    Disabled,
    Enabled(Arc<dyn ActivitiesManager>),
}

/// Stateless gateway from the scheduler's allocation loop to an
/// [`ActivitiesManager`]
#[derive(Clone, Default)]
pub struct ActivitiesLogger {
    recorder: Recorder,
}

impl ActivitiesLogger {
    pub fn new(manager: Arc<dyn ActivitiesManager>) -> Self {
        Self {
            recorder: Recorder::Enabled(manager),
        }
    }

    /// A logger on which every operation is a no-op
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Build a logger from an optional manager, disabled when `None`
    pub fn from_manager(manager: Option<Arc<dyn ActivitiesManager>>) -> Self {
        manager.map_or_else(Self::disabled, Self::new)
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.recorder, Recorder::Enabled(_))
    }

    pub fn app(&self) -> AppActivities<'_> {
        AppActivities::new(self.manager())
    }

    pub fn queue(&self) -> QueueActivities<'_> {
        QueueActivities::new(self.manager())
    }

    pub fn node(&self) -> NodeActivities<'_> {
        NodeActivities::new(self.manager())
    }

    fn manager(&self) -> Option<&dyn ActivitiesManager> {
        match &self.recorder {
            Recorder::Enabled(manager) => Some(manager.as_ref()),
            Recorder::Disabled => None,
        }
    }
}

impl std::fmt::Debug for ActivitiesLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivitiesLogger").field("enabled", &self.is_enabled()).finish()
    }
}

/// Key of the node pass to file records under, `None` when the node is not
/// traced or resolves to no identity at all.
fn traced_node_id(
    manager: &dyn ActivitiesManager,
    node: Option<&dyn SchedulerNode>,
) -> Option<NodeId> {
    traced(manager, manager.recording_node_id(node))
}

fn traced(manager: &dyn ActivitiesManager, node_id: Option<NodeId>) -> Option<NodeId> {
    node_id.filter(|id| manager.should_record_this_node(id))
}
