pub mod config;
pub mod error;
pub mod logger;
pub mod manager;
pub mod records;
pub mod scheduler;

pub use error::{ActivitiesError, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::ActivitiesConfig;
    pub use crate::error::{ActivitiesError, Result};
    pub use crate::logger::{ActivitiesLogger, AppAllocationSession, NodeUpdateSession};
    pub use crate::manager::{ActivitiesManager, InMemoryActivitiesManager};
    pub use crate::records::diagnostics;
    pub use crate::records::{
        ActivityNode, ActivityRecord, ActivityState, AllocationState, AppActivityRecord,
        AppAllocation, ApplicationId, ContainerId, NodeAllocation, NodeId, Priority, RecordKind,
    };
    pub use crate::scheduler::{
        Container, SchedulerApplicationAttempt, SchedulerNode, SchedulerRequestKey,
    };
}
