//! Activity data model
//!
//! Everything a recorder emits and a store retains:
//!
//! - **Identifiers** ([`NodeId`], [`ApplicationId`], [`ContainerId`], [`Priority`])
//!   in the scheduler's canonical string forms
//! - **States** ([`ActivityState`] for per-entity outcomes, [`AllocationState`]
//!   for the terminal outcome of an allocation attempt) and [`RecordKind`]
//! - **Records** ([`ActivityRecord`] for node passes, [`AppActivityRecord`] for
//!   nested application sessions)
//! - **Sessions** ([`NodeAllocation`], [`AppAllocation`]) that accumulate records
//!   until finalized
//! - **Trees** ([`ActivityNode`]) rebuilding queue → app → request → container

pub mod activity;
pub mod allocation;
pub mod diagnostics;
pub mod ids;
pub mod state;

pub use activity::{build_activity_tree, ActivityNode, ActivityRecord, AppActivityRecord};
pub use allocation::{AppAllocation, NodeAllocation};
pub use ids::{ApplicationId, ContainerId, NodeId, Priority};
pub use state::{ActivityState, AllocationState, RecordKind};
