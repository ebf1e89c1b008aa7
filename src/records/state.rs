//! Outcome and kind tags carried by activity records.

use crate::error::{ActivitiesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a queue, application, request or container within one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityState {
    /// Taken into further consideration.
    Accepted,
    /// Refused outright, e.g. by a queue or user limit.
    Rejected,
    /// Passed over; the scheduler moves on to the next candidate.
    Skipped,
    /// A container was reserved on the node.
    Reserved,
    /// An existing reservation was renewed.
    ReReserved,
    /// A container was allocated.
    Allocated,
}

impl ActivityState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityState::Accepted => "ACCEPTED",
            ActivityState::Rejected => "REJECTED",
            ActivityState::Skipped => "SKIPPED",
            ActivityState::Reserved => "RESERVED",
            ActivityState::ReReserved => "RE_RESERVED",
            ActivityState::Allocated => "ALLOCATED",
        }
    }
}

impl fmt::Display for ActivityState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityState {
    type Err = ActivitiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ACCEPTED" => Ok(ActivityState::Accepted),
            "REJECTED" => Ok(ActivityState::Rejected),
            "SKIPPED" => Ok(ActivityState::Skipped),
            "RESERVED" => Ok(ActivityState::Reserved),
            "RE_RESERVED" => Ok(ActivityState::ReReserved),
            "ALLOCATED" => Ok(ActivityState::Allocated),
            other => Err(ActivitiesError::UnknownState(other.to_string())),
        }
    }
}

/// Terminal outcome of one allocation attempt within a node pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationState {
    Allocated,
    AllocatedFromReserved,
    Reserved,
    Skipped,
}

impl AllocationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationState::Allocated => "ALLOCATED",
            AllocationState::AllocatedFromReserved => "ALLOCATED_FROM_RESERVED",
            AllocationState::Reserved => "RESERVED",
            AllocationState::Skipped => "SKIPPED",
        }
    }
}

impl fmt::Display for AllocationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationState {
    type Err = ActivitiesError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ALLOCATED" => Ok(AllocationState::Allocated),
            "ALLOCATED_FROM_RESERVED" => Ok(AllocationState::AllocatedFromReserved),
            "RESERVED" => Ok(AllocationState::Reserved),
            "SKIPPED" => Ok(AllocationState::Skipped),
            other => Err(ActivitiesError::UnknownState(other.to_string())),
        }
    }
}

/// Entity kind described by a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    App,
    Queue,
    Request,
    Container,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::App => "app",
            RecordKind::Queue => "queue",
            RecordKind::Request => "request",
            RecordKind::Container => "container",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
