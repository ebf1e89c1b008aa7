//! Identifiers of the scheduler entities that activities are keyed by.
//!
//! Every identifier renders in the scheduler's canonical string form and parses
//! back from it, so ids can travel as plain strings in diagnostic queries.

use crate::error::{ActivitiesError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of a cluster node, `host:port`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub host: String,
    pub port: u16,
}

impl NodeId {
    const EMPTY_HOST: &'static str = "0.0.0.0";

    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Sentinel used when a node has no real identity yet, e.g. while the
    /// scheduler evaluates a candidate set rather than a single node.
    pub fn empty() -> Self {
        Self::new(Self::EMPTY_HOST, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.port == 0 && self.host == Self::EMPTY_HOST
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for NodeId {
    type Err = ActivitiesError;

    fn from_str(s: &str) -> Result<Self> {
        let (host, port) =
            s.rsplit_once(':').ok_or_else(|| ActivitiesError::InvalidNodeId(s.to_string()))?;
        if host.is_empty() {
            return Err(ActivitiesError::InvalidNodeId(s.to_string()));
        }
        let port = port.parse().map_err(|_| ActivitiesError::InvalidNodeId(s.to_string()))?;
        Ok(Self::new(host, port))
    }
}

/// Identity of an application, `application_<clusterTimestamp>_<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicationId {
    pub cluster_timestamp: i64,
    pub id: i32,
}

impl ApplicationId {
    const PREFIX: &'static str = "application";

    pub fn new(cluster_timestamp: i64, id: i32) -> Self {
        Self {
            cluster_timestamp,
            id,
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{:04}", Self::PREFIX, self.cluster_timestamp, self.id)
    }
}

impl FromStr for ApplicationId {
    type Err = ActivitiesError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ActivitiesError::InvalidApplicationId(s.to_string());
        let mut parts = s.split('_');
        if parts.next() != Some(Self::PREFIX) {
            return Err(invalid());
        }
        let cluster_timestamp = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let id = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(cluster_timestamp, id))
    }
}

/// Identity of a container,
/// `container_<clusterTimestamp>_<appId>_<attemptId>_<containerId>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId {
    pub application_id: ApplicationId,
    pub attempt_id: i32,
    pub id: i64,
}

impl ContainerId {
    const PREFIX: &'static str = "container";

    pub fn new(application_id: ApplicationId, attempt_id: i32, id: i64) -> Self {
        Self {
            application_id,
            attempt_id,
            id,
        }
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{:04}_{:02}_{:06}",
            Self::PREFIX,
            self.application_id.cluster_timestamp,
            self.application_id.id,
            self.attempt_id,
            self.id
        )
    }
}

impl FromStr for ContainerId {
    type Err = ActivitiesError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ActivitiesError::InvalidContainerId(s.to_string());
        let parts: Vec<&str> = s.split('_').collect();
        if parts.len() != 5 || parts[0] != Self::PREFIX {
            return Err(invalid());
        }
        let cluster_timestamp = parts[1].parse().map_err(|_| invalid())?;
        let app_id = parts[2].parse().map_err(|_| invalid())?;
        let attempt_id = parts[3].parse().map_err(|_| invalid())?;
        let id = parts[4].parse().map_err(|_| invalid())?;
        Ok(Self::new(ApplicationId::new(cluster_timestamp, app_id), attempt_id, id))
    }
}

/// Scheduling priority of an application or request. Renders as the bare number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Priority(pub i32);

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
