//! Test doubles: a spy manager that records every call it receives, plus
//! minimal scheduler node and application types.

use super::ActivitiesManager;
use crate::records::{
    ActivityRecord, ActivityState, AllocationState, AppActivityRecord, ApplicationId, ContainerId,
    NodeId, Priority,
};
use crate::scheduler::{SchedulerApplicationAttempt, SchedulerNode};
use std::collections::HashSet;
use std::sync::Mutex;

pub(crate) struct TestNode(pub NodeId);

impl SchedulerNode for TestNode {
    fn node_id(&self) -> &NodeId {
        &self.0
    }
}

/// A node that must never be resolved.
pub(crate) struct UntouchableNode;

impl SchedulerNode for UntouchableNode {
    fn node_id(&self) -> &NodeId {
        panic!("node identity resolved while recording is disabled")
    }
}

pub(crate) struct TestApp {
    application_id: ApplicationId,
    queue_name: String,
    priority: Priority,
}

impl TestApp {
    pub fn new(application_id: ApplicationId, queue_name: &str, priority: Priority) -> Self {
        Self {
            application_id,
            queue_name: queue_name.to_string(),
            priority,
        }
    }
}

impl SchedulerApplicationAttempt for TestApp {
    fn application_id(&self) -> &ApplicationId {
        &self.application_id
    }

    fn queue_name(&self) -> &str {
        &self.queue_name
    }

    fn priority(&self) -> Priority {
        self.priority
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ShouldRecordNode(NodeId),
    ShouldRecordApp(ApplicationId),
    RecordingNodeId,
    NodeActivity(ActivityRecord),
    AppActivity(AppActivityRecord),
    StartApp(Option<NodeId>, i64, ApplicationId),
    FinishApp(ApplicationId, Option<ContainerId>, ActivityState, String),
    StartNode(NodeId),
    FinishNode(NodeId),
    FinalState(NodeId, Option<ContainerId>, AllocationState),
}

/// Answers filter questions from fixed sets and logs every call.
pub(crate) struct SpyManager {
    traced_nodes: HashSet<NodeId>,
    traced_apps: HashSet<ApplicationId>,
    /// When set, node resolution yields no identity at all.
    unresolvable: bool,
    calls: Mutex<Vec<Call>>,
}

impl SpyManager {
    pub fn new() -> Self {
        Self {
            traced_nodes: HashSet::new(),
            traced_apps: HashSet::new(),
            unresolvable: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn tracing_node(mut self, node_id: NodeId) -> Self {
        self.traced_nodes.insert(node_id);
        self
    }

    pub fn tracing_app(mut self, application_id: ApplicationId) -> Self {
        self.traced_apps.insert(application_id);
        self
    }

    pub fn unresolvable(mut self) -> Self {
        self.unresolvable = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that emit or finalize something, ignoring filter queries.
    pub fn effects(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                !matches!(
                    c,
                    Call::ShouldRecordNode(_) | Call::ShouldRecordApp(_) | Call::RecordingNodeId
                )
            })
            .collect()
    }

    pub fn node_records(&self) -> Vec<ActivityRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::NodeActivity(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn app_records(&self) -> Vec<AppActivityRecord> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::AppActivity(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ActivitiesManager for SpyManager {
    fn should_record_this_node(&self, node_id: &NodeId) -> bool {
        self.log(Call::ShouldRecordNode(node_id.clone()));
        self.traced_nodes.contains(node_id)
    }

    fn should_record_this_app(&self, application_id: &ApplicationId) -> bool {
        self.log(Call::ShouldRecordApp(application_id.clone()));
        self.traced_apps.contains(application_id)
    }

    fn recording_node_id(&self, node: Option<&dyn SchedulerNode>) -> Option<NodeId> {
        self.log(Call::RecordingNodeId);
        if self.unresolvable {
            return None;
        }
        Some(node.map_or_else(NodeId::empty, |n| n.node_id().clone()))
    }

    fn add_scheduling_activity_for_node(&self, record: ActivityRecord) {
        self.log(Call::NodeActivity(record));
    }

    fn add_scheduling_activity_for_app(&self, record: AppActivityRecord) {
        self.log(Call::AppActivity(record));
    }

    fn start_app_allocation_recording(
        &self,
        node_id: Option<&NodeId>,
        timestamp: i64,
        application: &dyn SchedulerApplicationAttempt,
    ) {
        self.log(Call::StartApp(node_id.cloned(), timestamp, application.application_id().clone()));
    }

    fn finish_app_allocation_recording(
        &self,
        application_id: &ApplicationId,
        container_id: Option<&ContainerId>,
        state: ActivityState,
        diagnostic: &str,
    ) {
        self.log(Call::FinishApp(
            application_id.clone(),
            container_id.cloned(),
            state,
            diagnostic.to_string(),
        ));
    }

    fn start_node_update_recording(&self, node_id: &NodeId) {
        self.log(Call::StartNode(node_id.clone()));
    }

    fn finish_node_update_recording(&self, node_id: &NodeId) {
        self.log(Call::FinishNode(node_id.clone()));
    }

    fn update_allocation_final_state(
        &self,
        node_id: &NodeId,
        container_id: Option<&ContainerId>,
        state: AllocationState,
    ) {
        self.log(Call::FinalState(node_id.clone(), container_id.cloned(), state));
    }
}
