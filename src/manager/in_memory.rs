//! In-memory activities store with selective capture
//!
//! Nothing is captured until a diagnostic consumer asks for it: either the next
//! heartbeat of a node ([`InMemoryActivitiesManager::record_next_node_update_activities`])
//! or an application for a bounded time window
//! ([`InMemoryActivitiesManager::turn_on_app_activities_recording`]).

use super::ActivitiesManager;
use crate::config::ActivitiesConfig;
use crate::records::{
    ActivityRecord, ActivityState, AllocationState, AppActivityRecord, AppAllocation,
    ApplicationId, ContainerId, NodeAllocation, NodeId,
};
use crate::scheduler::{SchedulerApplicationAttempt, SchedulerNode};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Default)]
struct NodeRecordings {
    armed: HashSet<NodeId>,
    record_next_available: bool,
    /// Open passes; the last allocation of each is the one being filled.
    active: HashMap<NodeId, Vec<NodeAllocation>>,
    completed: HashMap<NodeId, Vec<NodeAllocation>>,
}

#[derive(Default)]
struct AppRecordings {
    /// `None` keeps the application traced until it is turned off.
    recording_until: HashMap<ApplicationId, Option<Instant>>,
    open: HashMap<ApplicationId, AppAllocation>,
    completed: HashMap<ApplicationId, VecDeque<AppAllocation>>,
}

impl AppRecordings {
    /// Whether the application is still traced at `now`, dropping its window
    /// once it has elapsed. A session in flight keeps the application traced
    /// until that session finishes.
    fn is_recording(&mut self, application_id: &ApplicationId, now: Instant) -> bool {
        match self.recording_until.get(application_id).copied() {
            None => false,
            Some(until) if !window_elapsed(until, now) => true,
            Some(_) if self.open.contains_key(application_id) => true,
            Some(_) => {
                debug!("Recording window of {} elapsed", application_id);
                self.recording_until.remove(application_id);
                false
            }
        }
    }

    fn prune_elapsed(&mut self, now: Instant) {
        let open = &self.open;
        self.recording_until
            .retain(|id, until| !window_elapsed(*until, now) || open.contains_key(id));
    }
}

fn window_elapsed(until: Option<Instant>, now: Instant) -> bool {
    until.is_some_and(|until| now >= until)
}

/// Thread-safe [`ActivitiesManager`] keeping captured activities in memory.
///
/// Each node keeps the allocations of its latest traced pass; each application
/// keeps a bounded ring of its most recent finished sessions.
pub struct InMemoryActivitiesManager {
    config: ActivitiesConfig,
    nodes: Mutex<NodeRecordings>,
    apps: Mutex<AppRecordings>,
}

impl InMemoryActivitiesManager {
    pub fn new(config: ActivitiesConfig) -> Self {
        Self {
            config,
            nodes: Mutex::new(NodeRecordings::default()),
            apps: Mutex::new(AppRecordings::default()),
        }
    }

    pub fn config(&self) -> &ActivitiesConfig {
        &self.config
    }

    /// Arm tracing for the next heartbeat pass of a node
    ///
    /// # Arguments
    ///
    /// * `node_id` - The node to trace, or `None` to trace whichever node
    ///   heartbeats next
    pub fn record_next_node_update_activities(&self, node_id: Option<NodeId>) {
        let mut nodes = self.lock_nodes();
        match node_id {
            Some(node_id) => {
                debug!("Recording next node update activities for {}", node_id);
                nodes.armed.insert(node_id);
            }
            None => {
                debug!("Recording next available node update activities");
                nodes.record_next_available = true;
            }
        }
    }

    /// Trace an application until the given duration has elapsed
    ///
    /// The window is checked on every query. A session in flight at expiry is
    /// still captured in full. A window too long to represent never expires.
    ///
    /// # Arguments
    ///
    /// * `application_id` - The application to trace
    /// * `max_duration` - Recording window, or `None` for the configured default
    pub fn turn_on_app_activities_recording(
        &self,
        application_id: ApplicationId,
        max_duration: Option<Duration>,
    ) {
        let duration = max_duration.unwrap_or_else(|| self.config.app_recording_duration());
        debug!("Recording activities of {} for {:?}", application_id, duration);
        let until = Instant::now().checked_add(duration);
        self.lock_apps().recording_until.insert(application_id, until);
    }

    pub fn turn_off_app_activities_recording(&self, application_id: &ApplicationId) {
        let mut apps = self.lock_apps();
        apps.recording_until.remove(application_id);
        apps.open.remove(application_id);
    }

    /// Allocations of the latest completed traced pass of a node
    pub fn node_allocations(&self, node_id: &NodeId) -> Vec<NodeAllocation> {
        self.lock_nodes().completed.get(node_id).cloned().unwrap_or_default()
    }

    /// Finished sessions of an application, oldest first
    pub fn app_allocations(&self, application_id: &ApplicationId) -> Vec<AppAllocation> {
        self.lock_apps()
            .completed
            .get(application_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Applications whose recording window is currently open
    pub fn recording_app_ids(&self) -> Vec<ApplicationId> {
        let mut apps = self.lock_apps();
        apps.prune_elapsed(Instant::now());
        let mut ids: Vec<_> = apps.recording_until.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop all captured activities and recording requests
    pub fn clear(&self) {
        *self.lock_nodes() = NodeRecordings::default();
        *self.lock_apps() = AppRecordings::default();
    }

    fn lock_nodes(&self) -> MutexGuard<'_, NodeRecordings> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_apps(&self) -> MutexGuard<'_, AppRecordings> {
        self.apps.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryActivitiesManager {
    fn default() -> Self {
        Self::new(ActivitiesConfig::default())
    }
}

impl ActivitiesManager for InMemoryActivitiesManager {
    fn should_record_this_node(&self, node_id: &NodeId) -> bool {
        self.lock_nodes().active.contains_key(node_id)
    }

    fn should_record_this_app(&self, application_id: &ApplicationId) -> bool {
        self.lock_apps().is_recording(application_id, Instant::now())
    }

    fn recording_node_id(&self, node: Option<&dyn SchedulerNode>) -> Option<NodeId> {
        Some(node.map_or_else(NodeId::empty, |node| node.node_id().clone()))
    }

    fn add_scheduling_activity_for_node(&self, record: ActivityRecord) {
        let mut nodes = self.lock_nodes();
        if let Some(current) =
            nodes.active.get_mut(&record.node_id).and_then(|pass| pass.last_mut())
        {
            current.add_record(record);
        }
    }

    fn add_scheduling_activity_for_app(&self, record: AppActivityRecord) {
        let mut apps = self.lock_apps();
        if let Some(allocation) = apps.open.get_mut(&record.application_id) {
            allocation.add_record(record);
        }
    }

    fn start_app_allocation_recording(
        &self,
        node_id: Option<&NodeId>,
        timestamp: i64,
        application: &dyn SchedulerApplicationAttempt,
    ) {
        let mut apps = self.lock_apps();
        let application_id = application.application_id();
        if !apps.is_recording(application_id, Instant::now()) {
            return;
        }
        apps.open.insert(
            application_id.clone(),
            AppAllocation::new(
                application_id.clone(),
                node_id.cloned(),
                application.queue_name(),
                application.priority(),
                timestamp,
            ),
        );
    }

    fn finish_app_allocation_recording(
        &self,
        application_id: &ApplicationId,
        container_id: Option<&ContainerId>,
        state: ActivityState,
        diagnostic: &str,
    ) {
        let mut apps = self.lock_apps();
        let Some(mut allocation) = apps.open.remove(application_id) else {
            return;
        };
        allocation.finish(container_id.cloned(), state, diagnostic);

        let max_len = self.config.app_activities_max_queue_length;
        let ring = apps.completed.entry(application_id.clone()).or_default();
        ring.push_back(allocation);
        while ring.len() > max_len {
            ring.pop_front();
        }

        apps.prune_elapsed(Instant::now());
    }

    fn start_node_update_recording(&self, node_id: &NodeId) {
        let mut nodes = self.lock_nodes();
        let armed = nodes.armed.remove(node_id);
        if !armed && !nodes.record_next_available {
            return;
        }
        if !armed {
            nodes.record_next_available = false;
        }
        debug!("Started recording node update of {}", node_id);
        let allocation = NodeAllocation::new(node_id.clone(), current_timestamp_ms());
        nodes.active.insert(node_id.clone(), vec![allocation]);
    }

    fn finish_node_update_recording(&self, node_id: &NodeId) {
        let mut nodes = self.lock_nodes();
        let Some(pass) = nodes.active.remove(node_id) else {
            return;
        };
        let allocations: Vec<_> = pass.into_iter().filter(|a| !a.is_empty()).collect();
        debug!(
            "Finished recording node update of {}: {} allocation(s)",
            node_id,
            allocations.len()
        );
        nodes.completed.insert(node_id.clone(), allocations);
    }

    fn update_allocation_final_state(
        &self,
        node_id: &NodeId,
        container_id: Option<&ContainerId>,
        state: AllocationState,
    ) {
        let mut nodes = self.lock_nodes();
        let Some(pass) = nodes.active.get_mut(node_id) else {
            return;
        };
        if let Some(current) = pass.last_mut() {
            current.finalize(container_id.cloned(), state);
        }
        pass.push(NodeAllocation::new(node_id.clone(), current_timestamp_ms()));
    }
}

fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::spy::{TestApp, TestNode};
    use crate::records::{Priority, RecordKind};
    use std::sync::Arc;

    fn init_logging() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn node() -> NodeId {
        NodeId::new("worker-1", 8041)
    }

    fn app() -> TestApp {
        TestApp::new(ApplicationId::new(1700000000000, 1), "default", Priority(1))
    }

    fn queue_record(node_id: &NodeId, parent: &str, child: &str) -> ActivityRecord {
        ActivityRecord {
            node_id: node_id.clone(),
            parent_name: Some(parent.to_string()),
            child_name: Some(child.to_string()),
            priority: None,
            state: ActivityState::Skipped,
            diagnostic: String::new(),
            kind: None,
            allocation_request_id: None,
        }
    }

    fn app_record(application_id: &ApplicationId) -> AppActivityRecord {
        AppActivityRecord {
            application_id: application_id.clone(),
            container_id: None,
            priority: Some("5".to_string()),
            state: ActivityState::Skipped,
            diagnostic: "priority skipped".to_string(),
            kind: RecordKind::Container,
            node_id: Some(node()),
            allocation_request_id: Some("7".to_string()),
        }
    }

    #[test]
    fn test_nothing_recorded_by_default() {
        let manager = InMemoryActivitiesManager::default();

        manager.start_node_update_recording(&node());
        assert!(!manager.should_record_this_node(&node()));
        manager.add_scheduling_activity_for_node(queue_record(&node(), "root", "default"));
        manager.finish_node_update_recording(&node());

        assert!(manager.node_allocations(&node()).is_empty());
        assert!(!manager.should_record_this_app(app().application_id()));
    }

    #[test]
    fn test_armed_node_records_one_pass() {
        init_logging();
        let manager = InMemoryActivitiesManager::default();
        manager.record_next_node_update_activities(Some(node()));

        manager.start_node_update_recording(&node());
        assert!(manager.should_record_this_node(&node()));
        manager.add_scheduling_activity_for_node(queue_record(&node(), "root", "default"));
        manager.add_scheduling_activity_for_node(queue_record(&node(), "root", "batch"));
        manager.update_allocation_final_state(&node(), None, AllocationState::Skipped);
        manager.finish_node_update_recording(&node());

        assert!(!manager.should_record_this_node(&node()));
        let allocations = manager.node_allocations(&node());
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].final_state, Some(AllocationState::Skipped));
        let children: Vec<_> =
            allocations[0].records.iter().map(|r| r.child_name.clone().unwrap()).collect();
        assert_eq!(children, vec!["default", "batch"]);

        // Arming is one-shot.
        manager.start_node_update_recording(&node());
        assert!(!manager.should_record_this_node(&node()));
    }

    #[test]
    fn test_next_available_node_is_picked_once() {
        let manager = InMemoryActivitiesManager::default();
        let other = NodeId::new("worker-2", 8041);
        manager.record_next_node_update_activities(None);

        manager.start_node_update_recording(&other);
        assert!(manager.should_record_this_node(&other));
        manager.start_node_update_recording(&node());
        assert!(!manager.should_record_this_node(&node()));
    }

    #[test]
    fn test_final_state_update_opens_new_allocation() {
        let manager = InMemoryActivitiesManager::default();
        let container = ContainerId::new(ApplicationId::new(1700000000000, 1), 1, 2);
        manager.record_next_node_update_activities(Some(node()));
        manager.start_node_update_recording(&node());

        manager.add_scheduling_activity_for_node(queue_record(&node(), "root", "default"));
        manager.update_allocation_final_state(
            &node(),
            Some(&container),
            AllocationState::Allocated,
        );
        manager.add_scheduling_activity_for_node(queue_record(&node(), "root", "batch"));
        manager.finish_node_update_recording(&node());

        let allocations = manager.node_allocations(&node());
        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].container_id, Some(container));
        assert_eq!(allocations[1].final_state, None);
        assert_eq!(allocations[1].records[0].child_name.as_deref(), Some("batch"));
    }

    #[test]
    fn test_latest_pass_replaces_previous() {
        let manager = InMemoryActivitiesManager::default();
        for queue in ["default", "batch"] {
            manager.record_next_node_update_activities(Some(node()));
            manager.start_node_update_recording(&node());
            manager.add_scheduling_activity_for_node(queue_record(&node(), "root", queue));
            manager.finish_node_update_recording(&node());
        }

        let allocations = manager.node_allocations(&node());
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].records[0].child_name.as_deref(), Some("batch"));
    }

    #[test]
    fn test_recording_node_id_resolution() {
        let manager = InMemoryActivitiesManager::default();
        let scheduler_node = TestNode(node());

        assert_eq!(manager.recording_node_id(Some(&scheduler_node)), Some(node()));
        assert_eq!(manager.recording_node_id(None), Some(NodeId::empty()));
    }

    #[test]
    fn test_app_session_captured_while_recording() {
        let manager = InMemoryActivitiesManager::default();
        let app = app();
        manager.turn_on_app_activities_recording(app.application_id().clone(), None);
        assert!(manager.should_record_this_app(app.application_id()));

        manager.start_app_allocation_recording(Some(&node()), 1700000000123, &app);
        manager.add_scheduling_activity_for_app(app_record(app.application_id()));
        manager.finish_app_allocation_recording(
            app.application_id(),
            None,
            ActivityState::Skipped,
            "priority skipped",
        );

        let allocations = manager.app_allocations(app.application_id());
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].queue_name, "default");
        assert_eq!(allocations[0].node_id, Some(node()));
        assert_eq!(allocations[0].records.len(), 1);
        assert_eq!(allocations[0].final_state, Some(ActivityState::Skipped));
        assert_eq!(allocations[0].diagnostic.as_deref(), Some("priority skipped"));
    }

    #[test]
    fn test_untraced_app_session_is_discarded() {
        let manager = InMemoryActivitiesManager::default();
        let app = app();

        manager.start_app_allocation_recording(Some(&node()), 0, &app);
        manager.add_scheduling_activity_for_app(app_record(app.application_id()));
        manager.finish_app_allocation_recording(
            app.application_id(),
            None,
            ActivityState::Skipped,
            "",
        );

        assert!(manager.app_allocations(app.application_id()).is_empty());
    }

    #[test]
    fn test_app_ring_is_bounded() {
        let config = ActivitiesConfig {
            app_activities_max_queue_length: 2,
            ..ActivitiesConfig::default()
        };
        let manager = InMemoryActivitiesManager::new(config);
        let app = app();
        manager.turn_on_app_activities_recording(
            app.application_id().clone(),
            Some(Duration::from_secs(60)),
        );

        for ts in 0..3 {
            manager.start_app_allocation_recording(Some(&node()), ts, &app);
            manager.finish_app_allocation_recording(
                app.application_id(),
                None,
                ActivityState::Skipped,
                "",
            );
        }

        let timestamps: Vec<_> =
            manager.app_allocations(app.application_id()).iter().map(|a| a.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2]);
    }

    #[test]
    fn test_zero_window_records_nothing() {
        let manager = InMemoryActivitiesManager::default();
        let app = app();
        manager
            .turn_on_app_activities_recording(app.application_id().clone(), Some(Duration::ZERO));

        manager.start_app_allocation_recording(Some(&node()), 0, &app);
        manager.finish_app_allocation_recording(
            app.application_id(),
            None,
            ActivityState::Rejected,
            "",
        );

        assert!(manager.app_allocations(app.application_id()).is_empty());
        assert!(!manager.should_record_this_app(app.application_id()));
        assert!(manager.recording_app_ids().is_empty());
    }

    #[test]
    fn test_elapsed_window_stops_recording_without_session() {
        let manager = InMemoryActivitiesManager::default();
        let app = app();
        manager.turn_on_app_activities_recording(
            app.application_id().clone(),
            Some(Duration::from_millis(1)),
        );

        std::thread::sleep(Duration::from_millis(20));

        assert!(manager.recording_app_ids().is_empty());
        assert!(!manager.should_record_this_app(app.application_id()));

        manager.start_app_allocation_recording(Some(&node()), 0, &app);
        manager.finish_app_allocation_recording(
            app.application_id(),
            None,
            ActivityState::Skipped,
            "",
        );
        assert!(manager.app_allocations(app.application_id()).is_empty());
    }

    #[test]
    fn test_session_in_flight_outlives_its_window() {
        let manager = InMemoryActivitiesManager::default();
        let app = app();
        manager.turn_on_app_activities_recording(
            app.application_id().clone(),
            Some(Duration::from_millis(1)),
        );
        manager.start_app_allocation_recording(Some(&node()), 0, &app);

        std::thread::sleep(Duration::from_millis(20));

        assert!(manager.should_record_this_app(app.application_id()));
        manager.add_scheduling_activity_for_app(app_record(app.application_id()));
        manager.finish_app_allocation_recording(
            app.application_id(),
            None,
            ActivityState::Skipped,
            "",
        );

        let allocations = manager.app_allocations(app.application_id());
        assert_eq!(allocations.len(), 1);
        assert_eq!(allocations[0].records.len(), 1);
        assert!(!manager.should_record_this_app(app.application_id()));
    }

    #[test]
    fn test_unrepresentable_window_never_expires() {
        let config = ActivitiesConfig {
            app_recording_secs: u64::MAX,
            ..ActivitiesConfig::default()
        };
        let manager = InMemoryActivitiesManager::new(config);
        let app = app();

        manager.turn_on_app_activities_recording(app.application_id().clone(), None);
        manager.turn_on_app_activities_recording(
            ApplicationId::new(1700000000000, 2),
            Some(Duration::MAX),
        );

        assert!(manager.should_record_this_app(app.application_id()));
        assert_eq!(manager.recording_app_ids().len(), 2);

        manager.turn_off_app_activities_recording(app.application_id());
        assert!(!manager.should_record_this_app(app.application_id()));
    }

    #[test]
    fn test_concurrent_passes_on_different_nodes() {
        let manager = Arc::new(InMemoryActivitiesManager::default());
        let nodes: Vec<_> = (0..4).map(|i| NodeId::new(format!("worker-{}", i), 8041)).collect();
        for node_id in &nodes {
            manager.record_next_node_update_activities(Some(node_id.clone()));
        }

        let handles: Vec<_> = nodes
            .iter()
            .cloned()
            .map(|node_id| {
                let manager = Arc::clone(&manager);
                std::thread::spawn(move || {
                    manager.start_node_update_recording(&node_id);
                    for i in 0..50 {
                        let record = queue_record(&node_id, "root", &format!("q{}", i));
                        manager.add_scheduling_activity_for_node(record);
                    }
                    manager.finish_node_update_recording(&node_id);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        for node_id in &nodes {
            let allocations = manager.node_allocations(node_id);
            let names: Vec<_> =
                allocations[0].records.iter().map(|r| r.child_name.clone().unwrap()).collect();
            let expected: Vec<_> = (0..50).map(|i| format!("q{}", i)).collect();
            assert_eq!(names, expected);
        }
    }

    #[test]
    fn test_clear() {
        let manager = InMemoryActivitiesManager::default();
        manager.turn_on_app_activities_recording(app().application_id().clone(), None);
        manager.record_next_node_update_activities(Some(node()));

        manager.clear();

        assert!(manager.recording_app_ids().is_empty());
        manager.start_node_update_recording(&node());
        assert!(!manager.should_record_this_node(&node()));
    }
}
