//! Recording activities of an application during a node pass.

use super::naming::{priority_str, request_name};
use super::session::AppAllocationSession;
use super::{traced, traced_node_id};
use crate::manager::ActivitiesManager;
use crate::records::diagnostics;
use crate::records::{
    ActivityRecord, ActivityState, AppActivityRecord, ApplicationId, ContainerId, Priority,
    RecordKind,
};
use crate::scheduler::{Container, SchedulerApplicationAttempt, SchedulerNode, SchedulerRequestKey};

/// Application-level operations of an [`ActivitiesLogger`](super::ActivitiesLogger)
#[derive(Clone, Copy)]
pub struct AppActivities<'a> {
    manager: Option<&'a dyn ActivitiesManager>,
}

impl<'a> AppActivities<'a> {
    pub(crate) fn new(manager: Option<&'a dyn ActivitiesManager>) -> Self {
        Self { manager }
    }

    /// Record an application skipped without any container allocated, reserved
    /// or re-reserved. The scheduler moves on to the next application in the
    /// same leaf queue.
    pub fn record_skipped_app_activity_without_allocation(
        &self,
        node: Option<&dyn SchedulerNode>,
        application: &dyn SchedulerApplicationAttempt,
        request_key: Option<&SchedulerRequestKey>,
        diagnostic: &str,
    ) {
        self.record_app_activity_without_allocation(
            node,
            application,
            request_key,
            diagnostic,
            ActivityState::Skipped,
        );
    }

    /// Record an application rejected by its leaf queue, e.g. because of the
    /// queue's maximum capacity or a user limit. Rejection ends the
    /// application's session for this pass whether or not the node is traced.
    pub fn record_rejected_app_activity_from_leaf_queue(
        &self,
        node: Option<&dyn SchedulerNode>,
        application: &dyn SchedulerApplicationAttempt,
        priority: Option<Priority>,
        diagnostic: &str,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        if let Some(node_id) = traced_node_id(manager, node) {
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id,
                parent_name: Some(application.queue_name().to_string()),
                child_name: Some(application.application_id().to_string()),
                priority: priority.map(|p| p.to_string()),
                state: ActivityState::Rejected,
                diagnostic: diagnostic.to_string(),
                kind: Some(RecordKind::App),
                allocation_request_id: None,
            });
        }
        finish_app_allocation(
            manager,
            application.application_id(),
            None,
            ActivityState::Rejected,
            diagnostic,
        );
    }

    /// Record an application evaluated without any container allocated,
    /// reserved or re-reserved
    ///
    /// On a traced node this files up to three records: the skipped request's
    /// container and request entries (only with a request key) and the
    /// queue-to-application entry. The caller's diagnostic is attached once, at
    /// the finest granularity available. On a traced application one
    /// container-level record without a container id goes to its session.
    ///
    /// # Arguments
    ///
    /// * `node` - The node being evaluated, `None` for a candidate set
    /// * `application` - The application that got nothing
    /// * `request_key` - The request that was looked at, if any
    /// * `diagnostic` - Why nothing was allocated
    /// * `app_state` - Outcome recorded in the application's session
    pub fn record_app_activity_without_allocation(
        &self,
        node: Option<&dyn SchedulerNode>,
        application: &dyn SchedulerApplicationAttempt,
        request_key: Option<&SchedulerRequestKey>,
        diagnostic: &str,
        app_state: ActivityState,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        let node_id = manager.recording_node_id(node);
        let application_id = application.application_id();
        let priority = priority_str(request_key);
        let allocation_request_id = request_key.map(|key| key.allocation_request_id.to_string());

        if let Some(traced_id) = traced(manager, node_id.clone()) {
            if request_key.is_some() {
                let request = request_name(priority.as_deref(), allocation_request_id.as_deref());
                manager.add_scheduling_activity_for_node(ActivityRecord {
                    node_id: traced_id.clone(),
                    parent_name: Some(request.clone()),
                    child_name: None,
                    priority: priority.clone(),
                    state: ActivityState::Skipped,
                    diagnostic: diagnostic.to_string(),
                    kind: Some(RecordKind::Container),
                    allocation_request_id: allocation_request_id.clone(),
                });
                manager.add_scheduling_activity_for_node(ActivityRecord {
                    node_id: traced_id.clone(),
                    parent_name: Some(application_id.to_string()),
                    child_name: Some(request),
                    priority: priority.clone(),
                    state: ActivityState::Skipped,
                    diagnostic: diagnostics::EMPTY.to_string(),
                    kind: Some(RecordKind::Request),
                    allocation_request_id: allocation_request_id.clone(),
                });
            }
            let app_diagnostic =
                if request_key.is_some() { diagnostics::EMPTY } else { diagnostic };
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id: traced_id,
                parent_name: Some(application.queue_name().to_string()),
                child_name: Some(application_id.to_string()),
                priority: Some(application.priority().to_string()),
                state: ActivityState::Skipped,
                diagnostic: app_diagnostic.to_string(),
                kind: Some(RecordKind::App),
                allocation_request_id: None,
            });
        }

        // Nothing was allocated, so the app session gets no container id.
        if manager.should_record_this_app(application_id) {
            manager.add_scheduling_activity_for_app(AppActivityRecord {
                application_id: application_id.clone(),
                container_id: None,
                priority,
                state: app_state,
                diagnostic: diagnostic.to_string(),
                kind: RecordKind::Container,
                node_id,
                allocation_request_id,
            });
        }
    }

    /// Record a container allocated, reserved or re-reserved for an application
    ///
    /// Records are filed under the node being evaluated or, when that has no
    /// concrete identity, under the node the container landed on. The
    /// queue-to-application entry is always `ACCEPTED`: any container outcome,
    /// a reservation included, keeps the application in consideration.
    ///
    /// # Arguments
    ///
    /// * `node` - The node being evaluated, `None` for a candidate set
    /// * `application` - The application that got the container
    /// * `updated_container` - The allocated or reserved container
    /// * `activity_state` - Outcome of the container and its request
    pub fn record_app_activity_with_allocation(
        &self,
        node: Option<&dyn SchedulerNode>,
        application: &dyn SchedulerApplicationAttempt,
        updated_container: &Container,
        activity_state: ActivityState,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        let node_id = match manager.recording_node_id(node) {
            Some(id) if !id.is_empty() => id,
            _ => updated_container.node_id.clone(),
        };
        let application_id = application.application_id();
        let priority = updated_container.priority.to_string();
        let allocation_request_id = updated_container.allocation_request_id.to_string();

        if manager.should_record_this_node(&node_id) {
            let request =
                request_name(Some(priority.as_str()), Some(allocation_request_id.as_str()));
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id: node_id.clone(),
                parent_name: Some(request.clone()),
                child_name: Some(updated_container.to_string()),
                priority: Some(priority.clone()),
                state: activity_state,
                diagnostic: diagnostics::EMPTY.to_string(),
                kind: Some(RecordKind::Container),
                allocation_request_id: Some(allocation_request_id.clone()),
            });
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id: node_id.clone(),
                parent_name: Some(application_id.to_string()),
                child_name: Some(request),
                priority: Some(priority.clone()),
                state: activity_state,
                diagnostic: diagnostics::EMPTY.to_string(),
                kind: Some(RecordKind::Request),
                allocation_request_id: Some(allocation_request_id.clone()),
            });
            manager.add_scheduling_activity_for_node(ActivityRecord {
                node_id: node_id.clone(),
                parent_name: Some(application.queue_name().to_string()),
                child_name: Some(application_id.to_string()),
                priority: Some(application.priority().to_string()),
                state: ActivityState::Accepted,
                diagnostic: diagnostics::EMPTY.to_string(),
                kind: Some(RecordKind::App),
                allocation_request_id: None,
            });
        }

        if manager.should_record_this_app(application_id) {
            manager.add_scheduling_activity_for_app(AppActivityRecord {
                application_id: application_id.clone(),
                container_id: Some(updated_container.id.clone()),
                priority: Some(priority),
                state: activity_state,
                diagnostic: diagnostics::EMPTY.to_string(),
                kind: RecordKind::Container,
                node_id: Some(node_id),
                allocation_request_id: Some(allocation_request_id),
            });
        }
    }

    /// Open the application's session when the scheduler starts looking at it
    /// within a node pass.
    pub fn start_app_allocation_recording(
        &self,
        node: Option<&dyn SchedulerNode>,
        current_time: i64,
        application: &dyn SchedulerApplicationAttempt,
    ) -> AppAllocationSession {
        let application_id = application.application_id().clone();
        let Some(manager) = self.manager else {
            return AppAllocationSession::new(application_id, None, current_time);
        };
        let node_id = manager.recording_node_id(node);
        manager.start_app_allocation_recording(node_id.as_ref(), current_time, application);
        AppAllocationSession::new(application_id, node_id, current_time)
    }

    /// Close the application's session. `container_id` is present only when a
    /// container was allocated or reserved during the session.
    pub fn finish_allocated_app_allocation_recording(
        &self,
        session: AppAllocationSession,
        container_id: Option<&ContainerId>,
        container_state: ActivityState,
        diagnostic: &str,
    ) {
        let Some(manager) = self.manager else {
            return;
        };
        finish_app_allocation(
            manager,
            session.application_id(),
            container_id,
            container_state,
            diagnostic,
        );
    }

    /// Close the application's session when nothing was allocated or reserved.
    pub fn finish_skipped_app_allocation_recording(
        &self,
        session: AppAllocationSession,
        container_state: ActivityState,
        diagnostic: &str,
    ) {
        self.finish_allocated_app_allocation_recording(session, None, container_state, diagnostic);
    }
}

fn finish_app_allocation(
    manager: &dyn ActivitiesManager,
    application_id: &ApplicationId,
    container_id: Option<&ContainerId>,
    state: ActivityState,
    diagnostic: &str,
) {
    if manager.should_record_this_app(application_id) {
        manager.finish_app_allocation_recording(application_id, container_id, state, diagnostic);
    }
}
