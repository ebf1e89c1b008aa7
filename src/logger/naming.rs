//! Names synthesized for request-level records.

use crate::scheduler::SchedulerRequestKey;

/// Join key between a `request` record and its paired `container` record,
/// `request_<priority>_<allocationRequestId>` with missing parts left empty.
pub fn request_name(priority: Option<&str>, allocation_request_id: Option<&str>) -> String {
    format!(
        "request_{}_{}",
        priority.unwrap_or_default(),
        allocation_request_id.unwrap_or_default()
    )
}

/// Priority of a request key as a string, `None` when the key or its priority
/// is missing.
pub fn priority_str(request_key: Option<&SchedulerRequestKey>) -> Option<String> {
    request_key.and_then(|key| key.priority).map(|priority| priority.to_string())
}
