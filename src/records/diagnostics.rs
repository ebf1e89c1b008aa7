//! Reason strings the scheduler attaches to activity records.

pub const EMPTY: &str = "";

// Queue level
pub const QUEUE_MAX_CAPACITY_LIMIT: &str = "queue exceeds max capacity limit";
pub const QUEUE_DO_NOT_NEED_MORE_RESOURCE: &str = "queue does not need more resource";
pub const QUEUE_SKIPPED_HEADROOM: &str = "queue skipped because of headroom";

// Application level
pub const USER_CAPACITY_MAXIMUM_LIMIT: &str = "user capacity reach maximum limit";
pub const SKIP_AM_ALLOCATION_IN_IGNORE_EXCLUSIVE_MODE: &str =
    "skip AM allocation in ignore exclusive mode";
pub const SKIPPED_ALL_PRIORITIES: &str = "skipped all priorities of the app";
pub const RESPECT_FIFO: &str =
    "to respect FIFO of applications, skipped following applications in the queue";
pub const APPLICATION_DO_NOT_NEED_RESOURCE: &str = "application does not need more resource";

// Request level
pub const PRIORITY_SKIPPED: &str = "priority skipped";
pub const PRIORITY_SKIPPED_BECAUSE_NULL_ANY_REQUEST: &str =
    "priority skipped because off-switch request is null";
pub const SKIP_PRIORITY_BECAUSE_OF_RELAX_LOCALITY: &str =
    "priority skipped because of relax locality is not allowed";
pub const SKIP_IN_IGNORE_EXCLUSIVITY_MODE: &str =
    "skipping x allocation in ignore exclusivity mode";
pub const DO_NOT_NEED_ALLOCATIONATTEMPTINFOS: &str = "do not need more allocation attempts";
pub const LOCALITY_SKIPPED: &str = "locality skipped";

// Node level
pub const SKIP_BLACK_LISTED_NODE: &str = "skipped because node is black listed";
pub const NOT_SUFFICIENT_RESOURCE: &str = "node does not have sufficient resource for request";
pub const NODE_DO_NOT_MATCH_PARTITION_OR_PLACEMENT_CONSTRAINTS: &str =
    "node does not match partition or placement constraints";
pub const NODE_IS_RESERVED: &str = "node is reserved by another application";
