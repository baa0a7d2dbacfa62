//! Reference names of the work item fields this crate consumes.
//!
//! These are defined by the remote process template, not by us, so they live
//! here as named constants rather than inline strings.

pub const ID: &str = "System.Id";
pub const TITLE: &str = "System.Title";
pub const TEAM_PROJECT: &str = "System.TeamProject";
pub const WORK_ITEM_TYPE: &str = "System.WorkItemType";
pub const ITERATION_PATH: &str = "System.IterationPath";
pub const ASSIGNED_TO: &str = "System.AssignedTo";
pub const STATE: &str = "System.State";
pub const REMAINING_WORK: &str = "Microsoft.VSTS.Scheduling.RemainingWork";
pub const ACTIVITY: &str = "Microsoft.VSTS.Common.Activity";
pub const BACKLOG_PRIORITY: &str = "Microsoft.VSTS.Common.BacklogPriority";
pub const PRIORITY: &str = "Microsoft.VSTS.Common.Priority";
pub const BLOCKED: &str = "Microsoft.VSTS.CMMI.Blocked";

pub const TYPE_BACKLOG_ITEM: &str = "Product Backlog Item";
pub const TYPE_BUG: &str = "Bug";
pub const TYPE_TASK: &str = "Task";

pub const STATE_DONE: &str = "Done";
pub const STATE_REMOVED: &str = "Removed";

/// The field set fetched for every work item. Covers everything the record
/// conversion reads; consumers extend it through
/// [`AdoWorkItemSource::with_extra_fields`](crate::AdoWorkItemSource::with_extra_fields).
pub fn default_query_fields() -> Vec<String> {
    [
        TITLE,
        WORK_ITEM_TYPE,
        ITERATION_PATH,
        ASSIGNED_TO,
        STATE,
        REMAINING_WORK,
        ACTIVITY,
        BACKLOG_PRIORITY,
        BLOCKED,
    ]
    .iter()
    .map(|field| field.to_string())
    .collect()
}
