use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::Date;

/// One time-trackable work item as handed to the evaluation pipeline.
///
/// Backlog items and bugs carry their qualifying child tasks in `tasks`;
/// task records never nest further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimeLogRecord {
    pub work_item_id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub item_type: String,
    pub iteration_path: String,
    /// Display name of the assignee; empty when the item is unassigned.
    pub assigned_to: String,
    pub state: String,
    /// Activity classification, populated only for tasks.
    pub activity: String,
    pub is_task_marked_as_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remaining_work: Option<f64>,
    /// Date the record was produced.
    pub tracking_date: Date,
    #[serde(default)]
    pub tasks: Vec<TimeLogRecord>,
    /// Extra fields written by the custom-field hook; empty by default.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub custom_fields: Map<String, Value>,
}

impl TimeLogRecord {
    pub fn is_task(&self) -> bool {
        self.item_type.eq_ignore_ascii_case(crate::fields::TYPE_TASK)
    }
}
