use az_wit::RawWorkItem;
use serde_json::Value;
use time::OffsetDateTime;

use crate::error::DataConversionError;
use crate::fields;
use crate::record::TimeLogRecord;

/// Convert a raw work item into a [`TimeLogRecord`].
///
/// Title, type, iteration path and state are required; a missing one fails
/// the conversion. `System.AssignedTo` is absent for unassigned items and
/// maps to an empty string.
pub fn to_time_log_record(raw: &RawWorkItem) -> Result<TimeLogRecord, DataConversionError> {
    let title = required_string(raw, fields::TITLE)?;
    let item_type = required_string(raw, fields::WORK_ITEM_TYPE)?;
    let iteration_path = required_string(raw, fields::ITERATION_PATH)?;
    let state = required_string(raw, fields::STATE)?;

    let is_task = item_type.eq_ignore_ascii_case(fields::TYPE_TASK);
    let activity = if is_task {
        optional_string(raw, fields::ACTIVITY).unwrap_or_default()
    } else {
        String::new()
    };
    let is_task_marked_as_done = is_task && state.eq_ignore_ascii_case(fields::STATE_DONE);

    Ok(TimeLogRecord {
        work_item_id: raw.id,
        title,
        item_type,
        iteration_path,
        assigned_to: assigned_display_name(raw),
        state,
        activity,
        is_task_marked_as_done,
        remaining_work: remaining_work(raw)?,
        tracking_date: OffsetDateTime::now_utc().date(),
        tasks: Vec::new(),
        custom_fields: serde_json::Map::new(),
    })
}

fn required_string(
    raw: &RawWorkItem,
    field: &'static str,
) -> Result<String, DataConversionError> {
    match raw.field(field) {
        None => Err(DataConversionError::MissingField { id: raw.id, field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Ok(other.to_string()),
    }
}

fn optional_string(raw: &RawWorkItem, field: &str) -> Option<String> {
    match raw.field(field)? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// The API returns the assignee as an identity object; older servers hand
/// back a plain "Name <email>" string.
fn assigned_display_name(raw: &RawWorkItem) -> String {
    match raw.field(fields::ASSIGNED_TO) {
        Some(Value::Object(identity)) => identity
            .get("displayName")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        Some(Value::String(name)) => name.clone(),
        _ => String::new(),
    }
}

fn remaining_work(raw: &RawWorkItem) -> Result<Option<f64>, DataConversionError> {
    match raw.field(fields::REMAINING_WORK) {
        None => Ok(None),
        Some(Value::Number(n)) => Ok(n.as_f64()),
        Some(Value::String(s)) => {
            s.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| DataConversionError::InvalidNumber {
                    id: raw.id,
                    field: fields::REMAINING_WORK,
                    value: s.clone(),
                })
        }
        Some(other) => Err(DataConversionError::InvalidNumber {
            id: raw.id,
            field: fields::REMAINING_WORK,
            value: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(id: i32, fields: Value) -> RawWorkItem {
        RawWorkItem {
            id,
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    fn task(id: i32, state: &str) -> RawWorkItem {
        raw(
            id,
            json!({
                "System.Title": "Implement parser",
                "System.WorkItemType": "Task",
                "System.IterationPath": "Fabrikam\\Sprint 3",
                "System.State": state,
                "Microsoft.VSTS.Common.Activity": "Development",
            }),
        )
    }

    #[test]
    fn converts_a_task() {
        let record = to_time_log_record(&task(201, "Active")).unwrap();

        assert_eq!(record.work_item_id, 201);
        assert_eq!(record.item_type, "Task");
        assert_eq!(record.activity, "Development");
        assert!(!record.is_task_marked_as_done);
        assert!(record.tasks.is_empty());
    }

    #[test]
    fn done_flag_compares_state_case_insensitively() {
        assert!(to_time_log_record(&task(201, "done")).unwrap().is_task_marked_as_done);
        assert!(to_time_log_record(&task(201, "Done")).unwrap().is_task_marked_as_done);
        assert!(!to_time_log_record(&task(201, "Active")).unwrap().is_task_marked_as_done);
    }

    #[test]
    fn non_task_has_empty_activity_and_false_done_flag() {
        let record = to_time_log_record(&raw(
            101,
            json!({
                "System.Title": "Checkout flow",
                "System.WorkItemType": "Product Backlog Item",
                "System.IterationPath": "Fabrikam\\Sprint 3",
                "System.State": "Done",
                "Microsoft.VSTS.Common.Activity": "Development",
            }),
        ))
        .unwrap();

        assert_eq!(record.activity, "");
        assert!(!record.is_task_marked_as_done);
    }

    #[test]
    fn missing_remaining_work_is_none() {
        let record = to_time_log_record(&task(201, "Active")).unwrap();
        assert_eq!(record.remaining_work, None);
    }

    #[test]
    fn numeric_remaining_work_is_parsed() {
        let mut item = task(201, "Active");
        item.fields.insert(
            fields::REMAINING_WORK.to_string(),
            json!(3.5),
        );
        assert_eq!(to_time_log_record(&item).unwrap().remaining_work, Some(3.5));

        item.fields.insert(
            fields::REMAINING_WORK.to_string(),
            json!("4.25"),
        );
        assert_eq!(to_time_log_record(&item).unwrap().remaining_work, Some(4.25));
    }

    #[test]
    fn non_numeric_remaining_work_fails_conversion() {
        let mut item = task(201, "Active");
        item.fields.insert(
            fields::REMAINING_WORK.to_string(),
            json!("abc"),
        );

        let err = to_time_log_record(&item).unwrap_err();
        assert_eq!(
            err,
            DataConversionError::InvalidNumber {
                id: 201,
                field: fields::REMAINING_WORK,
                value: "abc".to_string(),
            }
        );
    }

    #[test]
    fn missing_title_is_fatal() {
        let err = to_time_log_record(&raw(
            7,
            json!({
                "System.WorkItemType": "Bug",
                "System.IterationPath": "Fabrikam\\Sprint 3",
                "System.State": "New",
            }),
        ))
        .unwrap_err();

        assert_eq!(
            err,
            DataConversionError::MissingField {
                id: 7,
                field: fields::TITLE,
            }
        );
    }

    #[test]
    fn assignee_identity_object_maps_to_display_name() {
        let mut item = task(201, "Active");
        item.fields.insert(
            fields::ASSIGNED_TO.to_string(),
            json!({ "displayName": "Ada Lovelace", "uniqueName": "ada@fabrikam.com" }),
        );
        assert_eq!(to_time_log_record(&item).unwrap().assigned_to, "Ada Lovelace");

        item.fields.insert(
            fields::ASSIGNED_TO.to_string(),
            json!("Ada Lovelace <ada@fabrikam.com>"),
        );
        assert_eq!(
            to_time_log_record(&item).unwrap().assigned_to,
            "Ada Lovelace <ada@fabrikam.com>"
        );
    }

    #[test]
    fn unassigned_item_maps_to_empty_string() {
        let record = to_time_log_record(&task(201, "Active")).unwrap();
        assert_eq!(record.assigned_to, "");
    }
}
