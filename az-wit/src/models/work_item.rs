use serde::Deserialize;
use serde_json::{Map, Value};

/// A work item exactly as returned by the REST API: an id plus the requested
/// fields keyed by reference name (`System.Title`, ...).
#[derive(Debug, Clone, Deserialize)]
pub struct RawWorkItem {
    pub id: i32,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl RawWorkItem {
    /// Look up a field by reference name, treating JSON null as absent.
    pub fn field(&self, reference_name: &str) -> Option<&Value> {
        self.fields.get(reference_name).filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_batch_row() {
        let item: RawWorkItem = serde_json::from_value(json!({
            "id": 42,
            "rev": 7,
            "fields": {
                "System.Title": "Fix the thing",
                "Microsoft.VSTS.Scheduling.RemainingWork": 2.5
            },
            "url": "https://dev.azure.com/fabrikam/_apis/wit/workItems/42"
        }))
        .unwrap();

        assert_eq!(item.id, 42);
        assert_eq!(
            item.field("System.Title").and_then(Value::as_str),
            Some("Fix the thing")
        );
    }

    #[test]
    fn null_fields_read_as_absent() {
        let item: RawWorkItem = serde_json::from_value(json!({
            "id": 42,
            "fields": { "System.AssignedTo": null }
        }))
        .unwrap();

        assert!(item.field("System.AssignedTo").is_none());
    }
}
