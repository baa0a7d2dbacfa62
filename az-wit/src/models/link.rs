use serde::Deserialize;

/// A directed parent-to-child relation returned by a `WorkItemLinks` query.
///
/// Root rows have no source; their targets are the top-level items of the
/// queried tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItemLink {
    pub source_id: Option<i32>,
    pub target_id: i32,
}

impl WorkItemLink {
    pub fn is_root(&self) -> bool {
        self.source_id.is_none()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LinkRow {
    pub source: Option<WorkItemRef>,
    pub target: Option<WorkItemRef>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkItemRef {
    pub id: i32,
}

impl LinkRow {
    /// Collapse a REST result row into a link. The API marks root rows either
    /// with a missing source or a source id of 0; both mean the same thing.
    pub(crate) fn into_link(self) -> Option<WorkItemLink> {
        let target_id = self.target.map(|t| t.id)?;
        let source_id = self.source.map(|s| s.id).filter(|id| *id != 0);
        Some(WorkItemLink { source_id, target_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_source_is_a_root_link() {
        let row = LinkRow {
            source: Some(WorkItemRef { id: 0 }),
            target: Some(WorkItemRef { id: 101 }),
        };

        let link = row.into_link().unwrap();
        assert!(link.is_root());
        assert_eq!(link.target_id, 101);
    }

    #[test]
    fn missing_source_is_a_root_link() {
        let row = LinkRow {
            source: None,
            target: Some(WorkItemRef { id: 101 }),
        };

        assert!(row.into_link().unwrap().is_root());
    }

    #[test]
    fn row_without_target_is_dropped() {
        let row = LinkRow {
            source: Some(WorkItemRef { id: 101 }),
            target: None,
        };

        assert!(row.into_link().is_none());
    }
}
