use std::collections::HashSet;

use az_wit::{RawWorkItem, WorkItemLink};

use crate::convert::to_time_log_record;
use crate::error::{DataConversionError, TimeLogError};
use crate::fields;
use crate::record::TimeLogRecord;
use crate::source::{QueryScope, WorkItemSource};

type CustomFieldsHook = Box<dyn Fn(&RawWorkItem, &mut TimeLogRecord) + Send + Sync>;
type PostProcessHook = Box<dyn Fn(&mut Vec<TimeLogRecord>) + Send + Sync>;

/// Merges the linked and unlinked views of an iteration into one
/// deduplicated list of [`TimeLogRecord`]s.
///
/// The linked view (tree query) establishes which backlog items and bugs own
/// which tasks; the flat view catches every qualifying item the tree query
/// did not surface. Each call builds the record graph from scratch.
pub struct WorkItemReconciler<S> {
    source: S,
    custom_fields: Option<CustomFieldsHook>,
    post_process: Option<PostProcessHook>,
}

impl<S: WorkItemSource> WorkItemReconciler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            custom_fields: None,
            post_process: None,
        }
    }

    /// Register a hook that runs once per converted record, with access to
    /// the raw field data it came from.
    pub fn with_custom_fields(
        mut self,
        hook: impl Fn(&RawWorkItem, &mut TimeLogRecord) + Send + Sync + 'static,
    ) -> Self {
        self.custom_fields = Some(Box::new(hook));
        self
    }

    /// Register a hook that runs once on the reconciled list before it is
    /// returned, e.g. to enrich or filter records.
    pub fn with_post_process(
        mut self,
        hook: impl Fn(&mut Vec<TimeLogRecord>) + Send + Sync + 'static,
    ) -> Self {
        self.post_process = Some(Box::new(hook));
        self
    }

    /// Retrieve and reconcile every time-trackable work item of one
    /// iteration.
    #[tracing::instrument(name = "WorkItemReconciler::load_data", skip(self))]
    pub async fn load_data(
        &self,
        iteration_path: &str,
        project: &str,
    ) -> Result<Vec<TimeLogRecord>, TimeLogError> {
        if iteration_path.trim().is_empty() {
            return Err(TimeLogError::InvalidInput(
                "iteration path must not be empty".to_string(),
            ));
        }
        if project.trim().is_empty() {
            return Err(TimeLogError::InvalidInput(
                "project name must not be empty".to_string(),
            ));
        }

        let scope = QueryScope::new(project, iteration_path);

        let links = self.source.run_link_query(&scope).await?;
        tracing::debug!(link_count = links.len(), iteration_path, "ran link query");

        let linked_ids = distinct_target_ids(&links);
        let linked_raw = if linked_ids.is_empty() {
            Vec::new()
        } else {
            self.source.fetch_work_items(&linked_ids).await?
        };
        let linked = self.convert_all(&linked_raw)?;

        let mut reconciled = build_relation_map(&linked, &links);

        let flat_raw = self.source.query_work_items(&scope).await?;
        let flat = self.convert_all(&flat_raw)?;
        tracing::debug!(
            linked_count = linked.len(),
            flat_count = flat.len(),
            parent_count = reconciled.len(),
            "reconciling linked and unlinked sets"
        );

        let known_ids: HashSet<i32> = reconciled.iter().map(|r| r.work_item_id).collect();
        reconciled.extend(
            flat.into_iter()
                .filter(|record| !known_ids.contains(&record.work_item_id)),
        );

        if let Some(hook) = &self.post_process {
            hook(&mut reconciled);
        }

        Ok(reconciled)
    }

    fn convert_all(
        &self,
        raw_items: &[RawWorkItem],
    ) -> Result<Vec<TimeLogRecord>, DataConversionError> {
        raw_items
            .iter()
            .map(|raw| {
                let mut record = to_time_log_record(raw)?;
                if let Some(hook) = &self.custom_fields {
                    hook(raw, &mut record);
                }
                Ok(record)
            })
            .collect()
    }
}

/// Target ids in first-seen order. The tree query repeats an item id once
/// per inbound link, but it must be fetched only once.
fn distinct_target_ids(links: &[WorkItemLink]) -> Vec<i32> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|link| link.target_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Select the records targeted by root links as parents and attach their
/// qualifying tasks: directly linked, of type Task, and not Removed.
fn build_relation_map(records: &[TimeLogRecord], links: &[WorkItemLink]) -> Vec<TimeLogRecord> {
    let root_ids: HashSet<i32> = links
        .iter()
        .filter(|link| link.is_root())
        .map(|link| link.target_id)
        .collect();

    let mut parents: Vec<TimeLogRecord> = records
        .iter()
        .filter(|record| root_ids.contains(&record.work_item_id))
        .cloned()
        .collect();

    for parent in &mut parents {
        let child_ids: HashSet<i32> = links
            .iter()
            .filter(|link| link.source_id == Some(parent.work_item_id))
            .map(|link| link.target_id)
            .collect();

        parent.tasks = records
            .iter()
            .filter(|record| {
                child_ids.contains(&record.work_item_id)
                    && record.is_task()
                    && record.state != fields::STATE_REMOVED
            })
            .cloned()
            .collect();
    }

    parents
}
