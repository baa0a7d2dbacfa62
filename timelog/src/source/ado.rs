use async_trait::async_trait;
use az_wit::{RawWorkItem, WitClient, WitClientError, WorkItemLink};

use super::{QueryScope, WorkItemSource};
use crate::error::SourceError;
use crate::fields;

const HIERARCHY_LINK_TYPE: &str = "System.LinkTypes.Hierarchy-Forward";

/// [`WorkItemSource`] backed by the Azure DevOps work item tracking API.
///
/// Owns its [`WitClient`]; the session is not shared across concurrent
/// retrievals, so acquire a fresh client per reconciler.
pub struct AdoWorkItemSource {
    client: WitClient,
    fetch_fields: Vec<String>,
}

impl AdoWorkItemSource {
    pub fn new(client: WitClient) -> Self {
        Self {
            client,
            fetch_fields: fields::default_query_fields(),
        }
    }

    /// Extend the fetched field set with custom reference names so the
    /// custom-field hook sees them on the raw items.
    pub fn with_extra_fields(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        for field in extra {
            if !self.fetch_fields.contains(&field) {
                self.fetch_fields.push(field);
            }
        }
        self
    }
}

#[async_trait]
impl WorkItemSource for AdoWorkItemSource {
    async fn run_link_query(&self, scope: &QueryScope) -> Result<Vec<WorkItemLink>, SourceError> {
        self.client
            .run_link_query(&tree_query(scope))
            .await
            .map_err(to_source_error)
    }

    async fn fetch_work_items(&self, ids: &[i32]) -> Result<Vec<RawWorkItem>, SourceError> {
        self.client
            .get_work_items(ids, &self.fetch_fields)
            .await
            .map_err(to_source_error)
    }

    async fn query_work_items(&self, scope: &QueryScope) -> Result<Vec<RawWorkItem>, SourceError> {
        let ids = self
            .client
            .run_id_query(&flat_query(scope))
            .await
            .map_err(to_source_error)?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        self.client
            .get_work_items(&ids, &self.fetch_fields)
            .await
            .map_err(to_source_error)
    }
}

fn to_source_error(error: WitClientError) -> SourceError {
    if error.is_connection_error() {
        SourceError::Connection(error.to_string())
    } else {
        SourceError::Query(error.to_string())
    }
}

/// WIQL uses single-quoted string literals, so escape user-provided quotes.
fn escape_wiql(value: &str) -> String {
    value.replace('\'', "''")
}

fn filter_clause(scope: &QueryScope, prefix: &str) -> String {
    format!(
        "{prefix}[{project_field}] = '{project}' \
         AND {prefix}[{type_field}] IN ('{backlog_item}', '{bug}') \
         AND {prefix}[{state_field}] <> '{removed}' \
         AND {prefix}[{iteration_field}] UNDER '{iteration}'",
        prefix = prefix,
        project_field = fields::TEAM_PROJECT,
        project = escape_wiql(&scope.project),
        type_field = fields::WORK_ITEM_TYPE,
        backlog_item = fields::TYPE_BACKLOG_ITEM,
        bug = fields::TYPE_BUG,
        state_field = fields::STATE,
        removed = fields::STATE_REMOVED,
        iteration_field = fields::ITERATION_PATH,
        iteration = escape_wiql(&scope.iteration_path),
    )
}

fn tree_query(scope: &QueryScope) -> String {
    format!(
        "SELECT [{id}] FROM WorkItemLinks \
         WHERE {filter} \
         AND [System.Links.LinkType] = '{link_type}' \
         ORDER BY [{priority}], [{id}] \
         MODE (Recursive)",
        id = fields::ID,
        filter = filter_clause(scope, "Source."),
        link_type = HIERARCHY_LINK_TYPE,
        priority = fields::PRIORITY,
    )
}

fn flat_query(scope: &QueryScope) -> String {
    format!(
        "SELECT [{id}] FROM WorkItems \
         WHERE {filter} \
         ORDER BY [{priority}], [{id}]",
        id = fields::ID,
        filter = filter_clause(scope, ""),
        priority = fields::PRIORITY,
    )
}
