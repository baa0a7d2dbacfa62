mod ado;

use async_trait::async_trait;

pub use ado::AdoWorkItemSource;
pub use az_wit::{RawWorkItem, WorkItemLink};

use crate::error::SourceError;

/// Scope shared by both retrieval queries: one team project, one iteration
/// subtree.
#[derive(Debug, Clone)]
pub struct QueryScope {
    pub project: String,
    pub iteration_path: String,
}

impl QueryScope {
    pub fn new(project: impl Into<String>, iteration_path: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            iteration_path: iteration_path.into(),
        }
    }
}

/// Outbound port to the work-tracking service.
///
/// The reconciler only ever reads through this trait; query text, paging and
/// authentication are the implementor's concern. Retry and timeout policy,
/// if any, also belongs behind this seam.
#[async_trait]
pub trait WorkItemSource: Send + Sync {
    /// Hierarchical query: parent-to-child link pairs rooted at backlog items
    /// and bugs in the scoped iteration (project equality, type in
    /// {Product Backlog Item, Bug}, state not Removed), ordered by priority
    /// then id.
    async fn run_link_query(&self, scope: &QueryScope) -> Result<Vec<WorkItemLink>, SourceError>;

    /// Batched field fetch for an explicit id set.
    async fn fetch_work_items(&self, ids: &[i32]) -> Result<Vec<RawWorkItem>, SourceError>;

    /// Flat query with the same filter predicate as [`run_link_query`],
    /// returning full rows for every qualifying item regardless of linkage.
    ///
    /// [`run_link_query`]: WorkItemSource::run_link_query
    async fn query_work_items(&self, scope: &QueryScope) -> Result<Vec<RawWorkItem>, SourceError>;
}
