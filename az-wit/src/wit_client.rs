use base64::prelude::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::models::{LinkRow, RawWorkItem, WorkItemLink, WorkItemRef};
use crate::AdoUrl;

const API_VERSION: &str = "7.1";
/// The batch endpoint rejects requests with more than 200 ids.
const BATCH_PAGE_SIZE: usize = 200;

/// Authenticated session against the work item tracking API of one project.
///
/// Not designed for sharing across concurrent retrievals; acquire a fresh
/// client per caller instead.
pub struct WitClient {
    http: reqwest::Client,
    base_url: AdoUrl,
    project: String,
    auth_header: String,
}

impl WitClient {
    /// Connect to a project and validate the credentials with a cheap read,
    /// so a bad token or unknown project fails here instead of on the first
    /// query.
    pub async fn connect(
        organization: &str,
        project: &str,
        pat: &str,
    ) -> Result<Self, WitClientError> {
        let client = Self {
            http: reqwest::Client::new(),
            base_url: AdoUrl::for_organization(organization),
            project: project.to_owned(),
            auth_header: format!("Basic {}", BASE64_STANDARD.encode(format!(":{}", pat))),
        };

        let url = client
            .base_url
            .append_path("_apis/projects")
            .append_path(project)
            .with_api_version(API_VERSION);
        let _: serde_json::Value = client.get(url).await?;

        Ok(client)
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// Execute a `WorkItemLinks` (tree) WIQL query and return its link rows.
    pub async fn run_link_query(&self, wiql: &str) -> Result<Vec<WorkItemLink>, WitClientError> {
        tracing::debug!(wiql, "executing link query");
        let response: WiqlResponse = self.post(self.wiql_url(), &WiqlBody { query: wiql }).await?;

        Ok(response
            .work_item_relations
            .into_iter()
            .filter_map(LinkRow::into_link)
            .collect())
    }

    /// Execute a flat `WorkItems` WIQL query and return the matching ids.
    pub async fn run_id_query(&self, wiql: &str) -> Result<Vec<i32>, WitClientError> {
        tracing::debug!(wiql, "executing flat query");
        let response: WiqlResponse = self.post(self.wiql_url(), &WiqlBody { query: wiql }).await?;

        Ok(response.work_items.into_iter().map(|wi| wi.id).collect())
    }

    /// Fetch field data for an explicit id set. One logical fetch; pages at
    /// the API limit of 200 ids per request.
    pub async fn get_work_items(
        &self,
        ids: &[i32],
        fields: &[String],
    ) -> Result<Vec<RawWorkItem>, WitClientError> {
        let url = self
            .base_url
            .append_path(&self.project)
            .append_path("_apis/wit/workitemsbatch")
            .with_api_version(API_VERSION);

        let mut items = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(BATCH_PAGE_SIZE) {
            let page: ListResponse<RawWorkItem> = self
                .post(url.clone(), &BatchRequest { ids: chunk, fields })
                .await?;
            items.extend(page.value);
        }

        tracing::debug!(requested = ids.len(), received = items.len(), "fetched work items");
        Ok(items)
    }

    fn wiql_url(&self) -> AdoUrl {
        self.base_url
            .append_path(&self.project)
            .append_path("_apis/wit/wiql")
            .with_api_version(API_VERSION)
    }

    async fn get<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, WitClientError> {
        let resp = self
            .http
            .get(url.as_ref())
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .send()
            .await
            .map_err(|e| WitClientError::Connection(e.to_string()))?;

        Self::read_json(resp).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: impl AsRef<str>,
        body: &B,
    ) -> Result<T, WitClientError> {
        let resp = self
            .http
            .post(url.as_ref())
            .header(reqwest::header::AUTHORIZATION, &self.auth_header)
            .json(body)
            .send()
            .await
            .map_err(|e| WitClientError::Connection(e.to_string()))?;

        Self::read_json(resp).await
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, WitClientError> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WitClientError::Unauthorized);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(WitClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| WitClientError::InvalidResponse(e.to_string()))
    }
}

#[derive(Error, Debug)]
pub enum WitClientError {
    #[error("unauthorized: the personal access token was rejected")]
    Unauthorized,
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request failed with status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("failed to parse response: {0}")]
    InvalidResponse(String),
}

impl WitClientError {
    /// True for failures that happened before the server accepted a query.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Connection(_))
    }
}

#[derive(Serialize)]
struct WiqlBody<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WiqlResponse {
    #[serde(default)]
    work_item_relations: Vec<LinkRow>,
    #[serde(default)]
    work_items: Vec<WorkItemRef>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BatchRequest<'a> {
    ids: &'a [i32],
    fields: &'a [String],
}

#[derive(Deserialize)]
struct ListResponse<T> {
    value: Vec<T>,
}
