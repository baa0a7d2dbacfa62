use std::env;

/// URL rooted at an Azure DevOps organization, e.g. `https://dev.azure.com/fabrikam`.
#[derive(Debug, Clone)]
pub struct AdoUrl(String);

impl AsRef<str> for AdoUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AdoUrl {
    /// Creates the base URL for an organization. `ADO_BASE_URL` overrides the
    /// hosted service address for on-premises servers.
    pub fn for_organization(organization: &str) -> Self {
        match env::var("ADO_BASE_URL") {
            Ok(base) if !base.is_empty() => Self(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                organization
            )),
            _ => Self(format!("https://dev.azure.com/{}", organization)),
        }
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    pub fn with_api_version(&self, version: &str) -> Self {
        if self.0.contains('?') {
            Self(format!("{}&api-version={}", self.0, version))
        } else {
            Self(format!("{}?api-version={}", self.0, version))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_paths_without_duplicate_slashes() {
        let url = AdoUrl("https://dev.azure.com/fabrikam/".to_string())
            .append_path("/_apis/wit/wiql");
        assert_eq!(url.as_ref(), "https://dev.azure.com/fabrikam/_apis/wit/wiql");
    }

    #[test]
    fn api_version_uses_query_separator() {
        let url = AdoUrl("https://dev.azure.com/fabrikam/_apis/projects".to_string())
            .with_api_version("7.1");
        assert_eq!(
            url.as_ref(),
            "https://dev.azure.com/fabrikam/_apis/projects?api-version=7.1"
        );

        let url = url.with_api_version("7.1");
        assert!(url.as_ref().ends_with("?api-version=7.1&api-version=7.1"));
    }
}
