//! Configuration for the Graph client.

use secrecy::SecretString;

use crate::{GraphError, GraphResult};

/// Azure cloud environment, selecting login and Graph endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloudEnvironment {
    /// Worldwide commercial cloud.
    #[default]
    Commercial,
    /// US Government (GCC-High / DoD).
    UsGovernment,
    /// 21Vianet-operated China cloud.
    China,
    /// Germany cloud.
    Germany,
}

impl CloudEnvironment {
    /// OAuth2 login endpoint for this cloud.
    #[must_use]
    pub fn login_endpoint(self) -> &'static str {
        match self {
            Self::Commercial => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Germany => "https://login.microsoftonline.de",
        }
    }

    /// Microsoft Graph endpoint for this cloud.
    #[must_use]
    pub fn graph_endpoint(self) -> &'static str {
        match self {
            Self::Commercial => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
        }
    }
}

/// Client credentials for the OAuth2 client-credentials flow.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: SecretString,
}

/// Graph client configuration.
///
/// Built via [`GraphConfig::builder`]. The Graph base URL is normally
/// derived from the cloud environment and API version; tests override it
/// to point at a mock server.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    tenant_id: String,
    cloud: CloudEnvironment,
    api_version: String,
    base_url_override: Option<String>,
}

impl GraphConfig {
    /// Starts building a configuration for the given tenant.
    #[must_use]
    pub fn builder(tenant_id: impl Into<String>) -> GraphConfigBuilder {
        GraphConfigBuilder {
            tenant_id: tenant_id.into(),
            cloud: CloudEnvironment::default(),
            api_version: "v1.0".to_string(),
            base_url_override: None,
        }
    }

    #[must_use]
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    #[must_use]
    pub fn cloud(&self) -> CloudEnvironment {
        self.cloud
    }

    /// Base URL for Graph requests, e.g. `https://graph.microsoft.com/v1.0`.
    #[must_use]
    pub fn graph_base_url(&self) -> String {
        match &self.base_url_override {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("{}/{}", self.cloud.graph_endpoint(), self.api_version),
        }
    }

    /// Token endpoint for this tenant and cloud.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!(
            "{}/{}/oauth2/v2.0/token",
            self.cloud.login_endpoint(),
            self.tenant_id
        )
    }

    /// OAuth2 scope for the client-credentials flow.
    #[must_use]
    pub fn default_scope(&self) -> String {
        format!("{}/.default", self.cloud.graph_endpoint())
    }
}

/// Builder for [`GraphConfig`].
#[derive(Debug)]
pub struct GraphConfigBuilder {
    tenant_id: String,
    cloud: CloudEnvironment,
    api_version: String,
    base_url_override: Option<String>,
}

impl GraphConfigBuilder {
    #[must_use]
    pub fn cloud(mut self, cloud: CloudEnvironment) -> Self {
        self.cloud = cloud;
        self
    }

    #[must_use]
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Overrides the derived Graph base URL (mock servers in tests).
    #[must_use]
    pub fn base_url(mut self, base: impl Into<String>) -> Self {
        self.base_url_override = Some(base.into());
        self
    }

    /// Finalizes the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] if the tenant id is empty.
    pub fn build(self) -> GraphResult<GraphConfig> {
        if self.tenant_id.trim().is_empty() {
            return Err(GraphError::Config("tenant id must not be empty".into()));
        }
        Ok(GraphConfig {
            tenant_id: self.tenant_id,
            cloud: self.cloud,
            api_version: self.api_version,
            base_url_override: self.base_url_override,
        })
    }
}
