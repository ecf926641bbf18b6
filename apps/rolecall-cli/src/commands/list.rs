//! `rolecall list` - list enriched app-role assignments.

use clap::{Args, ValueEnum};
use secrecy::SecretString;
use tracing::debug;

use rolecall_graph::{
    list_enriched_assignments, ApplicationSelector, ClientCredentials, CloudEnvironment,
    GraphClient, GraphConfig, TokenProvider,
};

use crate::error::{CliError, CliResult};
use crate::output::print_assignment_table;

/// Azure cloud to talk to.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum CloudArg {
    #[default]
    Commercial,
    UsGovernment,
    China,
    Germany,
}

impl From<CloudArg> for CloudEnvironment {
    fn from(cloud: CloudArg) -> Self {
        match cloud {
            CloudArg::Commercial => Self::Commercial,
            CloudArg::UsGovernment => Self::UsGovernment,
            CloudArg::China => Self::China,
            CloudArg::Germany => Self::Germany,
        }
    }
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Client id (appId GUID) of the app registration
    #[arg(long, value_name = "GUID")]
    pub app_id: Option<String>,

    /// Directory object id (GUID) of the service principal
    #[arg(long, value_name = "GUID")]
    pub app_object_id: Option<String>,

    /// Display name of the app registration
    #[arg(long, value_name = "NAME")]
    pub app_display_name: Option<String>,

    /// Entra tenant id
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: Option<String>,

    /// Client id used to authenticate (client-credentials flow)
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Client secret used to authenticate
    #[arg(long, env = "AZURE_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Pre-acquired Graph access token, bypassing the token flow
    #[arg(long, env = "GRAPH_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Azure cloud environment
    #[arg(long, value_enum, default_value_t = CloudArg::Commercial)]
    pub cloud: CloudArg,

    /// Output full records as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Selector handed to the resolution core. Exclusivity and GUID syntax
    /// are validated there, before any network call.
    fn selector(&self) -> ApplicationSelector {
        ApplicationSelector {
            app_id: self.app_id.clone(),
            app_object_id: self.app_object_id.clone(),
            app_display_name: self.app_display_name.clone(),
        }
    }

    fn token_provider(&self, config: &GraphConfig) -> CliResult<TokenProvider> {
        if let Some(token) = &self.access_token {
            return Ok(TokenProvider::static_token(SecretString::from(
                token.clone(),
            )));
        }

        match (&self.client_id, &self.client_secret) {
            (Some(client_id), Some(client_secret)) => Ok(TokenProvider::client_credentials(
                config,
                ClientCredentials {
                    client_id: client_id.clone(),
                    client_secret: SecretString::from(client_secret.clone()),
                },
            )),
            _ => Err(CliError::Config(
                "provide --access-token, or --client-id and --client-secret \
                 (AZURE_CLIENT_ID / AZURE_CLIENT_SECRET)"
                    .to_string(),
            )),
        }
    }
}

/// Execute the list command.
pub async fn execute(args: ListArgs) -> CliResult<()> {
    // A static token needs no tenant; the client-credentials flow does.
    let tenant_id = match (&args.tenant_id, &args.access_token) {
        (Some(tenant), _) => tenant.clone(),
        (None, Some(_)) => "common".to_string(),
        (None, None) => {
            return Err(CliError::Config(
                "missing tenant id (--tenant-id or AZURE_TENANT_ID)".to_string(),
            ))
        }
    };

    let config = GraphConfig::builder(tenant_id)
        .cloud(args.cloud.into())
        .build()?;
    let tokens = args.token_provider(&config)?;
    let client = GraphClient::new(&config, tokens)?;

    debug!(cloud = ?args.cloud, "Resolving app role assignments");
    let enriched = list_enriched_assignments(&client, &args.selector()).await?;
    debug!(count = enriched.len(), "Resolution complete");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&enriched)?);
    } else if enriched.is_empty() {
        println!("No app role assignments resolved.");
    } else {
        print_assignment_table(&enriched);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(app_id: Option<&str>, object_id: Option<&str>, name: Option<&str>) -> ListArgs {
        ListArgs {
            app_id: app_id.map(String::from),
            app_object_id: object_id.map(String::from),
            app_display_name: name.map(String::from),
            tenant_id: None,
            client_id: None,
            client_secret: None,
            access_token: None,
            cloud: CloudArg::Commercial,
            json: false,
        }
    }

    #[test]
    fn test_selector_carries_all_flags() {
        let selector = args(Some("a"), None, Some("b")).selector();
        assert_eq!(selector.app_id.as_deref(), Some("a"));
        assert!(selector.app_object_id.is_none());
        assert_eq!(selector.app_display_name.as_deref(), Some("b"));
    }

    #[test]
    fn test_token_provider_requires_credentials() {
        let config = GraphConfig::builder("tenant").build().unwrap();
        let err = args(None, None, None).token_provider(&config).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_access_token_wins_over_credentials() {
        let config = GraphConfig::builder("tenant").build().unwrap();
        let mut a = args(None, None, None);
        a.access_token = Some("tok".to_string());
        a.client_id = Some("cid".to_string());
        assert!(a.token_provider(&config).unwrap().is_static());
    }
}
