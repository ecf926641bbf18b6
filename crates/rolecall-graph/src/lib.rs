//! Microsoft Graph app-role assignment resolution.
//!
//! Given an app registration — identified by client id, object id, or
//! display name — this crate resolves the app-role assignments granted to
//! its service principal and enriches each one with the human-readable
//! role name from the resource's role catalog, which the assignment
//! object alone does not carry.
//!
//! The pipeline is read-only and stateless across invocations: locate the
//! application, fetch the distinct resource service principals its
//! assignments reference (concurrently, all-or-nothing), and join each
//! assignment against its resource's `appRoles`.
//!
//! # Example
//!
//! ```no_run
//! use rolecall_graph::{
//!     ApplicationSelector, ClientCredentials, GraphClient, GraphConfig, TokenProvider,
//! };
//!
//! # async fn example() -> rolecall_graph::GraphResult<()> {
//! let config = GraphConfig::builder("your-tenant-id").build()?;
//! let credentials = ClientCredentials {
//!     client_id: "your-client-id".to_string(),
//!     client_secret: "your-client-secret".to_string().into(),
//! };
//! let client = GraphClient::new(&config, TokenProvider::client_credentials(&config, credentials))?;
//!
//! let selector = ApplicationSelector {
//!     app_display_name: Some("My API".to_string()),
//!     ..Default::default()
//! };
//! let enriched = rolecall_graph::list_enriched_assignments(&client, &selector).await?;
//! for record in enriched {
//!     println!("{}: {}", record.resource_display_name.unwrap_or_default(), record.role_name);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod models;
mod resolver;
mod selector;

pub use auth::TokenProvider;
pub use client::{GraphClient, ODataCollection, ODataError, ODataErrorBody};
pub use config::{ClientCredentials, CloudEnvironment, GraphConfig, GraphConfigBuilder};
pub use error::{GraphError, GraphResult};
pub use models::{AppRole, AppRoleAssignment, EnrichedAssignment, ServicePrincipal};
pub use resolver::{fetch_resources, join_assignments, list_enriched_assignments, resolve_assignments};
pub use selector::{escape_odata_literal, is_valid_guid, ApplicationSelector};
