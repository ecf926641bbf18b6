//! Shared helpers for resolver integration tests.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rolecall_graph::{GraphClient, GraphConfig, TokenProvider};

/// Builds an assignment payload in Graph wire format.
pub fn assignment_json(resource_id: &str, app_role_id: &str, resource_name: &str) -> Value {
    json!({
        "resourceId": resource_id,
        "appRoleId": app_role_id,
        "resourceDisplayName": resource_name,
        "createdDateTime": "2025-06-01T08:30:00Z",
        "deletedDateTime": null
    })
}

/// Builds a service principal payload with a role catalog.
pub fn service_principal_json(id: &str, name: &str, roles: &[(&str, &str)]) -> Value {
    json!({
        "id": id,
        "displayName": name,
        "appRoles": roles
            .iter()
            .map(|(role_id, value)| json!({"id": role_id, "value": value}))
            .collect::<Vec<_>>()
    })
}

/// Wraps items in an OData collection envelope.
pub fn odata_collection(items: Vec<Value>, next_link: Option<&str>) -> Value {
    let mut body = json!({ "value": items });
    if let Some(link) = next_link {
        body["@odata.nextLink"] = json!(link);
    }
    body
}

/// Mock Graph server with a client wired to it.
pub struct MockGraph {
    pub server: MockServer,
}

impl MockGraph {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Graph client pointed at this mock server with a static token.
    pub fn client(&self) -> GraphClient {
        let config = GraphConfig::builder("test-tenant")
            .base_url(format!("{}/v1.0", self.server.uri()))
            .build()
            .expect("config");
        GraphClient::new(
            &config,
            TokenProvider::static_token("test-token".to_string().into()),
        )
        .expect("client")
    }

    /// Mounts the assignment collection for a service principal object id.
    pub async fn mock_assignments(&self, object_id: &str, items: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path(format!(
                "/v1.0/servicePrincipals/{object_id}/appRoleAssignments"
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(odata_collection(items, None)))
            .mount(&self.server)
            .await;
    }

    /// Mounts a resource service principal fetch, asserting it is hit
    /// exactly `expected_calls` times.
    pub async fn mock_resource(&self, sp: Value, expected_calls: u64) {
        let id = sp["id"].as_str().expect("service principal id").to_string();
        Mock::given(method("GET"))
            .and(path(format!("/v1.0/servicePrincipals/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(sp))
            .expect(expected_calls)
            .mount(&self.server)
            .await;
    }

    /// Mounts the filtered service-principal lookup used by the app-id and
    /// display-name paths.
    pub async fn mock_principal_search(&self, principals: Vec<Value>) {
        Mock::given(method("GET"))
            .and(path("/v1.0/servicePrincipals"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(odata_collection(principals, None)),
            )
            .mount(&self.server)
            .await;
    }
}
