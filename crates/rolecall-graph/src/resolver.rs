//! Resolution-and-join pipeline for app-role assignments.
//!
//! Three stages, data flowing left to right: locate the application and
//! its raw assignments, fetch the distinct resource service principals
//! they reference, then join each assignment against its resource's role
//! catalog to recover the human-readable role name.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::client::ODataCollection;
use crate::{
    AppRoleAssignment, ApplicationSelector, EnrichedAssignment, GraphClient, GraphError,
    GraphResult, ServicePrincipal,
};

/// Resolves and enriches every app-role assignment of the selected
/// application.
///
/// Validates the selector before any network access, then runs the three
/// stages. A single failed resource fetch fails the whole invocation;
/// assignments whose resource or role cannot be matched are dropped
/// silently.
///
/// # Errors
///
/// Returns [`GraphError::Validation`] for selector violations,
/// [`GraphError::NotFound`] when the application resolves to nothing, and
/// transport errors unmodified.
#[instrument(skip(client))]
pub async fn list_enriched_assignments(
    client: &GraphClient,
    selector: &ApplicationSelector,
) -> GraphResult<Vec<EnrichedAssignment>> {
    selector.validate()?;

    let assignments = resolve_assignments(client, selector).await?;
    let resources = fetch_resources(client, &assignments).await?;

    Ok(join_assignments(&assignments, &resources))
}

/// Locates the target application and returns its raw assignments.
///
/// Object-id selectors query the service principal's assignment collection
/// directly. App-id and display-name selectors filter service principals
/// with assignments expanded and use the first match; exact-match filters
/// on a presumably-unique field return at most one meaningful result, so
/// ambiguity (possible for display names) is resolved first-wins rather
/// than erroring.
#[instrument(skip(client))]
pub async fn resolve_assignments(
    client: &GraphClient,
    selector: &ApplicationSelector,
) -> GraphResult<Vec<AppRoleAssignment>> {
    if let Some(object_id) = &selector.app_object_id {
        let url = client.resource_url(
            &format!("servicePrincipals/{object_id}/appRoleAssignments"),
            &[],
        )?;
        let assignments: Vec<AppRoleAssignment> = client.get_collection(&url).await?;

        if assignments.is_empty() {
            return Err(GraphError::NotFound(
                "no app role assignments found".to_string(),
            ));
        }
        return Ok(assignments);
    }

    let filter = selector
        .filter_expr()
        .ok_or_else(|| GraphError::Validation("no application identifier provided".to_string()))?;

    let url = client.resource_url(
        "servicePrincipals",
        &[("$expand", "appRoleAssignments"), ("$filter", &filter)],
    )?;
    let matches: ODataCollection<ServicePrincipal> = client.get(&url).await?;

    let Some(principal) = matches.value.into_iter().next() else {
        return Err(GraphError::NotFound("app registration not found".to_string()));
    };

    debug!(
        principal_id = %principal.id,
        assignments = principal.app_role_assignments.len(),
        "Resolved app registration"
    );

    Ok(principal.app_role_assignments)
}

/// Fetches the distinct resource service principals referenced by the
/// assignments.
///
/// Resource ids are deduplicated in first-seen order and fetched
/// concurrently; the join barrier is all-or-nothing, so any single fetch
/// failure aborts the resolution with no partial result.
#[instrument(skip(client, assignments), fields(assignments = assignments.len()))]
pub async fn fetch_resources(
    client: &GraphClient,
    assignments: &[AppRoleAssignment],
) -> GraphResult<Vec<ServicePrincipal>> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::new();
    for assignment in assignments {
        if seen.insert(assignment.resource_id) {
            distinct.push(assignment.resource_id);
        }
    }

    debug!("Fetching {} distinct resources", distinct.len());

    let fetches = distinct
        .iter()
        .map(|resource_id| {
            let url = client.resource_url(
                &format!("servicePrincipals/{resource_id}"),
                &[("$select", "id,displayName,appRoles")],
            )?;
            Ok(async move { client.get::<ServicePrincipal>(&url).await })
        })
        .collect::<GraphResult<Vec<_>>>()?;

    try_join_all(fetches).await
}

/// Joins assignments against the fetched resources' role catalogs.
///
/// Output preserves assignment order. An assignment whose resource is not
/// in `resources`, or whose role id is absent from the matched resource's
/// catalog, is omitted; nothing else is affected. Duplicate input
/// assignments produce duplicate output rows.
#[must_use]
pub fn join_assignments(
    assignments: &[AppRoleAssignment],
    resources: &[ServicePrincipal],
) -> Vec<EnrichedAssignment> {
    let by_id: HashMap<Uuid, &ServicePrincipal> =
        resources.iter().map(|sp| (sp.id, sp)).collect();

    assignments
        .iter()
        .filter_map(|assignment| {
            let Some(resource) = by_id.get(&assignment.resource_id) else {
                debug!(resource_id = %assignment.resource_id, "Dropping assignment: unknown resource");
                return None;
            };

            let Some(role) = resource
                .app_roles
                .iter()
                .find(|role| role.id == assignment.app_role_id)
            else {
                debug!(
                    resource_id = %assignment.resource_id,
                    app_role_id = %assignment.app_role_id,
                    "Dropping assignment: role not in resource catalog"
                );
                return None;
            };

            Some(EnrichedAssignment {
                app_role_id: assignment.app_role_id,
                resource_display_name: assignment.resource_display_name.clone(),
                resource_id: assignment.resource_id,
                role_id: role.id,
                role_name: role.value.clone().unwrap_or_default(),
                created: assignment.created_date_time,
                deleted: assignment.deleted_date_time,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppRole;

    fn guid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn assignment(resource: Uuid, role: Uuid) -> AppRoleAssignment {
        AppRoleAssignment {
            resource_id: resource,
            app_role_id: role,
            resource_display_name: Some("Resource".to_string()),
            created_date_time: None,
            deleted_date_time: None,
        }
    }

    fn principal(id: Uuid, roles: &[(Uuid, &str)]) -> ServicePrincipal {
        ServicePrincipal {
            id,
            display_name: Some("Resource".to_string()),
            app_roles: roles
                .iter()
                .map(|(role_id, value)| AppRole {
                    id: *role_id,
                    value: Some((*value).to_string()),
                })
                .collect(),
            app_role_assignments: Vec::new(),
        }
    }

    #[test]
    fn test_join_recovers_role_name() {
        let assignments = [assignment(guid(1), guid(10))];
        let resources = [principal(guid(1), &[(guid(10), "Reader")])];

        let enriched = join_assignments(&assignments, &resources);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].role_name, "Reader");
        assert_eq!(enriched[0].role_id, enriched[0].app_role_id);
        assert_eq!(enriched[0].resource_id, guid(1));
    }

    #[test]
    fn test_join_drops_assignment_with_unknown_resource() {
        let assignments = [assignment(guid(1), guid(10))];
        let resources = [principal(guid(2), &[(guid(10), "Reader")])];

        assert!(join_assignments(&assignments, &resources).is_empty());
    }

    #[test]
    fn test_join_drops_assignment_with_unknown_role() {
        let assignments = [assignment(guid(1), guid(10))];
        let resources = [principal(guid(1), &[(guid(11), "Writer")])];

        assert!(join_assignments(&assignments, &resources).is_empty());
    }

    #[test]
    fn test_join_preserves_assignment_order_skipping_drops() {
        let assignments = [
            assignment(guid(1), guid(10)),
            assignment(guid(3), guid(30)), // no such resource, dropped
            assignment(guid(2), guid(20)),
        ];
        // Resource order deliberately differs from assignment order.
        let resources = [
            principal(guid(2), &[(guid(20), "Second")]),
            principal(guid(1), &[(guid(10), "First")]),
        ];

        let enriched = join_assignments(&assignments, &resources);
        let names: Vec<&str> = enriched.iter().map(|e| e.role_name.as_str()).collect();
        assert_eq!(names, ["First", "Second"]);
    }

    #[test]
    fn test_join_does_not_dedup_duplicate_assignments() {
        let assignments = [
            assignment(guid(1), guid(10)),
            assignment(guid(1), guid(10)),
        ];
        let resources = [principal(guid(1), &[(guid(10), "Reader")])];

        assert_eq!(join_assignments(&assignments, &resources).len(), 2);
    }

    #[test]
    fn test_join_drop_leaves_other_records_intact() {
        let assignments = [
            assignment(guid(1), guid(10)),
            assignment(guid(1), guid(99)), // role not in catalog
        ];
        let resources = [principal(guid(1), &[(guid(10), "Reader")])];

        let enriched = join_assignments(&assignments, &resources);
        assert_eq!(enriched.len(), 1);
        assert_eq!(enriched[0].role_name, "Reader");
    }
}
