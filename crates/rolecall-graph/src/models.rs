//! Wire and output types for app-role assignment resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A permission exposed by a resource application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRole {
    /// Stable role identifier within the resource's catalog.
    pub id: Uuid,
    /// Machine-readable role name, e.g. `Directory.Read.All`.
    pub value: Option<String>,
}

/// A service principal, fetched per distinct resource id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipal {
    pub id: Uuid,
    pub display_name: Option<String>,
    /// Role catalog declared by this service principal.
    #[serde(default)]
    pub app_roles: Vec<AppRole>,
    /// Present only on `$expand=appRoleAssignments` queries.
    #[serde(default)]
    pub app_role_assignments: Vec<AppRoleAssignment>,
}

/// An app-role grant as returned by the directory. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRoleAssignment {
    /// Service principal that owns the granted role.
    pub resource_id: Uuid,
    /// Granted role within the resource's catalog.
    pub app_role_id: Uuid,
    pub resource_display_name: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub deleted_date_time: Option<DateTime<Utc>>,
}

/// An assignment joined with its resolved role name.
///
/// Exists only for the duration of one invocation; `role_id` always equals
/// the source assignment's `app_role_id`, and `role_name` is the matched
/// [`AppRole::value`] from the resource identified by `resource_id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedAssignment {
    pub app_role_id: Uuid,
    pub resource_display_name: Option<String>,
    pub resource_id: Uuid,
    pub role_id: Uuid,
    pub role_name: String,
    pub created: Option<DateTime<Utc>>,
    pub deleted: Option<DateTime<Utc>>,
}
