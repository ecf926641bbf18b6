//! Application selection and input validation.

use uuid::Uuid;

use crate::{GraphError, GraphResult};

/// Identifies the application whose assignments should be resolved.
///
/// Exactly one field must be populated; [`ApplicationSelector::validate`]
/// enforces this before any network access.
#[derive(Debug, Clone, Default)]
pub struct ApplicationSelector {
    /// Client id of the app registration.
    pub app_id: Option<String>,
    /// Directory object id of the service principal.
    pub app_object_id: Option<String>,
    /// Display name of the app registration. Not guaranteed unique.
    pub app_display_name: Option<String>,
}

impl ApplicationSelector {
    /// Checks selector exclusivity and GUID syntax.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Validation`] if zero or multiple identifiers
    /// are populated, or if `app_id`/`app_object_id` is not a canonical
    /// GUID.
    pub fn validate(&self) -> GraphResult<()> {
        let populated = [
            self.app_id.is_some(),
            self.app_object_id.is_some(),
            self.app_display_name.is_some(),
        ]
        .iter()
        .filter(|present| **present)
        .count();

        if populated != 1 {
            return Err(GraphError::Validation(
                "exactly one of app id, app object id, or app display name must be provided"
                    .to_string(),
            ));
        }

        for (label, value) in [("app id", &self.app_id), ("app object id", &self.app_object_id)] {
            if let Some(value) = value {
                if !is_valid_guid(value) {
                    return Err(GraphError::Validation(format!(
                        "{label} '{value}' is not a valid GUID"
                    )));
                }
            }
        }

        Ok(())
    }

    /// OData filter expression for the `$filter` lookup paths.
    ///
    /// `None` when the selector targets an object id directly (that path
    /// queries the service principal without a filter).
    #[must_use]
    pub fn filter_expr(&self) -> Option<String> {
        if let Some(app_id) = &self.app_id {
            Some(format!("appId eq '{}'", escape_odata_literal(app_id)))
        } else {
            self.app_display_name
                .as_ref()
                .map(|name| format!("displayName eq '{}'", escape_odata_literal(name)))
        }
    }
}

/// Accepts only the canonical hyphenated 8-4-4-4-12 textual form.
///
/// `Uuid::try_parse` alone also admits braced, URN, and simple forms;
/// the length check pins it to the hyphenated one.
#[must_use]
pub fn is_valid_guid(value: &str) -> bool {
    value.len() == 36 && Uuid::try_parse(value).is_ok()
}

/// Escapes a string literal for interpolation into an OData filter.
///
/// OData escapes embedded single quotes by doubling them. Percent-encoding
/// of the final query string is the URL builder's job.
#[must_use]
pub fn escape_odata_literal(value: &str) -> String {
    value.replace('\'', "''")
}
