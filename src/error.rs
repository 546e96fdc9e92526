//! # Errors
//!
//! Two families, matching the two phases of the system:
//!
//! - [`DefinitionError`]: raised while the version graph is being built. Fatal
//!   to the enclosing `define`/`version`/`resource` block; nothing partial is
//!   installed.
//! - [`RequestError`]: raised while resolving a single request. Never escapes
//!   the resolver; each variant maps to a [`Status`] and a readable body.

use crate::model::ModelError;
use crate::request::params::ParameterMissing;
use crate::request::Status;

/// Errors raised while declaring versions, resources and actions.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DefinitionError {
    /// The resource name does not resolve to a known model.
    #[error("Could not find constant `{model}' for resource `{resource}'")]
    UnknownModel { model: String, resource: String },

    #[error("Unknown resource `{0}'")]
    UnknownResource(String),

    #[error("Unknown resource `{resource}' on ancestor version {version}")]
    UnknownAncestorResource { resource: String, version: String },

    #[error("Unknown action `{action}' on resource `{resource}'")]
    UnknownAction { action: String, resource: String },

    #[error("Unknown action `{action}' on ancestor version {version}")]
    UnknownAncestorAction { action: String, version: String },

    #[error("An attributes block was specified without a :create or :update action")]
    AttributesWithoutWriteAction,

    #[error("An attributes block was not specified for `{action}' action on resource `{resource}'")]
    MissingAttributes { action: String, resource: String },

    #[error("{0}")]
    MissingAssociation(String),

    #[error("Can't use default :{action} action on singular resource `{resource}'")]
    MissingBehavior { action: String, resource: String },

    #[error("You must specify an HTTP method (get, put, post, delete) for action `{0}'")]
    MissingHttpMethod(String),

    /// The version number is not SemVer, even after padding.
    #[error("Invalid version number: {0}")]
    InvalidVersion(String),
}

impl DefinitionError {
    /// True for the "unknown resource" family, whichever message it carries.
    pub fn is_unknown_resource(&self) -> bool {
        matches!(
            self,
            Self::UnknownModel { .. }
                | Self::UnknownResource(_)
                | Self::UnknownAncestorResource { .. }
        )
    }

    /// True for the "unknown action" family, including an attributes block
    /// declared without anything to apply it to.
    pub fn is_unknown_action(&self) -> bool {
        matches!(
            self,
            Self::UnknownAction { .. }
                | Self::UnknownAncestorAction { .. }
                | Self::AttributesWithoutWriteAction
        )
    }
}

/// Conditions that end a single request early.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum RequestError {
    #[error("A version number must be passed in the {header} header")]
    MissingVersionHeader { header: String },

    #[error("Unknown API version: {0}")]
    UnknownVersion(String),

    #[error("No action `{action}' on `{path}'")]
    UnknownRoute { path: String, action: String },

    #[error("Access denied to action `{0}'")]
    AccessDenied(String),

    #[error("A valid API token is required")]
    TokenRequired,

    #[error(transparent)]
    ParameterMissing(#[from] ParameterMissing),

    #[error("Paging is not allowed for action `{action}' on resource `{resource}'")]
    PagingNotAllowed { action: String, resource: String },

    #[error("Invalid paging parameter `{0}'")]
    InvalidPaging(String),

    /// A singular resource's parent has no associated record.
    #[error("Couldn't find {resource} for {parent} with id={id}")]
    RecordNotFound {
        resource: String,
        parent: String,
        id: String,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl RequestError {
    pub fn status(&self) -> Status {
        match self {
            Self::MissingVersionHeader { .. }
            | Self::UnknownVersion(_)
            | Self::ParameterMissing(_)
            | Self::PagingNotAllowed { .. }
            | Self::InvalidPaging(_) => Status::BadRequest,
            Self::UnknownRoute { .. } | Self::RecordNotFound { .. } => Status::NotFound,
            Self::AccessDenied(_) | Self::TokenRequired => Status::Unauthorized,
            Self::Model(ModelError::NotFound { .. }) => Status::NotFound,
            Self::Model(_) => Status::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_http_method_message() {
        let err = DefinitionError::MissingHttpMethod("status".into());
        assert_eq!(
            err.to_string(),
            "You must specify an HTTP method (get, put, post, delete) for action `status'"
        );
    }

    #[test]
    fn test_request_error_statuses() {
        assert_eq!(
            RequestError::UnknownVersion("2.0.0".into()).status(),
            Status::BadRequest
        );
        assert_eq!(
            RequestError::AccessDenied("show".into()).status(),
            Status::Unauthorized
        );
        assert_eq!(
            RequestError::Model(ModelError::NotFound {
                model: "Product".into(),
                id: "9".into(),
            })
            .status(),
            Status::NotFound
        );
        assert_eq!(
            RequestError::Model(ModelError::Unavailable("Product".into())).status(),
            Status::InternalServerError
        );
    }

    #[test]
    fn test_error_families() {
        assert!(DefinitionError::UnknownResource("boxes".into()).is_unknown_resource());
        assert!(DefinitionError::AttributesWithoutWriteAction.is_unknown_action());
        assert!(!DefinitionError::InvalidVersion("a".into()).is_unknown_action());
    }
}
