//! Action kinds and HTTP methods.

use serde::Serialize;
use std::fmt;

/// The five actions with built-in behavior.
pub const DEFAULT_ACTIONS: [&str; 5] = ["index", "show", "create", "update", "destroy"];

/// Sub-feature name that lets an index action page its results.
pub const PAGING: &str = "paging";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(verb)
    }
}

/// Closed set of action variants. Everything that is not one of the five
/// defaults is `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Index,
    Show,
    Create,
    Update,
    Destroy,
    Custom,
}

impl ActionKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "index" => ActionKind::Index,
            "show" => ActionKind::Show,
            "create" => ActionKind::Create,
            "update" => ActionKind::Update,
            "destroy" => ActionKind::Destroy,
            _ => ActionKind::Custom,
        }
    }

    pub fn is_default(self) -> bool {
        !matches!(self, ActionKind::Custom)
    }

    /// Verb a default action answers to when none is given.
    pub fn default_method(self) -> Option<HttpMethod> {
        match self {
            ActionKind::Index | ActionKind::Show => Some(HttpMethod::Get),
            ActionKind::Create => Some(HttpMethod::Post),
            ActionKind::Update => Some(HttpMethod::Put),
            ActionKind::Destroy => Some(HttpMethod::Delete),
            ActionKind::Custom => None,
        }
    }

    /// Create and update persist request input and need strong params.
    pub fn requires_strong_params(self) -> bool {
        matches!(self, ActionKind::Create | ActionKind::Update)
    }

    /// Show, update and destroy address one member rather than the collection.
    pub fn is_member(self) -> bool {
        matches!(
            self,
            ActionKind::Show | ActionKind::Update | ActionKind::Destroy
        )
    }
}
