use std::fmt;

use super::common::segment;

/// The identity that owns an entity: a user or an organization
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    User(String),
    Org(String),
}

impl Scope {
    /// Path prefix for endpoints owned by this identity
    pub fn base_path(&self) -> String {
        match self {
            Scope::User(handle) => format!("/user/{}", segment(handle)),
            Scope::Org(handle) => format!("/org/{}", segment(handle)),
        }
    }

    pub fn handle(&self) -> &str {
        match self {
            Scope::User(handle) | Scope::Org(handle) => handle,
        }
    }

    /// The organization handle, or None in user scope
    pub fn organization(&self) -> Option<&str> {
        match self {
            Scope::Org(handle) => Some(handle),
            Scope::User(_) => None,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::User(handle) => write!(f, "user {}", handle),
            Scope::Org(handle) => write!(f, "org {}", handle),
        }
    }
}
