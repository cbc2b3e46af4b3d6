//! Composite import IDs
//!
//! An import ID is a slash-joined tuple whose shape is fixed per entity kind.
//! Segments are named after the state attributes they populate.

use thiserror::Error;
use tfplug::types::{Dynamic, DynamicValue};

use crate::api::Scope;

pub const ORGANIZATION: &str = "organization";
const IDENTITY: &str = "identity";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid import ID {id:?} for {kind}: expected {expected}")]
    Arity {
        kind: String,
        id: String,
        expected: String,
    },

    #[error("ID segment {segment:?} for {kind} must be non-empty and must not contain '/'")]
    InvalidSegment { kind: String, segment: String },

    #[error("{kind} state has no value for ID segment {field}")]
    MissingSegment { kind: String, field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdLayout {
    /// Exactly these segments
    Fixed(&'static [&'static str]),
    /// These segments in user scope; org scope adds a leading organization
    Scoped(&'static [&'static str]),
    /// A leading user or organization handle, then these segments
    Identity(&'static [&'static str]),
}

impl IdLayout {
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            IdLayout::Fixed(fields) | IdLayout::Scoped(fields) | IdLayout::Identity(fields) => {
                fields
            }
        }
    }

    /// Whether encoding needs to know the owning identity
    pub fn is_scoped(&self) -> bool {
        !matches!(self, IdLayout::Fixed(_))
    }

    fn describe(&self) -> String {
        let fields = |prefix: Option<&str>| {
            prefix
                .into_iter()
                .chain(self.fields().iter().copied())
                .map(|f| format!("<{}>", f))
                .collect::<Vec<_>>()
                .join("/")
        };
        let n = self.fields().len();
        match self {
            IdLayout::Fixed(_) => format!("{} segments: {}", n, fields(None)),
            IdLayout::Scoped(_) => format!(
                "{} or {} segments: {} or {}",
                n,
                n + 1,
                fields(None),
                fields(Some(ORGANIZATION))
            ),
            IdLayout::Identity(_) => {
                format!("{} segments: {}", n + 1, fields(Some(IDENTITY)))
            }
        }
    }
}

/// A parsed or state-derived import ID: entity kind plus named segments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeId {
    kind: String,
    pairs: Vec<(&'static str, String)>,
}

impl CompositeId {
    pub fn parse(kind: &str, layout: IdLayout, id: &str) -> Result<Self, IdError> {
        let segments: Vec<&str> = id.split('/').collect();
        if let Some(empty) = segments.iter().find(|s| s.is_empty()) {
            return Err(IdError::InvalidSegment {
                kind: kind.to_string(),
                segment: (*empty).to_string(),
            });
        }

        let fields = layout.fields();
        let leading = match (layout, segments.len()) {
            (IdLayout::Fixed(_), n) if n == fields.len() => None,
            (IdLayout::Scoped(_), n) if n == fields.len() => None,
            (IdLayout::Scoped(_), n) if n == fields.len() + 1 => Some(ORGANIZATION),
            (IdLayout::Identity(_), n) if n == fields.len() + 1 => Some(IDENTITY),
            _ => {
                return Err(IdError::Arity {
                    kind: kind.to_string(),
                    id: id.to_string(),
                    expected: layout.describe(),
                })
            }
        };

        let names = leading.into_iter().chain(fields.iter().copied());
        Ok(Self {
            kind: kind.to_string(),
            pairs: names
                .zip(segments)
                .map(|(name, value)| (name, value.to_string()))
                .collect(),
        })
    }

    /// Build the ID of an existing instance from its state. `scope` is the
    /// owning identity and is only consulted for scoped layouts.
    pub fn from_state(
        kind: &str,
        layout: IdLayout,
        state: &DynamicValue,
        scope: Option<&Scope>,
    ) -> Result<Self, IdError> {
        let missing = |field: &str| IdError::MissingSegment {
            kind: kind.to_string(),
            field: field.to_string(),
        };

        let mut pairs = Vec::new();
        match layout {
            IdLayout::Fixed(_) => {}
            IdLayout::Scoped(_) => {
                if let Some(org) = scope.and_then(Scope::organization) {
                    pairs.push((ORGANIZATION, org.to_string()));
                }
            }
            IdLayout::Identity(_) => {
                let scope = scope.ok_or_else(|| missing(IDENTITY))?;
                pairs.push((IDENTITY, scope.handle().to_string()));
            }
        }

        for field in layout.fields() {
            let value = state
                .attribute(field)
                .and_then(Dynamic::as_string)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| missing(field))?;
            pairs.push((*field, value.to_string()));
        }

        Ok(Self {
            kind: kind.to_string(),
            pairs,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Leading identity handle of an `Identity` layout
    pub fn identity(&self) -> Option<&str> {
        self.get(IDENTITY)
    }

    pub fn encode(&self) -> Result<String, IdError> {
        for (_, value) in &self.pairs {
            if value.is_empty() || value.contains('/') {
                return Err(IdError::InvalidSegment {
                    kind: self.kind.clone(),
                    segment: value.clone(),
                });
            }
        }
        Ok(self
            .pairs
            .iter()
            .map(|(_, v)| v.as_str())
            .collect::<Vec<_>>()
            .join("/"))
    }

    /// Write the identifying attributes into a fresh state before a read.
    /// The identity segment is not an attribute and is left to the caller.
    pub fn seed(&self, state: &mut DynamicValue) {
        for (name, value) in &self.pairs {
            if *name != IDENTITY {
                state.set_attribute(name, Dynamic::String(value.clone()));
            }
        }
    }
}
