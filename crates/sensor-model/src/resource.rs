use std::fmt;

use serde::Serialize;

/// What a resource handle points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    File,
    UnitTestFile,
}

/// Opaque reference to a project resource, issued by the host.
///
/// Sensors only use the handle as a persistence key; the kind tag lets them
/// re-qualify a source file as a unit test file without inspecting it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceHandle {
    key: String,
    kind: ResourceKind,
}

impl ResourceHandle {
    pub fn new(key: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            key: key.into(),
            kind,
        }
    }

    pub fn project(key: impl Into<String>) -> Self {
        Self::new(key, ResourceKind::Project)
    }

    pub fn file(key: impl Into<String>) -> Self {
        Self::new(key, ResourceKind::File)
    }

    /// Marks a file as a unit test file. Other kinds are returned unchanged.
    #[must_use]
    pub fn into_unit_test(self) -> Self {
        match self.kind {
            ResourceKind::File => Self {
                kind: ResourceKind::UnitTestFile,
                ..self
            },
            _ => self,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ResourceKind::File | ResourceKind::UnitTestFile)
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}
