use std::fmt;

use serde::Serialize;

/// Rule identifier qualified by the repository that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RuleKey {
    pub repository: String,
    pub rule: String,
}

impl RuleKey {
    pub fn of(repository: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            rule: rule.into(),
        }
    }
}

impl fmt::Display for RuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.rule)
    }
}

/// A static-analysis finding as read from a report, before its file is
/// resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Opaque rule identifier.
    pub rule: String,
    /// 1-based source line.
    pub line: u32,
    pub message: String,
    /// File path exactly as written in the report.
    pub file: String,
    pub priority: Option<u8>,
}

impl Violation {
    /// Builds the issue to attach to the resolved file.
    pub fn to_issue(&self, repository: &str) -> Issue {
        Issue {
            rule: RuleKey::of(repository, self.rule.as_str()),
            line: self.line,
            message: self.message.clone(),
        }
    }
}

/// An issue attached to a project resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub rule: RuleKey,
    pub line: u32,
    pub message: String,
}
