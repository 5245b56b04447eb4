//! Shared domain types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Opaque cloud instance identifier (e.g. `i-0abc123`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle state reported by the compute provider.
///
/// Anything outside the states the interpreter reasons about is kept
/// verbatim in `Other` so it can still be shown to users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceStatus {
    Running,
    Stopped,
    Stopping,
    Pending,
    Other(String),
}

impl InstanceStatus {
    /// Parse a provider state name (case-insensitive).
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "running" => InstanceStatus::Running,
            "stopped" => InstanceStatus::Stopped,
            "stopping" => InstanceStatus::Stopping,
            "pending" => InstanceStatus::Pending,
            other => InstanceStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InstanceStatus::Running => "running",
            InstanceStatus::Stopped => "stopped",
            InstanceStatus::Stopping => "stopping",
            InstanceStatus::Pending => "pending",
            InstanceStatus::Other(name) => name,
        }
    }

    /// True when a stop request would be a no-op.
    pub fn is_halted(&self) -> bool {
        matches!(self, InstanceStatus::Stopped | InstanceStatus::Stopping)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aliases exempted from the next shutdown sweep.
///
/// Serialized as a single JSON object mapping alias to instance id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RetainedSet(BTreeMap<String, InstanceId>);

impl RetainedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.0.contains_key(alias)
    }

    /// Insert an alias. Returns false if it was already present.
    pub fn insert(&mut self, alias: impl Into<String>, instance: InstanceId) -> bool {
        let alias = alias.into();
        if self.0.contains_key(&alias) {
            return false;
        }
        self.0.insert(alias, instance);
        true
    }

    pub fn remove(&mut self, alias: &str) -> Option<InstanceId> {
        self.0.remove(alias)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl FromIterator<(String, InstanceId)> for RetainedSet {
    fn from_iter<I: IntoIterator<Item = (String, InstanceId)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_known_states() {
        assert_eq!(InstanceStatus::parse("running"), InstanceStatus::Running);
        assert_eq!(InstanceStatus::parse("STOPPED"), InstanceStatus::Stopped);
        assert_eq!(InstanceStatus::parse(" stopping "), InstanceStatus::Stopping);
        assert_eq!(InstanceStatus::parse("pending"), InstanceStatus::Pending);
    }

    #[test]
    fn test_status_parse_keeps_unknown_name() {
        let status = InstanceStatus::parse("shutting-down");
        assert_eq!(status, InstanceStatus::Other("shutting-down".to_string()));
        assert_eq!(status.to_string(), "shutting-down");
        assert!(!status.is_halted());
    }

    #[test]
    fn test_is_halted() {
        assert!(InstanceStatus::Stopped.is_halted());
        assert!(InstanceStatus::Stopping.is_halted());
        assert!(!InstanceStatus::Running.is_halted());
        assert!(!InstanceStatus::Pending.is_halted());
    }

    #[test]
    fn test_retained_set_insert_is_idempotent() {
        let mut set = RetainedSet::new();
        assert!(set.insert("devbox", InstanceId::from("i-1")));
        assert!(!set.insert("devbox", InstanceId::from("i-1")));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_retained_set_json_document_shape() {
        let mut set = RetainedSet::new();
        set.insert("alice", InstanceId::from("i-0a"));
        set.insert("bob", InstanceId::from("i-0b"));

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"alice":"i-0a","bob":"i-0b"}"#);

        let parsed: RetainedSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }
}
