//! Session identity

use std::fmt;
use uuid::Uuid;

/// Opaque, stable identity of one capture session.
///
/// Generated when a session is created (UUID v7, so identities sort by
/// creation time) and never reused. Once the session is stopped the
/// identity becomes invalid for all further operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Generate a fresh session identity
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = SessionId::new();
        let b = SessionId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_ids_sort_by_creation() {
        let a = SessionId::new();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = SessionId::new();
        assert!(a.as_uuid() < b.as_uuid());
    }

    #[test]
    fn test_display_roundtrip() {
        let id = SessionId::new();
        let text = id.to_string();
        assert_eq!(text.parse::<Uuid>().unwrap(), id.as_uuid());
    }
}
