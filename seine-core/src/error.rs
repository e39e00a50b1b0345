//! Error types for the seine capture engine

use thiserror::Error;

use crate::SessionId;

/// Result type alias for seine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the seine capture engine
///
/// Every device-layer failure is translated into one of these variants at
/// the boundary to the capture binding, carrying the binding's raw
/// diagnostic text. Failures surface synchronously to the caller of the
/// failing operation and are never retried automatically.
#[derive(Error, Debug)]
pub enum Error {
    /// Capture device could not be opened
    #[error("could not open capture device '{device}': {cause}")]
    DeviceOpen { device: String, cause: String },

    /// Filter expression could not be compiled
    #[error("could not compile capture filter '{filter}': {cause}")]
    FilterCompile { filter: String, cause: String },

    /// Compiled filter could not be attached to the capture handle
    #[error("could not install capture filter '{filter}': {cause}")]
    FilterInstall { filter: String, cause: String },

    /// Capture size (snaplen) configuration was rejected
    #[error("could not set capture size to {snaplen} bytes: {cause}")]
    CaptureSize { snaplen: i32, cause: String },

    /// Session activation failed
    #[error("could not activate capture session {session}: {kind}")]
    Activation {
        /// Session identity, or the device name when no identity exists yet
        session: String,
        kind: ActivationFailure,
    },

    /// The blocking capture loop reported an unrecoverable failure
    #[error("capture loop failed for session {session}: {cause}")]
    Loop { session: String, cause: String },

    /// The identity does not name a live session
    #[error("unknown or stopped capture session {0}")]
    UnknownSession(SessionId),

    /// Interface enumeration error
    #[error("interface error: {0}")]
    Interface(String),

    /// Interface not found
    #[error("interface '{0}' not found")]
    InterfaceNotFound(String),
}

/// Classified reasons a capture handle can fail to activate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivationFailure {
    /// Promiscuous mode requested but not supported by the device
    #[error("promiscuous mode not supported: {0}")]
    PromiscuousNotSupported(String),

    /// The capture device does not exist
    #[error("no such device: {0}")]
    NoSuchDevice(String),

    /// The session has already been activated
    #[error("session has already been activated")]
    AlreadyActivated,

    /// No permission to open the capture device
    #[error("no permission to access the device: {0}")]
    PermissionDenied(String),

    /// No permission to put the device into promiscuous mode
    #[error("no permission to enable promiscuous mode: {0}")]
    PromiscuousPermissionDenied(String),

    /// The capture device is not up
    #[error("device is not up: {0}")]
    NotUp(String),

    /// Any other activation error or warning from the binding
    #[error("{0}")]
    Generic(String),
}

impl Error {
    /// Create a device-open error with a custom cause
    pub fn device_open<D: Into<String>, C: Into<String>>(device: D, cause: C) -> Self {
        Error::DeviceOpen {
            device: device.into(),
            cause: cause.into(),
        }
    }

    /// Create an activation error for a handle that has no session yet
    pub fn activation<S: Into<String>>(session: S, kind: ActivationFailure) -> Self {
        Error::Activation {
            session: session.into(),
            kind,
        }
    }

    /// Create a capture-loop error
    pub fn capture_loop<S: Into<String>, C: Into<String>>(session: S, cause: C) -> Self {
        Error::Loop {
            session: session.into(),
            cause: cause.into(),
        }
    }

    /// Rewrite the session designator of an activation or loop error to the
    /// given identity. Binding adapters only know the device name; the
    /// lifecycle controller attaches the real identity at its boundary.
    pub fn for_session(self, id: SessionId) -> Self {
        match self {
            Error::Activation { kind, .. } => Error::Activation {
                session: id.to_string(),
                kind,
            },
            Error::Loop { cause, .. } => Error::Loop {
                session: id.to_string(),
                cause,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_cause() {
        let err = Error::device_open("eth9", "no such interface");
        let text = err.to_string();
        assert!(text.contains("eth9"));
        assert!(text.contains("no such interface"));
    }

    #[test]
    fn test_for_session_rewrites_activation() {
        let id = SessionId::new();
        let err = Error::activation("eth0", ActivationFailure::AlreadyActivated).for_session(id);
        match err {
            Error::Activation { session, kind } => {
                assert_eq!(session, id.to_string());
                assert_eq!(kind, ActivationFailure::AlreadyActivated);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_for_session_leaves_other_variants() {
        let id = SessionId::new();
        let err = Error::device_open("eth0", "boom").for_session(id);
        assert!(matches!(err, Error::DeviceOpen { .. }));
    }

    #[test]
    fn test_activation_failure_display() {
        let kind = ActivationFailure::NotUp("interface lo is down".to_string());
        assert!(kind.to_string().contains("not up"));
    }
}
