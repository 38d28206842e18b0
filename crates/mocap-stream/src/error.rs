//! # Error Types
//!
//! Two layers of errors live here:
//!
//! - [`ProviderError`] is the status a capture provider reports for a single
//!   query. It mirrors the SDK's result codes, minus success.
//! - [`MocapError`] is what the client loops return: provider failures that
//!   ended a run, timeouts, cancellation, configuration and I/O problems.
//!
//! ## Connection failure classification
//!
//! [`ConnectFailure::classify`] folds a failed `connect` status into the four
//! buckets the connection loop reports to the user.

use std::fmt;

use thiserror::Error;

/// Convenient Result alias for provider queries.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Convenient Result alias for client operations.
pub type MocapResult<T> = std::result::Result<T, MocapError>;

/// Non-success status codes reported by a capture provider.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderError {
    #[error("Not implemented")]
    NotImplemented,

    #[error("Invalid host name")]
    InvalidHostName,

    #[error("Invalid multicast IP")]
    InvalidMulticastIp,

    #[error("Client already connected")]
    ClientAlreadyConnected,

    #[error("Client connection failed")]
    ClientConnectionFailed,

    #[error("Not connected")]
    NotConnected,

    /// No frame is available yet.
    #[error("No frame available")]
    NoFrame,

    #[error("Invalid index")]
    InvalidIndex,

    #[error("Invalid subject name")]
    InvalidSubjectName,

    #[error("Invalid segment name")]
    InvalidSegmentName,

    #[error("Invalid marker name")]
    InvalidMarkerName,

    #[error("Invalid device name")]
    InvalidDeviceName,

    #[error("Invalid device output name")]
    InvalidDeviceOutputName,

    #[error("Invalid latency sample name")]
    InvalidLatencySampleName,

    #[error("Invalid frame rate name")]
    InvalidFrameRateName,

    #[error("Axes are co-linear")]
    CoLinearAxes,

    #[error("Axes are left-handed")]
    LeftHandedAxes,

    /// The provider does not support the query for this object.
    #[error("Not supported")]
    NotSupported,

    #[error("Not present")]
    NotPresent,

    #[error("Configuration failed")]
    ConfigurationFailed,

    #[error("Unknown provider error")]
    Unknown,
}

/// Why a `connect` call failed, as reported by the connection loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    AlreadyConnected,
    InvalidHostName,
    ConnectionFailed,
    Unrecognized(ProviderError),
}

impl ConnectFailure {
    /// Map a provider status to the connection failure bucket it belongs to.
    #[must_use]
    pub fn classify(err: ProviderError) -> Self {
        match err {
            ProviderError::ClientAlreadyConnected => Self::AlreadyConnected,
            ProviderError::InvalidHostName => Self::InvalidHostName,
            ProviderError::ClientConnectionFailed => Self::ConnectionFailed,
            other => Self::Unrecognized(other),
        }
    }
}

impl fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyConnected => f.write_str("Client Already Connected"),
            Self::InvalidHostName => f.write_str("Invalid Host Name"),
            Self::ConnectionFailed => f.write_str("Client Connection Failed"),
            Self::Unrecognized(err) => write!(f, "Unrecognized Error: {err:?}"),
        }
    }
}

/// All errors that can end a client run.
#[derive(Error, Debug)]
pub enum MocapError {
    // ─── Provider ───────────────────────────────────────────────────
    /// A provider call failed in a way the client cannot paper over.
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The provider reported that the connection is gone.
    #[error("Connection to {hosts} lost")]
    ConnectionLost { hosts: String },

    // ─── Polling ────────────────────────────────────────────────────
    /// A polling loop ran out of attempts or time.
    #[error("{operation} gave up after {attempts} attempts")]
    TimedOut {
        operation: &'static str,
        attempts: u32,
    },

    /// The run was cancelled through its shutdown signal.
    #[error("Cancelled")]
    Cancelled,

    // ─── Config ─────────────────────────────────────────────────────
    /// Configuration file or environment error.
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    // ─── I/O ────────────────────────────────────────────────────────
    /// Writing the report or reading a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MocapError {
    /// Returns `true` if the failed operation may succeed when attempted again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MocapError::TimedOut { .. }
                | MocapError::Provider(
                    ProviderError::NoFrame | ProviderError::ClientConnectionFailed
                )
        )
    }

    /// Returns `true` if this error only means the run was asked to stop.
    #[must_use]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, MocapError::Cancelled)
    }
}

// ─── From impls for external error types ────────────────────────────────

#[cfg(feature = "config-toml")]
impl From<toml::de::Error> for MocapError {
    fn from(err: toml::de::Error) -> Self {
        MocapError::ConfigError {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_connect_failures() {
        assert_eq!(
            ConnectFailure::classify(ProviderError::ClientAlreadyConnected),
            ConnectFailure::AlreadyConnected
        );
        assert_eq!(
            ConnectFailure::classify(ProviderError::InvalidHostName),
            ConnectFailure::InvalidHostName
        );
        assert_eq!(
            ConnectFailure::classify(ProviderError::ClientConnectionFailed),
            ConnectFailure::ConnectionFailed
        );
    }

    #[test]
    fn test_classify_unrecognized_keeps_status() {
        let failure = ConnectFailure::classify(ProviderError::InvalidMulticastIp);
        assert_eq!(
            failure,
            ConnectFailure::Unrecognized(ProviderError::InvalidMulticastIp)
        );
        assert_eq!(failure.to_string(), "Unrecognized Error: InvalidMulticastIp");
    }

    #[test]
    fn test_connect_failure_messages() {
        assert_eq!(
            ConnectFailure::AlreadyConnected.to_string(),
            "Client Already Connected"
        );
        assert_eq!(ConnectFailure::InvalidHostName.to_string(), "Invalid Host Name");
        assert_eq!(
            ConnectFailure::ConnectionFailed.to_string(),
            "Client Connection Failed"
        );
    }

    #[test]
    fn test_is_retryable() {
        assert!(MocapError::Provider(ProviderError::NoFrame).is_retryable());
        assert!(
            MocapError::TimedOut {
                operation: "connect",
                attempts: 3
            }
            .is_retryable()
        );
        assert!(!MocapError::Cancelled.is_retryable());
        assert!(!MocapError::Provider(ProviderError::InvalidHostName).is_retryable());
    }

    #[test]
    fn test_is_cancellation() {
        assert!(MocapError::Cancelled.is_cancellation());
        assert!(!MocapError::ConnectionLost { hosts: "a".into() }.is_cancellation());
    }

    #[test]
    fn test_provider_error_converts() {
        let err: MocapError = ProviderError::NotConnected.into();
        assert!(matches!(err, MocapError::Provider(ProviderError::NotConnected)));
        assert!(err.to_string().contains("Not connected"));
    }

    #[cfg(feature = "config-toml")]
    #[test]
    fn test_from_toml_error_conversion() {
        #[derive(Debug, serde::Deserialize)]
        struct DummyConfig {
            _value: String,
        }

        let toml_err = toml::from_str::<DummyConfig>("value = [").unwrap_err();
        let err: MocapError = toml_err.into();
        assert!(matches!(err, MocapError::ConfigError { .. }));
        assert!(err.to_string().contains("Configuration error"));
    }
}
