use std::{fmt, io};

use thiserror::Error;

/// Wrapped result type for all fallible endpoint operations.
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Structured detail carried by every endpoint error: the stage that failed
/// plus the platform error code, when the operating system reported one.
///
/// Codes are `errno` values on Unix and `WSAGetLastError` values on Windows.
/// They are carried as data so the set of error kinds stays fixed as
/// platforms are added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    stage: &'static str,
    code: Option<i32>,
}

impl Failure {
    /// Creates a failure for a stage with no platform error code, such as an
    /// address string that did not parse.
    pub fn stage(stage: &'static str) -> Self {
        Self { stage, code: None }
    }

    /// Creates a failure carrying the platform error code of an I/O error.
    pub fn os(stage: &'static str, err: &io::Error) -> Self {
        Self { stage, code: err.raw_os_error() }
    }

    /// The stage of the operation that failed.
    pub fn stage_name(&self) -> &'static str {
        self.stage
    }

    /// The raw platform error code, if one was available.
    pub fn code(&self) -> Option<i32> {
        self.code
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}: {}", self.stage, code),
            None => write!(f, "{}", self.stage),
        }
    }
}

/// Errors an endpoint can report, one variant per reportable kind.
///
/// The four kinds are fixed and flat; platform-specific codes travel inside
/// [`Failure`] rather than growing the enum. A receive that merely times out
/// is not an error and is never represented here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Could not construct the endpoint: address parse, socket creation,
    /// option setup, or bind failure.
    #[error("could not initialize endpoint ({0})")]
    InitializationError(Failure),
    /// Could not configure the endpoint: invalid remote address, or a
    /// receive timeout the platform refused to apply.
    #[error("could not configure endpoint ({0})")]
    ConfigurationError(Failure),
    /// A receive failed for a reason other than the configured timeout.
    #[error("error occurred while receiving from endpoint ({0})")]
    ReceiveError(Failure),
    /// A send failed: invalid destination address, transmission failure, or
    /// sending without a configured remote.
    #[error("error occurred while sending from endpoint ({0})")]
    SendError(Failure),
}

impl ErrorKind {
    /// The structured failure payload shared by every kind.
    pub fn failure(&self) -> &Failure {
        match self {
            ErrorKind::InitializationError(failure)
            | ErrorKind::ConfigurationError(failure)
            | ErrorKind::ReceiveError(failure)
            | ErrorKind::SendError(failure) => failure,
        }
    }
}

/// Returns true when an I/O error is the receive timeout expiring rather
/// than a transport failure.
///
/// Unix reports `EAGAIN`/`EWOULDBLOCK` and Windows reports `WSAETIMEDOUT`
/// when `SO_RCVTIMEO` fires; the standard library maps those to `WouldBlock`
/// and `TimedOut` respectively.
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_formats_stage_and_platform_code() {
        let err = io::Error::from_raw_os_error(111);
        let failure = Failure::os("transmit", &err);
        assert_eq!(failure.to_string(), "transmit: 111");
        assert_eq!(failure.code(), Some(111));
        assert_eq!(failure.stage_name(), "transmit");
    }

    #[test]
    fn failure_formats_stage_alone_without_code() {
        let failure = Failure::stage("parse remote address");
        assert_eq!(failure.to_string(), "parse remote address");
        assert_eq!(failure.code(), None);
    }

    #[test]
    fn error_kinds_expose_their_failure() {
        let err = ErrorKind::SendError(Failure::stage("remote not configured"));
        assert_eq!(err.failure().stage_name(), "remote not configured");
        assert_eq!(
            err.to_string(),
            "error occurred while sending from endpoint (remote not configured)"
        );
    }

    #[test]
    fn timeout_kinds_are_not_errors() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::ConnectionReset)));
    }
}
