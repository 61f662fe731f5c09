//! One-time process-wide network subsystem startup.

use std::sync::Once;

static STARTED: Once = Once::new();

/// Runs the process-wide network subsystem startup, exactly once.
///
/// On Windows the socket subsystem (Winsock) must be started before the
/// first socket call of the process. The standard library does that lazily
/// on first socket use; this hook forces that first use here so the startup
/// happens before the endpoint's own socket is created and is never re-run
/// per endpoint. On other platforms there is nothing to start.
pub fn ensure_started() {
    STARTED.call_once(|| {
        #[cfg(windows)]
        {
            // Touching one socket makes std run WSAStartup for the process.
            // A failure here will resurface on the caller's own bind, where
            // it is reported as an initialization error.
            let _ = std::net::UdpSocket::bind(("127.0.0.1", 0));
        }
    });
}
