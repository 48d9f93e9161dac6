//! History query facade and access gate
//!
//! Thin abstractions over the version-control transport: "fetch log
//! entries for a URL between two revisions" and "can the current
//! principal read this URL at all". The resolution engine consumes
//! these; implementations live with the host.

use crate::changeset::LogEntry;
use crate::revision::Revision;

/// Failures a log query can report.
#[derive(Debug, Clone, thiserror::Error)]
pub enum HistoryError {
    /// The principal is not permitted to read the queried location.
    #[error("access denied: {0}")]
    Access(String),

    /// The queried path or revision does not exist at that location
    /// (a structural gap, not a permission problem).
    #[error("not found: {0}")]
    NotFound(String),

    /// The transport failed: connectivity, malformed request, timeout.
    /// Never retried by the engine.
    #[error("transport error: {0}")]
    Transport(String),

    /// The operation was cancelled from the handler.
    #[error("operation cancelled")]
    Cancelled,
}

/// Per-entry callback for [`LogClient::log`]. Returning an error aborts
/// delivery; the error is propagated verbatim out of `log`.
pub type LogHandler<'a> = &'a mut dyn FnMut(&LogEntry) -> Result<(), HistoryError>;

/// Log-query facade.
///
/// Contract:
/// - Entries are delivered newest-first (descending revision). The
///   copy-path tracker depends on this ordering to walk backward in
///   time; callers must not assume ascending delivery.
/// - `limit == 0` means unbounded within the given range; otherwise at
///   most `limit` entries are delivered.
/// - A handler error stops delivery immediately and is returned to the
///   caller unchanged. Cancellation travels this way, as
///   [`HistoryError::Cancelled`], never by unwinding.
/// - Implementations issue no nested queries from inside the handler.
pub trait LogClient {
    fn log(
        &self,
        url: &str,
        start: Revision,
        end: Revision,
        limit: usize,
        handler: LogHandler<'_>,
    ) -> Result<(), HistoryError>;
}

/// Read-permission probe.
///
/// Non-throwing: the underlying check may itself query the server, but
/// its failures are swallowed and reported as `false`. Used to skip a
/// doomed query against a location the principal cannot read, without
/// masking structural "no such path" outcomes.
pub trait AccessGate {
    fn can_read(&self, url: &str) -> bool;
}
