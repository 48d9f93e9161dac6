//! SvnRev Core Library
//!
//! Resolves a single committed changeset for a versioned file,
//! including:
//! - Revision markers with `Undefined`/`HEAD` sentinels
//! - Changeset and log-entry data model
//! - Working-copy to repository address mapping
//! - Log-query facade and read-access gate traits
//! - Copy-path tracking backward through rename/copy history
//! - The three-strategy resolution engine
//!
//! The crate owns no transport or storage: hosts supply [`LogClient`],
//! [`AccessGate`], and [`WorkingCopyMapping`] implementations and call
//! [`RevisionResolver::resolve`].

pub mod cancel;
pub mod changeset;
pub mod copy_tracker;
pub mod history;
pub mod mapping;
pub mod resolve;
pub mod revision;

pub use cancel::CancellationToken;
pub use changeset::{ChangeAction, Changeset, CopySource, LogEntry, PathChange};
pub use copy_tracker::CopyPathTracker;
pub use history::{AccessGate, HistoryError, LogClient, LogHandler};
pub use mapping::{MappingError, RootUrlInfo, WorkingCopyMapping};
pub use resolve::{Resolution, ResolveError, Result, RevisionResolver};
pub use revision::Revision;
