//! Single-revision resolution engine
//!
//! Given a versioned file and a target revision number, produces the
//! changeset committed at that revision together with the file's path
//! identity at that revision (the path may have been renamed or copied
//! since). Three ordered search strategies, short-circuiting on first
//! success:
//!
//! 1. narrow log lookup at the working-copy root URL,
//! 2. narrow log lookup at the repository root URL, gated on read
//!    access,
//! 3. wide descending history search feeding the copy-path tracker.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::changeset::{ChangeAction, Changeset};
use crate::copy_tracker::CopyPathTracker;
use crate::history::{AccessGate, HistoryError, LogClient};
use crate::mapping::{MappingError, RootUrlInfo, WorkingCopyMapping};
use crate::revision::Revision;

/// Result type for resolution operations.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Failures that abort a resolution. Permission failures never appear
/// here: they only ever skip one search strategy.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("log query failed: {0}")]
    Transport(String),

    #[error("operation cancelled")]
    Cancelled,
}

/// Successful resolution: the changeset committed at the target
/// revision and the file's local path at that revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub changeset: Changeset,
    pub path: PathBuf,
}

/// Resolves a (file, revision number) pair to its committed changeset.
///
/// The resolver itself is stateless between invocations; all search
/// state is allocated per call, so independent resolutions may run on
/// separate threads. Queries are issued sequentially and block the
/// calling thread; no query is ever issued from inside another query's
/// entry callback.
pub struct RevisionResolver<'a> {
    log: &'a dyn LogClient,
    gate: &'a dyn AccessGate,
    mapping: &'a dyn WorkingCopyMapping,
    cancel: CancellationToken,
}

impl<'a> RevisionResolver<'a> {
    pub fn new(
        log: &'a dyn LogClient,
        gate: &'a dyn AccessGate,
        mapping: &'a dyn WorkingCopyMapping,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            log,
            gate,
            mapping,
            cancel,
        }
    }

    /// Resolve the changeset committed at `revision` for `file`.
    ///
    /// Returns `Ok(None)` when the file is not under version control or
    /// no changeset exists at that revision along any search strategy.
    /// `revision` must be a concrete revision number, never a sentinel.
    pub fn resolve(&self, file: &Path, revision: u64) -> Result<Option<Resolution>> {
        let Some(root) = self.mapping.root_for(file) else {
            debug!(file = %file.display(), "file has no working copy root");
            return Ok(None);
        };
        let repo_relative = root.relative_address(file)?;
        debug!(
            file = %file.display(),
            revision,
            address = %repo_relative,
            "resolving committed changeset"
        );

        Search {
            log: self.log,
            gate: self.gate,
            mapping: self.mapping,
            cancel: self.cancel.clone(),
            root,
            repo_relative,
            file: file.to_path_buf(),
            target: revision,
            found: None,
        }
        .run()
    }
}

/// Per-invocation search state.
struct Search<'a> {
    log: &'a dyn LogClient,
    gate: &'a dyn AccessGate,
    mapping: &'a dyn WorkingCopyMapping,
    cancel: CancellationToken,
    root: RootUrlInfo,
    repo_relative: String,
    file: PathBuf,
    target: u64,
    /// Single-assignment result slot shared between the strategies:
    /// the first strategy to find the target revision's entry wins.
    found: Option<Changeset>,
}

impl Search<'_> {
    fn run(mut self) -> Result<Option<Resolution>> {
        let root_url = self.root.root_url.clone();
        let repository_url = self.root.repository_url.clone();

        let narrow_hit = self.narrow_lookup(&root_url)?
            || (self.readable(&repository_url) && self.narrow_lookup(&repository_url)?);

        let path = match (narrow_hit, self.found.clone()) {
            (true, Some(changeset)) => self.resolved_path_for(&changeset)?,
            _ => self.wide_search()?,
        };

        Ok(self
            .found
            .take()
            .map(|changeset| Resolution { changeset, path }))
    }

    fn readable(&self, url: &str) -> bool {
        let readable = self.gate.can_read(url);
        if !readable {
            debug!(url, "repository root not readable, skipping narrow lookup there");
        }
        readable
    }

    /// Strategy 1/2: query exactly the target revision at `url`.
    fn narrow_lookup(&mut self, url: &str) -> Result<bool> {
        debug!(url, revision = self.target, "narrow log lookup");
        let target = self.target;
        let cancel = self.cancel.clone();
        let mut hit: Option<Changeset> = None;

        let outcome = self.log.log(
            url,
            target.into(),
            target.into(),
            1,
            &mut |entry| {
                if cancel.is_cancelled() {
                    return Err(HistoryError::Cancelled);
                }
                // A null timestamp marks an entry the principal has
                // only partial visibility into; not usable as a result.
                if entry.timestamp.is_some() && entry.revision == target && hit.is_none() {
                    hit = Some(Changeset::from_entry(entry));
                }
                Ok(())
            },
        );

        match outcome {
            Ok(()) => {}
            Err(err @ (HistoryError::Access(_) | HistoryError::NotFound(_))) => {
                info!(url, error = %err, "narrow lookup failed, trying next strategy");
                return Ok(false);
            }
            Err(HistoryError::Cancelled) => return Err(ResolveError::Cancelled),
            Err(err) => return Err(ResolveError::Transport(err.to_string())),
        }

        if self.found.is_none() {
            self.found = hit;
        }
        Ok(self.found.is_some())
    }

    /// Strategy 3: descend through the full history at the working-copy
    /// root URL, tracking copy ancestry, and return the file's local
    /// path at the target revision.
    fn wide_search(&mut self) -> Result<PathBuf> {
        debug!(
            url = %self.root.root_url,
            revision = self.target,
            "wide history search from head"
        );
        let mut tracker = CopyPathTracker::new(&self.root.repository_url, &self.repo_relative);
        let target = self.target;
        let cancel = self.cancel.clone();
        let mut hit: Option<Changeset> = None;

        let outcome = self.log.log(
            &self.root.root_url,
            Revision::Undefined,
            Revision::Head,
            0,
            &mut |entry| {
                if cancel.is_cancelled() {
                    return Err(HistoryError::Cancelled);
                }
                if entry.timestamp.is_none() {
                    return Ok(());
                }
                tracker.accept(entry);
                if entry.revision == target && hit.is_none() {
                    hit = Some(Changeset::from_entry(entry));
                }
                Ok(())
            },
        );

        match outcome {
            Ok(()) => {}
            Err(HistoryError::Cancelled) => return Err(ResolveError::Cancelled),
            // Access failures are not recoverable here: there is no
            // further strategy to fall back to.
            Err(err) => return Err(ResolveError::Transport(err.to_string())),
        }

        if self.found.is_none() {
            self.found = hit;
        }
        debug!(url = %tracker.url(), "wide search finished");

        Ok(tracker
            .repo_path()
            .and_then(|path| self.mapping.local_path(&self.root, path))
            .unwrap_or_else(|| self.file.clone()))
    }

    /// Resolved path for a changeset found by a narrow lookup.
    fn resolved_path_for(&mut self, changeset: &Changeset) -> Result<PathBuf> {
        if let Some((path, change)) = changeset.single_change() {
            // A deletion has no after state; keep the caller's path.
            if change.action == ChangeAction::Deleted {
                return Ok(self.file.clone());
            }
            return Ok(self
                .mapping
                .local_path(&self.root, path)
                .unwrap_or_else(|| self.file.clone()));
        }

        if changeset.by_path(&self.repo_relative).is_some() {
            return Ok(self.file.clone());
        }

        // The changeset does not list the address it was found for.
        // Recover the path identity through the wide search; the result
        // slot is already taken, so the changeset itself is kept.
        info!(
            address = %self.repo_relative,
            revision = changeset.revision,
            "changeset does not list the resolved address, re-searching from head"
        );
        self.wide_search()
    }
}
