//! Working/baseline bookkeeping for one record kind.
//!
//! [`Tracked`] holds the last snapshot known to match persisted state
//! (`baseline`) and the user's editable copy (`working`). Every staged edit
//! bumps a version counter; a commit remembers the version its payload was
//! computed from so edits made while it is in flight can be detected.
//!
//! Baselines carry the generation of the fetch that produced them. A rebase
//! from an older generation than the one already applied is dropped, so a
//! slow refresh cannot roll the baseline back.

use luminar_core::project::{ProjectPatch, ProjectSettings};
use luminar_core::project_config::{ProjectConfigPatch, ProjectConfigSettings};

/// Lifecycle of one record kind inside the synchronizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Working copy equals the baseline.
    Clean,
    /// At least one field differs from the baseline.
    Dirty,
    /// A commit is outstanding.
    Committing,
}

/// A record shape that can be diffed against its baseline.
pub trait Snapshot: Clone {
    type Patch;

    fn diff(&self, baseline: &Self) -> Self::Patch;

    fn dirty_field_names(&self, baseline: &Self) -> Vec<&'static str>;
}

impl Snapshot for ProjectSettings {
    type Patch = ProjectPatch;

    fn diff(&self, baseline: &Self) -> ProjectPatch {
        ProjectSettings::diff(self, baseline)
    }

    fn dirty_field_names(&self, baseline: &Self) -> Vec<&'static str> {
        self.dirty_fields(baseline).iter().map(|f| f.as_str()).collect()
    }
}

impl Snapshot for ProjectConfigSettings {
    type Patch = ProjectConfigPatch;

    fn diff(&self, baseline: &Self) -> ProjectConfigPatch {
        ProjectConfigSettings::diff(self, baseline)
    }

    fn dirty_field_names(&self, baseline: &Self) -> Vec<&'static str> {
        self.dirty_fields(baseline).iter().map(|f| f.as_str()).collect()
    }
}

#[derive(Debug, Clone)]
pub struct Tracked<S> {
    baseline: S,
    working: S,
    version: u64,
    in_flight: Option<u64>,
    generation: u64,
}

impl<S: Snapshot> Tracked<S> {
    pub fn new(initial: S) -> Self {
        Self {
            baseline: initial.clone(),
            working: initial,
            version: 0,
            in_flight: None,
            generation: 0,
        }
    }

    pub fn baseline(&self) -> &S {
        &self.baseline
    }

    pub fn working(&self) -> &S {
        &self.working
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Mutate the working copy.
    pub fn stage(&mut self, edit: impl FnOnce(&mut S)) {
        edit(&mut self.working);
        self.version += 1;
    }

    pub fn dirty_fields(&self) -> Vec<&'static str> {
        self.working.dirty_field_names(&self.baseline)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty_fields().is_empty()
    }

    pub fn is_committing(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Version the outstanding commit was computed from.
    pub fn in_flight(&self) -> Option<u64> {
        self.in_flight
    }

    pub fn state(&self) -> SyncState {
        if self.is_committing() {
            SyncState::Committing
        } else if self.is_dirty() {
            SyncState::Dirty
        } else {
            SyncState::Clean
        }
    }

    /// Start a commit: returns the payload and the version it was computed
    /// from, or `None` if a commit is already outstanding.
    pub fn begin_commit(&mut self) -> Option<(u64, S::Patch)> {
        if self.in_flight.is_some() {
            return None;
        }
        self.in_flight = Some(self.version);
        Some((self.version, self.working.diff(&self.baseline)))
    }

    /// End the outstanding commit. Returns `true` when edits were staged
    /// after the payload was taken (they remain dirty for the next commit).
    pub fn end_commit(&mut self, version: u64) -> bool {
        self.in_flight = None;
        self.version != version
    }

    /// Generation of the snapshot the baseline was last taken from.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the baseline with a freshly fetched snapshot.
    ///
    /// `overwrite` copies the externally owned fields from the new baseline
    /// into the working copy; every other working field keeps its local edit.
    /// Returns `false`, leaving everything untouched, when `generation` is
    /// older than the baseline already held.
    pub fn rebase(
        &mut self,
        generation: u64,
        baseline: S,
        overwrite: impl FnOnce(&mut S, &S),
    ) -> bool {
        if generation < self.generation {
            return false;
        }
        overwrite(&mut self.working, &baseline);
        self.baseline = baseline;
        self.generation = generation;
        true
    }

    /// Take the baseline as the working copy if nothing was staged since
    /// `version` and no commit is outstanding.
    ///
    /// Used after a successful commit: the server may store a normalized
    /// form of what was sent, and the working copy should show that form.
    pub fn settle(&mut self, version: u64) -> bool {
        if self.version != version || self.in_flight.is_some() {
            return false;
        }
        self.working = self.baseline.clone();
        true
    }
}
