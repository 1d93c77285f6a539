//! The settings synchronizer behind the project settings cards.
//!
//! One [`SettingsSynchronizer`] exists per open settings view. It keeps a
//! working and a baseline copy of the project record and of its
//! configuration record, and commits only the fields that differ.
//!
//! ```text
//! Clean --stage--> Dirty --commit--> Committing --ok--> refresh --> Clean
//!                    ^                    |                      (or Dirty if edited mid-flight)
//!                    +-------err----------+
//! ```
//!
//! State lives behind a mutex that is never held across a network call, so
//! edits can be staged while a commit is outstanding. Such edits are not part
//! of that commit and stay dirty afterwards.
//!
//! Every refresh takes a generation number before it fetches. Baselines from
//! a generation older than the one already applied are discarded, so two
//! commits whose refreshes interleave cannot roll a baseline back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use luminar_core::project::{ProjectEdit, ProjectField, ProjectPatch, ProjectSettings};
use luminar_core::project_config::{ConfigEdit, ProjectConfigPatch, ProjectConfigSettings};
use luminar_core::upload::{encode_image_upload, UploadRejection};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiError, SettingsApi};
use crate::notify::{Notification, Notifier};
use crate::tracker::{SyncState, Tracked};

const LOADING_MESSAGE: &str = "Updating project...";
const SUCCESS_MESSAGE: &str = "Project updated successfully.";

/// Which record a commit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Project,
    ProjectConfig,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::ProjectConfig => "project_config",
        }
    }
}

/// Result of [`SettingsSynchronizer::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The server accepted the patch. `requeued` is `true` when edits were
    /// staged while it was in flight; they are still dirty.
    Committed { requeued: bool },
    /// The server or the transport reported an error. Nothing was lost.
    Failed { message: String },
    /// Another commit for the same record kind is outstanding.
    AlreadyCommitting,
    /// The view was closed before the response arrived; no effects fired.
    Abandoned,
}

enum Payload {
    Project(ProjectPatch),
    Config(ProjectConfigPatch),
}

enum Persisted {
    Project(ProjectSettings),
    Config(ProjectConfigSettings),
}

struct Records {
    project: Tracked<ProjectSettings>,
    config: Tracked<ProjectConfigSettings>,
    /// Project version at which each field was last staged.
    staged_at: HashMap<ProjectField, u64>,
}

impl Records {
    fn stage_project(&mut self, edit: ProjectEdit) {
        let field = edit.field();
        self.project.stage(|w| w.apply(edit));
        self.staged_at.insert(field, self.project.version());
    }

    fn is_dirty(&self, kind: RecordKind) -> bool {
        match kind {
            RecordKind::Project => self.project.is_dirty(),
            RecordKind::ProjectConfig => self.config.is_dirty(),
        }
    }

    fn state(&self, kind: RecordKind) -> SyncState {
        match kind {
            RecordKind::Project => self.project.state(),
            RecordKind::ProjectConfig => self.config.state(),
        }
    }

    fn dirty_fields(&self, kind: RecordKind) -> Vec<&'static str> {
        match kind {
            RecordKind::Project => self.project.dirty_fields(),
            RecordKind::ProjectConfig => self.config.dirty_fields(),
        }
    }

    fn begin_commit(&mut self, kind: RecordKind) -> Option<(u64, Payload)> {
        match kind {
            RecordKind::Project => self
                .project
                .begin_commit()
                .map(|(v, p)| (v, Payload::Project(p))),
            RecordKind::ProjectConfig => self
                .config
                .begin_commit()
                .map(|(v, p)| (v, Payload::Config(p))),
        }
    }

    fn end_commit(&mut self, kind: RecordKind, version: u64) -> bool {
        match kind {
            RecordKind::Project => self.project.end_commit(version),
            RecordKind::ProjectConfig => self.config.end_commit(version),
        }
    }

    /// Images may arrive as freshly generated references, so the server's
    /// copy replaces whatever the view holds. Image edits staged after
    /// `keep_after`, or after the version of a project commit still in
    /// flight, postdate that commit and are kept.
    fn rebase_project(
        &mut self,
        generation: u64,
        project: ProjectSettings,
        keep_after: Option<u64>,
    ) {
        let keep_after = keep_after.or(self.project.in_flight());
        let keep = |field: ProjectField| {
            keep_after.is_some_and(|v| self.staged_at.get(&field).is_some_and(|&at| at > v))
        };
        let keep_icon = keep(ProjectField::Icon);
        let keep_og_image = keep(ProjectField::OgImage);

        self.project.rebase(generation, project, |working, fresh| {
            if !keep_icon {
                working.icon = fresh.icon.clone();
            }
            if !keep_og_image {
                working.og_image = fresh.og_image.clone();
            }
        });
    }

    fn rebase_config(&mut self, generation: u64, config: ProjectConfigSettings) {
        self.config.rebase(generation, config, |_, _| {});
    }

    fn settle(&mut self, kind: RecordKind, version: u64) -> bool {
        match kind {
            RecordKind::Project => self.project.settle(version),
            RecordKind::ProjectConfig => self.config.settle(version),
        }
    }
}

/// Working/baseline state for one project's settings view.
pub struct SettingsSynchronizer<A> {
    slug: String,
    api: A,
    notifier: Arc<dyn Notifier>,
    records: Mutex<Records>,
    next_toast_id: AtomicU64,
    last_generation: AtomicU64,
    alive: CancellationToken,
}

impl<A: SettingsApi> SettingsSynchronizer<A> {
    /// Build a synchronizer from the records the view was rendered with.
    pub fn new(
        slug: impl Into<String>,
        project: ProjectSettings,
        config: ProjectConfigSettings,
        api: A,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            slug: slug.into(),
            api,
            notifier,
            records: Mutex::new(Records {
                project: Tracked::new(project),
                config: Tracked::new(config),
                staged_at: HashMap::new(),
            }),
            next_toast_id: AtomicU64::new(1),
            last_generation: AtomicU64::new(0),
            alive: CancellationToken::new(),
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    // ---- staging ----

    pub async fn stage_project(&self, edit: ProjectEdit) {
        self.records.lock().await.stage_project(edit);
    }

    pub async fn stage_config(&self, edit: ConfigEdit) {
        self.records.lock().await.config.stage(|w| w.apply(edit));
    }

    /// Validate an uploaded logo and stage it as an inline `data:` URL.
    ///
    /// On rejection the working copy is left untouched.
    pub async fn stage_icon_upload(
        &self,
        bytes: &[u8],
        mime: &str,
        size: u64,
    ) -> Result<(), UploadRejection> {
        let encoded = encode_image_upload(bytes, mime, size)?;
        self.stage_project(ProjectEdit::Icon(Some(encoded))).await;
        Ok(())
    }

    /// Same rules as [`stage_icon_upload`](Self::stage_icon_upload), for the OG image.
    pub async fn stage_og_image_upload(
        &self,
        bytes: &[u8],
        mime: &str,
        size: u64,
    ) -> Result<(), UploadRejection> {
        let encoded = encode_image_upload(bytes, mime, size)?;
        self.stage_project(ProjectEdit::OgImage(Some(encoded))).await;
        Ok(())
    }

    // ---- introspection ----

    /// Current working copy of the project record.
    pub async fn project(&self) -> ProjectSettings {
        self.records.lock().await.project.working().clone()
    }

    /// Current working copy of the configuration record.
    pub async fn config(&self) -> ProjectConfigSettings {
        self.records.lock().await.config.working().clone()
    }

    pub async fn project_baseline(&self) -> ProjectSettings {
        self.records.lock().await.project.baseline().clone()
    }

    pub async fn config_baseline(&self) -> ProjectConfigSettings {
        self.records.lock().await.config.baseline().clone()
    }

    pub async fn state(&self, kind: RecordKind) -> SyncState {
        self.records.lock().await.state(kind)
    }

    pub async fn is_dirty(&self, kind: RecordKind) -> bool {
        self.records.lock().await.is_dirty(kind)
    }

    /// Whether the save button for `kind` should be enabled.
    pub async fn save_enabled(&self, kind: RecordKind) -> bool {
        self.state(kind).await == SyncState::Dirty
    }

    pub async fn dirty_fields(&self, kind: RecordKind) -> Vec<&'static str> {
        self.records.lock().await.dirty_fields(kind)
    }

    // ---- commit / refresh ----

    /// Send the dirty fields of `kind` as a partial update.
    ///
    /// Never returns an error: failures become an error notification and a
    /// [`CommitOutcome::Failed`], with baseline and working copy untouched.
    pub async fn commit(&self, kind: RecordKind) -> CommitOutcome {
        let Some((version, payload)) = self.records.lock().await.begin_commit(kind) else {
            tracing::debug!(slug = %self.slug, kind = kind.as_str(), "Commit already in flight");
            return CommitOutcome::AlreadyCommitting;
        };

        let toast_id = self.next_toast_id.fetch_add(1, Ordering::Relaxed);
        self.notifier
            .notify(Notification::loading(toast_id, LOADING_MESSAGE));

        let result = self.send(payload).await;
        let requeued = self.records.lock().await.end_commit(kind, version);

        if self.alive.is_cancelled() {
            tracing::debug!(slug = %self.slug, kind = kind.as_str(), "Commit finished after close");
            return CommitOutcome::Abandoned;
        }

        let persisted = match result {
            Ok(persisted) => persisted,
            Err(err) => {
                let message = err.to_string();
                tracing::warn!(slug = %self.slug, kind = kind.as_str(), error = %message, "Commit failed");
                self.notifier
                    .notify(Notification::error(toast_id, message.clone()));
                return CommitOutcome::Failed { message };
            }
        };

        tracing::info!(slug = %self.slug, kind = kind.as_str(), requeued, "Commit succeeded");
        self.notifier
            .notify(Notification::success(toast_id, SUCCESS_MESSAGE));

        let keep_after = (kind == RecordKind::Project).then_some(version);
        let generation = self.next_generation();
        let refreshed = self.refresh_at(generation, keep_after).await;
        if self.alive.is_cancelled() {
            return CommitOutcome::Committed { requeued };
        }

        let mut records = self.records.lock().await;
        if let Err(err) = refreshed {
            // Fall back to the record the PATCH returned.
            tracing::warn!(slug = %self.slug, error = %err, "Refresh after commit failed");
            match persisted {
                Persisted::Project(project) => {
                    records.rebase_project(generation, project, keep_after)
                }
                Persisted::Config(config) => records.rebase_config(generation, config),
            }
        }
        // The server may have stored a normalized form of what was sent.
        if records.settle(kind, version) {
            tracing::debug!(slug = %self.slug, kind = kind.as_str(), "Working copy settled on persisted record");
        }

        CommitOutcome::Committed { requeued }
    }

    /// Re-fetch both records and resynchronize. A no-op after [`close`](Self::close).
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let generation = self.next_generation();
        self.refresh_at(generation, None).await
    }

    /// Adopt new baselines delivered from outside.
    ///
    /// The project's image fields are overwritten in the working copy even
    /// over pending edits; all other working fields keep their local values.
    pub async fn resync(&self, project: ProjectSettings, config: ProjectConfigSettings) {
        let generation = self.next_generation();
        self.resync_at(generation, project, config, None).await;
    }

    /// Tear down: commits still in flight will complete without any effect.
    pub fn close(&self) {
        self.alive.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.alive.is_cancelled()
    }

    fn next_generation(&self) -> u64 {
        self.last_generation.fetch_add(1, Ordering::Relaxed) + 1
    }

    async fn refresh_at(&self, generation: u64, keep_after: Option<u64>) -> Result<(), ApiError> {
        if self.alive.is_cancelled() {
            return Ok(());
        }
        let project = self.api.fetch_project(&self.slug).await?;
        let config = self.api.fetch_project_config(&self.slug).await?;
        if self.alive.is_cancelled() {
            return Ok(());
        }
        self.resync_at(generation, project, config, keep_after).await;
        Ok(())
    }

    async fn resync_at(
        &self,
        generation: u64,
        project: ProjectSettings,
        config: ProjectConfigSettings,
        keep_after: Option<u64>,
    ) {
        let mut records = self.records.lock().await;
        let stale = records.project.generation() > generation
            || records.config.generation() > generation;
        records.rebase_project(generation, project, keep_after);
        records.rebase_config(generation, config);
        if stale {
            tracing::debug!(slug = %self.slug, generation, "Discarded records older than current baseline");
        }
    }

    async fn send(&self, payload: Payload) -> Result<Persisted, ApiError> {
        match payload {
            Payload::Project(patch) => {
                tracing::debug!(slug = %self.slug, empty = patch.is_empty(), "Patching project");
                self.api
                    .patch_project(&self.slug, &patch)
                    .await
                    .map(Persisted::Project)
            }
            Payload::Config(patch) => {
                tracing::debug!(slug = %self.slug, empty = patch.is_empty(), "Patching project config");
                self.api
                    .patch_project_config(&self.slug, &patch)
                    .await
                    .map(Persisted::Config)
            }
        }
    }
}
