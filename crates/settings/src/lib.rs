//! Client-side settings synchronization for the Luminar dashboard.
//!
//! - [`SettingsSynchronizer`] -- working/baseline copies of a project and its
//!   configuration, dirty tracking, and minimal partial-update commits.
//! - [`SettingsApi`] -- the persistence endpoints the synchronizer talks to,
//!   with [`HttpSettingsApi`] as the `reqwest` implementation.
//! - [`Notifier`] -- where loading / success / error toasts are delivered.

pub mod api;
pub mod notify;
pub mod synchronizer;
pub mod tracker;

pub use api::{ApiError, HttpSettingsApi, SettingsApi};
pub use notify::{Notification, NotificationKind, Notifier};
pub use synchronizer::{CommitOutcome, RecordKind, SettingsSynchronizer};
pub use tracker::SyncState;
