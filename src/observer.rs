//! Load-time events and the observers that receive them.
//!
//! The unlock protocol reports what happens while opening key material through a
//! [`LoadObserver`] handed to it by the caller. [`TracingObserver`] forwards the
//! events to `tracing`; tests can record them instead.

use std::path::{Path, PathBuf};

/// Something worth reporting while opening a key file.
///
/// Events never carry password material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    /// An input path does not name a regular file.
    MissingFile { path: PathBuf },
    /// A supplied password did not unlock the file.
    PasswordRejected { path: PathBuf, reason: String },
    /// The file was decoded after `prompts` interactive password requests.
    Unlocked { path: PathBuf, prompts: u32 },
}

impl LoadEvent {
    pub fn path(&self) -> &Path {
        match self {
            LoadEvent::MissingFile { path }
            | LoadEvent::PasswordRejected { path, .. }
            | LoadEvent::Unlocked { path, .. } => path,
        }
    }
}

/// Receives [`LoadEvent`]s.
pub trait LoadObserver {
    fn on_event(&self, event: &LoadEvent);
}

impl<T: LoadObserver + ?Sized> LoadObserver for &T {
    fn on_event(&self, event: &LoadEvent) {
        (**self).on_event(event)
    }
}

/// Emits every event as a structured `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LoadObserver for TracingObserver {
    fn on_event(&self, event: &LoadEvent) {
        match event {
            LoadEvent::MissingFile { path } => {
                tracing::error!(path = %path.display(), "input is not a file");
            }
            LoadEvent::PasswordRejected { path, reason } => {
                tracing::warn!(path = %path.display(), %reason, "password rejected");
            }
            LoadEvent::Unlocked { path, prompts } => {
                tracing::debug!(path = %path.display(), prompts, "key material loaded");
            }
        }
    }
}
