// crates/lantern-media/src/sessions.rs
//
// Open-dialog arena: DialogId → session state. Entries are inserted when the
// engine opens a dialog and removed on the first terminal transition, so a
// stale id simply misses the map and the relay fails soft. Ids are UUIDs,
// so a removed handle value is never observed again.

use std::collections::HashMap;
use std::sync::Weak;

use parking_lot::Mutex;

use lantern_core::{DialogId, DialogKind, DialogState};

use crate::renderer::DialogRenderer;

/// The renderer a dialog was opened under. `None` means the default UI path.
/// Pinned at open time — installing a new custom renderer never redirects a
/// dialog that is already on screen.
pub(crate) type PinnedRenderer = Option<Weak<dyn DialogRenderer>>;

struct DialogSession {
    kind:     DialogKind,
    state:    DialogState,
    renderer: PinnedRenderer,
}

pub(crate) struct SessionTable {
    inner: Mutex<HashMap<DialogId, DialogSession>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()) }
    }

    /// Register a freshly opened dialog. The engine guarantees id uniqueness;
    /// a colliding open is dropped rather than clobbering the live session.
    pub fn open(&self, id: DialogId, kind: DialogKind, renderer: PinnedRenderer) {
        let mut inner = self.inner.lock();
        if inner.contains_key(&id) {
            tracing::warn!(target: "lantern::dialog", %id, "duplicate dialog id from engine, ignoring");
            return;
        }
        inner.insert(id, DialogSession { kind, state: DialogState::opened(kind), renderer });
    }

    /// Pinned renderer for a progress update, if `id` is an open progress
    /// dialog. Anything else (unknown, wrong kind, terminal) yields `None`.
    pub fn update_target(&self, id: DialogId) -> Option<PinnedRenderer> {
        let inner = self.inner.lock();
        let session = inner.get(&id)?;
        if session.kind != DialogKind::Progress || !session.state.accepts_update() {
            return None;
        }
        Some(session.renderer.clone())
    }

    /// First (and only) `Responded` transition for `id`, provided the open
    /// dialog is of `kind`. Removes the session. False means the response
    /// was late, duplicated, or aimed at the wrong dialog kind.
    pub fn respond(&self, id: DialogId, kind: DialogKind) -> bool {
        let mut inner = self.inner.lock();
        match inner.get_mut(&id) {
            Some(session) if session.kind == kind => {
                if session.state.respond() {
                    inner.remove(&id);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// First (and only) `Cancelled` transition for `id`, any dialog kind.
    /// Removes the session and returns its pinned renderer so the caller can
    /// notify it. `None` means the cancel was a no-op (unknown/terminal id).
    pub fn cancel(&self, id: DialogId) -> Option<PinnedRenderer> {
        let mut inner = self.inner.lock();
        let session = inner.get_mut(&id)?;
        if !session.state.cancel() {
            return None;
        }
        inner.remove(&id).map(|s| s.renderer)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respond_consumes_the_session_once() {
        let table = SessionTable::new();
        let id = DialogId::new();
        table.open(id, DialogKind::Question, None);

        assert!(table.respond(id, DialogKind::Question));
        assert!(!table.respond(id, DialogKind::Question));
        assert!(table.cancel(id).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn respond_checks_dialog_kind() {
        let table = SessionTable::new();
        let id = DialogId::new();
        table.open(id, DialogKind::Login, None);

        // Posting a question answer to a login dialog is absorbed.
        assert!(!table.respond(id, DialogKind::Question));
        assert!(table.respond(id, DialogKind::Login));
    }

    #[test]
    fn updates_stop_after_cancel() {
        let table = SessionTable::new();
        let id = DialogId::new();
        table.open(id, DialogKind::Progress, None);

        assert!(table.update_target(id).is_some());
        assert!(table.cancel(id).is_some());
        assert!(table.update_target(id).is_none());
        // Cancel is idempotent.
        assert!(table.cancel(id).is_none());
    }

    #[test]
    fn updates_only_apply_to_progress_dialogs() {
        let table = SessionTable::new();
        let id = DialogId::new();
        table.open(id, DialogKind::Login, None);
        assert!(table.update_target(id).is_none());
        assert!(table.update_target(DialogId::new()).is_none());
    }

    #[test]
    fn duplicate_open_keeps_the_live_session() {
        let table = SessionTable::new();
        let id = DialogId::new();
        table.open(id, DialogKind::Progress, None);
        table.open(id, DialogKind::Login, None);
        // Still the progress session: updates flow, login responses don't.
        assert!(table.update_target(id).is_some());
        assert!(!table.respond(id, DialogKind::Login));
    }
}
