// crates/lantern-media/src/engine.rs
//
// MediaEngine: the near side of the native engine boundary. The engine glue
// emits dialog events here from whatever context it runs in; a DialogProvider
// claims the event stream and drains it on the host's UI thread. Responses
// travel the other way and are drained by the engine glue.
//
// Both directions are bounded crossbeam channels: emission never blocks the
// engine, and a host that stops pumping sheds events instead of wedging it.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

use lantern_core::{DialogEvent, DialogId, DialogResponse, QuestionType};

use crate::video::{VideoFeed, VideoLayer};

/// Events queued ahead of the host's pump. Progress-heavy workloads can
/// burst, so this is sized like the shared result channel in a decode
/// worker rather than a handful of slots.
const EVENT_CAPACITY: usize = 512;
const RESPONSE_CAPACITY: usize = 32;

/// Process-wide default engine instance. Initialized on first use; lives
/// until process exit, no teardown ordering beyond that.
static SHARED: Lazy<Arc<MediaEngine>> = Lazy::new(|| Arc::new(MediaEngine::new()));

pub struct MediaEngine {
    event_tx:    Sender<DialogEvent>,
    /// Claim slot for the provider side. `take`n by the first provider,
    /// handed back when it drops.
    event_rx:    Mutex<Option<Receiver<DialogEvent>>>,
    response_tx: Sender<DialogResponse>,
    response_rx: Receiver<DialogResponse>,
    /// Engine-side handles of every attached video layer.
    feeds:       Mutex<Vec<VideoFeed>>,
}

impl MediaEngine {
    pub fn new() -> Self {
        let (event_tx, event_rx) = bounded(EVENT_CAPACITY);
        let (response_tx, response_rx) = bounded(RESPONSE_CAPACITY);
        Self {
            event_tx,
            event_rx: Mutex::new(Some(event_rx)),
            response_tx,
            response_rx,
            feeds: Mutex::new(Vec::new()),
        }
    }

    /// The process-wide default instance, created on first call.
    pub fn shared() -> Arc<MediaEngine> {
        Arc::clone(&SHARED)
    }

    // ── Dialog emission (engine-side API) ─────────────────────────────────

    pub fn show_error(&self, title: &str, message: &str) {
        self.emit(DialogEvent::Error {
            title:   title.to_owned(),
            message: message.to_owned(),
        });
    }

    pub fn show_login(
        &self,
        title: &str,
        message: &str,
        default_username: Option<&str>,
        ask_store: bool,
    ) -> DialogId {
        let id = DialogId::new();
        self.emit(DialogEvent::Login {
            id,
            title:            title.to_owned(),
            message:          message.to_owned(),
            default_username: default_username.map(str::to_owned),
            ask_store,
        });
        id
    }

    pub fn show_question(
        &self,
        title: &str,
        message: &str,
        question_type: QuestionType,
        cancel_label: Option<&str>,
        action1_label: Option<&str>,
        action2_label: Option<&str>,
    ) -> DialogId {
        let id = DialogId::new();
        self.emit(DialogEvent::Question {
            id,
            title:         title.to_owned(),
            message:       message.to_owned(),
            question_type,
            cancel_label:  cancel_label.map(str::to_owned),
            action1_label: action1_label.map(str::to_owned),
            action2_label: action2_label.map(str::to_owned),
        });
        id
    }

    pub fn show_progress(
        &self,
        title: &str,
        message: &str,
        indeterminate: bool,
        position: f32,
        cancel_label: Option<&str>,
    ) -> DialogId {
        let id = DialogId::new();
        self.emit(DialogEvent::Progress {
            id,
            title:        title.to_owned(),
            message:      message.to_owned(),
            indeterminate,
            position,
            cancel_label: cancel_label.map(str::to_owned),
        });
        id
    }

    pub fn update_progress(&self, id: DialogId, message: Option<&str>, position: f32) {
        self.emit(DialogEvent::ProgressUpdate {
            id,
            message: message.map(str::to_owned),
            position,
        });
    }

    pub fn dismiss_dialog(&self, id: DialogId) {
        self.emit(DialogEvent::Dismiss { id });
    }

    fn emit(&self, event: DialogEvent) {
        // try_send so a stalled host can't block the engine context; a shed
        // event is lost UI, not lost state — the session opens on the pump
        // side, so nothing dangles.
        if let Err(TrySendError::Full(event)) = self.event_tx.try_send(event) {
            warn!(target: "lantern::engine", ?event, "dialog event queue full, dropping");
        }
    }

    // ── Responses (engine-side drain) ─────────────────────────────────────

    /// Next user response relayed by the provider, if any.
    pub fn try_recv_response(&self) -> Option<DialogResponse> {
        self.response_rx.try_recv().ok()
    }

    pub(crate) fn post_response(&self, response: DialogResponse) {
        if self.response_tx.try_send(response).is_err() {
            warn!(target: "lantern::engine", "response queue full, dropping");
        }
    }

    // ── Provider attachment ───────────────────────────────────────────────

    pub(crate) fn claim_events(&self) -> Option<Receiver<DialogEvent>> {
        self.event_rx.lock().take()
    }

    pub(crate) fn release_events(&self, rx: Receiver<DialogEvent>) {
        *self.event_rx.lock() = Some(rx);
    }

    // ── Video layers ──────────────────────────────────────────────────────

    /// Bind `layer` to this engine. Its has-video flag follows playback
    /// state from here on.
    pub fn attach_layer(&self, layer: &VideoLayer) {
        self.feeds.lock().push(layer.feed());
    }

    /// Flip the has-video flag on every attached layer. Called by the engine
    /// glue as decoded video starts and stops.
    pub fn set_video_active(&self, active: bool) {
        for feed in self.feeds.lock().iter() {
            feed.set_active(active);
        }
    }
}

impl Default for MediaEngine {
    fn default() -> Self {
        Self::new()
    }
}
