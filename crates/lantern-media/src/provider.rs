// crates/lantern-media/src/provider.rs
//
// DialogProvider: bridges engine dialog events to either the host's custom
// renderer or the built-in default UI, and relays user responses back.
//
// Threading model: the engine emits from its own context into a bounded
// channel; the host calls pump() from its UI-owning context, which is where
// every renderer method runs. That drain is the whole cross-context handoff —
// no thread is spawned here.
//
// Relay calls never return errors. A stale reference, a dropped renderer, a
// late response — all absorbed with a debug log, because the boundary gives
// the other side no way to handle a failure anyway.

use std::sync::{Arc, Weak};

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use tracing::debug;

use lantern_core::{
    clamp_position, DialogAction, DialogEvent, DialogId, DialogKind, DialogResponse,
};

use crate::engine::MediaEngine;
use crate::error::ProviderError;
use crate::renderer::{DefaultDialogRenderer, DialogRenderer};
use crate::sessions::{PinnedRenderer, SessionTable};

pub struct DialogProvider {
    engine:     Arc<MediaEngine>,
    /// Set once at construction. When false, host response posts are no-ops
    /// and every dialog takes the default-UI path.
    custom_ui:  bool,
    events:     Receiver<DialogEvent>,
    /// Host-installed renderer. Weak and non-owning: the host keeps the
    /// renderer alive; if it drops its reference we fall back to default UI.
    /// Single writer (set_custom_renderer), read by the pump path.
    renderer:   RwLock<Option<Weak<dyn DialogRenderer>>>,
    sessions:   SessionTable,
    default_ui: Arc<dyn DialogRenderer>,
}

impl DialogProvider {
    /// Bind a provider to `engine`, or to the process-wide shared engine if
    /// `None`. Fails only if the engine's dialog stream is already claimed
    /// by another live provider.
    pub fn new(engine: Option<Arc<MediaEngine>>, custom_ui: bool) -> Result<Self, ProviderError> {
        let engine = engine.unwrap_or_else(MediaEngine::shared);
        let events = engine.claim_events().ok_or(ProviderError::EngineBusy)?;
        Ok(Self {
            engine,
            custom_ui,
            events,
            renderer: RwLock::new(None),
            sessions: SessionTable::new(),
            default_ui: Arc::new(DefaultDialogRenderer),
        })
    }

    /// Install (or clear) the custom renderer. Only a weak reference is
    /// kept. Replacing the renderer does not notify the old one, and dialogs
    /// already on screen stay bound to the renderer that showed them.
    pub fn set_custom_renderer(&self, renderer: Option<&Arc<dyn DialogRenderer>>) {
        *self.renderer.write() = renderer.map(Arc::downgrade);
    }

    /// Drain pending engine events and invoke the renderer for each, on the
    /// calling thread. Call this from the context that owns your UI.
    pub fn pump(&self) {
        while let Ok(event) = self.events.try_recv() {
            self.dispatch(event);
        }
    }

    // ── Host → engine responses ───────────────────────────────────────────
    // All three are no-ops unless custom UI mode was requested at init.

    /// Answer the login dialog `id`. `store` asks the engine to keep the
    /// credentials in secure storage.
    pub fn post_credentials(&self, username: &str, password: &str, id: DialogId, store: bool) {
        if !self.custom_ui {
            return;
        }
        if !self.sessions.respond(id, DialogKind::Login) {
            debug!(target: "lantern::dialog", %id, "credentials for unknown login dialog, dropping");
            return;
        }
        self.engine.post_response(DialogResponse::Credentials {
            id,
            username: username.to_owned(),
            password: password.to_owned(),
            store,
        });
    }

    /// Answer the question dialog `id` with a raw button code:
    /// 1 = action 1, 2 = action 2, 3 = cancel. Unknown codes are absorbed.
    pub fn post_action(&self, button: i32, id: DialogId) {
        if !self.custom_ui {
            return;
        }
        let Some(action) = DialogAction::from_button(button) else {
            debug!(target: "lantern::dialog", %id, button, "unknown button code, dropping");
            return;
        };
        if !self.sessions.respond(id, DialogKind::Question) {
            debug!(target: "lantern::dialog", %id, "action for unknown question dialog, dropping");
            return;
        }
        self.engine.post_response(DialogResponse::Action { id, action });
    }

    /// Host-initiated cancellation of the open dialog `id` (typically a
    /// cancellable progress dialog). Safe no-op on unknown/terminal ids.
    pub fn dismiss_dialog(&self, id: DialogId) {
        if !self.custom_ui {
            return;
        }
        if self.sessions.cancel(id).is_none() {
            debug!(target: "lantern::dialog", %id, "dismiss for unknown dialog, dropping");
            return;
        }
        self.engine.post_response(DialogResponse::Dismissed { id });
    }

    // ── Event dispatch ────────────────────────────────────────────────────

    fn dispatch(&self, event: DialogEvent) {
        match event {
            DialogEvent::Error { title, message } => {
                self.current_renderer().show_error(&title, &message);
            }

            DialogEvent::Login { id, title, message, default_username, ask_store } => {
                match self.live_custom() {
                    Some((pinned, renderer)) => {
                        self.sessions.open(id, DialogKind::Login, pinned);
                        renderer.show_login(
                            id, &title, &message, default_username.as_deref(), ask_store,
                        );
                    }
                    None => {
                        // Nothing can answer: show, then dismiss on the
                        // engine's behalf so it isn't left waiting.
                        self.default_ui.show_login(
                            id, &title, &message, default_username.as_deref(), ask_store,
                        );
                        self.engine.post_response(DialogResponse::Dismissed { id });
                    }
                }
            }

            DialogEvent::Question {
                id, title, message, question_type,
                cancel_label, action1_label, action2_label,
            } => {
                match self.live_custom() {
                    Some((pinned, renderer)) => {
                        self.sessions.open(id, DialogKind::Question, pinned);
                        renderer.show_question(
                            id, &title, &message, question_type,
                            cancel_label.as_deref(),
                            action1_label.as_deref(),
                            action2_label.as_deref(),
                        );
                    }
                    None => {
                        self.default_ui.show_question(
                            id, &title, &message, question_type,
                            cancel_label.as_deref(),
                            action1_label.as_deref(),
                            action2_label.as_deref(),
                        );
                        self.engine.post_response(DialogResponse::Dismissed { id });
                    }
                }
            }

            DialogEvent::Progress { id, title, message, indeterminate, position, cancel_label } => {
                let position = clamp_position(position);
                let (pinned, renderer) = match self.live_custom() {
                    Some((pinned, renderer)) => (pinned, renderer),
                    None => (None, Arc::clone(&self.default_ui)),
                };
                // Progress dialogs stay open either way — the engine closes
                // them itself with a Dismiss once the operation finishes.
                self.sessions.open(id, DialogKind::Progress, pinned);
                renderer.show_progress(
                    id, &title, &message, indeterminate, position, cancel_label.as_deref(),
                );
            }

            DialogEvent::ProgressUpdate { id, message, position } => {
                let Some(pinned) = self.sessions.update_target(id) else {
                    debug!(target: "lantern::dialog", %id, "progress update for unknown dialog, dropping");
                    return;
                };
                self.pinned_or_default(pinned)
                    .update_progress(id, message.as_deref(), clamp_position(position));
            }

            DialogEvent::Dismiss { id } => {
                let Some(pinned) = self.sessions.cancel(id) else {
                    debug!(target: "lantern::dialog", %id, "engine dismiss for unknown dialog, ignoring");
                    return;
                };
                self.pinned_or_default(pinned).cancel_dialog(id);
            }
        }
    }

    /// The custom renderer, if custom UI mode is on and the host's reference
    /// is still alive. Returns both the weak handle (to pin into a session)
    /// and an upgraded strong one (to invoke right now).
    fn live_custom(&self) -> Option<(PinnedRenderer, Arc<dyn DialogRenderer>)> {
        if !self.custom_ui {
            return None;
        }
        let slot = self.renderer.read();
        let weak = slot.as_ref()?;
        let strong = weak.upgrade()?;
        Some((Some(weak.clone()), strong))
    }

    /// Renderer pinned at open time, falling back to default UI if the host
    /// has since dropped it.
    fn pinned_or_default(&self, pinned: PinnedRenderer) -> Arc<dyn DialogRenderer> {
        pinned
            .and_then(|weak| weak.upgrade())
            .unwrap_or_else(|| Arc::clone(&self.default_ui))
    }

    /// Renderer for reference-less events (errors): whatever is current.
    fn current_renderer(&self) -> Arc<dyn DialogRenderer> {
        self.live_custom()
            .map(|(_, renderer)| renderer)
            .unwrap_or_else(|| Arc::clone(&self.default_ui))
    }
}

impl Drop for DialogProvider {
    fn drop(&mut self) {
        // Hand the event stream back so a new provider can bind. Events
        // still queued stay queued and reach the next provider.
        self.engine.release_events(self.events.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lantern_core::QuestionType;
    use parking_lot::Mutex;

    #[derive(Debug, PartialEq)]
    enum Call {
        Error(String),
        Login(DialogId),
        Question(DialogId, QuestionType),
        Progress(DialogId, f32),
        Update(DialogId, f32),
        Cancel(DialogId),
    }

    /// Records every renderer invocation into a list the test holds onto,
    /// so assertions survive the renderer Arc being dropped.
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    fn recorder() -> (Arc<dyn DialogRenderer>, Arc<Mutex<Vec<Call>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let renderer: Arc<dyn DialogRenderer> = Arc::new(Recorder { calls: Arc::clone(&calls) });
        (renderer, calls)
    }

    impl DialogRenderer for Recorder {
        fn show_error(&self, title: &str, _message: &str) {
            self.calls.lock().push(Call::Error(title.to_owned()));
        }
        fn show_login(&self, id: DialogId, _: &str, _: &str, _: Option<&str>, _: bool) {
            self.calls.lock().push(Call::Login(id));
        }
        fn show_question(
            &self,
            id: DialogId,
            _: &str,
            _: &str,
            question_type: QuestionType,
            _: Option<&str>,
            _: Option<&str>,
            _: Option<&str>,
        ) {
            self.calls.lock().push(Call::Question(id, question_type));
        }
        fn show_progress(
            &self,
            id: DialogId,
            _: &str,
            _: &str,
            _: bool,
            position: f32,
            _: Option<&str>,
        ) {
            self.calls.lock().push(Call::Progress(id, position));
        }
        fn update_progress(&self, id: DialogId, _: Option<&str>, position: f32) {
            self.calls.lock().push(Call::Update(id, position));
        }
        fn cancel_dialog(&self, id: DialogId) {
            self.calls.lock().push(Call::Cancel(id));
        }
    }

    fn custom_ui_provider() -> (Arc<MediaEngine>, DialogProvider) {
        let engine = Arc::new(MediaEngine::new());
        let provider = DialogProvider::new(Some(Arc::clone(&engine)), true).unwrap();
        (engine, provider)
    }

    #[test]
    fn question_end_to_end() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_question(
            "Confirm", "Proceed?", QuestionType::Warning,
            Some("Cancel"), Some("Yes"), Some("No"),
        );
        provider.pump();
        assert_eq!(calls.lock().as_slice(), &[Call::Question(id, QuestionType::Warning)]);

        // "Yes" is action 1.
        provider.post_action(1, id);
        match engine.try_recv_response() {
            Some(DialogResponse::Action { id: rid, action }) => {
                assert_eq!(rid, id);
                assert_eq!(action, DialogAction::Action1);
            }
            other => panic!("expected action response, got {other:?}"),
        }

        // The dialog is terminal — a second answer is a no-op.
        provider.post_action(2, id);
        assert!(engine.try_recv_response().is_none());
    }

    #[test]
    fn login_round_trip_carries_credentials() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_login("Auth", "Server wants a login", Some("anna"), true);
        provider.pump();
        assert_eq!(calls.lock().as_slice(), &[Call::Login(id)]);

        provider.post_credentials("anna", "hunter2", id, true);
        match engine.try_recv_response() {
            Some(DialogResponse::Credentials { id: rid, username, password, store }) => {
                assert_eq!(rid, id);
                assert_eq!(username, "anna");
                assert_eq!(password, "hunter2");
                assert!(store);
            }
            other => panic!("expected credentials, got {other:?}"),
        }
    }

    #[test]
    fn posts_are_noops_without_custom_ui() {
        let engine = Arc::new(MediaEngine::new());
        let provider = DialogProvider::new(Some(Arc::clone(&engine)), false).unwrap();
        let (renderer, calls) = recorder();
        // Installed, but custom UI mode is off — the default path wins.
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_question("Q", "?", QuestionType::Normal, None, Some("Ok"), None);
        provider.pump();
        assert!(calls.lock().is_empty());

        // Default path already dismissed the question for the engine.
        assert!(matches!(
            engine.try_recv_response(),
            Some(DialogResponse::Dismissed { id: rid }) if rid == id,
        ));

        // Host posts have no observable effect in this mode.
        provider.post_action(1, id);
        provider.post_credentials("u", "p", id, false);
        provider.dismiss_dialog(id);
        assert!(engine.try_recv_response().is_none());
    }

    #[test]
    fn progress_positions_clamp_both_directions() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_progress("Export", "Rendering", false, 1.5, Some("Stop"));
        engine.update_progress(id, None, -0.2);
        engine.update_progress(id, Some("halfway"), 0.5);
        provider.pump();

        assert_eq!(
            calls.lock().as_slice(),
            &[
                Call::Progress(id, 1.0),
                Call::Update(id, 0.0),
                Call::Update(id, 0.5),
            ],
        );
    }

    #[test]
    fn swapping_renderers_does_not_redirect_open_dialogs() {
        let (engine, provider) = custom_ui_provider();
        let (first, first_calls) = recorder();
        provider.set_custom_renderer(Some(&first));

        let id = engine.show_progress("Job", "Working", false, 0.0, None);
        provider.pump();

        // New renderer installed while the dialog is still open.
        let (second, second_calls) = recorder();
        provider.set_custom_renderer(Some(&second));

        engine.update_progress(id, None, 0.7);
        engine.dismiss_dialog(id);
        provider.pump();

        assert_eq!(
            first_calls.lock().as_slice(),
            &[Call::Progress(id, 0.0), Call::Update(id, 0.7), Call::Cancel(id)],
        );
        assert!(second_calls.lock().is_empty());
    }

    #[test]
    fn stale_progress_update_is_silently_dropped() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        engine.update_progress(DialogId::new(), None, 0.5);
        provider.pump();
        assert!(calls.lock().is_empty());
        assert!(engine.try_recv_response().is_none());
    }

    #[test]
    fn engine_dismiss_voids_pending_response() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_login("Auth", "msg", None, false);
        provider.pump();
        engine.dismiss_dialog(id);
        provider.pump();
        assert_eq!(calls.lock().as_slice(), &[Call::Login(id), Call::Cancel(id)]);

        // The reference is void now — a late answer goes nowhere.
        provider.post_credentials("u", "p", id, false);
        assert!(engine.try_recv_response().is_none());
    }

    #[test]
    fn host_dismiss_resolves_progress_dialog_once() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, _calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_progress("Job", "Working", true, 0.0, Some("Stop"));
        provider.pump();

        provider.dismiss_dialog(id);
        assert!(matches!(
            engine.try_recv_response(),
            Some(DialogResponse::Dismissed { id: rid }) if rid == id,
        ));

        // Idempotent from the host's side.
        provider.dismiss_dialog(id);
        assert!(engine.try_recv_response().is_none());
    }

    #[test]
    fn dropped_renderer_falls_back_to_default_ui() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));
        drop(renderer); // host dropped its only strong reference

        let id = engine.show_question("Q", "?", QuestionType::Critical, None, Some("Ok"), None);
        provider.pump();

        // Default path: renderer never sees it, engine gets a dismissal.
        assert!(calls.lock().is_empty());
        assert!(matches!(
            engine.try_recv_response(),
            Some(DialogResponse::Dismissed { id: rid }) if rid == id,
        ));
    }

    #[test]
    fn unknown_button_code_is_absorbed() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, _calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));

        let id = engine.show_question("Q", "?", QuestionType::Normal, Some("Cancel"), None, None);
        provider.pump();

        provider.post_action(7, id);
        assert!(engine.try_recv_response().is_none());

        // The session is still live — a valid answer still lands.
        provider.post_action(3, id);
        assert!(matches!(
            engine.try_recv_response(),
            Some(DialogResponse::Action { action: DialogAction::Cancel, .. }),
        ));
    }

    #[test]
    fn second_provider_on_same_engine_is_rejected() {
        let engine = Arc::new(MediaEngine::new());
        let first = DialogProvider::new(Some(Arc::clone(&engine)), true).unwrap();
        assert!(matches!(
            DialogProvider::new(Some(Arc::clone(&engine)), true),
            Err(ProviderError::EngineBusy),
        ));

        // Dropping the provider releases the stream for a successor.
        drop(first);
        assert!(DialogProvider::new(Some(engine), true).is_ok());
    }

    #[test]
    fn clearing_the_renderer_restores_default_path() {
        let (engine, provider) = custom_ui_provider();
        let (renderer, calls) = recorder();
        provider.set_custom_renderer(Some(&renderer));
        provider.set_custom_renderer(None);

        engine.show_error("Disk", "Read failure");
        provider.pump();
        assert!(calls.lock().is_empty());
        assert!(engine.try_recv_response().is_none());
    }
}
