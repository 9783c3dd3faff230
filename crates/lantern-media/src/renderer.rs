// crates/lantern-media/src/renderer.rs
//
// The capability a host implements to draw its own dialogs. All six methods
// are invoked on whichever thread calls DialogProvider::pump — pump from your
// UI-owning context and no further marshaling is needed.

use lantern_core::{DialogId, QuestionType};
use tracing::{debug, error, info};

/// Custom dialog renderer capability.
///
/// For login, question and cancellable progress dialogs, answer back through
/// `DialogProvider::post_credentials` / `post_action` / `dismiss_dialog`
/// with the `DialogId` handed to the show call. A dialog id is valid until
/// the first response or until `cancel_dialog` is delivered for it.
pub trait DialogRenderer: Send + Sync {
    /// Informational error. Nothing to respond to.
    fn show_error(&self, title: &str, message: &str);

    /// `ask_store` is true when secure credential storage is a possibility,
    /// i.e. the "remember me" checkbox should be offered at all.
    fn show_login(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        default_username: Option<&str>,
        ask_store: bool,
    );

    /// Up to two actions plus cancel. A `None` label means the corresponding
    /// button is absent for this question.
    fn show_question(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        question_type: QuestionType,
        cancel_label: Option<&str>,
        action1_label: Option<&str>,
        action2_label: Option<&str>,
    );

    /// `cancel_label` is present iff the operation is cancellable.
    /// `position` is already clamped into [0, 1].
    fn show_progress(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        indeterminate: bool,
        position: f32,
        cancel_label: Option<&str>,
    );

    /// Only delivered while the progress dialog opened under `id` is open.
    fn update_progress(&self, id: DialogId, message: Option<&str>, position: f32);

    /// The engine tore the dialog down. Any pending response for `id` is void.
    fn cancel_dialog(&self, id: DialogId);
}

/// Built-in fallback renderer: structured log output, no interaction.
///
/// Selected whenever no live custom renderer applies (custom UI off, none
/// installed, or the host dropped its renderer). The provider dismisses
/// login/question dialogs on the engine's behalf right after showing them
/// here, so a headless host never leaves the engine waiting.
pub struct DefaultDialogRenderer;

impl DialogRenderer for DefaultDialogRenderer {
    fn show_error(&self, title: &str, message: &str) {
        error!(target: "lantern::dialog", title, message, "engine error dialog");
    }

    fn show_login(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        default_username: Option<&str>,
        _ask_store: bool,
    ) {
        info!(
            target: "lantern::dialog",
            %id, title, message, ?default_username,
            "login dialog (no renderer installed, dismissing)",
        );
    }

    fn show_question(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        question_type: QuestionType,
        _cancel_label: Option<&str>,
        _action1_label: Option<&str>,
        _action2_label: Option<&str>,
    ) {
        info!(
            target: "lantern::dialog",
            %id, title, message, ?question_type,
            "question dialog (no renderer installed, dismissing)",
        );
    }

    fn show_progress(
        &self,
        id: DialogId,
        title: &str,
        message: &str,
        indeterminate: bool,
        position: f32,
        _cancel_label: Option<&str>,
    ) {
        info!(
            target: "lantern::dialog",
            %id, title, message, indeterminate, position,
            "progress dialog",
        );
    }

    fn update_progress(&self, id: DialogId, message: Option<&str>, position: f32) {
        debug!(target: "lantern::dialog", %id, ?message, position, "progress update");
    }

    fn cancel_dialog(&self, id: DialogId) {
        debug!(target: "lantern::dialog", %id, "dialog dismissed by engine");
    }
}
