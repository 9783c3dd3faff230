// crates/lantern-core/src/dialog_types.rs
//
// Types that flow across the channel between the engine facade and the
// dialog provider. Hosts that forward dialogs over IPC can serialize these
// as-is — everything derives serde.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque handle correlating a dialog session between engine and renderer.
///
/// Engine-assigned. Unique for the whole validity window of the dialog —
/// a handle is never reused while a response for it is still outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DialogId(Uuid);

impl DialogId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DialogId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First group of the UUID is plenty for log correlation.
        let s = self.0.as_simple().to_string();
        write!(f, "dlg-{}", &s[..8])
    }
}

/// Severity/category of a question dialog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    Normal,
    Warning,
    Critical,
}

/// Dialog-lifecycle events sent from the engine to the provider.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DialogEvent {
    /// Informational. Carries no id — nothing to respond to.
    Error {
        title:   String,
        message: String,
    },
    /// Expects an eventual `DialogResponse::Credentials` (or a dismissal).
    Login {
        id:               DialogId,
        title:            String,
        message:          String,
        /// Pre-filled username if the engine knows one for this context.
        default_username: Option<String>,
        /// Whether secure credential storage is even a possibility here.
        ask_store:        bool,
    },
    /// Expects an eventual `DialogResponse::Action` (or a dismissal).
    Question {
        id:            DialogId,
        title:         String,
        message:       String,
        question_type: QuestionType,
        cancel_label:  Option<String>,
        action1_label: Option<String>,
        action2_label: Option<String>,
    },
    /// Opens a progress dialog. Zero or more `ProgressUpdate`s follow.
    Progress {
        id:            DialogId,
        title:         String,
        message:       String,
        indeterminate: bool,
        /// Initial position in [0, 1]. Clamped at the provider boundary.
        position:      f32,
        /// Present iff the operation is cancellable.
        cancel_label:  Option<String>,
    },
    /// Must correlate to an open progress dialog; stale ids are dropped.
    ProgressUpdate {
        id:       DialogId,
        message:  Option<String>,
        position: f32,
    },
    /// Engine-initiated teardown. Any pending response for `id` becomes void.
    Dismiss {
        id: DialogId,
    },
}

impl DialogEvent {
    /// The dialog reference this event targets, if it carries one.
    pub fn id(&self) -> Option<DialogId> {
        match self {
            DialogEvent::Error { .. } => None,
            DialogEvent::Login { id, .. }
            | DialogEvent::Question { id, .. }
            | DialogEvent::Progress { id, .. }
            | DialogEvent::ProgressUpdate { id, .. }
            | DialogEvent::Dismiss { id } => Some(*id),
        }
    }
}

/// User responses relayed from the provider back to the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum DialogResponse {
    Credentials {
        id:       DialogId,
        username: String,
        password: String,
        /// Ask the engine to store the login securely.
        store:    bool,
    },
    Action {
        id:     DialogId,
        action: DialogAction,
    },
    /// Host-side cancellation of an open dialog.
    Dismissed {
        id: DialogId,
    },
}

impl DialogResponse {
    pub fn id(&self) -> DialogId {
        match self {
            DialogResponse::Credentials { id, .. }
            | DialogResponse::Action { id, .. }
            | DialogResponse::Dismissed { id } => *id,
        }
    }
}

/// Which button answered a question dialog.
///
/// Wire convention: 1 = action 1, 2 = action 2, 3 = cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogAction {
    Action1,
    Action2,
    Cancel,
}

impl DialogAction {
    /// Map a raw button code to an action. Unknown codes yield `None` and
    /// are absorbed as no-ops by the caller.
    pub fn from_button(code: i32) -> Option<Self> {
        match code {
            1 => Some(DialogAction::Action1),
            2 => Some(DialogAction::Action2),
            3 => Some(DialogAction::Cancel),
            _ => None,
        }
    }

    pub fn button_code(self) -> i32 {
        match self {
            DialogAction::Action1 => 1,
            DialogAction::Action2 => 2,
            DialogAction::Cancel => 3,
        }
    }
}
