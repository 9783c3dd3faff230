// crates/lantern-core/src/session.rs
//
// Per-dialog state machine:
//
//   Opened → { AwaitingResponse | InProgress } → { Responded | Cancelled }
//
// The two right-hand states are terminal. Every transition helper returns
// whether it took effect, so the relay path can fail soft (ignore + log)
// on stale references instead of crashing — the boundary declares no error
// return path for relay calls.

use serde::{Deserialize, Serialize};

/// What kind of dialog a session was opened for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogKind {
    Login,
    Question,
    Progress,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialogState {
    /// Login/question dialog shown, waiting for the user.
    AwaitingResponse,
    /// Progress dialog shown, accepting updates.
    InProgress,
    /// The user (or default UI) answered. Terminal.
    Responded,
    /// Torn down by either side before a response. Terminal.
    Cancelled,
}

impl DialogState {
    /// The state a freshly opened dialog of `kind` starts in.
    pub fn opened(kind: DialogKind) -> Self {
        match kind {
            DialogKind::Login | DialogKind::Question => DialogState::AwaitingResponse,
            DialogKind::Progress => DialogState::InProgress,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DialogState::Responded | DialogState::Cancelled)
    }

    /// A progress update is only valid while the dialog is in progress.
    pub fn accepts_update(self) -> bool {
        self == DialogState::InProgress
    }

    /// Try to move to `Responded`. Returns false from a terminal state —
    /// exactly one terminal transition happens per dialog.
    pub fn respond(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self = DialogState::Responded;
        true
    }

    /// Try to move to `Cancelled`. Idempotent from the caller's point of
    /// view: cancelling an already-terminal dialog is a safe no-op.
    pub fn cancel(&mut self) -> bool {
        if self.is_terminal() {
            return false;
        }
        *self = DialogState::Cancelled;
        true
    }
}

/// Clamp a progress position into [0, 1]. NaN clamps to 0.0.
pub fn clamp_position(position: f32) -> f32 {
    if position.is_nan() {
        return 0.0;
    }
    position.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opened_state_depends_on_kind() {
        assert_eq!(DialogState::opened(DialogKind::Login), DialogState::AwaitingResponse);
        assert_eq!(DialogState::opened(DialogKind::Question), DialogState::AwaitingResponse);
        assert_eq!(DialogState::opened(DialogKind::Progress), DialogState::InProgress);
    }

    #[test]
    fn exactly_one_terminal_transition() {
        let mut s = DialogState::AwaitingResponse;
        assert!(s.respond());
        assert!(!s.respond());
        assert!(!s.cancel());
        assert_eq!(s, DialogState::Responded);
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut s = DialogState::InProgress;
        assert!(s.cancel());
        assert!(!s.cancel());
        assert_eq!(s, DialogState::Cancelled);
    }

    #[test]
    fn cancel_beats_late_response() {
        let mut s = DialogState::AwaitingResponse;
        assert!(s.cancel());
        assert!(!s.respond());
        assert_eq!(s, DialogState::Cancelled);
    }

    #[test]
    fn updates_only_while_in_progress() {
        assert!(DialogState::InProgress.accepts_update());
        assert!(!DialogState::AwaitingResponse.accepts_update());
        assert!(!DialogState::Responded.accepts_update());
        assert!(!DialogState::Cancelled.accepts_update());
    }

    #[test]
    fn position_clamps_both_directions() {
        assert_eq!(clamp_position(1.5), 1.0);
        assert_eq!(clamp_position(-0.2), 0.0);
        assert_eq!(clamp_position(0.42), 0.42);
        assert_eq!(clamp_position(f32::NAN), 0.0);
    }
}
