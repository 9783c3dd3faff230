// crates/lantern-core/src/lib.rs
//
// Plain data that crosses the engine/host boundary — no channels, no locks,
// no engine handles. Everything here is cheap to clone and serde-friendly.
//
// To add a new dialog kind:
//   1. Add a variant to DialogEvent (and DialogResponse if it answers back)
//   2. Add a method to the DialogRenderer trait in lantern-media
//   3. Handle it in DialogProvider::pump

pub mod dialog_types;
pub mod session;

// Re-export the boundary types so lantern-media imports stay flat.
pub use dialog_types::{DialogAction, DialogEvent, DialogId, DialogResponse, QuestionType};
pub use session::{clamp_position, DialogKind, DialogState};
