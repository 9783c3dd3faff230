// crates/lantern-media/src/lib.rs
//
// The engine-facing layer: everything that talks to (or stands in for) the
// native media engine. No UI toolkit dependency — the host drains dialog
// events onto its own UI thread via DialogProvider::pump and implements
// DialogRenderer however it likes.
//
// To add a new engine-side capability:
//   1. Create a new module file here
//   2. Add `pub mod mymodule;` below
//   3. Wire it through MediaEngine (emission) and DialogProvider (dispatch)

pub mod engine;
pub mod error;
pub mod provider;
pub mod renderer;
pub mod video;

mod sessions;

// Re-export the main public API so host imports are simple.
pub use engine::MediaEngine;
pub use error::ProviderError;
pub use provider::DialogProvider;
pub use renderer::{DefaultDialogRenderer, DialogRenderer};
pub use video::{VideoFeed, VideoLayer};

// Re-export the boundary types so hosts don't need a direct lantern-core dep.
pub use lantern_core::{DialogAction, DialogEvent, DialogId, DialogResponse, QuestionType};
