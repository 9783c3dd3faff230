// crates/lantern-media/src/video.rs
//
// VideoLayer: a compositable rendering surface handle. The host's compositor
// holds one side (scaling flag, presence query); the engine holds the other
// (VideoFeed, the only writer of the presence flag). Pixel production itself
// lives in the engine — the layer is just the two flags the host can see.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

struct LayerCore {
    /// True while the engine has an active decoded video feed bound here.
    has_video:   AtomicBool,
    /// True = scale to fill (crop); false = letterbox. Host-written.
    fill_screen: AtomicBool,
}

/// Host-side handle. Clones share the same underlying surface state.
#[derive(Clone)]
pub struct VideoLayer {
    core: Arc<LayerCore>,
}

impl VideoLayer {
    pub fn new() -> Self {
        Self {
            core: Arc::new(LayerCore {
                has_video:   AtomicBool::new(false),
                fill_screen: AtomicBool::new(false),
            }),
        }
    }

    /// Whether the engine currently has video bound to this surface.
    /// Purely observational — reading never changes anything.
    pub fn has_video(&self) -> bool {
        self.core.has_video.load(Ordering::Relaxed)
    }

    pub fn fill_screen(&self) -> bool {
        self.core.fill_screen.load(Ordering::Relaxed)
    }

    /// Toggle fill (crop) vs. letterbox. Takes effect on the next composited
    /// frame — the compositor reads the flag per frame, nothing redraws here.
    pub fn set_fill_screen(&self, fill: bool) {
        self.core.fill_screen.store(fill, Ordering::Relaxed);
    }

    /// Engine-side writer handle. Obtained by the engine (or its glue) when
    /// the layer is attached; the feed is the only path that flips has_video.
    pub fn feed(&self) -> VideoFeed {
        VideoFeed { core: Arc::clone(&self.core) }
    }
}

impl Default for VideoLayer {
    fn default() -> Self {
        Self::new()
    }
}

/// The engine's end of a VideoLayer.
#[derive(Clone)]
pub struct VideoFeed {
    core: Arc<LayerCore>,
}

impl VideoFeed {
    pub fn set_active(&self, active: bool) {
        self.core.has_video.store(active, Ordering::Relaxed);
    }
}
