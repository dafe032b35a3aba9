use std::sync::Arc;

use crate::overlay::Overlay;

/// Write surface of the host rendering engine.
///
/// The engine diffs by overlay id; an overlay whose `Arc` is unchanged
/// between calls is untouched.
pub trait RenderEngine {
    fn set_overlays(&mut self, overlays: &[Arc<Overlay>]);
}

/// Keeps every overlay list it was handed, newest last.
#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub frames: Vec<Vec<Arc<Overlay>>>,
}

impl RecordingEngine {
    pub fn current(&self) -> &[Arc<Overlay>] {
        self.frames.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn current_ids(&self) -> Vec<&str> {
        self.current().iter().map(|o| o.id()).collect()
    }
}

impl RenderEngine for RecordingEngine {
    fn set_overlays(&mut self, overlays: &[Arc<Overlay>]) {
        self.frames.push(overlays.to_vec());
    }
}
