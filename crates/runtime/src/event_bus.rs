/// Ordered event queue stamped with a monotonically increasing sequence.
///
/// Producers push during an event-handling turn; consumers drain afterwards.
/// Everything happens on one logical thread, so no locking is involved.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    pub seq: u64,
    pub payload: E,
}

#[derive(Debug)]
pub struct EventBus<E> {
    next_seq: u64,
    events: Vec<Event<E>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            events: Vec::new(),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, payload: E) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event { seq, payload });
        seq
    }

    pub fn events(&self) -> &[Event<E>] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<E>> {
        std::mem::take(&mut self.events)
    }
}

/// Integration seam between the gallery / display-list UI and the layer
/// manager.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSignal {
    /// A gallery card was chosen; `url` is the dataset's items endpoint or
    /// tileset manifest.
    Selected { url: String },
    Opacity { dataset_id: String, opacity: u8 },
}
