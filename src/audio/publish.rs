use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Immutable copy of the smoothed spectrum handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumSnapshot {
    pub values: Arc<[f32]>,
    /// Session frame index that produced this snapshot.
    pub frame: u64,
    /// Stream time at the start of that frame.
    pub position: Duration,
}

impl SpectrumSnapshot {
    pub fn new(values: Vec<f32>, frame: u64) -> Self {
        Self { values: values.into(), frame, position: Duration::ZERO }
    }

    pub fn at(mut self, position: Duration) -> Self {
        self.position = position;
        self
    }

    pub fn zeroed(len: usize) -> Self {
        Self::new(vec![0.0; len], 0)
    }

    pub fn is_silent(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

#[derive(Default)]
struct SlotState {
    pending: Option<SpectrumSnapshot>,
    latest: Option<SpectrumSnapshot>,
    dropped: u64,
    closed: bool,
}

/// Single-slot, latest-value-wins hand-off between the analysis thread and
/// the render loop. Publishing over an unconsumed snapshot replaces it.
#[derive(Default)]
pub struct SpectrumSlot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl SpectrumSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns false once the slot is closed.
    pub fn publish(&self, snapshot: SpectrumSnapshot) -> bool {
        let mut st = self.lock();
        if st.closed {
            return false;
        }
        if st.pending.is_some() {
            st.dropped += 1;
        }
        st.latest = Some(snapshot.clone());
        st.pending = Some(snapshot);
        drop(st);
        self.ready.notify_one();
        true
    }

    /// Takes the unconsumed snapshot, if any.
    pub fn take(&self) -> Option<SpectrumSnapshot> {
        self.lock().pending.take()
    }

    /// Like `take`, but waits up to `timeout` for a publish.
    pub fn wait_take(&self, timeout: Duration) -> Option<SpectrumSnapshot> {
        let st = self.lock();
        let (mut st, _) = self
            .ready
            .wait_timeout_while(st, timeout, |st| st.pending.is_none() && !st.closed)
            .unwrap_or_else(|e| e.into_inner());
        st.pending.take()
    }

    /// Last published snapshot, consumed or not.
    pub fn latest(&self) -> Option<SpectrumSnapshot> {
        self.lock().latest.clone()
    }

    /// Snapshots replaced before anyone took them.
    pub fn dropped(&self) -> u64 {
        self.lock().dropped
    }

    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }
}
