use crate::audio::{AnalysisConfig, SpectrumSlot};
use crate::playback::{AudioSource, FileSource, PlaybackSession, RodioSink, SessionEnd, SessionError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Opens and runs one session to completion on the calling thread.
pub trait SessionRunner: Send + Sync + 'static {
    fn run(&self, path: &Path, slot: Arc<SpectrumSlot>, stop: &AtomicBool) -> Result<SessionEnd, SessionError>;
}

/// Decodes files with Symphonia and plays them on the default device.
pub struct DeviceRunner {
    config: AnalysisConfig,
}

impl DeviceRunner {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }
}

impl SessionRunner for DeviceRunner {
    fn run(&self, path: &Path, slot: Arc<SpectrumSlot>, stop: &AtomicBool) -> Result<SessionEnd, SessionError> {
        let source = FileSource::open(path, self.config.frame_size)?;
        let sink = RodioSink::open(source.format(), source.sample_rate())?;
        let mut session = PlaybackSession::new(source, sink, &self.config, slot)?;
        session.run(stop)
    }
}

/// Worker reports. `id` names the session that sent it; ids grow with every
/// `start`.
#[derive(Debug)]
pub enum SessionEvent {
    Started { id: u64, path: PathBuf },
    Ended { id: u64, path: PathBuf, end: SessionEnd },
    Failed { id: u64, path: PathBuf, error: String },
}

impl SessionEvent {
    pub fn id(&self) -> u64 {
        match self {
            SessionEvent::Started { id, .. } | SessionEvent::Ended { id, .. } | SessionEvent::Failed { id, .. } => *id,
        }
    }
}

struct ActiveSession {
    id: u64,
    path: PathBuf,
    stop: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

/// Session control for the host: start, stop and swap tracks. At most one
/// session runs at a time, on its own worker thread.
pub struct Player {
    runner: Arc<dyn SessionRunner>,
    slot: Arc<SpectrumSlot>,
    active: Option<ActiveSession>,
    next_id: u64,
    events_tx: Sender<SessionEvent>,
    events_rx: Receiver<SessionEvent>,
}

impl Player {
    pub fn new(runner: Arc<dyn SessionRunner>) -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            runner,
            slot: Arc::new(SpectrumSlot::new()),
            active: None,
            next_id: 0,
            events_tx,
            events_rx,
        }
    }

    /// Slot the render loop drains.
    pub fn slot(&self) -> Arc<SpectrumSlot> {
        Arc::clone(&self.slot)
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }

    /// Id of the current session, if one was started and not stopped.
    pub fn current_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|a| !a.handle.is_finished())
    }

    /// Starts `path`, stopping whatever was playing first.
    pub fn start(&mut self, path: &Path) {
        self.stop();

        self.next_id += 1;
        let id = self.next_id;
        let path = path.to_path_buf();
        let stop = Arc::new(AtomicBool::new(false));
        let runner = Arc::clone(&self.runner);
        let slot = Arc::clone(&self.slot);
        let tx = self.events_tx.clone();
        let worker_stop = Arc::clone(&stop);
        let worker_path = path.clone();

        log::info!("starting session {id}: {}", path.display());
        let handle = thread::spawn(move || {
            let _ = tx.send(SessionEvent::Started { id, path: worker_path.clone() });
            let event = match runner.run(&worker_path, slot, &worker_stop) {
                Ok(end) => {
                    log::info!("session ended ({end:?}): {}", worker_path.display());
                    SessionEvent::Ended { id, path: worker_path, end }
                }
                Err(e) => {
                    log::warn!("session failed: {}: {e}", worker_path.display());
                    SessionEvent::Failed { id, path: worker_path, error: e.to_string() }
                }
            };
            let _ = tx.send(event);
        });

        self.active = Some(ActiveSession { id, path, stop, handle });
    }

    /// Stops the running session and waits for it to release its resources.
    pub fn stop(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        active.stop.store(true, Ordering::Relaxed);
        if active.handle.join().is_err() {
            log::warn!("session thread panicked: {}", active.path.display());
        }
    }

    /// Replaces the running session with a new one for `path`.
    pub fn swap(&mut self, path: &Path) {
        self.start(path);
    }

    /// Pending events of the current session. Events from sessions that
    /// were stopped or replaced are discarded.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        let current = self.current_id();
        let mut out = Vec::new();
        loop {
            match self.events_rx.try_recv() {
                Ok(ev) if Some(ev.id()) == current => out.push(ev),
                Ok(ev) => log::debug!("dropping event of stale session {}", ev.id()),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.stop();
        self.slot.close();
    }
}
