mod common;

use common::{MemorySource, VecSink};
use spectrum_player::app::player::{Player, SessionEvent, SessionRunner};
use spectrum_player::audio::synth::sine_s16le;
use spectrum_player::audio::{AnalysisConfig, PcmFormat, SpectrumSlot};
use spectrum_player::playback::{PlaybackSession, SessionEnd, SessionError, SinkError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const RATE: u32 = 44100;

fn config() -> AnalysisConfig {
    AnalysisConfig { frame_size: 512, ..AnalysisConfig::default() }
}

/// 4.5 frames of tone: four full frames plus a short tail.
fn tone_source() -> (MemorySource, Vec<u8>) {
    let cfg = config();
    let bytes = sine_s16le(1000.0, RATE, cfg.frame_size * 9 / 2, 0.8);
    let source = MemorySource::new(&bytes, cfg.frame_size * 2, PcmFormat::s16le(1), RATE);
    (source, bytes)
}

#[test]
fn plays_to_end_of_stream() {
    let (source, bytes) = tone_source();
    let sink = VecSink::default();
    let slot = Arc::new(SpectrumSlot::new());
    let stop = AtomicBool::new(false);

    let mut session = PlaybackSession::new(source, sink.clone(), &config(), Arc::clone(&slot)).unwrap();
    assert!(slot.take().unwrap().is_silent());

    assert_eq!(session.run(&stop).unwrap(), SessionEnd::EndOfStream);
    assert_eq!(session.processor().frames_processed(), 5);
    assert_eq!(*sink.written.lock().unwrap(), bytes);
    assert!(*sink.drained.lock().unwrap());

    let last = slot.take().unwrap();
    assert_eq!(last.frame, 4);
    assert!(!last.is_silent());

    drop(session);
    assert!(slot.take().unwrap().is_silent());
}

#[test]
fn step_publishes_each_frame() {
    let (source, _) = tone_source();
    let slot = Arc::new(SpectrumSlot::new());
    let mut session = PlaybackSession::new(source, VecSink::default(), &config(), Arc::clone(&slot)).unwrap();

    let first = session.step().unwrap().unwrap();
    assert_eq!(slot.latest().unwrap(), first);
    let second = session.step().unwrap().unwrap();
    assert_eq!(second.frame, 1);
    assert!(second.position > first.position);
}

#[test]
fn raised_stop_flag_ends_session() {
    let (source, _) = tone_source();
    let sink = VecSink::default();
    let stop = AtomicBool::new(true);
    let mut session = PlaybackSession::new(source, sink.clone(), &config(), Arc::new(SpectrumSlot::new())).unwrap();

    assert_eq!(session.run(&stop).unwrap(), SessionEnd::Stopped);
    assert!(sink.written.lock().unwrap().is_empty());
}

#[test]
fn source_error_is_fatal() {
    let cfg = config();
    let bytes = sine_s16le(1000.0, RATE, cfg.frame_size * 2, 0.8);
    let source = MemorySource::new(&bytes, cfg.frame_size * 2, PcmFormat::s16le(1), RATE).then_fail();
    let slot = Arc::new(SpectrumSlot::new());
    let mut session = PlaybackSession::new(source, VecSink::default(), &cfg, Arc::clone(&slot)).unwrap();

    let err = session.run(&AtomicBool::new(false)).unwrap_err();
    assert!(matches!(err, SessionError::Source(_)));
    drop(session);
    assert!(slot.latest().unwrap().is_silent());
}

#[test]
fn sink_error_is_fatal() {
    let (source, _) = tone_source();
    let sink = VecSink { fail_after: Some(2), ..VecSink::default() };
    let mut session = PlaybackSession::new(source, sink.clone(), &config(), Arc::new(SpectrumSlot::new())).unwrap();

    let err = session.run(&AtomicBool::new(false)).unwrap_err();
    assert!(matches!(err, SessionError::Sink(SinkError::Io(_))));
    assert_eq!(*sink.writes.lock().unwrap(), 2);
}

#[test]
fn invalid_config_rejected_before_playback() {
    let (source, _) = tone_source();
    let sink = VecSink::default();
    let cfg = AnalysisConfig { frame_size: 0, ..config() };
    let err = PlaybackSession::new(source, sink.clone(), &cfg, Arc::new(SpectrumSlot::new())).err();
    assert!(matches!(err, Some(SessionError::Analysis(_))));
    assert_eq!(*sink.writes.lock().unwrap(), 0);
}

/// Runs an in-memory session, or spins until stopped for paths named "loop".
struct FakeRunner {
    runs: AtomicUsize,
}

impl SessionRunner for FakeRunner {
    fn run(&self, path: &Path, slot: Arc<SpectrumSlot>, stop: &AtomicBool) -> Result<SessionEnd, SessionError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if path == Path::new("loop") {
            while !stop.load(Ordering::Relaxed) {
                std::thread::sleep(Duration::from_millis(1));
            }
            return Ok(SessionEnd::Stopped);
        }
        if path == Path::new("broken") {
            return Err(SessionError::Sink(SinkError::Io(std::io::Error::other("no device"))));
        }
        let (source, _) = tone_source();
        let mut session = PlaybackSession::new(source, VecSink::default(), &config(), slot)?;
        session.run(stop)
    }
}

fn wait_for_events(player: &mut Player, count: usize) -> Vec<SessionEvent> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut events = Vec::new();
    while events.len() < count && Instant::now() < deadline {
        events.extend(player.drain_events());
        std::thread::sleep(Duration::from_millis(1));
    }
    events
}

fn fake_player() -> (Player, Arc<FakeRunner>) {
    let runner = Arc::new(FakeRunner { runs: AtomicUsize::new(0) });
    (Player::new(runner.clone()), runner)
}

#[test]
fn player_reports_session_lifecycle() {
    let (mut player, _) = fake_player();
    player.start(Path::new("song.wav"));

    let events = wait_for_events(&mut player, 2);
    assert!(matches!(&events[0], SessionEvent::Started { path, .. } if path == &PathBuf::from("song.wav")));
    assert!(matches!(&events[1], SessionEvent::Ended { end: SessionEnd::EndOfStream, .. }));
    assert!(player.slot().latest().unwrap().is_silent());
}

#[test]
fn player_reports_failures() {
    let (mut player, _) = fake_player();
    player.start(Path::new("broken"));
    let events = wait_for_events(&mut player, 2);
    assert!(matches!(&events[1], SessionEvent::Failed { error, .. } if error.contains("no device")));
}

#[test]
fn swap_stops_the_running_session() {
    let (mut player, runner) = fake_player();
    player.start(Path::new("loop"));
    let first = player.current_id().unwrap();
    assert_eq!(player.current_path(), Some(Path::new("loop")));

    player.swap(Path::new("song.wav"));
    let second = player.current_id().unwrap();
    assert!(second > first);
    assert_eq!(player.current_path(), Some(Path::new("song.wav")));

    // only the replacement session is reported
    let events = wait_for_events(&mut player, 2);
    assert!(events.iter().all(|e| e.id() == second));
    assert!(matches!(
        &events[1],
        SessionEvent::Ended { path, end: SessionEnd::EndOfStream, .. } if path == &PathBuf::from("song.wav")
    ));
    assert_eq!(runner.runs.load(Ordering::SeqCst), 2);
}

#[test]
fn stopped_session_events_are_discarded() {
    let (mut player, _) = fake_player();
    player.start(Path::new("song.wav"));
    while player.is_running() {
        std::thread::sleep(Duration::from_millis(1));
    }
    player.stop();
    assert!(player.drain_events().is_empty());
}

#[test]
fn stop_is_idempotent() {
    let (mut player, _) = fake_player();
    player.stop();
    player.start(Path::new("loop"));
    assert!(player.current_path().is_some());
    player.stop();
    player.stop();
    assert!(player.current_path().is_none());
    assert!(!player.is_running());
}

#[test]
fn dropping_player_closes_slot() {
    let (mut player, _) = fake_player();
    player.start(Path::new("loop"));
    let slot = player.slot();
    drop(player);
    assert!(slot.is_closed());
}
