use crate::audio::{AnalysisConfig, AnalysisError, SpectrumProcessor, SpectrumSlot, SpectrumSnapshot};
use crate::playback::sink::{PlaybackSink, SinkError};
use crate::playback::source::{AudioSource, FrameRead, SourceError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    EndOfStream,
    Stopped,
}

/// One track being played and analyzed. Owns its source and sink; dropping
/// the session releases both and publishes an all-zero spectrum.
pub struct PlaybackSession<S: AudioSource, K: PlaybackSink> {
    source: S,
    sink: K,
    processor: SpectrumProcessor,
    slot: Arc<SpectrumSlot>,
}

impl<S: AudioSource, K: PlaybackSink> PlaybackSession<S, K> {
    /// Fails fast on a configuration the pipeline cannot run with.
    pub fn new(source: S, sink: K, config: &AnalysisConfig, slot: Arc<SpectrumSlot>) -> Result<Self, SessionError> {
        let processor = SpectrumProcessor::new(config, source.format(), source.sample_rate())?;
        slot.publish(SpectrumSnapshot::zeroed(processor.slots()));
        Ok(Self { source, sink, processor, slot })
    }

    pub fn processor(&self) -> &SpectrumProcessor {
        &self.processor
    }

    /// Reads, analyzes, publishes and plays one frame. `None` at end of stream.
    pub fn step(&mut self) -> Result<Option<SpectrumSnapshot>, SessionError> {
        let frame = match self.source.next_frame()? {
            FrameRead::Frame(frame) => frame,
            FrameRead::EndOfStream => return Ok(None),
        };
        let snapshot = self.processor.process_frame(&frame.bytes);
        self.slot.publish(snapshot.clone());
        self.sink.write(&frame.bytes)?;
        Ok(Some(snapshot))
    }

    /// Runs until end of stream, an error, or `stop` being raised.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<SessionEnd, SessionError> {
        loop {
            if stop.load(Ordering::Relaxed) {
                return Ok(SessionEnd::Stopped);
            }
            if self.step()?.is_none() {
                self.sink.drain()?;
                return Ok(SessionEnd::EndOfStream);
            }
        }
    }
}

impl<S: AudioSource, K: PlaybackSink> Drop for PlaybackSession<S, K> {
    fn drop(&mut self) {
        log::debug!(
            "session released after {} frames ({} snapshots superseded)",
            self.processor.frames_processed(),
            self.slot.dropped()
        );
        self.processor.reset();
        self.slot.publish(SpectrumSnapshot::zeroed(self.processor.slots()));
    }
}
