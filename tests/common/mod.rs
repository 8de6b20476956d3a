#![allow(dead_code)]

use spectrum_player::audio::{AudioFrame, PcmFormat};
use spectrum_player::playback::{AudioSource, FrameRead, PlaybackSink, SinkError, SourceError};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// Serves pre-built PCM bytes in fixed-size frames.
pub struct MemorySource {
    pub format: PcmFormat,
    pub sample_rate: u32,
    frames: VecDeque<Result<Vec<u8>, SourceError>>,
}

impl MemorySource {
    pub fn new(bytes: &[u8], frame_bytes: usize, format: PcmFormat, sample_rate: u32) -> Self {
        let frames = bytes.chunks(frame_bytes).map(|c| Ok(c.to_vec())).collect();
        Self { format, sample_rate, frames }
    }

    /// Fails with a decode error once the given frames are used up.
    pub fn then_fail(mut self) -> Self {
        self.frames.push_back(Err(SourceError::NoAudioTrack));
        self
    }
}

impl AudioSource for MemorySource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn format(&self) -> PcmFormat {
        self.format
    }

    fn next_frame(&mut self) -> Result<FrameRead, SourceError> {
        match self.frames.pop_front() {
            Some(Ok(bytes)) => Ok(FrameRead::Frame(AudioFrame { bytes, sample_rate: self.sample_rate })),
            Some(Err(e)) => Err(e),
            None => Ok(FrameRead::EndOfStream),
        }
    }
}

/// Collects everything written; optionally fails after `fail_after` writes.
#[derive(Clone, Default)]
pub struct VecSink {
    pub written: Arc<Mutex<Vec<u8>>>,
    pub writes: Arc<Mutex<usize>>,
    pub drained: Arc<Mutex<bool>>,
    pub fail_after: Option<usize>,
}

impl PlaybackSink for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        let mut writes = self.writes.lock().unwrap();
        if self.fail_after.is_some_and(|n| *writes >= n) {
            return Err(SinkError::Io(io::Error::new(io::ErrorKind::BrokenPipe, "device gone")));
        }
        *writes += 1;
        self.written.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        *self.drained.lock().unwrap() = true;
        Ok(())
    }
}
