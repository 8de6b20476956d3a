use crate::audio::pcm::to_f32_interleaved;
use crate::audio::PcmFormat;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, Sink};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("no output device: {0}")]
    Device(#[from] rodio::StreamError),
    #[error("cannot play on output device: {0}")]
    Play(#[from] rodio::PlayError),
    #[error("playback write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives raw frames for playback. `write` may block until the device has
/// room, which is what paces the analysis loop.
pub trait PlaybackSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError>;

    /// Blocks until everything written so far has been played.
    fn drain(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Plays frames on the default output device.
///
/// Not `Send`: the output stream has to live on the thread that created it.
pub struct RodioSink {
    _stream: OutputStream,
    sink: Sink,
    format: PcmFormat,
    sample_rate: u32,
    max_queued: usize,
}

impl RodioSink {
    pub fn open(format: PcmFormat, sample_rate: u32) -> Result<Self, SinkError> {
        let (_stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;
        Ok(Self { _stream, sink, format, sample_rate, max_queued: 4 })
    }
}

impl PlaybackSink for RodioSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        // keep only a few frames queued so analysis stays close to what is heard
        while self.sink.len() >= self.max_queued {
            std::thread::sleep(Duration::from_millis(2));
        }
        let samples = to_f32_interleaved(self.format.encoding, bytes);
        self.sink.append(SamplesBuffer::new(self.format.channels, self.sample_rate, samples));
        Ok(())
    }

    fn drain(&mut self) -> Result<(), SinkError> {
        self.sink.sleep_until_end();
        Ok(())
    }
}

impl Drop for RodioSink {
    fn drop(&mut self) {
        self.sink.stop();
    }
}
