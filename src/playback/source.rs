use crate::audio::{AudioFrame, PcmFormat};
use std::fs::File;
use std::path::Path;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to open audio file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported or corrupt audio: {0}")]
    Decode(#[from] SymphoniaError),
    #[error("no audio track found")]
    NoAudioTrack,
    #[error("unknown sample rate")]
    UnknownSampleRate,
}

#[derive(Debug)]
pub enum FrameRead {
    Frame(AudioFrame),
    EndOfStream,
}

/// Supplies raw PCM frames. A frame may be shorter than requested only at
/// the end of the stream.
pub trait AudioSource {
    fn sample_rate(&self) -> u32;
    fn format(&self) -> PcmFormat;
    fn next_frame(&mut self) -> Result<FrameRead, SourceError>;
}

/// Streams a compressed file as interleaved 16-bit PCM frames.
pub struct FileSource {
    format: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    pcm: PcmFormat,
    frame_bytes: usize,

    sample_buf: Option<SampleBuffer<i16>>,
    pending: Vec<u8>,
    finished: bool,
}

impl FileSource {
    /// `frame_samples` is the number of samples per channel in one frame.
    pub fn open(path: &Path, frame_samples: usize) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe().format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )?;
        let format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(SourceError::NoAudioTrack)?;
        let track_id = track.id;
        let sample_rate = track.codec_params.sample_rate.ok_or(SourceError::UnknownSampleRate)?;
        let channels = track.codec_params.channels.map(|c| c.count() as u16).unwrap_or(2);
        let decoder = symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

        let pcm = PcmFormat::s16le(channels);
        log::info!("opened {}: {sample_rate} Hz, {channels} ch", path.display());

        Ok(Self {
            format,
            decoder,
            track_id,
            sample_rate,
            pcm,
            frame_bytes: pcm.frame_bytes(frame_samples.max(1)),
            sample_buf: None,
            pending: Vec::new(),
            finished: false,
        })
    }

    /// Decodes one more packet into `pending`. Returns false at end of stream.
    fn fill(&mut self) -> Result<bool, SourceError> {
        loop {
            let packet = match self.format.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => {
                    log::debug!("decoder reset required");
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(msg)) => {
                    // a damaged packet is recoverable: skip it
                    log::warn!("skipping undecodable packet: {msg}");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            if decoded.spec().channels.count() != self.pcm.channels as usize {
                log::warn!(
                    "packet has {} channels, stream has {}; dropping",
                    decoded.spec().channels.count(),
                    self.pcm.channels
                );
                continue;
            }

            let buf = self.sample_buf.get_or_insert_with(|| {
                SampleBuffer::new(decoded.capacity() as u64, *decoded.spec())
            });
            if buf.capacity() < decoded.capacity() * decoded.spec().channels.count() {
                *buf = SampleBuffer::new(decoded.capacity() as u64, *decoded.spec());
            }
            buf.copy_interleaved_ref(decoded);
            self.pending.extend(buf.samples().iter().flat_map(|s| s.to_le_bytes()));
            return Ok(true);
        }
    }
}

impl AudioSource for FileSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn format(&self) -> PcmFormat {
        self.pcm
    }

    fn next_frame(&mut self) -> Result<FrameRead, SourceError> {
        while !self.finished && self.pending.len() < self.frame_bytes {
            if !self.fill()? {
                self.finished = true;
            }
        }
        if self.pending.is_empty() {
            return Ok(FrameRead::EndOfStream);
        }

        let take = self.frame_bytes.min(self.pending.len());
        let bytes: Vec<u8> = self.pending.drain(..take).collect();
        Ok(FrameRead::Frame(AudioFrame { bytes, sample_rate: self.sample_rate }))
    }
}
