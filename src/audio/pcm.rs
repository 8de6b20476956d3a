use serde::{Deserialize, Serialize};

/// Sample layout of raw frame bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    U8,
    S16Le,
    F32Le,
}

impl SampleEncoding {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleEncoding::U8 => 1,
            SampleEncoding::S16Le => 2,
            SampleEncoding::F32Le => 4,
        }
    }

    fn decode(self, raw: &[u8]) -> f32 {
        match self {
            SampleEncoding::U8 => (raw[0] as f32 - 128.0) / 128.0,
            SampleEncoding::S16Le => i16::from_le_bytes([raw[0], raw[1]]) as f32 / 32768.0,
            SampleEncoding::F32Le => {
                let v = f32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
                if v.is_finite() {
                    v.clamp(-1.0, 1.0)
                } else {
                    0.0
                }
            }
        }
    }
}

/// Decodes every sample of `bytes`, keeping channel interleaving. Used on
/// the playback side, where the device wants all channels.
pub fn to_f32_interleaved(encoding: SampleEncoding, bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(encoding.bytes_per_sample())
        .map(|raw| encoding.decode(raw))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub encoding: SampleEncoding,
    pub channels: u16,
}

impl PcmFormat {
    pub fn s16le(channels: u16) -> Self {
        Self { encoding: SampleEncoding::S16Le, channels }
    }

    /// Size of one interleaved group (one sample per channel).
    pub fn bytes_per_frame(&self) -> usize {
        self.encoding.bytes_per_sample() * self.channels.max(1) as usize
    }

    /// Bytes needed to carry `samples` mono analysis samples.
    pub fn frame_bytes(&self, samples: usize) -> usize {
        samples * self.bytes_per_frame()
    }
}

/// One block of raw bytes handed over by a source, plus the stream rate.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    pub bytes: Vec<u8>,
    pub sample_rate: u32,
}

/// Turns interleaved PCM bytes into mono floats of a fixed length.
#[derive(Debug, Clone)]
pub struct SampleNormalizer {
    format: PcmFormat,
    len: usize,
}

impl SampleNormalizer {
    pub fn new(format: PcmFormat, len: usize) -> Self {
        Self { format, len }
    }

    pub fn format(&self) -> PcmFormat {
        self.format
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fills `out` with exactly `len` samples. Missing samples are silence,
    /// extra bytes past the frame and trailing partial samples are ignored.
    pub fn normalize_into(&self, bytes: &[u8], out: &mut Vec<f32>) {
        out.clear();
        out.resize(self.len, 0.0);

        let width = self.format.encoding.bytes_per_sample();
        let channels = self.format.channels.max(1) as usize;
        let group = width * channels;

        for (slot, chunk) in out.iter_mut().zip(bytes.chunks(group)) {
            let mut sum = 0.0;
            for ch in 0..channels {
                // partial trailing group: absent channels count as silence
                if let Some(raw) = chunk.get(ch * width..(ch + 1) * width) {
                    sum += self.format.encoding.decode(raw);
                }
            }
            *slot = sum / channels as f32;
        }
    }

    pub fn normalize(&self, bytes: &[u8]) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len);
        self.normalize_into(bytes, &mut out);
        out
    }
}
