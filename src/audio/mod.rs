//! Spectrum analysis: PCM bytes in, smoothed band values out.

pub mod bands;
pub mod fft;
pub mod pcm;
pub mod publish;
pub mod smoother;
pub mod spectrum;
pub mod synth;
pub mod window;

pub use bands::{BandTable, FrequencyBand, FrequencyBander};
pub use pcm::{AudioFrame, PcmFormat, SampleEncoding, SampleNormalizer};
pub use publish::{SpectrumSlot, SpectrumSnapshot};
pub use smoother::{AttackPolicy, PeakFalloff};
pub use spectrum::{AnalysisConfig, SpectrumProcessor};
pub use window::{Window, WindowKind};

/// Invalid analysis configuration. Raised when a session is set up, never
/// while frames are processed.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("frame size must be non-zero")]
    ZeroFrameSize,
    #[error("sample rate must be non-zero")]
    ZeroSampleRate,
    #[error("channel count must be non-zero")]
    ZeroChannels,
    #[error("invalid band table: {0}")]
    InvalidBandTable(String),
    #[error("invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
}
