use crate::audio::bands::{BandTable, FrequencyBand, FrequencyBander};
use crate::audio::fft::{magnitudes_into, FftEngine};
use crate::audio::pcm::{PcmFormat, SampleNormalizer};
use crate::audio::publish::SpectrumSnapshot;
use crate::audio::smoother::{AttackPolicy, PeakFalloff};
use crate::audio::window::{Window, WindowKind};
use crate::audio::AnalysisError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables of the analysis pipeline. Fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Mono samples per analysis frame (transform length).
    pub frame_size: usize,
    pub window: WindowKind,
    pub attack: AttackPolicy,
    pub falloff_step: f32,
    pub max_column_width: f32,
    /// Magnitudes are divided by this before clamping.
    pub magnitude_scale: f32,
    /// Slots kept in raw bin mode (single-band table).
    pub raw_bin_count: usize,

    // log-spaced table, used when `bands` is empty
    pub band_count: usize,
    pub min_hz: f32,
    pub max_hz: f32,

    pub bands: Vec<[f32; 2]>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            window: WindowKind::Blackman,
            attack: AttackPolicy::Average,
            falloff_step: 0.9,
            max_column_width: 40.0,
            magnitude_scale: 4.0,
            raw_bin_count: 15,
            band_count: 24,
            min_hz: 20.0,
            max_hz: 16000.0,
            bands: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn band_table(&self) -> Result<BandTable, AnalysisError> {
        if self.bands.is_empty() {
            BandTable::log_spaced(self.band_count, self.min_hz, self.max_hz)
        } else {
            BandTable::new(self.bands.iter().map(|&[lo, hi]| FrequencyBand::new(lo, hi)).collect())
        }
    }

    /// Checks the tunables and the band table without building a pipeline.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.frame_size == 0 {
            return Err(AnalysisError::ZeroFrameSize);
        }
        if !(self.falloff_step.is_finite() && self.falloff_step >= 0.0) {
            return Err(AnalysisError::InvalidParameter { name: "falloff_step", value: self.falloff_step });
        }
        if !(self.max_column_width.is_finite() && self.max_column_width > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "max_column_width",
                value: self.max_column_width,
            });
        }
        if !(self.magnitude_scale.is_finite() && self.magnitude_scale > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "magnitude_scale",
                value: self.magnitude_scale,
            });
        }
        self.band_table().map(|_| ())
    }
}

/// The full per-frame pipeline: normalize, window, transform, magnitudes,
/// banding, smoothing. Owns the session's spectrum state.
pub struct SpectrumProcessor {
    sample_rate: u32,
    normalizer: SampleNormalizer,
    window: Window,
    fft: FftEngine,
    bander: FrequencyBander,
    smooth: PeakFalloff,

    samples: Vec<f32>,
    mags: Vec<f32>,
    banded: Vec<f32>,
    frames: u64,
}

impl SpectrumProcessor {
    pub fn new(config: &AnalysisConfig, format: PcmFormat, sample_rate: u32) -> Result<Self, AnalysisError> {
        config.validate()?;
        if sample_rate == 0 {
            return Err(AnalysisError::ZeroSampleRate);
        }
        if format.channels == 0 {
            return Err(AnalysisError::ZeroChannels);
        }

        let n = config.frame_size;
        let table = config.band_table()?;
        let bander = FrequencyBander::new(&table, n, sample_rate, config.raw_bin_count, config.magnitude_scale)?;
        let smooth = PeakFalloff::new(bander.slots(), config.attack, config.falloff_step, config.max_column_width);

        log::debug!(
            "spectrum processor: n={n} rate={sample_rate} slots={} window={:?} attack={:?}",
            bander.slots(),
            config.window,
            config.attack
        );

        Ok(Self {
            sample_rate,
            normalizer: SampleNormalizer::new(format, n),
            window: Window::new(config.window, n),
            fft: FftEngine::new(n),
            bander,
            smooth,
            samples: Vec::with_capacity(n),
            mags: Vec::with_capacity(n / 2 + 1),
            banded: Vec::new(),
            frames: 0,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn format(&self) -> PcmFormat {
        self.normalizer.format()
    }

    pub fn frame_size(&self) -> usize {
        self.fft.fft_size()
    }

    /// Raw bytes expected per frame for this format.
    pub fn frame_bytes(&self) -> usize {
        self.normalizer.format().frame_bytes(self.frame_size())
    }

    /// Number of display slots (bands or raw bins).
    pub fn slots(&self) -> usize {
        self.bander.slots()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    /// Stream time covered by `frames` analysis frames.
    pub fn elapsed(&self, frames: u64) -> Duration {
        let samples = frames as f64 * self.frame_size() as f64;
        Duration::from_secs_f64(samples / self.sample_rate as f64)
    }

    /// Raw banded values of the last frame, before smoothing.
    pub fn last_banded(&self) -> &[f32] {
        &self.banded
    }

    pub fn process_frame(&mut self, bytes: &[u8]) -> SpectrumSnapshot {
        self.normalizer.normalize_into(bytes, &mut self.samples);
        self.window.apply(&mut self.samples);
        magnitudes_into(self.fft.transform(&self.samples), &mut self.mags);
        self.bander.aggregate_into(&self.mags, &mut self.banded);
        let values = self.smooth.apply(&self.banded).to_vec();

        let snapshot = SpectrumSnapshot::new(values, self.frames).at(self.elapsed(self.frames));
        self.frames += 1;
        snapshot
    }

    /// Zeroes the spectrum state and the frame counter.
    pub fn reset(&mut self) {
        self.smooth.reset();
        self.banded.iter_mut().for_each(|v| *v = 0.0);
        self.frames = 0;
    }

    pub fn snapshot(&self) -> SpectrumSnapshot {
        SpectrumSnapshot::new(self.smooth.state().to_vec(), self.frames.saturating_sub(1))
    }
}
