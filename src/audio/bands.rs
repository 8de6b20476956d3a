use crate::audio::AnalysisError;

/// Frequency range `(min_hz, max_hz]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub min_hz: f32,
    pub max_hz: f32,
}

impl FrequencyBand {
    pub const fn new(min_hz: f32, max_hz: f32) -> Self {
        Self { min_hz, max_hz }
    }

    pub fn contains(&self, hz: f32) -> bool {
        hz > self.min_hz && hz <= self.max_hz
    }
}

/// Ordered, disjoint band table. Validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BandTable {
    bands: Vec<FrequencyBand>,
}

impl BandTable {
    pub fn new(bands: Vec<FrequencyBand>) -> Result<Self, AnalysisError> {
        if bands.is_empty() {
            return Err(AnalysisError::InvalidBandTable("table is empty".into()));
        }
        for (i, b) in bands.iter().enumerate() {
            if !b.min_hz.is_finite() || !b.max_hz.is_finite() || b.min_hz < 0.0 || b.min_hz >= b.max_hz {
                return Err(AnalysisError::InvalidBandTable(format!(
                    "band {i} has invalid range ({}, {}]",
                    b.min_hz, b.max_hz
                )));
            }
            if i > 0 && b.min_hz < bands[i - 1].max_hz {
                return Err(AnalysisError::InvalidBandTable(format!(
                    "band {i} overlaps or precedes band {}",
                    i - 1
                )));
            }
        }
        Ok(Self { bands })
    }

    /// `count` logarithmically spaced bands covering `(min_hz, max_hz]`.
    pub fn log_spaced(count: usize, min_hz: f32, max_hz: f32) -> Result<Self, AnalysisError> {
        if count == 0 || !(min_hz > 0.0) || !(max_hz > min_hz) {
            return Err(AnalysisError::InvalidBandTable(format!(
                "cannot space {count} bands over ({min_hz}, {max_hz}]"
            )));
        }
        let log_min = min_hz.ln();
        let log_max = max_hz.ln();
        let edge = |i: usize| {
            if i == count {
                max_hz
            } else {
                (log_min + (log_max - log_min) * i as f32 / count as f32).exp()
            }
        };
        let bands = (0..count).map(|i| FrequencyBand::new(edge(i), edge(i + 1))).collect();
        Self::new(bands)
    }

    pub fn bands(&self) -> &[FrequencyBand] {
        &self.bands
    }

    pub fn len(&self) -> usize {
        self.bands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Index of the band containing `hz`, if any.
    pub fn locate(&self, hz: f32) -> Option<usize> {
        // first band whose max is >= hz, then check its lower edge
        let idx = self.bands.partition_point(|b| b.max_hz < hz);
        self.bands.get(idx).filter(|b| b.contains(hz)).map(|_| idx)
    }
}

/// Aggregates per-bin magnitudes into display slots.
///
/// With more than one band every slot is a band and receives the loudest bin
/// falling into it. A single-band table switches to raw mode: each bin inside
/// the band gets its own slot, truncated to `raw_bin_count`.
#[derive(Debug, Clone)]
pub struct FrequencyBander {
    slot_of_bin: Vec<Option<usize>>,
    slots: usize,
    magnitude_scale: f32,
}

impl FrequencyBander {
    pub fn new(
        table: &BandTable,
        fft_size: usize,
        sample_rate: u32,
        raw_bin_count: usize,
        magnitude_scale: f32,
    ) -> Result<Self, AnalysisError> {
        if fft_size == 0 {
            return Err(AnalysisError::ZeroFrameSize);
        }
        if sample_rate == 0 {
            return Err(AnalysisError::ZeroSampleRate);
        }
        if !(magnitude_scale.is_finite() && magnitude_scale > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "magnitude_scale",
                value: magnitude_scale,
            });
        }

        let usable = fft_size / 2 + 1;
        let freq = |bin: usize| bin as f32 * sample_rate as f32 / fft_size as f32;

        let (slot_of_bin, slots) = if table.len() == 1 {
            if raw_bin_count == 0 {
                return Err(AnalysisError::InvalidParameter { name: "raw_bin_count", value: 0.0 });
            }
            let band = table.bands()[0];
            let mut next = 0;
            let map = (0..usable)
                .map(|bin| {
                    if next < raw_bin_count && band.contains(freq(bin)) {
                        next += 1;
                        Some(next - 1)
                    } else {
                        None
                    }
                })
                .collect();
            (map, raw_bin_count)
        } else {
            let map = (0..usable).map(|bin| table.locate(freq(bin))).collect();
            (map, table.len())
        };

        Ok(Self { slot_of_bin, slots, magnitude_scale })
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Writes one scaled value per slot into `out`. Slots that no bin maps
    /// to stay at zero.
    pub fn aggregate_into(&self, magnitudes: &[f32], out: &mut Vec<f32>) {
        out.clear();
        out.resize(self.slots, 0.0);
        for (mag, slot) in magnitudes.iter().zip(&self.slot_of_bin) {
            if let Some(slot) = *slot {
                let v = mag / self.magnitude_scale;
                if v > out[slot] {
                    out[slot] = v;
                }
            }
        }
    }
}
