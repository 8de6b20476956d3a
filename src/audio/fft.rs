use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Forward transform of a real frame. Any length works: rustfft picks
/// mixed-radix or Bluestein plans for non powers of two.
pub struct FftEngine {
    fft_size: usize,
    fft: Arc<dyn Fft<f32>>,
    buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl FftEngine {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        let buf = vec![Complex::new(0.0, 0.0); fft_size];
        Self { fft_size, fft, buf, scratch }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Bins 0..=N/2; everything above is the mirrored half.
    pub fn usable_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    /// Returns all N complex bins. Missing input is treated as zero.
    pub fn transform(&mut self, input: &[f32]) -> &[Complex<f32>] {
        for (i, c) in self.buf.iter_mut().enumerate() {
            *c = Complex::new(input.get(i).copied().unwrap_or(0.0), 0.0);
        }
        self.fft.process_with_scratch(&mut self.buf, &mut self.scratch);
        &self.buf
    }
}

/// Writes `|bin|` for the usable half of `bins` into `out`.
pub fn magnitudes_into(bins: &[Complex<f32>], out: &mut Vec<f32>) {
    let half = if bins.is_empty() { 0 } else { bins.len() / 2 + 1 };
    out.clear();
    out.extend(bins[..half].iter().map(|c| c.norm()));
}
