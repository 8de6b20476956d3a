//! Synthetic PCM generators for tests and benchmarks.

use std::f32::consts::PI;

/// `n` samples of a sine wave as normalized floats.
pub fn sine(frequency: f32, sample_rate: u32, n: usize, amplitude: f32) -> Vec<f32> {
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Encodes floats as mono 16-bit little-endian PCM.
pub fn to_s16le(samples: &[f32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| ((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes())
        .collect()
}

/// Mono 16-bit PCM sine.
pub fn sine_s16le(frequency: f32, sample_rate: u32, n: usize, amplitude: f32) -> Vec<u8> {
    to_s16le(&sine(frequency, sample_rate, n, amplitude))
}

/// Deterministic white noise from a small LCG.
pub fn white_noise(n: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            amplitude * ((state >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_amplitude() {
        let s = sine(441.0, 44100, 100, 0.5);
        let max = s.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_s16le_length() {
        assert_eq!(sine_s16le(440.0, 44100, 64, 1.0).len(), 128);
    }

    #[test]
    fn test_white_noise_bounded() {
        let n = white_noise(1000, 0.5, 7);
        assert!(n.iter().all(|v| v.abs() <= 0.5));
        assert!(n.iter().any(|&v| v > 0.0) && n.iter().any(|&v| v < 0.0));
    }
}
