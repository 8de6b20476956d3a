use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Hann,
    Blackman,
}

/// Precomputed analysis window, applied in place.
#[derive(Debug, Clone)]
pub struct Window {
    kind: WindowKind,
    coeffs: Vec<f32>,
}

impl Window {
    pub fn new(kind: WindowKind, n: usize) -> Self {
        let coeffs = match n {
            0 => Vec::new(),
            1 => vec![1.0],
            _ => {
                let denom = (n - 1) as f32;
                (0..n)
                    .map(|i| {
                        let x = 2.0 * PI * i as f32 / denom;
                        match kind {
                            WindowKind::Hann => 0.5 * (1.0 - x.cos()),
                            WindowKind::Blackman => 0.42 - 0.5 * x.cos() + 0.08 * (2.0 * x).cos(),
                        }
                    })
                    .collect()
            }
        };
        Self { kind, coeffs }
    }

    pub fn kind(&self) -> WindowKind {
        self.kind
    }

    pub fn coeffs(&self) -> &[f32] {
        &self.coeffs
    }

    pub fn apply(&self, samples: &mut [f32]) {
        for (s, w) in samples.iter_mut().zip(&self.coeffs) {
            *s *= w;
        }
    }
}
