use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackPolicy {
    /// Jump straight to the louder value.
    Immediate,
    /// Move halfway towards the louder value.
    Average,
}

/// Peak meter smoothing: fast attack, linear falloff.
#[derive(Debug, Clone)]
pub struct PeakFalloff {
    attack: AttackPolicy,
    falloff_step: f32,
    max: f32,
    state: Vec<f32>,
}

impl PeakFalloff {
    pub fn new(len: usize, attack: AttackPolicy, falloff_step: f32, max: f32) -> Self {
        Self { attack, falloff_step, max, state: vec![0.0; len] }
    }

    pub fn apply(&mut self, input: &[f32]) -> &[f32] {
        for (cur, &raw) in self.state.iter_mut().zip(input) {
            let val = if raw.is_nan() { 0.0 } else { raw.clamp(0.0, self.max) };
            if val > *cur {
                *cur = match self.attack {
                    AttackPolicy::Immediate => val,
                    AttackPolicy::Average => (val + *cur) / 2.0,
                };
            } else {
                *cur = (*cur - self.falloff_step).max(0.0);
            }
        }
        &self.state
    }

    pub fn state(&self) -> &[f32] {
        &self.state
    }

    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(|v| *v = 0.0);
    }
}
