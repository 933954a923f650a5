use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

/// Source of uniform draws in `[0, 1)` used by every randomized reply choice.
pub trait RandomSource: Send + Sync {
    fn draw(&self) -> f64;
}

/// Picks one element of `bank` from a single draw.
pub fn choose<T>(bank: &[T], draw: f64) -> Option<&T> {
    if bank.is_empty() {
        return None;
    }

    let index = (draw.clamp(0.0, 1.0) * bank.len() as f64) as usize;
    bank.get(index.min(bank.len() - 1))
}

pub struct StdRandom {
    rng: Mutex<StdRng>,
}

impl StdRandom {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for StdRandom {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl RandomSource for StdRandom {
    fn draw(&self) -> f64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, wrapping around at the end.
pub struct ScriptedRandom {
    draws: Vec<f64>,
    cursor: Mutex<usize>,
}

impl ScriptedRandom {
    pub fn new(draws: Vec<f64>) -> Self {
        Self {
            draws,
            cursor: Mutex::new(0),
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn draw(&self) -> f64 {
        if self.draws.is_empty() {
            return 0.0;
        }

        let mut cursor = self.cursor.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let value = self.draws[*cursor % self.draws.len()];
        *cursor += 1;
        value
    }
}
