//! Template picking

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Error, Result};

/// Source of the engine's randomised choices
pub trait TemplatePicker: Send + Sync {
    /// Index in `0..len`. Callers never pass `len == 0`.
    fn pick_index(&self, len: usize) -> usize;

    /// True with the given probability (clamped to `[0, 1]`)
    fn chance(&self, probability: f64) -> bool;
}

/// Uniformly pick one element of `items`.
///
/// An empty list is a configuration error named by `what`.
pub fn pick<'a, T>(picker: &dyn TemplatePicker, items: &'a [T], what: &str) -> Result<&'a T> {
    if items.is_empty() {
        return Err(Error::EmptyTemplates(what.to_string()));
    }
    let index = picker.pick_index(items.len()).min(items.len() - 1);
    Ok(&items[index])
}

/// Picker backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl TemplatePicker for RandomPicker {
    fn pick_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }

    fn chance(&self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Reproducible picker seeded once at construction
pub struct SeededPicker {
    rng: Mutex<StdRng>,
}

impl SeededPicker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl TemplatePicker for SeededPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.rng.lock().gen_range(0..len.max(1))
    }

    fn chance(&self, probability: f64) -> bool {
        self.rng.lock().gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Deterministic picker: always the same index (clamped) and the same coin
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPicker {
    pub index: usize,
    pub coin: bool,
}

impl FixedPicker {
    pub fn new(index: usize, coin: bool) -> Self {
        Self { index, coin }
    }

    /// First template, coin always tails
    pub fn first() -> Self {
        Self::new(0, false)
    }
}

impl TemplatePicker for FixedPicker {
    fn pick_index(&self, len: usize) -> usize {
        self.index.min(len.saturating_sub(1))
    }

    fn chance(&self, _probability: f64) -> bool {
        self.coin
    }
}
