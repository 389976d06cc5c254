use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Uniform random source in `[0, 1)`, injected into the draw engine.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for SmallRng {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Fast generator for deterministic runs.
pub fn seeded(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Generator seeded from the operating system.
pub fn from_entropy() -> SmallRng {
    SmallRng::from_os_rng()
}

/// Replays a fixed list of values, cycling when exhausted. Values are clamped
/// into `[0, 1)`. Handy for forcing tiers in tests.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
    calls: usize,
}

impl ScriptedSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0, calls: 0 }
    }

    /// Always yields `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of values handed out so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        self.calls += 1;
        let Some(&value) = self.values.get(self.cursor) else {
            return 0.0;
        };
        self.cursor = (self.cursor + 1) % self.values.len();
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
