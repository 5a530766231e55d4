use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shared random source: each call yields a value in `[0, 1)`.
pub type RandomSource = Box<dyn FnMut() -> f64 + Send>;

pub fn random_source(seed: Option<u64>) -> RandomSource {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Box::new(move || rng.gen::<f64>())
}

/// Uniform index in `0..len`. `len` must be non-zero.
pub fn pick_index(rng: &mut dyn FnMut() -> f64, len: usize) -> usize {
    let roll = rng().clamp(0.0, 1.0);
    ((roll * len as f64) as usize).min(len.saturating_sub(1))
}

/// Uniform integer in `min..=max`.
pub fn roll_inclusive(rng: &mut dyn FnMut() -> f64, min: u32, max: u32) -> u32 {
    if min >= max {
        return min;
    }
    min + pick_index(rng, (max - min + 1) as usize) as u32
}
