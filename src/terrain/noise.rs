//! Ground perturbation outside the road band.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Source of the low-frequency perturbation applied to off-road ground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum SurroundNoise {
    /// Deterministic sin/cos ripple
    #[default]
    Harmonic,
    /// Fractal Perlin noise
    Perlin { seed: u32 },
}

/// Sampler built from a [`SurroundNoise`] choice.
pub enum NoiseSampler {
    Harmonic,
    Fractal(Fbm<Perlin>),
}

impl NoiseSampler {
    /// Create the sampler for a noise kind.
    pub fn new(kind: SurroundNoise) -> Self {
        match kind {
            SurroundNoise::Harmonic => NoiseSampler::Harmonic,
            SurroundNoise::Perlin { seed } => NoiseSampler::Fractal(
                Fbm::<Perlin>::new(seed)
                    .set_octaves(4)
                    .set_persistence(0.5)
                    .set_lacunarity(2.0),
            ),
        }
    }

    /// Sample at grid coordinates `(x, z)`; always in `[0, 1]`.
    pub fn sample(&self, x: usize, z: usize) -> f32 {
        let (x, z) = (x as f64, z as f64);
        let n = match self {
            NoiseSampler::Harmonic => (x * 0.35).sin() * (z * 0.15).cos(),
            NoiseSampler::Fractal(fbm) => fbm.get([x * 0.08, z * 0.08]),
        };
        (((n + 1.0) / 2.0) as f32).clamp(0.0, 1.0)
    }
}
