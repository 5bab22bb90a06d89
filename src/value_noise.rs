//! Value noise channels used by terrain synthesis
//!
//! Each channel is an independently seeded [`ValueNoiseField`]: a 512-entry
//! doubled permutation table shuffled by a private [`RandomStream`], sampled
//! with quintic fading and gradient corners. The field implements
//! [`noise::NoiseFn`], so the fractal helpers below work on it directly.

use ::noise::NoiseFn;

use crate::rng::RandomStream;
use crate::seeds::WorldSeeds;

/// Gradient lattice noise over a seeded permutation table.
#[derive(Clone)]
pub struct ValueNoiseField {
    perm: [u8; 512],
}

impl ValueNoiseField {
    pub fn new(seed: i64) -> Self {
        let mut rng = RandomStream::new(seed.wrapping_mul(10_000));

        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        rng.shuffle(&mut table);

        // Doubled so `perm[X + 1] + Y + 1` never needs wrapping
        let mut perm = [0u8; 512];
        perm[..256].copy_from_slice(&table);
        perm[256..].copy_from_slice(&table);

        Self { perm }
    }

    /// Sample the field. Result lies in [-1, 1].
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let a = self.perm[xi] as usize + yi;
        let b = self.perm[xi + 1] as usize + yi;

        lerp(
            v,
            lerp(u, grad(self.perm[a], x, y), grad(self.perm[b], x - 1.0, y)),
            lerp(
                u,
                grad(self.perm[a + 1], x, y - 1.0),
                grad(self.perm[b + 1], x - 1.0, y - 1.0),
            ),
        )
    }
}

impl NoiseFn<f64, 2> for ValueNoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.sample(point[0], point[1])
    }
}

/// Quintic smoothing curve 6t^5 - 15t^4 + 10t^3
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Corner contribution, gradient chosen by the low four bits of the hash.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

/// Fractional Brownian motion over any 2D noise function, normalized to the
/// input range.
pub fn fbm(
    noise: &impl NoiseFn<f64, 2>,
    x: f64,
    y: f64,
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
) -> f64 {
    let mut total = 0.0;
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut max_value = 0.0;

    for _ in 0..octaves {
        total += amplitude * noise.get([x * frequency, y * frequency]);
        max_value += amplitude;
        amplitude *= persistence;
        frequency *= lacunarity;
    }

    if max_value > 0.0 {
        total / max_value
    } else {
        0.0
    }
}

/// Spatial frequency of the elevation channel
pub const ELEVATION_FREQUENCY: f64 = 0.08;
/// Spatial frequency of the forest density channel
pub const FOREST_FREQUENCY: f64 = 0.05;
/// Offset that keeps the forest channel away from the lattice origin
pub const FOREST_OFFSET: f64 = 500.0;
/// Spatial frequency of the detail channel
pub const DETAIL_FREQUENCY: f64 = 0.25;
/// How much the detail channel perturbs elevation
pub const DETAIL_WEIGHT: f64 = 0.1;

/// The three noise channels terrain synthesis reads.
pub struct NoiseChannels {
    pub elevation: ValueNoiseField,
    pub forest: ValueNoiseField,
    pub detail: ValueNoiseField,
}

impl NoiseChannels {
    pub fn new(seeds: &WorldSeeds) -> Self {
        Self {
            elevation: ValueNoiseField::new(seeds.elevation),
            forest: ValueNoiseField::new(seeds.forest),
            detail: ValueNoiseField::new(seeds.detail),
        }
    }

    /// Elevation at a tile, jittered by the detail channel.
    pub fn elevation_at(&self, x: usize, y: usize) -> f64 {
        let base = self
            .elevation
            .sample(x as f64 * ELEVATION_FREQUENCY, y as f64 * ELEVATION_FREQUENCY);
        let detail = fbm(
            &self.detail,
            x as f64 * DETAIL_FREQUENCY,
            y as f64 * DETAIL_FREQUENCY,
            2,
            0.5,
            2.0,
        );
        base + detail * DETAIL_WEIGHT
    }

    /// Forest density at a tile.
    pub fn forest_at(&self, x: usize, y: usize) -> f64 {
        self.forest.sample(
            x as f64 * FOREST_FREQUENCY + FOREST_OFFSET,
            y as f64 * FOREST_FREQUENCY + FOREST_OFFSET,
        )
    }
}
