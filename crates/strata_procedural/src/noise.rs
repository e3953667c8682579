//! # Simplex Noise
//!
//! Seeded 2D simplex noise and the [`Noise2D`] sampling interface used by
//! biome selection and ore placement.
//!
//! ## Determinism Guarantee
//!
//! Given the same [`WorldSeed`], every sample is bit-identical on every
//! platform and every run.

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives an independent sub-seed for one purpose (biomes, ores, ...).
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0x5742_4154_4131_0001)
    }
}

/// Smooth, deterministic 2D noise in `[0, 1)`.
pub trait Noise2D: Send + Sync {
    /// Samples the noise field at `(x, y)`.
    fn noise_2d(&self, x: f64, y: f64) -> f64;
}

/// Largest value a [`Noise2D`] sample may take.
pub const NOISE_MAX: f64 = 1.0 - f64::EPSILON;

/// Seeded permutation table, computed once per generator.
#[derive(Debug)]
struct PermutationTable {
    /// 256 entries, doubled so lookups never wrap.
    perm: [u8; 512],
}

impl PermutationTable {
    /// 12 gradient directions for 2D simplex.
    const GRADIENTS: [[i8; 2]; 12] = [
        [1, 0], [1, 1], [0, 1], [-1, 1],
        [-1, 0], [-1, -1], [0, -1], [1, -1],
        [1, 0], [0, 1], [-1, 0], [0, -1],
    ];

    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().take(256).enumerate() {
            *slot = i as u8;
        }

        // Fisher-Yates with xorshift64; zero would be a fixed point.
        let mut state = seed.value() | 1;
        for i in (1..256).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = (state as usize) % (i + 1);
            perm.swap(i, j);
        }

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> u8 {
        self.perm[index & 511]
    }

    #[inline]
    fn gradient(hash: u8) -> [i8; 2] {
        Self::GRADIENTS[(hash % 12) as usize]
    }
}

/// 2D simplex noise generator.
///
/// [`SimplexNoise::sample`] returns values in `[-1, 1]`; the [`Noise2D`]
/// implementation remaps them to `[0, 1)`.
///
/// # Example
///
/// ```rust
/// use strata_procedural::{Noise2D, SimplexNoise, WorldSeed};
///
/// let noise = SimplexNoise::new(WorldSeed::new(42));
/// let value = noise.noise_2d(100.5, 200.3);
/// assert!((0.0..1.0).contains(&value));
/// ```
#[derive(Debug)]
pub struct SimplexNoise {
    perm_table: PermutationTable,
}

impl SimplexNoise {
    /// Skewing factor for 2D simplex grid, `(sqrt(3) - 1) / 2`.
    const F2: f64 = 0.366_025_403_784_439;
    /// Unskewing factor for 2D simplex grid, `(3 - sqrt(3)) / 6`.
    const G2: f64 = 0.211_324_865_405_187;

    /// Creates a new simplex noise generator from a seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            perm_table: PermutationTable::new(seed),
        }
    }

    /// Samples 2D simplex noise at the given coordinates, in `[-1, 1]`.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let skew = (x + y) * Self::F2;
        let i = fast_floor(x + skew);
        let j = fast_floor(y + skew);

        let unskew = f64::from(i + j) * Self::G2;
        let x0 = x - (f64::from(i) - unskew);
        let y0 = y - (f64::from(j) - unskew);

        // Upper or lower triangle of the skewed cell
        let (i1, j1) = if x0 > y0 { (1, 0) } else { (0, 1) };

        let x1 = x0 - f64::from(i1) + Self::G2;
        let y1 = y0 - f64::from(j1) + Self::G2;
        let x2 = x0 - 1.0 + 2.0 * Self::G2;
        let y2 = y0 - 1.0 + 2.0 * Self::G2;

        let ii = (i & 255) as usize;
        let jj = (j & 255) as usize;
        let i1 = i1 as usize;
        let j1 = j1 as usize;

        let gi0 = self.perm_table.get(ii + self.perm_table.get(jj) as usize);
        let gi1 = self.perm_table.get(ii + i1 + self.perm_table.get(jj + j1) as usize);
        let gi2 = self.perm_table.get(ii + 1 + self.perm_table.get(jj + 1) as usize);

        let n0 = Self::contribution(x0, y0, gi0);
        let n1 = Self::contribution(x1, y1, gi1);
        let n2 = Self::contribution(x2, y2, gi2);

        // 70 normalizes the sum to [-1, 1]
        (70.0 * (n0 + n1 + n2)).clamp(-1.0, 1.0)
    }

    #[inline]
    fn contribution(x: f64, y: f64, gradient_index: u8) -> f64 {
        let t = 0.5 - x * x - y * y;
        if t < 0.0 {
            0.0
        } else {
            let grad = PermutationTable::gradient(gradient_index);
            let t2 = t * t;
            t2 * t2 * (x * f64::from(grad[0]) + y * f64::from(grad[1]))
        }
    }

    /// Fractal noise: `octaves` layers, each at `lacunarity` times the
    /// frequency and `persistence` times the amplitude of the previous one.
    ///
    /// Normalized to `[-1, 1]`.
    #[must_use]
    pub fn octaved(&self, x: f64, y: f64, octaves: u32, persistence: f64, lacunarity: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;

        for _ in 0..octaves.max(1) {
            total += self.sample(x * frequency, y * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_amplitude
    }
}

impl Noise2D for SimplexNoise {
    #[inline]
    fn noise_2d(&self, x: f64, y: f64) -> f64 {
        to_unit(self.sample(x, y))
    }
}

/// Maps a `[-1, 1]` sample into `[0, 1)`.
#[inline]
#[must_use]
pub fn to_unit(value: f64) -> f64 {
    ((value + 1.0) * 0.5).clamp(0.0, NOISE_MAX)
}

#[inline]
fn fast_floor(x: f64) -> i32 {
    let xi = x as i32;
    if x < f64::from(xi) {
        xi - 1
    } else {
        xi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let seed = WorldSeed::new(12345);
        let noise1 = SimplexNoise::new(seed);
        let noise2 = SimplexNoise::new(seed);

        for i in 0..100 {
            let x = f64::from(i) * 0.1;
            let y = f64::from(i) * 0.17;
            assert_eq!(noise1.sample(x, y), noise2.sample(x, y));
        }
    }

    #[test]
    fn test_different_seeds_different_results() {
        let noise1 = SimplexNoise::new(WorldSeed::new(1));
        let noise2 = SimplexNoise::new(WorldSeed::new(2));

        let differs = (0..32).any(|i| {
            let x = f64::from(i) * 3.7 + 0.5;
            noise1.sample(x, x * 0.3) != noise2.sample(x, x * 0.3)
        });
        assert!(differs, "different seeds should produce different fields");
    }

    #[test]
    fn test_unit_range() {
        let noise = SimplexNoise::new(WorldSeed::new(42));

        for i in 0..10_000 {
            let x = f64::from(i) * 0.1 - 500.0;
            let y = f64::from(i) * 0.13 - 650.0;
            let raw = noise.sample(x, y);
            let unit = noise.noise_2d(x, y);

            assert!((-1.0..=1.0).contains(&raw), "raw {raw} at ({x}, {y})");
            assert!((0.0..1.0).contains(&unit), "unit {unit} at ({x}, {y})");
        }
    }

    #[test]
    fn test_to_unit_never_reaches_one() {
        assert_eq!(to_unit(-1.0), 0.0);
        assert!(to_unit(1.0) < 1.0);
        assert!((to_unit(0.0) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_continuity() {
        let noise = SimplexNoise::new(WorldSeed::new(42));
        let v1 = noise.sample(100.0, 100.0);
        let v2 = noise.sample(100.001, 100.0);
        let v3 = noise.sample(100.0, 100.001);

        assert!((v1 - v2).abs() < 0.01);
        assert!((v1 - v3).abs() < 0.01);
    }

    #[test]
    fn test_octaved_range() {
        let noise = SimplexNoise::new(WorldSeed::new(42));
        for i in 0..1000 {
            let x = f64::from(i) * 0.37;
            let value = noise.octaved(x, x * 0.5, 4, 0.5, 2.0);
            assert!((-1.0..=1.0).contains(&value), "octaved {value}");
        }
    }

    #[test]
    fn test_seed_derivation() {
        let base = WorldSeed::new(42);
        assert_ne!(base.derive(1), base.derive(2));
        assert_eq!(base.derive(1), base.derive(1));
        assert_ne!(base.derive(1), base);
    }
}
