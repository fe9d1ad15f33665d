//! Spatial parameter field
//!
//! A world-wide, immutable table of sine frequency bands sampled over
//! world-space to bias room sizes regionally, giving whole neighborhoods of
//! chunks a shared character. The table is built once at startup from a
//! fixed world constant and passed by reference into every generation call;
//! chunk generation never mutates it.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::CHUNK_SIZE;

/// Fixed world constant seeding the band table. Every process derives the
/// identical table, which chunk determinism depends on.
pub const FIELD_TABLE_SEED: u64 = 0x5EED;

/// Number of frequency bands in the table.
pub const BAND_COUNT: usize = 6;

/// Base spatial unit for band wavelengths: the midpoint of the room size
/// range, so the shortest band varies on the scale of a few rooms.
const ROOM_SIZE_UNIT: f64 = 8.0;
/// Wavelength multiplier of the shortest band.
const MIN_WAVELENGTH_MULT: f64 = 4.0;
/// Wavelength multiplier of the longest band.
const MAX_WAVELENGTH_MULT: f64 = 64.0;

const AMPLITUDE_MIN: f64 = 0.5;
const AMPLITUDE_MAX: f64 = 1.0;

/// Center of the room-size Beta distribution when the field is neutral.
const BASE_ALPHA: f64 = 2.0;
const BASE_BETA: f64 = 2.0;
/// How strongly the field variation pushes the distribution parameters.
const FIELD_INFLUENCE: f64 = 1.5;
/// Clamp range for both distribution parameters.
const PARAM_MIN: f64 = 0.5;
const PARAM_MAX: f64 = 4.0;

/// One sine band of the spatial field.
#[derive(Clone, Copy, Debug)]
pub struct FrequencyBand {
    /// Spatial frequency in radians per cell.
    pub frequency: f64,
    pub amplitude: f64,
    pub phase_x: f64,
    pub phase_y: f64,
}

impl FrequencyBand {
    /// Spatial period of this band in cells.
    pub fn wavelength(&self) -> f64 {
        TAU / self.frequency
    }
}

/// The immutable band table. Construct once before generation starts and
/// share by reference; it is `Sync` and safe under fully parallel chunk
/// generation.
#[derive(Clone, Debug)]
pub struct SpatialField {
    bands: [FrequencyBand; BAND_COUNT],
}

impl SpatialField {
    /// Build the world's band table from the fixed constant seed.
    pub fn new() -> Self {
        Self::from_seed(FIELD_TABLE_SEED)
    }

    /// Build a table from an explicit seed. Exposed for tests and tools;
    /// the world proper always uses [`FIELD_TABLE_SEED`].
    pub fn from_seed(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut bands = [FrequencyBand {
            frequency: 0.0,
            amplitude: 0.0,
            phase_x: 0.0,
            phase_y: 0.0,
        }; BAND_COUNT];

        for (i, band) in bands.iter_mut().enumerate() {
            // Squared-fraction interpolation in log space: wavelengths
            // cluster toward the short end, with one very long band.
            let fraction = i as f64 / (BAND_COUNT - 1) as f64;
            let t = fraction * fraction;
            let mult = MIN_WAVELENGTH_MULT * (MAX_WAVELENGTH_MULT / MIN_WAVELENGTH_MULT).powf(t);
            let wavelength = ROOM_SIZE_UNIT * mult;

            *band = FrequencyBand {
                frequency: TAU / wavelength,
                amplitude: rng.gen_range(AMPLITUDE_MIN..AMPLITUDE_MAX),
                phase_x: rng.gen_range(0.0..TAU),
                phase_y: rng.gen_range(0.0..TAU),
            };
        }

        Self { bands }
    }

    pub fn bands(&self) -> &[FrequencyBand] {
        &self.bands
    }

    /// Band wavelengths rounded to whole cells, for debug output.
    pub fn wavelengths(&self) -> Vec<i64> {
        self.bands.iter().map(|b| b.wavelength().round() as i64).collect()
    }

    /// Sample the variation field at a chunk coordinate. Result is in [-1, 1].
    pub fn sample(&self, cx: i64, cy: i64) -> f64 {
        let world_x = (cx * CHUNK_SIZE as i64) as f64;
        let world_y = (cy * CHUNK_SIZE as i64) as f64;

        let mut total = 0.0;
        for band in &self.bands {
            let sx = (world_x * band.frequency + band.phase_x).sin();
            let sy = (world_y * band.frequency + band.phase_y).sin();
            total += band.amplitude * (sx + sy) / 2.0;
        }

        (total / BAND_COUNT as f64).clamp(-1.0, 1.0)
    }

    /// Derive the room-size distribution parameters for a chunk.
    ///
    /// Positive variation raises alpha and lowers beta, skewing the Beta
    /// distribution toward larger rooms; negative variation does the
    /// opposite. Both parameters clamp independently to [0.5, 4.0].
    pub fn spatial_parameters(&self, cx: i64, cy: i64) -> (f64, f64) {
        let v = self.sample(cx, cy);
        let alpha = (BASE_ALPHA + v * FIELD_INFLUENCE).clamp(PARAM_MIN, PARAM_MAX);
        let beta = (BASE_BETA - v * FIELD_INFLUENCE).clamp(PARAM_MIN, PARAM_MAX);
        (alpha, beta)
    }
}

impl Default for SpatialField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_deterministic() {
        let a = SpatialField::new();
        let b = SpatialField::new();
        for (ba, bb) in a.bands().iter().zip(b.bands()) {
            assert_eq!(ba.frequency, bb.frequency);
            assert_eq!(ba.amplitude, bb.amplitude);
            assert_eq!(ba.phase_x, bb.phase_x);
            assert_eq!(ba.phase_y, bb.phase_y);
        }
        assert_eq!(a.sample(17, -4), b.sample(17, -4));
    }

    #[test]
    fn test_band_count_and_wavelength_spread() {
        let field = SpatialField::new();
        let wavelengths = field.wavelengths();
        assert_eq!(wavelengths.len(), BAND_COUNT);
        // Shortest band: 8 * 4 cells. Longest: 8 * 64 cells.
        assert_eq!(wavelengths[0], 32);
        assert_eq!(wavelengths[BAND_COUNT - 1], 512);
        for pair in wavelengths.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_amplitudes_and_phases_in_range() {
        let field = SpatialField::new();
        for band in field.bands() {
            assert!(band.amplitude >= AMPLITUDE_MIN && band.amplitude < AMPLITUDE_MAX);
            assert!(band.phase_x >= 0.0 && band.phase_x < TAU);
            assert!(band.phase_y >= 0.0 && band.phase_y < TAU);
        }
    }

    #[test]
    fn test_sample_and_parameters_bounded() {
        let field = SpatialField::new();
        for cy in -20..=20 {
            for cx in -20..=20 {
                let v = field.sample(cx, cy);
                assert!((-1.0..=1.0).contains(&v));

                let (alpha, beta) = field.spatial_parameters(cx, cy);
                assert!((PARAM_MIN..=PARAM_MAX).contains(&alpha));
                assert!((PARAM_MIN..=PARAM_MAX).contains(&beta));
            }
        }
    }

    #[test]
    fn test_variation_moves_parameters_in_opposite_directions() {
        let field = SpatialField::new();
        for &(cx, cy) in &[(0i64, 0i64), (9, 9), (-31, 12)] {
            let v = field.sample(cx, cy);
            let (alpha, beta) = field.spatial_parameters(cx, cy);
            if v > 0.0 {
                assert!(alpha >= BASE_ALPHA);
                assert!(beta <= BASE_BETA);
            } else {
                assert!(alpha <= BASE_ALPHA);
                assert!(beta >= BASE_BETA);
            }
        }
    }
}
