//! Seed management for world generation
//!
//! Normalizes user-supplied seeds into the supported 32-bit range and derives
//! independent sub-seeds for each noise channel and for per-structure content
//! such as dungeons.

/// Seed used when the supplied value is degenerate (zero, negative, non-finite).
pub const DEFAULT_SEED: i64 = 1337;

/// Upper bound (exclusive) of the normalized seed range.
const SEED_RANGE: i64 = 1 << 31;

/// Coerce an arbitrary integer into a usable world seed.
///
/// Zero and negative values fall back to [`DEFAULT_SEED`]; large values are
/// folded into `1..2^31`.
pub fn normalize_seed(seed: i64) -> i64 {
    if seed <= 0 {
        return DEFAULT_SEED;
    }
    match seed.rem_euclid(SEED_RANGE) {
        0 => DEFAULT_SEED,
        folded => folded,
    }
}

/// Same as [`normalize_seed`] for floating point input (e.g. from scripts).
pub fn normalize_seed_f64(seed: f64) -> i64 {
    if !seed.is_finite() {
        return DEFAULT_SEED;
    }
    normalize_seed(seed.trunc().clamp(i64::MIN as f64, i64::MAX as f64) as i64)
}

/// Seed derived from the current wall-clock time, for "no seed given".
pub fn time_seed() -> i64 {
    normalize_seed(chrono::Utc::now().timestamp_millis())
}

/// Seeds for every generation channel, derived from one master seed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Normalized master seed (also drives the main random stream)
    pub master: i64,
    /// Elevation noise channel
    pub elevation: i64,
    /// Forest density noise channel
    pub forest: i64,
    /// Fine detail noise channel
    pub detail: i64,
}

impl WorldSeeds {
    /// Derive all channel seeds from a master seed.
    pub fn from_master(master: i64) -> Self {
        let master = normalize_seed(master);
        Self {
            master,
            elevation: derive_seed(master, "elevation"),
            forest: derive_seed(master, "forest"),
            detail: derive_seed(master, "detail"),
        }
    }
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, elevation: {}, forest: {}, detail: {} }}",
            self.master, self.elevation, self.forest, self.detail,
        )
    }
}

/// Derive a sub-seed from a master seed and a channel name.
///
/// FNV-1a over the name bytes, mixed with the master. Stable across builds
/// and platforms, unlike `DefaultHasher`.
fn derive_seed(master: i64, channel: &str) -> i64 {
    let mut h: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in channel.bytes() {
        h ^= byte as u64;
        h = h.wrapping_mul(0x0000_0100_0000_01b3);
    }
    h ^= master as u64;
    h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
    h ^= h >> 32;
    normalize_seed((h & 0x7fff_ffff) as i64)
}

/// Sub-seed for content anchored at a tile (dungeons behind entrances).
pub fn combine_seeds(world_seed: i64, x: usize, y: usize) -> i64 {
    let mut h = world_seed as u64;
    h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
    h ^= x as u64;
    h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
    h ^= y as u64;
    h = h.wrapping_mul(0x517c_c1b7_2722_0a95);
    h ^= h >> 29;
    normalize_seed((h & 0x7fff_ffff) as i64)
}
