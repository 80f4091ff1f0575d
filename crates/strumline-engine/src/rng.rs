//! Noise generators for click voices.
//!
//! Clicks are white noise, so every click voice owns a PCG32 generator. By
//! default each generator is seeded from OS entropy and clicks are never
//! reproducible. A configured base seed switches every voice to a generator
//! derived from that seed via BLAKE3, keyed by the instrument it belongs to.

use rand::SeedableRng;
use rand_pcg::Pcg32;

/// Creates a PCG32 RNG from a 32-bit seed.
///
/// The 32-bit seed is expanded to 64 bits by duplicating the value in both
/// halves, as required by PCG32's state initialization.
pub fn create_rng(seed: u32) -> Pcg32 {
    let seed64 = (seed as u64) | ((seed as u64) << 32);
    Pcg32::seed_from_u64(seed64)
}

/// Creates a PCG32 RNG seeded from OS entropy.
pub fn entropy_rng() -> Pcg32 {
    Pcg32::from_entropy()
}

/// Derives a seed for a specific component from the base seed using a string key.
///
/// # Arguments
/// * `base_seed` - The configured base seed
/// * `key` - A string identifier for the component (e.g. "point-3")
///
/// # Returns
/// A derived u32 seed for the component
pub fn derive_component_seed(base_seed: u32, key: &str) -> u32 {
    let mut input = Vec::with_capacity(4 + key.len());
    input.extend_from_slice(&base_seed.to_le_bytes());
    input.extend_from_slice(key.as_bytes());

    let hash = blake3::hash(&input);

    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&hash.as_bytes()[0..4]);
    u32::from_le_bytes(bytes)
}

/// Creates the generator for one component.
///
/// With `Some(base_seed)` the stream is reproducible; with `None` it is drawn
/// from entropy.
pub fn component_rng(base_seed: Option<u32>, key: &str) -> Pcg32 {
    match base_seed {
        Some(seed) => create_rng(derive_component_seed(seed, key)),
        None => entropy_rng(),
    }
}
