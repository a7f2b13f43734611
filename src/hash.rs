use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Stable seeded hash of a string, used for deterministic selection order.
pub fn stable_hash_str(seed: u64, value: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    value.hash(&mut hasher);
    hasher.finish()
}
