pub mod rng;

// Dependency-free substitutes for the `cfg-if`/`subtle` crates, used
// internally by `curve25519_dalek`.
pub mod cfg_if;
pub mod curve25519_dalek;
pub mod schnorrkel;
pub mod subtle;
pub mod transcript;
