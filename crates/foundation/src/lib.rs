pub mod math;

// Spherical primitives shared by the other crates.
pub use math::*;
