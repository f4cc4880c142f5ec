//! Collision detection: pair generation, shape tests, contact manifolds.

pub mod broadphase;
pub mod clipping;
pub mod contact;
pub mod narrowphase;

pub use broadphase::{ExhaustivePairs, PairSource};
pub use contact::ContactManifold;
pub use narrowphase::{ContactGeometry, NarrowPhase};
