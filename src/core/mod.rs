//! Core types describing bodies, their shapes and materials, and the layered body store.

pub mod body;
pub mod group;
pub mod shape;
pub mod types;

pub use body::{Body, BodyId, BodyOptions};
pub use group::BodyGroup;
pub use shape::{Polygon, Shape};
pub use types::{Material, MaterialPairProperties, MaterialTable};
