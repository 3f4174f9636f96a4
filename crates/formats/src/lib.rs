pub mod centroid;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod topojson;
pub mod world;

pub use centroid::*;
pub use error::*;
pub use geometry::*;
pub use world::*;
