pub mod geo;
pub mod great_arc;
pub mod rotation;
pub mod vec;

pub use geo::*;
pub use great_arc::*;
pub use rotation::*;
pub use vec::*;
