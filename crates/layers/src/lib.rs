pub mod clip;
pub mod graticule;
pub mod path;
pub mod projection;
pub mod style;

pub use clip::ClipCircle;
pub use graticule::Graticule;
pub use path::{Path, PathCommand, PathGenerator};
pub use projection::Orthographic;
pub use style::{GlobeStyle, LayerStyle};

