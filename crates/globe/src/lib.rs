pub mod config;
pub mod drag;
pub mod error;
pub mod render;
pub mod session;

pub use config::{ConfigError, GlobeConfig};
pub use drag::{DragController, DragSettings};
pub use error::GlobeError;
pub use render::{GlobeFrame, Layer, Pass, Renderer, Surface, paint_frame};
pub use session::{GlobeSession, Mode, Phase};
