pub mod cancel;
pub mod ease;
pub mod event_bus;
pub mod frame;
pub mod scheduler;
pub mod transition;

pub use cancel::*;
pub use ease::*;
pub use event_bus::*;
pub use frame::*;
pub use scheduler::*;
pub use transition::*;
