//! Canvas (spec.md §4.G): the drawing surface widgets paint onto, split into
//! a stateless layer ([`RawCanvas`]) and a stateful save/restore wrapper
//! around it ([`Canvas`]).

pub mod paint;
pub mod raw;
pub mod state;

pub use paint::Paint;
pub use raw::RawCanvas;
pub use state::{Canvas, CanvasState};
