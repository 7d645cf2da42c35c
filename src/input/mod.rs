//! Input and event dispatch (spec.md §4.L): the hit-test map, hover/focus/
//! capture state machines, tab navigation, double/triple-click detection,
//! and drag-and-drop, all driven by [`InputQueue`].
//!
//! The widget tree (`crate::tree`) rebuilds the hit-test map every frame
//! and owns the widgets this module dispatches *to*; `InputQueue` itself
//! stays tree-agnostic (see `queue.rs`'s module doc) so it can be unit
//! tested against a hand-built hit-test map.

pub mod event;
pub mod queue;

pub use event::{DragPhase, DropOutcome, Event, KeyCode, Modifiers, MouseButton};
pub use queue::{ClickKind, HitTestEntry, InputQueue};
