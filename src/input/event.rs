//! The event taxonomy spec.md §4.L enumerates: a tagged union of mouse,
//! keyboard, drag-and-drop, and focus events, each carrying just the fields
//! its handlers need.
//!
//! Grounded on `original_source/include/brisk/gui/Event.hpp` per spec.md
//! §4.L directly (the header itself could not be re-consulted after the
//! pack loss noted in DESIGN.md; the variant list and per-event payload
//! below follow the prose description word for word rather than a header
//! read).

use crate::geometry::Point;
use bitflags::bitflags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Tab,
    Escape,
    Enter,
    Backspace,
    Delete,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Other(u32),
}

bitflags! {
    /// Held modifier keys, tracked by the queue across events (spec.md
    /// §4.L "modifier state").
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// Whether a drop ended in a successful drop or a cancellation, delivered
/// to both sides of a drag-and-drop operation (spec.md §4.L).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Drop,
    Cancel,
}

/// The three sub-phases of `TargetDragging`, named directly in spec.md
/// §4.L ("`TargetDragging{Over|Enter|Exit}`").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Enter,
    Over,
    Exit,
}

/// One dispatchable event. Mouse-carrying variants hold the current point
/// and, if a button is held, the press-down point, per spec.md §4.L
/// ("Each mouse event carries current point and, if a button is held, the
/// press-down point").
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    MouseMoved { point: Point, press_point: Option<Point> },
    MouseEntered { point: Point },
    MouseExited { point: Point },
    WheelX { point: Point, delta: f32 },
    WheelY { point: Point, delta: f32 },
    ButtonPressed { point: Point, button: MouseButton },
    ButtonReleased { point: Point, button: MouseButton },
    DoubleClicked { point: Point, button: MouseButton },
    TripleClicked { point: Point, button: MouseButton },
    KeyPressed { key: KeyCode, modifiers: Modifiers },
    KeyReleased { key: KeyCode, modifiers: Modifiers },
    CharTyped { ch: char },
    SourceDragging { phase: DragPhase, point: Point },
    TargetDragging { phase: DragPhase, point: Point },
    SourceDropped { outcome: DropOutcome },
    TargetDropped { outcome: DropOutcome },
    Focused { by_keyboard: bool },
    Blurred,
}

impl Event {
    /// Whether this event, if not stopped by the receiving widget, keeps
    /// walking up the parent chain (spec.md §4.L dispatch step 2). Focus
    /// and drag-and-drop events target exactly one widget and never bubble;
    /// hover enter/exit are synthesized per widget and likewise don't
    /// bubble past the widget whose hover state they report.
    pub fn should_bubble(&self) -> bool {
        !matches!(
            self,
            Event::MouseEntered { .. }
                | Event::MouseExited { .. }
                | Event::Focused { .. }
                | Event::Blurred
                | Event::SourceDragging { .. }
                | Event::TargetDragging { .. }
                | Event::SourceDropped { .. }
                | Event::TargetDropped { .. }
        )
    }

    /// True for the events the dispatch algorithm's hover bookkeeping and
    /// capture-stack rules treat as "mouse events" (spec.md §4.L steps 1-4).
    pub fn point(&self) -> Option<Point> {
        match *self {
            Event::MouseMoved { point, .. }
            | Event::MouseEntered { point }
            | Event::MouseExited { point }
            | Event::WheelX { point, .. }
            | Event::WheelY { point, .. }
            | Event::ButtonPressed { point, .. }
            | Event::ButtonReleased { point, .. }
            | Event::DoubleClicked { point, .. }
            | Event::TripleClicked { point, .. }
            | Event::SourceDragging { point, .. }
            | Event::TargetDragging { point, .. } => Some(point),
            _ => None,
        }
    }
}
