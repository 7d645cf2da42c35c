//! [`InputQueue`]: the per-frame hit-test map plus the hover/focus/capture/
//! drag state machines spec.md §4.L describes, and the dispatch algorithm
//! that ties them together.
//!
//! Grounded on spec.md §4.L directly (see DESIGN.md for why: the
//! `original_source` header this is based on, `Event.hpp`, was listed in
//! `_INDEX.md` but not re-readable after the pack loss). Capture-stack and
//! hover-chain bookkeeping use small `Vec`-backed stacks in the teacher's
//! general style of pooled, reusable buffers (`util.rs`'s buffer pool).

use std::collections::VecDeque;

use crate::geometry::{Point, Rectangle};
use crate::widget::WidgetId;

use super::event::{DragPhase, DropOutcome, Event, MouseButton, Modifiers};

/// One entry in the per-frame spatial index the widget tree rebuilds every
/// frame (spec.md §4.K step 4, §4.L "hit-test map"). `z_index` is paint
/// order (later painted = higher priority at a point); `tab_group` is the
/// id of the nearest ancestor with `focus_capture` set, or `0` for the root
/// group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitTestEntry {
    pub widget: WidgetId,
    pub parent: Option<WidgetId>,
    pub rect: Rectangle,
    pub scissor: Rectangle,
    pub z_index: usize,
    pub anywhere: bool,
    pub visible: bool,
    pub mouse_transparent: bool,
    pub tab_stop: bool,
    pub tab_group: u32,
}

impl HitTestEntry {
    fn hit(&self, point: Point) -> bool {
        self.visible && !self.mouse_transparent && (self.anywhere || (self.rect.contains(point) && self.scissor.contains(point)))
    }
}

/// Whether a button press registered as a single, double, or triple click,
/// per spec.md §8 invariant 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
    Triple,
}

/// The drag-and-drop state machine's live state, generic over the payload a
/// drag carries (spec.md's "drag source/object/target"; the original
/// doesn't constrain the object's type, so this crate doesn't either).
struct DragState<D> {
    source: WidgetId,
    object: D,
    button: MouseButton,
    target: Option<WidgetId>,
    allow_drop: bool,
    started: bool,
    start_point: Point,
}

/// Every dispatch entry point below takes a `deliver: impl FnMut(WidgetId,
/// &Event) -> bool` closure that actually hands the event to a widget and
/// reports whether it was consumed (stops bubbling), rather than storing a
/// tree reference: `InputQueue` doesn't own the widget tree (see
/// DESIGN.md) — the caller (normally `WidgetTree`) already has `&mut`
/// access to widget state and is the one place both can be borrowed
/// together.
///
/// Holds the hit-test map, focus, hover, capture stacks, tab list, drag
/// state, and pending/re-injected event queues spec.md §4.L's `InputQueue`
/// names. `D` is the drag-and-drop payload type (default `()` for crates
/// that don't move data through a drag, only notifications).
pub struct InputQueue<D = ()> {
    hit_test: Vec<HitTestEntry>,
    focused: Option<WidgetId>,
    hovered_chain: Vec<WidgetId>,
    mouse_capture: Vec<WidgetId>,
    key_capture: Vec<WidgetId>,
    autofocus: Option<WidgetId>,
    drag: Option<DragState<D>>,
    last_mouse_point: Option<Point>,
    last_press_point: Option<Point>,
    modifiers: Modifiers,
    queue: VecDeque<Event>,
    pending_reinject: Vec<Event>,
    next_reinject: Vec<Event>,
    double_click_time: f32,
    double_click_distance: f32,
    last_click: Option<(MouseButton, Point, f32)>,
    last_click_count: u32,
    drag_threshold: f32,
}

impl<D> InputQueue<D> {
    pub fn new(double_click_time: f32, double_click_distance: f32) -> Self {
        InputQueue {
            hit_test: Vec::new(),
            focused: None,
            hovered_chain: Vec::new(),
            mouse_capture: Vec::new(),
            key_capture: Vec::new(),
            autofocus: None,
            drag: None,
            last_mouse_point: None,
            last_press_point: None,
            modifiers: Modifiers::empty(),
            queue: VecDeque::new(),
            pending_reinject: Vec::new(),
            next_reinject: Vec::new(),
            double_click_time,
            double_click_distance,
            last_click: None,
            last_click_count: 0,
            drag_threshold: 4.0,
        }
    }

    // --- hit-test map -----------------------------------------------------

    /// Replaces the hit-test map for the current frame; called once per
    /// frame by the widget tree after its geometry pass (spec.md §4.K
    /// step 4).
    pub fn set_hit_test(&mut self, entries: Vec<HitTestEntry>) {
        self.hit_test = entries;
    }

    pub fn hit_test(&self) -> &[HitTestEntry] {
        &self.hit_test
    }

    fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.hit_test.iter().find(|e| e.widget == id).and_then(|e| e.parent)
    }

    fn chain_from(&self, id: WidgetId) -> Vec<WidgetId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Finds the topmost hit-testable widget at `point` (spec.md §4.L
    /// dispatch step 1): the capture stack top if the mouse is captured,
    /// otherwise the highest-`z_index` entry whose rectangle (or `anywhere`
    /// flag) and scissor both contain the point.
    pub fn topmost_at(&self, point: Point) -> Option<WidgetId> {
        if let Some(&top) = self.mouse_capture.last() {
            return Some(top);
        }
        self.hit_test.iter().filter(|e| e.hit(point)).max_by_key(|e| e.z_index).map(|e| e.widget)
    }

    // --- focus --------------------------------------------------------

    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// `setFocus` (spec.md §4.L "Focus"): blurs the current focus (if any
    /// and different) and focuses `widget`, honoring §8 invariant 11 — at
    /// most one widget holds focus.
    pub fn set_focus(&mut self, widget: Option<WidgetId>, by_keyboard: bool, mut deliver: impl FnMut(WidgetId, &Event) -> bool) {
        if self.focused == widget {
            return;
        }
        if let Some(old) = self.focused.take() {
            deliver(old, &Event::Blurred);
        }
        self.focused = widget;
        if let Some(w) = widget {
            deliver(w, &Event::Focused { by_keyboard });
        }
    }

    pub fn set_autofocus(&mut self, widget: Option<WidgetId>) {
        self.autofocus = widget;
    }

    pub fn autofocus(&self) -> Option<WidgetId> {
        self.autofocus
    }

    /// `Tab`/`Shift-Tab` navigation within the focused widget's tab group
    /// (spec.md §4.L: "tab groups are nestable" — modeled by each entry
    /// carrying the id of its nearest `focus_capture` ancestor).
    pub fn move_focus(&mut self, reverse: bool, deliver: impl FnMut(WidgetId, &Event) -> bool) {
        if let Some(next) = self.next_tab_stop(reverse) {
            self.set_focus(Some(next), true, deliver);
        }
    }

    fn next_tab_stop(&self, reverse: bool) -> Option<WidgetId> {
        let group = self
            .focused
            .and_then(|f| self.hit_test.iter().find(|e| e.widget == f))
            .map(|e| e.tab_group)
            .unwrap_or(0);
        let mut group_list: Vec<&HitTestEntry> = self.hit_test.iter().filter(|e| e.tab_stop && e.tab_group == group).collect();
        group_list.sort_by_key(|e| e.z_index);
        if group_list.is_empty() {
            return None;
        }
        let current_pos = self.focused.and_then(|f| group_list.iter().position(|e| e.widget == f));
        let next_index = match current_pos {
            None => {
                if reverse {
                    group_list.len() - 1
                } else {
                    0
                }
            }
            Some(pos) => {
                if reverse {
                    (pos + group_list.len() - 1) % group_list.len()
                } else {
                    (pos + 1) % group_list.len()
                }
            }
        };
        Some(group_list[next_index].widget)
    }

    // --- mouse capture --------------------------------------------------

    pub fn capture_mouse(&mut self, widget: WidgetId) {
        self.mouse_capture.push(widget);
    }

    pub fn release_mouse_capture(&mut self, widget: WidgetId) {
        if self.mouse_capture.last() == Some(&widget) {
            self.mouse_capture.pop();
        }
    }

    pub fn is_mouse_captured(&self) -> bool {
        !self.mouse_capture.is_empty()
    }

    pub fn capture_key(&mut self, widget: WidgetId) {
        self.key_capture.push(widget);
    }

    pub fn release_key_capture(&mut self, widget: WidgetId) {
        if self.key_capture.last() == Some(&widget) {
            self.key_capture.pop();
        }
    }

    fn key_target(&self) -> Option<WidgetId> {
        self.key_capture.last().copied().or(self.focused)
    }

    // --- dispatch --------------------------------------------------------

    fn bubble(&self, start: WidgetId, event: &Event, deliver: &mut impl FnMut(WidgetId, &Event) -> bool) {
        let mut current = Some(start);
        while let Some(id) = current {
            let consumed = deliver(id, event);
            if consumed || !event.should_bubble() {
                break;
            }
            current = self.parent_of(id);
        }
    }

    /// Updates hover state (spec.md §4.L dispatch step 3): widgets leaving
    /// the topmost ancestor chain get `MouseExited`, widgets entering it get
    /// `MouseEntered`, innermost (topmost) first either way.
    fn update_hover(&mut self, point: Point, deliver: &mut impl FnMut(WidgetId, &Event) -> bool) {
        let new_chain = self.topmost_at(point).map(|id| self.chain_from(id)).unwrap_or_default();
        for &old in &self.hovered_chain {
            if !new_chain.contains(&old) {
                deliver(old, &Event::MouseExited { point });
            }
        }
        for &new in &new_chain {
            if !self.hovered_chain.contains(&new) {
                deliver(new, &Event::MouseEntered { point });
            }
        }
        self.hovered_chain = new_chain;
    }

    /// Dispatches a `MouseMoved`/wheel-style event: delivers to the topmost
    /// widget at its point (bubbling per `should_bubble`), then updates
    /// hover.
    pub fn dispatch_mouse_event(&mut self, event: Event, mut deliver: impl FnMut(WidgetId, &Event) -> bool) {
        if let Some(point) = event.point() {
            self.last_mouse_point = Some(point);
            if let Some(target) = self.topmost_at(point) {
                self.bubble(target, &event, &mut deliver);
            }
            self.update_hover(point, &mut deliver);
        }
    }

    /// A button press (spec.md §4.L dispatch step 4): dispatches
    /// `ButtonPressed`, records the press point for subsequent `MouseMoved`
    /// events to report, and — if `auto_capture` is set (the original's
    /// per-widget `autoMouseCapture` property) — pushes the target onto the
    /// capture stack.
    pub fn handle_button_pressed(&mut self, button: MouseButton, point: Point, auto_capture: bool, mut deliver: impl FnMut(WidgetId, &Event) -> bool) -> Option<WidgetId> {
        self.last_press_point = Some(point);
        let target = self.topmost_at(point);
        if let Some(target) = target {
            self.bubble(target, &Event::ButtonPressed { point, button }, &mut deliver);
            if auto_capture {
                self.capture_mouse(target);
            }
        }
        target
    }

    /// A button release: dispatches `ButtonReleased`, pops a matching
    /// capture, and clears the press point.
    pub fn handle_button_released(&mut self, button: MouseButton, point: Point, mut deliver: impl FnMut(WidgetId, &Event) -> bool) {
        let target = self.topmost_at(point);
        if let Some(target) = target {
            self.bubble(target, &Event::ButtonReleased { point, button }, &mut deliver);
        }
        if let Some(&top) = self.mouse_capture.last() {
            if target.is_none() || target == Some(top) {
                self.mouse_capture.pop();
            }
        }
        self.last_press_point = None;
    }

    pub fn press_point(&self) -> Option<Point> {
        self.last_press_point
    }

    pub fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Dispatches a key event to the key-capturing stack top, or the
    /// focused widget otherwise (spec.md §4.L "Key events").
    pub fn dispatch_key_event(&self, event: Event, mut deliver: impl FnMut(WidgetId, &Event) -> bool) {
        if let Some(target) = self.key_target() {
            self.bubble(target, &event, &mut deliver);
        }
    }

    // --- double/triple click --------------------------------------------

    /// Classifies a press against the last recorded click (spec.md §8
    /// invariant 12): three presses within `doubleClickTime`/
    /// `doubleClickDistance` of each other yield `Double` on the second and
    /// `Triple` on the third; the sequence then resets.
    pub fn record_click(&mut self, button: MouseButton, point: Point, now: f32) -> ClickKind {
        let continues = match self.last_click {
            Some((last_button, last_point, last_time)) => {
                last_button == button && (now - last_time) <= self.double_click_time && distance(last_point, point) <= self.double_click_distance
            }
            None => false,
        };
        self.last_click_count = if continues { self.last_click_count + 1 } else { 1 };
        self.last_click = Some((button, point, now));
        match self.last_click_count {
            1 => ClickKind::Single,
            2 => ClickKind::Double,
            _ => {
                self.last_click_count = 0;
                ClickKind::Triple
            }
        }
    }

    // --- drag and drop ----------------------------------------------------

    /// `beginDrag` (spec.md §4.L): arms the drag-and-drop state machine.
    pub fn begin_drag(&mut self, source: WidgetId, object: D, button: MouseButton, point: Point) {
        self.drag = Some(DragState { source, object, button, target: None, allow_drop: false, started: false, start_point: point });
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn drag_object(&self) -> Option<&D> {
        self.drag.as_ref().map(|d| &d.object)
    }

    /// Called by a drag target's handler while it's receiving
    /// `TargetDragging{Over}`, to permit a drop on release (spec.md §4.L:
    /// "The target calls `allowDrop()` during `Over` to permit a drop").
    pub fn allow_drop(&mut self) {
        if let Some(drag) = &mut self.drag {
            drag.allow_drop = true;
        }
    }

    /// Advances the drag-and-drop state machine on pointer movement while
    /// the drag button is held: once the pointer has moved past
    /// `drag_threshold`, emits `SourceDragging{Enter}` to the source on the
    /// first such move and `{Over}` on every later one (spec.md §8 S6:
    /// "`SourceDragging(Enter on S)`" then "zero or more `Over`"), and
    /// `TargetDragging{Enter|Over|Exit}` to the widget under the cursor.
    pub fn drag_moved(&mut self, point: Point, mut deliver: impl FnMut(WidgetId, &Event) -> bool) {
        let Some(drag) = &self.drag else { return };
        let source = drag.source;
        let old_target = drag.target;
        let already_started = drag.started;
        if !already_started && distance(drag.start_point, point) < self.drag_threshold {
            return;
        }

        let source_phase = if already_started { DragPhase::Over } else { DragPhase::Enter };
        deliver(source, &Event::SourceDragging { phase: source_phase, point });

        let new_target = self.topmost_at(point).filter(|&w| w != source);
        if old_target != new_target {
            if let Some(old) = old_target {
                deliver(old, &Event::TargetDragging { phase: DragPhase::Exit, point });
            }
            if let Some(new) = new_target {
                deliver(new, &Event::TargetDragging { phase: DragPhase::Enter, point });
            }
        } else if let Some(new) = new_target {
            deliver(new, &Event::TargetDragging { phase: DragPhase::Over, point });
        }

        if let Some(drag) = &mut self.drag {
            drag.started = true;
            drag.target = new_target;
            if old_target != new_target {
                drag.allow_drop = false;
            }
        }
    }

    /// The button-release end of the drag-and-drop state machine (spec.md
    /// §4.L): delivers `Dropped{Drop}` to both sides if the target allowed
    /// the drop, `Dropped{Cancel}` otherwise, and clears drag state.
    pub fn end_drag(&mut self, mut deliver: impl FnMut(WidgetId, &Event) -> bool) -> Option<D> {
        let drag = self.drag.take()?;
        let outcome = if drag.allow_drop { DropOutcome::Drop } else { DropOutcome::Cancel };
        deliver(drag.source, &Event::SourceDropped { outcome });
        if let Some(target) = drag.target {
            deliver(target, &Event::TargetDropped { outcome });
        }
        Some(drag.object)
    }

    /// `cancelDragging()`: immediate cancel regardless of button state.
    pub fn cancel_dragging(&mut self, deliver: impl FnMut(WidgetId, &Event) -> bool) -> Option<D> {
        if let Some(drag) = &mut self.drag {
            drag.allow_drop = false;
        }
        self.end_drag(deliver)
    }

    // --- event queue / re-injection --------------------------------------

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Re-injects `event` so it's delivered at the start of the *next*
    /// frame rather than immediately (spec.md §5 "re-injected events are
    /// deferred to the next frame").
    pub fn reinject(&mut self, event: Event) {
        self.next_reinject.push(event);
    }

    /// Rolls last frame's re-injected events to the front of this frame's
    /// queue. Called once per frame before draining.
    pub fn begin_frame(&mut self) {
        for event in self.pending_reinject.drain(..).rev() {
            self.queue.push_front(event);
        }
        self.pending_reinject = std::mem::take(&mut self.next_reinject);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

fn distance(a: Point, b: Point) -> f32 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(index: u32) -> WidgetId {
        crate::widget::core::WidgetId::from_raw(index, 0)
    }

    fn entry(widget: WidgetId, parent: Option<WidgetId>, rect: Rectangle, z: usize) -> HitTestEntry {
        HitTestEntry {
            widget,
            parent,
            rect,
            scissor: rect,
            z_index: z,
            anywhere: false,
            visible: true,
            mouse_transparent: false,
            tab_stop: false,
            tab_group: 0,
        }
    }

    #[test]
    fn topmost_at_prefers_the_highest_z_index() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let a = widget(0);
        let b = widget(1);
        let rect = Rectangle::from_corners((0.0, 0.0), (100.0, 100.0));
        q.set_hit_test(vec![entry(a, None, rect, 0), entry(b, None, rect, 1)]);
        assert_eq!(q.topmost_at(Point::new(10.0, 10.0)), Some(b));
    }

    #[test]
    fn mouse_capture_overrides_hit_test() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let a = widget(0);
        let b = widget(1);
        let rect = Rectangle::from_corners((0.0, 0.0), (100.0, 100.0));
        q.set_hit_test(vec![entry(a, None, rect, 0), entry(b, None, rect, 1)]);
        q.capture_mouse(a);
        assert_eq!(q.topmost_at(Point::new(10.0, 10.0)), Some(a));
    }

    #[test]
    fn hover_enter_and_exit_fire_once_each() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let a = widget(0);
        let rect_a = Rectangle::from_corners((0.0, 0.0), (50.0, 50.0));
        let b = widget(1);
        let rect_b = Rectangle::from_corners((60.0, 60.0), (100.0, 100.0));
        q.set_hit_test(vec![entry(a, None, rect_a, 0), entry(b, None, rect_b, 0)]);

        let mut delivered = Vec::new();
        q.dispatch_mouse_event(Event::MouseMoved { point: Point::new(10.0, 10.0), press_point: None }, |id, e| {
            delivered.push((id, format!("{:?}", e)));
            false
        });
        assert!(delivered.iter().any(|(id, e)| *id == a && e.contains("Entered")));

        delivered.clear();
        q.dispatch_mouse_event(Event::MouseMoved { point: Point::new(80.0, 80.0), press_point: None }, |id, e| {
            delivered.push((id, format!("{:?}", e)));
            false
        });
        assert!(delivered.iter().any(|(id, e)| *id == a && e.contains("Exited")));
        assert!(delivered.iter().any(|(id, e)| *id == b && e.contains("Entered")));
    }

    #[test]
    fn double_and_triple_click_window() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let p = Point::new(10.0, 10.0);
        assert_eq!(q.record_click(MouseButton::Left, p, 0.0), ClickKind::Single);
        assert_eq!(q.record_click(MouseButton::Left, p, 0.1), ClickKind::Double);
        assert_eq!(q.record_click(MouseButton::Left, p, 0.2), ClickKind::Triple);
        // sequence resets after the triple
        assert_eq!(q.record_click(MouseButton::Left, p, 0.3), ClickKind::Single);
    }

    #[test]
    fn a_click_outside_the_distance_window_does_not_count_as_double() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        assert_eq!(q.record_click(MouseButton::Left, Point::new(0.0, 0.0), 0.0), ClickKind::Single);
        assert_eq!(q.record_click(MouseButton::Left, Point::new(50.0, 50.0), 0.1), ClickKind::Single);
    }

    #[test]
    fn focus_is_exclusive_and_emits_blur_then_focus() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let a = widget(0);
        let b = widget(1);
        let mut events = Vec::new();
        q.set_focus(Some(a), false, |id, e| {
            events.push((id, format!("{:?}", e)));
            false
        });
        q.set_focus(Some(b), true, |id, e| {
            events.push((id, format!("{:?}", e)));
            false
        });
        assert_eq!(q.focused(), Some(b));
        assert!(events.iter().any(|(id, e)| *id == a && e.contains("Blurred")));
        assert!(events.iter().any(|(id, e)| *id == b && e.contains("Focused")));
    }

    #[test]
    fn tab_moves_focus_forward_with_wraparound() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        let a = widget(0);
        let b = widget(1);
        let rect = Rectangle::from_corners((0.0, 0.0), (10.0, 10.0));
        let mut ea = entry(a, None, rect, 0);
        ea.tab_stop = true;
        let mut eb = entry(b, None, rect, 1);
        eb.tab_stop = true;
        q.set_hit_test(vec![ea, eb]);
        q.set_focus(Some(a), true, |_, _| false);
        q.move_focus(false, |_, _| false);
        assert_eq!(q.focused(), Some(b));
        q.move_focus(false, |_, _| false);
        assert_eq!(q.focused(), Some(a));
    }

    #[test]
    fn drag_and_drop_sequence_on_successful_drop() {
        let mut q: InputQueue<&'static str> = InputQueue::new(0.4, 4.0);
        let source = widget(0);
        let target = widget(1);
        let rect = Rectangle::from_corners((0.0, 0.0), (100.0, 100.0));
        q.set_hit_test(vec![entry(target, None, rect, 0)]);

        q.begin_drag(source, "payload", MouseButton::Left, Point::new(0.0, 0.0));
        let mut log = Vec::new();
        q.drag_moved(Point::new(50.0, 50.0), |id, e| {
            log.push((id, format!("{:?}", e)));
            false
        });
        assert!(log.iter().any(|(id, e)| *id == source && e.contains("SourceDragging")));
        assert!(log.iter().any(|(id, e)| *id == target && e.contains("TargetDragging")));

        q.allow_drop();
        log.clear();
        let object = q.end_drag(|id, e| {
            log.push((id, format!("{:?}", e)));
            false
        });
        assert_eq!(object, Some("payload"));
        assert!(log.iter().any(|(id, e)| *id == source && e.contains("Drop")));
        assert!(log.iter().any(|(id, e)| *id == target && e.contains("Drop")));
        assert!(!q.is_dragging());
    }

    #[test]
    fn drag_cancelled_without_allow_drop() {
        let mut q: InputQueue<()> = InputQueue::new(0.4, 4.0);
        let source = widget(0);
        q.begin_drag(source, (), MouseButton::Left, Point::new(0.0, 0.0));
        let mut log = Vec::new();
        q.end_drag(|id, e| {
            log.push((id, format!("{:?}", e)));
            false
        });
        assert!(log.iter().any(|(id, e)| *id == source && e.contains("Cancel")));
    }

    #[test]
    fn reinjected_events_surface_on_the_next_frame_only() {
        let mut q: InputQueue = InputQueue::new(0.4, 4.0);
        q.reinject(Event::CharTyped { ch: 'x' });
        assert!(q.drain().is_empty());
        q.begin_frame();
        let drained = q.drain();
        assert_eq!(drained.len(), 1);
    }
}
