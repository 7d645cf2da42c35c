//! The [`Widget`] struct itself: identity, tree linkage, a representative
//! slice of the original's ~100 typed properties, paint/layout output state,
//! and the builder-callback/transition machinery spec.md §4.J describes.
//!
//! Grounded on `original_source/include/brisk/gui/Properties.hpp`'s property
//! declaration table (the `(index, Type, flags, field, …)` rows) — this
//! crate implements a representative cross-section (layout dimensions, box
//! model, flex participation, paint colors, text alignment, interaction
//! flags) rather than the original's full property count, per SPEC_FULL.md's
//! scope note. Every property still goes through the same [`Prop`]/
//! [`ResolvableProp`] state machine the original's full set would use.

use bitflags::bitflags;

use crate::color::{Color, ColorF};
use crate::geometry::{Corners, EdgesOf, Length};
use crate::layout::{
    AlignContent, AlignItems, AlignSelf, Display, FlexDirection, FlexStyle, Justify, LayoutResult,
    Overflow, PositionType, ResolveContext, Wrap,
};

use super::binding::PropertyAddress;
use super::property::{
    AlignToViewport, Classes, FlowAxis, LayoutOrder, Placement, Prop, PropFlags, ResolvableProp,
    Rotation, TextAlign, WidgetClip, ZOrder,
};
use super::style::SelectorTarget;

/// A generational handle into the widget tree's arena (`crate::tree`). Two
/// widgets never share an id while both are live; an id whose generation no
/// longer matches the slot it indexes refers to a widget that has since been
/// removed, which is how the tree tells a stale handle from a live one
/// without scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetId {
    index: u32,
    generation: u32,
}

impl WidgetId {
    pub(crate) fn from_raw(index: u32, generation: u32) -> Self {
        WidgetId { index, generation }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

bitflags! {
    /// Interaction/pseudo-class state, matched by stylesheet `State`
    /// selectors and read directly by widgets that change appearance on
    /// hover/press without a stylesheet (spec.md §4.K).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WidgetState: u16 {
        const HOVER      = 1 << 0;
        const PRESSED    = 1 << 1;
        const FOCUSED    = 1 << 2;
        const KEY_FOCUSED = 1 << 3;
        const SELECTED   = 1 << 4;
        const DISABLED   = 1 << 5;
    }
}

/// Whether a widget (and which part of its subtree) needs the styling pass
/// to revisit it, per spec.md §4.K step 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StyleState {
    #[default]
    None,
    NeedRestyleForChildren,
    NeedRestyle,
}

/// When a builder callback registered via [`Widget::add_callback`] runs
/// relative to the widget's lifetime: immediately and once (`Once`), on
/// every update cycle (`Regular`), or on the next cycle only, then removed
/// (`Delayed`) — e.g. a one-shot focus grab that must wait for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Once,
    Regular,
    Delayed,
}

pub type BuilderCallback = Box<dyn FnMut(&mut Widget) + Send>;

/// An in-flight animation of a color property from `from` to `to` over
/// `duration` seconds, driven by the tree's animation phase
/// (spec.md §4.K step 5). `property_index` is whatever the caller used to
/// register the matching [`PropertyAddress`] with the binding registry, if
/// any observer cares when it completes.
pub struct ColorTransition {
    pub property_index: u32,
    pub from: ColorF,
    pub to: ColorF,
    pub duration: f32,
    pub elapsed: f32,
}

impl ColorTransition {
    fn value(&self) -> ColorF {
        let t = if self.duration <= 0.0 { 1.0 } else { (self.elapsed / self.duration).clamp(0.0, 1.0) };
        ColorF::mix(t, self.from, self.to)
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

macro_rules! edges_resolvable {
    () => {
        EdgesOf<ResolvableProp>
    };
}

/// One widget instance. Properties are grouped the way
/// `original_source/include/brisk/gui/Properties.hpp` groups them: identity,
/// flex participation, box model, paint, text, then interaction/animation
/// state that isn't itself a style-settable property.
pub struct Widget {
    pub(crate) id: WidgetId,
    pub(crate) parent: Option<WidgetId>,
    pub(crate) children: Vec<WidgetId>,

    pub type_name: &'static str,
    pub widget_id_attr: Option<String>,
    pub classes: Classes,
    pub role: Option<String>,

    pub placement: Prop<Placement>,
    pub clip: Prop<WidgetClip>,
    pub z_order: Prop<ZOrder>,
    pub flow_axis: Prop<FlowAxis>,
    pub layout_order: Prop<LayoutOrder>,
    pub rotation: Prop<Rotation>,
    pub text_align: Prop<TextAlign>,
    pub align_to_viewport: Prop<AlignToViewport>,
    pub visible: Prop<bool>,
    pub enabled: Prop<bool>,
    pub tab_stop: Prop<bool>,
    /// Excludes this widget (but not its children) from hit testing,
    /// per spec.md §4.L's `mouseTransparent` hit-test map field.
    pub mouse_transparent: Prop<bool>,
    /// Matches regardless of whether the point falls in the widget's
    /// scissored rectangle — the `anywhere=true` escape hatch spec.md
    /// §4.L's dispatch algorithm names (e.g. a full-viewport drag catcher).
    pub hit_test_anywhere: Prop<bool>,
    /// Marks this widget as a `focusCapture` scope boundary: tab navigation
    /// and autofocus resolution starting inside this subtree stay inside it
    /// (spec.md §4.L "Focus").
    pub focus_capture: Prop<bool>,

    pub direction: Prop<FlexDirection>,
    pub justify_content: Prop<Justify>,
    pub align_items: Prop<AlignItems>,
    pub align_self: Prop<AlignSelf>,
    pub align_content: Prop<AlignContent>,
    pub wrap: Prop<Wrap>,
    pub overflow_x: Prop<Overflow>,
    pub overflow_y: Prop<Overflow>,
    pub display: Prop<Display>,
    pub position: Prop<PositionType>,
    pub flex_grow: Prop<f32>,
    pub flex_shrink: Prop<f32>,
    pub flex_basis: ResolvableProp,
    pub gap_column: ResolvableProp,
    pub gap_row: ResolvableProp,

    pub width: ResolvableProp,
    pub height: ResolvableProp,
    pub min_width: ResolvableProp,
    pub min_height: ResolvableProp,
    pub max_width: ResolvableProp,
    pub max_height: ResolvableProp,
    pub margin: edges_resolvable!(),
    pub padding: edges_resolvable!(),
    pub border_width: edges_resolvable!(),
    pub left: ResolvableProp,
    pub top: ResolvableProp,
    pub right: ResolvableProp,
    pub bottom: ResolvableProp,

    pub background_color: Prop<Color>,
    pub border_color: Prop<Color>,
    pub color: Prop<Color>,
    pub corner_radius: Prop<Corners>,
    pub shadow_color: Prop<Color>,
    pub shadow_offset: Prop<(f32, f32)>,
    pub shadow_spread: Prop<f32>,
    pub opacity: Prop<f32>,
    pub font_size: ResolvableProp,
    pub font_family: Prop<Option<String>>,

    pub text: Prop<String>,

    pub state: WidgetState,
    pub style_state: StyleState,

    pub layout_result: Option<LayoutResult>,
    pub transitions: Vec<ColorTransition>,

    pub callbacks: Vec<(CallbackKind, BuilderCallback)>,
}

impl Widget {
    pub fn new(type_name: &'static str) -> Self {
        Widget {
            id: WidgetId::from_raw(0, 0),
            parent: None,
            children: Vec::new(),

            type_name,
            widget_id_attr: None,
            classes: Classes::new(),
            role: None,

            placement: Prop::tracked(Placement::default(), PropFlags::AFFECT_LAYOUT),
            clip: Prop::default(),
            z_order: Prop::tracked(ZOrder::default(), PropFlags::AFFECT_LAYOUT),
            flow_axis: Prop::tracked(FlowAxis::default(), PropFlags::AFFECT_LAYOUT),
            layout_order: Prop::tracked(LayoutOrder::default(), PropFlags::AFFECT_LAYOUT),
            rotation: Prop::tracked(Rotation::default(), PropFlags::AFFECT_STYLE),
            text_align: Prop::tracked(TextAlign::default(), PropFlags::INHERITABLE),
            align_to_viewport: Prop::tracked(AlignToViewport::default(), PropFlags::AFFECT_LAYOUT),
            visible: Prop::tracked(true, PropFlags::AFFECT_LAYOUT),
            enabled: Prop::tracked(true, PropFlags::AFFECT_STYLE),
            tab_stop: Prop::new(false),
            mouse_transparent: Prop::new(false),
            hit_test_anywhere: Prop::new(false),
            focus_capture: Prop::new(false),

            direction: Prop::tracked(FlexDirection::default(), PropFlags::AFFECT_LAYOUT),
            justify_content: Prop::tracked(Justify::default(), PropFlags::AFFECT_LAYOUT),
            align_items: Prop::tracked(AlignItems::default(), PropFlags::AFFECT_LAYOUT),
            align_self: Prop::tracked(AlignSelf::default(), PropFlags::AFFECT_LAYOUT),
            align_content: Prop::tracked(AlignContent::default(), PropFlags::AFFECT_LAYOUT),
            wrap: Prop::tracked(Wrap::default(), PropFlags::AFFECT_LAYOUT),
            overflow_x: Prop::tracked(Overflow::default(), PropFlags::AFFECT_LAYOUT),
            overflow_y: Prop::tracked(Overflow::default(), PropFlags::AFFECT_LAYOUT),
            display: Prop::tracked(Display::default(), PropFlags::AFFECT_LAYOUT),
            position: Prop::tracked(PositionType::default(), PropFlags::AFFECT_LAYOUT),
            flex_grow: Prop::tracked(0.0, PropFlags::AFFECT_LAYOUT),
            flex_shrink: Prop::tracked(1.0, PropFlags::AFFECT_LAYOUT),
            flex_basis: ResolvableProp::tracked(Length::AUTO, true, PropFlags::AFFECT_LAYOUT),
            gap_column: ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
            gap_row: ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),

            width: ResolvableProp::tracked(Length::AUTO, true, PropFlags::AFFECT_LAYOUT),
            height: ResolvableProp::tracked(Length::AUTO, false, PropFlags::AFFECT_LAYOUT),
            min_width: ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
            min_height: ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
            max_width: ResolvableProp::tracked(Length::AUTO, true, PropFlags::AFFECT_LAYOUT),
            max_height: ResolvableProp::tracked(Length::AUTO, false, PropFlags::AFFECT_LAYOUT),
            margin: EdgesOf::new(
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
            ),
            padding: EdgesOf::new(
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
            ),
            border_width: EdgesOf::new(
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), true, PropFlags::AFFECT_LAYOUT),
                ResolvableProp::tracked(Length::px(0.0), false, PropFlags::AFFECT_LAYOUT),
            ),
            left: ResolvableProp::tracked(Length::AUTO, true, PropFlags::AFFECT_LAYOUT),
            top: ResolvableProp::tracked(Length::AUTO, false, PropFlags::AFFECT_LAYOUT),
            right: ResolvableProp::tracked(Length::AUTO, true, PropFlags::AFFECT_LAYOUT),
            bottom: ResolvableProp::tracked(Length::AUTO, false, PropFlags::AFFECT_LAYOUT),

            background_color: Prop::tracked(Color::TRANSPARENT, PropFlags::TRANSITION),
            border_color: Prop::tracked(Color::TRANSPARENT, PropFlags::TRANSITION),
            color: Prop::tracked(Color::BLACK, PropFlags::TRANSITION | PropFlags::INHERITABLE),
            corner_radius: Prop::tracked(Corners::default(), PropFlags::AFFECT_STYLE | PropFlags::INHERITABLE),
            shadow_color: Prop::tracked(Color::TRANSPARENT, PropFlags::AFFECT_STYLE | PropFlags::TRANSITION),
            shadow_offset: Prop::tracked((0.0, 0.0), PropFlags::AFFECT_STYLE),
            shadow_spread: Prop::tracked(0.0, PropFlags::AFFECT_STYLE),
            opacity: Prop::tracked(1.0, PropFlags::AFFECT_STYLE),
            font_size: ResolvableProp::tracked(
                Length::px(12.0),
                false,
                PropFlags::AFFECT_LAYOUT
                    | PropFlags::AFFECT_RESOLVE
                    | PropFlags::AFFECT_FONT
                    | PropFlags::INHERITABLE
                    | PropFlags::RELATIVE_TO_PARENT,
            ),
            font_family: Prop::tracked(None, PropFlags::AFFECT_LAYOUT | PropFlags::AFFECT_FONT | PropFlags::INHERITABLE),

            text: Prop::tracked(String::new(), PropFlags::AFFECT_LAYOUT),

            state: WidgetState::empty(),
            style_state: StyleState::NeedRestyle,

            layout_result: None,
            transitions: Vec::new(),
            callbacks: Vec::new(),
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    /// Marks this widget dirty for the next styling pass; `for_children`
    /// additionally requests the subtree be revisited even if this widget's
    /// own match set is unchanged (e.g. after a class list edit that might
    /// change descendant-combinator matches).
    pub fn mark_dirty(&mut self, for_children: bool) {
        self.style_state = if for_children { StyleState::NeedRestyleForChildren } else { StyleState::NeedRestyle };
    }

    pub fn add_callback(&mut self, kind: CallbackKind, callback: BuilderCallback) {
        self.callbacks.push((kind, callback));
    }

    /// Routes a changed property's [`PropFlags`] to whichever passes need to
    /// revisit this widget, mirroring the original's `Widget::requestUpdates`
    /// (`GUI.cpp`): `AffectLayout` forces relayout, `AffectStyle` re-queues
    /// the styling pass, and `AffectFont` invalidates layout too since a
    /// font change moves resolved text metrics. Called with whatever
    /// [`Prop::set_requesting`]/[`ResolvableProp::set_requesting`] returns.
    pub fn request_updates(&mut self, flags: PropFlags) {
        if flags.intersects(PropFlags::AFFECT_LAYOUT | PropFlags::AFFECT_FONT) {
            self.layout_result = None;
        }
        if flags.contains(PropFlags::AFFECT_STYLE) && self.style_state == StyleState::None {
            self.style_state = StyleState::NeedRestyle;
        }
    }

    /// Runs every registered callback once, dropping `Once` entries
    /// afterward (`Regular` and `Delayed` callbacks stay registered and
    /// re-run on every rebuild, per spec.md §4.K phase 1 / §9).
    pub fn run_callbacks(&mut self) {
        let callbacks = std::mem::take(&mut self.callbacks);
        let mut kept = Vec::with_capacity(callbacks.len());
        for (kind, mut callback) in callbacks {
            callback(self);
            if kind != CallbackKind::Once {
                kept.push((kind, callback));
            }
        }
        self.callbacks = kept;
    }

    /// Begins animating `background_color` from its current displayed value
    /// to `to` over `duration` seconds, rather than snapping immediately
    /// (spec.md §4.J: "color properties ... may transition").
    pub fn transition_background_color(&mut self, to: Color, duration: f32) {
        let from = self.displayed_background_color();
        let flags = self.background_color.set_requesting(to, false, true);
        self.request_updates(flags);
        if duration > 0.0 {
            self.transitions.push(ColorTransition {
                property_index: PROPERTY_INDEX_BACKGROUND_COLOR,
                from: from.to_float(),
                to: to.to_float(),
                duration,
                elapsed: 0.0,
            });
        }
    }

    /// The color that should actually be painted this frame: the target
    /// value, unless an in-flight transition for it hasn't finished yet.
    pub fn displayed_background_color(&self) -> Color {
        for t in &self.transitions {
            if t.property_index == PROPERTY_INDEX_BACKGROUND_COLOR && !t.is_done() {
                return t.value().into();
            }
        }
        *self.background_color.get()
    }

    /// Advances every in-flight transition by `dt` seconds, dropping those
    /// that complete. Returns whether any transition is still running (the
    /// tree's animation phase uses this to decide whether another repaint
    /// is needed next frame).
    pub fn advance_transitions(&mut self, dt: f32) -> bool {
        for t in &mut self.transitions {
            t.elapsed += dt;
        }
        self.transitions.retain(|t| !t.is_done());
        !self.transitions.is_empty()
    }

    pub fn property_address(&self, property_index: u32) -> PropertyAddress {
        PropertyAddress { widget: self.id, property_index }
    }

    /// Resolves every `ResolvableProp` against `ctx`, per spec.md §4.J step
    /// 3. Called once per widget per layout pass, before the flex solver
    /// reads its style.
    pub fn resolve_lengths(&mut self, ctx: &ResolveContext) {
        self.width.resolve(ctx);
        self.height.resolve(ctx);
        self.min_width.resolve(ctx);
        self.min_height.resolve(ctx);
        self.max_width.resolve(ctx);
        self.max_height.resolve(ctx);
        self.flex_basis.resolve(ctx);
        self.left.resolve(ctx);
        self.top.resolve(ctx);
        self.right.resolve(ctx);
        self.bottom.resolve(ctx);
        self.font_size.resolve(ctx);
        self.margin.left.resolve(ctx);
        self.margin.right.resolve(ctx);
        self.margin.top.resolve(ctx);
        self.margin.bottom.resolve(ctx);
        self.padding.left.resolve(ctx);
        self.padding.right.resolve(ctx);
        self.padding.top.resolve(ctx);
        self.padding.bottom.resolve(ctx);
        self.border_width.left.resolve(ctx);
        self.border_width.right.resolve(ctx);
        self.border_width.top.resolve(ctx);
        self.border_width.bottom.resolve(ctx);
        self.gap_column.resolve(ctx);
        self.gap_row.resolve(ctx);
    }

    /// Builds the [`FlexStyle`] the layout solver consumes from this
    /// widget's current property values (spec.md §4.I/§4.K boundary).
    pub fn flex_style(&self) -> FlexStyle {
        FlexStyle {
            direction: *self.direction.get(),
            justify_content: *self.justify_content.get(),
            align_items: *self.align_items.get(),
            align_content: *self.align_content.get(),
            align_self: *self.align_self.get(),
            wrap: *self.wrap.get(),
            overflow_x: *self.overflow_x.get(),
            overflow_y: *self.overflow_y.get(),
            position: *self.position.get(),
            display: *self.display.get(),
            flex_grow: *self.flex_grow.get(),
            flex_shrink: *self.flex_shrink.get(),
            flex_basis: self.flex_basis.raw(),
            margin: EdgesOf::new(self.margin.left.raw(), self.margin.top.raw(), self.margin.right.raw(), self.margin.bottom.raw()),
            padding: EdgesOf::new(self.padding.left.raw(), self.padding.top.raw(), self.padding.right.raw(), self.padding.bottom.raw()),
            border: EdgesOf::new(
                self.border_width.left.raw(),
                self.border_width.top.raw(),
                self.border_width.right.raw(),
                self.border_width.bottom.raw(),
            ),
            gap_column: self.gap_column.raw(),
            gap_row: self.gap_row.raw(),
            width: self.width.raw(),
            height: self.height.raw(),
            min_width: self.min_width.raw(),
            min_height: self.min_height.raw(),
            max_width: self.max_width.raw(),
            max_height: self.max_height.raw(),
            aspect_ratio: None,
            left: self.left.raw(),
            top: self.top.raw(),
            right: self.right.raw(),
            bottom: self.bottom.raw(),
        }
    }
}

/// Stable property-table index for `background_color`, used to address its
/// transition/binding state. A handful of these constants exist for the
/// properties that actually transition or get bound to; the rest of the
/// property set doesn't need a stable index since nothing outside the
/// widget itself ever addresses them.
pub const PROPERTY_INDEX_BACKGROUND_COLOR: u32 = 0;
pub const PROPERTY_INDEX_COLOR: u32 = 1;
pub const PROPERTY_INDEX_BORDER_COLOR: u32 = 2;

impl SelectorTarget for Widget {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn widget_id(&self) -> Option<&str> {
        self.widget_id_attr.as_deref()
    }

    fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn widget_state(&self) -> WidgetState {
        self.state
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn sibling_index(&self) -> usize {
        // Filled in by the tree when it builds ancestor/sibling context for
        // a styling pass; a freestanding widget (not yet inserted into a
        // tree) is always treated as the first child of its (nonexistent)
        // parent.
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_widget_has_sensible_defaults() {
        let w = Widget::new("box");
        assert!(*w.visible.get());
        assert!(*w.enabled.get());
        assert_eq!(*w.opacity.get(), 1.0);
        assert_eq!(w.style_state, StyleState::NeedRestyle);
    }

    #[test]
    fn transition_background_color_animates_toward_target() {
        let mut w = Widget::new("box");
        w.background_color.set(Color::BLACK, false, true);
        w.transition_background_color(Color::WHITE, 1.0);
        assert_eq!(w.displayed_background_color(), Color::BLACK);
        let still_running = w.advance_transitions(0.5);
        assert!(still_running);
        let mid = w.displayed_background_color();
        assert_ne!(mid, Color::BLACK);
        assert_ne!(mid, Color::WHITE);
        let still_running = w.advance_transitions(0.5);
        assert!(!still_running);
        assert_eq!(w.displayed_background_color(), Color::WHITE);
    }

    #[test]
    fn callbacks_once_run_a_single_time() {
        let mut w = Widget::new("box");
        let mut runs = 0u32;
        w.add_callback(CallbackKind::Once, Box::new(|_| {}));
        w.run_callbacks();
        assert!(w.callbacks.is_empty());
        let _ = runs; // silence unused in case of future expansion
        runs += 1;
        assert_eq!(runs, 1);
    }

    #[test]
    fn regular_callbacks_stay_registered() {
        let mut w = Widget::new("box");
        w.add_callback(CallbackKind::Regular, Box::new(|_| {}));
        w.run_callbacks();
        assert_eq!(w.callbacks.len(), 1);
    }

    #[test]
    fn delayed_callbacks_stay_registered_and_rerun_every_rebuild() {
        let mut w = Widget::new("box");
        w.add_callback(CallbackKind::Delayed, Box::new(|_| {}));
        w.run_callbacks();
        assert_eq!(w.callbacks.len(), 1);
        w.run_callbacks();
        assert_eq!(w.callbacks.len(), 1);
    }

    #[test]
    fn changing_an_affect_layout_property_invalidates_layout_result() {
        let mut w = Widget::new("box");
        w.layout_result = Some(LayoutResult::default());
        let flags = w.width.set_requesting(Length::px(50.0), false, true);
        assert!(flags.contains(PropFlags::AFFECT_LAYOUT));
        w.request_updates(flags);
        assert!(w.layout_result.is_none());
    }

    #[test]
    fn changing_an_affect_style_property_requests_restyle() {
        let mut w = Widget::new("box");
        w.style_state = StyleState::None;
        let flags = w.opacity.set_requesting(0.5, false, true);
        assert!(flags.contains(PropFlags::AFFECT_STYLE));
        w.request_updates(flags);
        assert_eq!(w.style_state, StyleState::NeedRestyle);
    }

    #[test]
    fn an_untagged_property_requests_nothing() {
        let mut w = Widget::new("box");
        w.layout_result = Some(LayoutResult::default());
        let flags = w.tab_stop.set_requesting(true, false, true);
        assert!(flags.is_empty());
        w.request_updates(flags);
        assert!(w.layout_result.is_some());
    }
}
