//! The typed, state-tracked property mechanism spec.md §3/§4.J describes.
//!
//! Grounded on `original_source/include/brisk/gui/Properties.hpp`, read in
//! full: `PropFlags`, the 2-bit `PropState` (`Internal::PropState` there),
//! `Placement`, `WidgetClip`, `ZOrder`, `Layout`/`LayoutOrder`, `Rotation`,
//! `TextAlign`, `AlignToViewport`, `FontSize` are ported with matching
//! variants. The original's bitset-plus-enum-class pair is ported to a
//! `bitflags!`-based state machine rather than reproduced literally.

use bitflags::bitflags;

use crate::geometry::Length;
use crate::layout::ResolveContext;

bitflags! {
    /// What a property declaration affects when it changes, per spec.md
    /// §4.J's `(index, Type, flags, field, [subfield…])` declaration shape.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropFlags: u16 {
        const AFFECT_LAYOUT      = 1 << 0;
        const AFFECT_STYLE       = 1 << 1;
        const TRANSITION         = 1 << 2;
        const RESOLVABLE         = 1 << 3;
        const AFFECT_RESOLVE     = 1 << 4;
        const AFFECT_FONT        = 1 << 5;
        const INHERITABLE        = 1 << 6;
        const RELATIVE_TO_PARENT = 1 << 7;
        const COMPOUND           = 1 << 8;
    }
}

bitflags! {
    /// Per-property state, 2 bits wide per spec.md §3 ("per-property 2-bit
    /// state"). `Overridden` blocks the styling pass from touching a
    /// property a direct API call already set; `Inherited` marks a value
    /// copied from the parent on the last resolve pass.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PropState: u8 {
        const OVERRIDDEN = 1 << 0;
        const INHERITED  = 1 << 1;
    }
}

/// Where a widget sits relative to normal flow, ported from the original's
/// `Placement` enum (Properties.hpp).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    #[default]
    Normal,
    Absolute,
    Window,
}

/// How a widget clips its own and its children's painting, ported from the
/// original's `WidgetClip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetClip {
    #[default]
    Children,
    All,
    Inherit,
    None,
}

/// Paint-order override, ported from the original's `ZOrder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZOrder {
    #[default]
    Normal,
    TopMost,
}

/// The widget's own flex-container axis (`Layout` in the original, renamed
/// to avoid colliding with `crate::layout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowAxis {
    #[default]
    Horizontal,
    Vertical,
}

/// Child iteration order within a container, ported verbatim from the
/// original's `LayoutOrder`. See SPEC_FULL.md / DESIGN.md for the Open
/// Question decision on its interaction with RTL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutOrder {
    #[default]
    Direct,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    NoRotation,
    Rotate90,
    Rotate180,
    Rotate270,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    pub fn to_float_align(self) -> f32 {
        match self {
            TextAlign::Start => 0.0,
            TextAlign::Center => 0.5,
            TextAlign::End => 1.0,
        }
    }
}

bitflags! {
    /// Which viewport axes a `Placement::Window` widget re-anchors to stay
    /// on screen, ported from the original's `AlignToViewport`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AlignToViewport: u8 {
        const X = 1 << 0;
        const Y = 1 << 1;
    }
}

/// A named default type-ramp, ported from the original's `FontSize` enum
/// (not load-bearing for any invariant; a styling convenience).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small = 10,
    Normal = 12,
    Bigger = 16,
    Headline = 24,
}

/// A widget's class list. The original uses a small-vector-of-strings;
/// `Vec<String>` here since the spec doesn't call out an inline-capacity
/// requirement the way it does for e.g. `Length`.
pub type Classes = Vec<String>;

/// A plain (non-resolvable) property: a value plus its 2-bit state and the
/// [`PropFlags`] its declaration carries. Transition/animation state for
/// color properties lives alongside this in `crate::widget::core::Transition`,
/// not inside `Prop` itself, since only a handful of properties (colors) ever
/// transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prop<T> {
    value: T,
    state: PropState,
    flags: PropFlags,
}

impl<T: Clone + PartialEq> Prop<T> {
    /// A property with no declared flags — nothing it affects beyond its own
    /// stored value. Most test fixtures and properties without a tracked
    /// side effect (e.g. `tab_stop`) use this.
    pub fn new(value: T) -> Self {
        Prop { value, state: PropState::empty(), flags: PropFlags::empty() }
    }

    /// A property tagged with the [`PropFlags`] spec.md §4.J's declaration
    /// table assigns it, so [`Prop::set_requesting`] can report what a
    /// change to this property should trigger.
    pub fn tracked(value: T, flags: PropFlags) -> Self {
        Prop { value, state: PropState::empty(), flags }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_overridden(&self) -> bool {
        self.state.contains(PropState::OVERRIDDEN)
    }

    pub fn is_inherited(&self) -> bool {
        self.state.contains(PropState::INHERITED)
    }

    pub fn state(&self) -> PropState {
        self.state
    }

    pub fn flags(&self) -> PropFlags {
        self.flags
    }

    /// Applies the setter semantics of spec.md §4.J steps 1-2: during a
    /// styling pass (`applying_style`), an already-`Overridden` property is
    /// left untouched; otherwise the `Inherited` bit clears, and a direct
    /// API call (`from_api`) sets `Overridden`. Returns whether the stored
    /// value actually changed.
    pub fn set(&mut self, value: T, applying_style: bool, from_api: bool) -> bool {
        if applying_style && self.state.contains(PropState::OVERRIDDEN) {
            return false;
        }
        self.state.remove(PropState::INHERITED);
        if from_api {
            self.state.insert(PropState::OVERRIDDEN);
        }
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Applies [`Prop::set`] and reports which updates the change requests
    /// (spec.md §4.J step 5), mirroring the original's `requestUpdates(flags)`
    /// call that follows every property write (`Widget::requestUpdates`,
    /// `GUI.cpp`). Returns `PropFlags::empty()` when the value didn't change.
    pub fn set_requesting(&mut self, value: T, applying_style: bool, from_api: bool) -> PropFlags {
        if self.set(value, applying_style, from_api) {
            self.flags
        } else {
            PropFlags::empty()
        }
    }

    /// Copies a parent's resolved value in during the inheritance pass
    /// (spec.md §4.J "Inheritance"). Never blocked by `Overridden` — a
    /// property explicitly set back to `inherit` always re-copies.
    pub fn set_inherited(&mut self, value: T) -> bool {
        self.state.insert(PropState::INHERITED);
        if self.value == value {
            return false;
        }
        self.value = value;
        true
    }

    /// Marks this property as wanting inherited values on the next resolve
    /// pass (the `inherit` sentinel from spec.md §4.J).
    pub fn mark_inherit(&mut self) {
        self.state.remove(PropState::OVERRIDDEN);
        self.state.insert(PropState::INHERITED);
    }
}

impl<T: Default + Clone + PartialEq> Default for Prop<T> {
    fn default() -> Self {
        Prop::new(T::default())
    }
}

/// A `Resolvable` dimension property: a raw `Length` the API/style layer
/// writes, plus its resolved pixel value recomputed by
/// `resolve(ResolveContext)` (spec.md §4.J step 3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvableProp {
    raw: Prop<Length>,
    resolved: f32,
    along_width: bool,
}

impl ResolvableProp {
    pub fn new(value: Length, along_width: bool) -> Self {
        ResolvableProp { raw: Prop::new(value), resolved: 0.0, along_width }
    }

    /// A resolvable property tagged with its declared [`PropFlags`] (always
    /// including `RESOLVABLE`, per spec.md §4.J).
    pub fn tracked(value: Length, along_width: bool, flags: PropFlags) -> Self {
        ResolvableProp { raw: Prop::tracked(value, flags | PropFlags::RESOLVABLE), resolved: 0.0, along_width }
    }

    pub fn raw(&self) -> Length {
        *self.raw.get()
    }

    pub fn resolved(&self) -> f32 {
        self.resolved
    }

    pub fn flags(&self) -> PropFlags {
        self.raw.flags()
    }

    pub fn set(&mut self, value: Length, applying_style: bool, from_api: bool) -> bool {
        self.raw.set(value, applying_style, from_api)
    }

    pub fn set_requesting(&mut self, value: Length, applying_style: bool, from_api: bool) -> PropFlags {
        self.raw.set_requesting(value, applying_style, from_api)
    }

    pub fn resolve(&mut self, ctx: &ResolveContext) {
        self.resolved = ctx.resolve(self.raw(), self.along_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styling_pass_does_not_clobber_an_overridden_property() {
        let mut p = Prop::new(1);
        p.set(2, false, true); // direct API call, sets Overridden
        assert!(p.is_overridden());
        let changed = p.set(3, true, false); // stylesheet pass
        assert!(!changed);
        assert_eq!(*p.get(), 2);
    }

    #[test]
    fn styling_pass_applies_when_not_overridden() {
        let mut p: Prop<i32> = Prop::default();
        let changed = p.set(5, true, false);
        assert!(changed);
        assert_eq!(*p.get(), 5);
        assert!(!p.is_overridden());
    }

    #[test]
    fn direct_set_clears_inherited_and_sets_overridden() {
        let mut p = Prop::new(1);
        p.mark_inherit();
        assert!(p.is_inherited());
        p.set(9, false, true);
        assert!(!p.is_inherited());
        assert!(p.is_overridden());
    }

    #[test]
    fn resolvable_prop_resolves_percent_against_parent_width() {
        let mut p = ResolvableProp::new(Length::percent(50.0), true);
        let ctx = ResolveContext {
            parent_width: 200.0,
            parent_height: 100.0,
            font_height: 16.0,
            pixel_ratio: 1.0,
            viewport_width: 800.0,
            viewport_height: 600.0,
        };
        p.resolve(&ctx);
        assert_eq!(p.resolved(), 100.0);
    }
}
