//! The typed widget property system (spec.md §3/§4.J): [`Widget`] itself,
//! its per-property [`property::Prop`]/[`property::ResolvableProp`] state
//! machine, the default box painter, stylesheet selectors, and external
//! bindings. The widget tree that arranges these into a hierarchy and runs
//! the per-frame pipeline over them lives in [`crate::tree`].

pub mod binding;
pub mod core;
pub mod painter;
pub mod property;
pub mod style;

pub use binding::{BindType, BindingRegistry, PropertyAddress};
pub use core::{
    BuilderCallback, CallbackKind, ColorTransition, StyleState, Widget, WidgetId, WidgetState,
    PROPERTY_INDEX_BACKGROUND_COLOR, PROPERTY_INDEX_BORDER_COLOR, PROPERTY_INDEX_COLOR,
};
pub use painter::{box_painter, BoxAppearance};
pub use property::{
    AlignToViewport, Classes, FlowAxis, FontSize, LayoutOrder, Placement, Prop, PropFlags,
    PropState, ResolvableProp, Rotation, TextAlign, WidgetClip, ZOrder,
};
pub use style::{Selector, SelectorTarget, StyleRule, Stylesheet};
