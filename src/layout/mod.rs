//! The flexbox-subset layout adapter (spec.md §4.I): the style inputs the
//! solver consumes, the `AvailableSize`/`MeasureMode` vocabulary intrinsic
//! sizing participates in, and `calculate_layout` itself.

pub mod flex;

pub use flex::{
    Align, AlignContent, AlignItems, AlignSelf, AvailableLength, AvailableSize, Display, EdgesL,
    FlexDirection, FlexStyle, Gutter, Justify, LayoutHost, LayoutResult, MeasureMode, Overflow,
    PositionType, ResolveContext, Wrap, calculate_layout,
};
