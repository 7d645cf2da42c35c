//! The flexbox subset spec.md §4.I names, grounded on
//! `original_source/include/brisk/gui/Layout.hpp` (read in full: the
//! `FlexDirection`/`Justify`/`Align`/`Wrap`/`Overflow`/`Gutter`/
//! `BoxSizingPerAxis`/`MeasureMode` enums are ported with the same variants
//! and discriminant order). The solver itself has no teacher or pack-crate
//! analogue — hand-written directly against spec.md §4.I's operation list.

use crate::geometry::{Edges, Length, LengthUnit, Rectangle, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    Column,
    ColumnReverse,
    #[default]
    Row,
    RowReverse,
}

impl FlexDirection {
    fn is_row(self) -> bool {
        matches!(self, FlexDirection::Row | FlexDirection::RowReverse)
    }

    fn is_reversed(self) -> bool {
        matches!(self, FlexDirection::RowReverse | FlexDirection::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    Auto,
    FlexStart,
    Center,
    FlexEnd,
    #[default]
    Stretch,
    Baseline,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

pub type AlignItems = Align;
pub type AlignSelf = Align;
pub type AlignContent = Align;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Wrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    ScrollX,
    ScrollY,
    ScrollBoth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gutter {
    Column,
    Row,
    All,
}

/// Named after the original's `Placement` (Properties.hpp) but scoped to
/// what the solver itself needs to know: whether a node participates in
/// flex flow at all. The wider `Placement::Window` case (anchor to the
/// window rather than the parent) is a widget/tree concern layered above
/// this module; see `crate::widget::property::Placement`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionType {
    #[default]
    Relative,
    Absolute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Flex,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasureMode {
    Undefined,
    #[default]
    Exactly,
    AtMost,
}

/// `Length` twin used for "available size" passed down a subtree: instead
/// of a unit tag it carries a `MeasureMode`, matching the original's
/// `AvailableLength = LengthOf<MeasureMode>` (Layout.hpp).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableLength {
    pub value: f32,
    pub mode: MeasureMode,
}

impl AvailableLength {
    pub fn exactly(value: f32) -> Self {
        AvailableLength { value, mode: MeasureMode::Exactly }
    }

    pub fn at_most(value: f32) -> Self {
        AvailableLength { value, mode: MeasureMode::AtMost }
    }

    pub const UNDEFINED: AvailableLength = AvailableLength { value: 0.0, mode: MeasureMode::Undefined };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvailableSize {
    pub width: AvailableLength,
    pub height: AvailableLength,
}

impl AvailableSize {
    pub fn exactly(size: Size) -> Self {
        AvailableSize {
            width: AvailableLength::exactly(size.width),
            height: AvailableLength::exactly(size.height),
        }
    }
}

/// The scale factors a [`Length`] resolves against, per spec.md §4.I: percent
/// resolves against the parent content box, `Em` against the resolved font
/// height, `Pixels` against the pixel ratio, and viewport units against the
/// tree's viewport rectangle. `AlignedPixels` rounds the pixel-ratio-scaled
/// result to the nearest device pixel before converting back to GUI space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolveContext {
    pub parent_width: f32,
    pub parent_height: f32,
    pub font_height: f32,
    pub pixel_ratio: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
}

impl ResolveContext {
    /// Resolves a length against the appropriate axis. `along_width` selects
    /// whether `Percent` resolves against `parent_width` or `parent_height`.
    pub fn resolve(&self, length: Length, along_width: bool) -> f32 {
        match length.unit() {
            LengthUnit::Undefined | LengthUnit::Auto => 0.0,
            LengthUnit::Pixels => length.value(),
            LengthUnit::DevicePixels => length.value() / self.pixel_ratio,
            LengthUnit::AlignedPixels => {
                (length.value() * self.pixel_ratio).round() / self.pixel_ratio
            }
            LengthUnit::Em => length.value() * self.font_height,
            LengthUnit::Percent => {
                let base = if along_width { self.parent_width } else { self.parent_height };
                length.value() / 100.0 * base
            }
            LengthUnit::Vw => length.value() / 100.0 * self.viewport_width,
            LengthUnit::Vh => length.value() / 100.0 * self.viewport_height,
            LengthUnit::Vmin => length.value() / 100.0 * self.viewport_width.min(self.viewport_height),
            LengthUnit::Vmax => length.value() / 100.0 * self.viewport_width.max(self.viewport_height),
        }
    }
}

/// The style inputs the solver reads off a node. Mirrors spec.md §4.I's
/// enumerated property list; a subset of `crate::widget`'s full property set
/// relevant to layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexStyle {
    pub direction: FlexDirection,
    pub justify_content: Justify,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    pub align_self: AlignSelf,
    pub wrap: Wrap,
    pub overflow_x: Overflow,
    pub overflow_y: Overflow,
    pub position: PositionType,
    pub display: Display,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub flex_basis: Length,
    pub margin: EdgesL,
    pub padding: EdgesL,
    pub border: EdgesL,
    pub gap_column: Length,
    pub gap_row: Length,
    pub width: Length,
    pub height: Length,
    pub min_width: Length,
    pub min_height: Length,
    pub max_width: Length,
    pub max_height: Length,
    pub aspect_ratio: Option<f32>,
    /// Anchoring offsets used only when `position == Absolute`.
    pub left: Length,
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
}

/// `EdgesOf<Length>`, named for parity with the original's `EdgesL`.
pub type EdgesL = crate::geometry::EdgesOf<Length>;

impl Default for FlexStyle {
    fn default() -> Self {
        FlexStyle {
            direction: FlexDirection::default(),
            justify_content: Justify::default(),
            align_items: AlignItems::Stretch,
            align_content: AlignContent::Stretch,
            align_self: AlignSelf::Auto,
            wrap: Wrap::default(),
            overflow_x: Overflow::default(),
            overflow_y: Overflow::default(),
            position: PositionType::default(),
            display: Display::default(),
            flex_grow: 0.0,
            flex_shrink: 1.0,
            flex_basis: Length::AUTO,
            margin: EdgesL::uniform(Length::px(0.0)),
            padding: EdgesL::uniform(Length::px(0.0)),
            border: EdgesL::uniform(Length::px(0.0)),
            gap_column: Length::px(0.0),
            gap_row: Length::px(0.0),
            width: Length::AUTO,
            height: Length::AUTO,
            min_width: Length::UNDEFINED,
            min_height: Length::UNDEFINED,
            max_width: Length::UNDEFINED,
            max_height: Length::UNDEFINED,
            aspect_ratio: None,
            left: Length::UNDEFINED,
            top: Length::UNDEFINED,
            right: Length::UNDEFINED,
            bottom: Length::UNDEFINED,
        }
    }
}

/// The solver's output for one node: its border-box rectangle (relative to
/// the same origin `calculate_layout` was called with), the resolved
/// margin/padding/border in pixels, and the content-box size children are
/// laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutResult {
    pub rect: Rectangle,
    pub margin: Edges,
    pub padding: Edges,
    pub border: Edges,
    pub content_size: Size,
}

/// The solver's view of a tree. Implemented by `crate::tree::WidgetTree` over
/// its widget arena; a test-only in-memory tree is used below to exercise
/// the algorithm without pulling in the widget/property machinery.
pub trait LayoutHost {
    type NodeId: Copy + PartialEq;

    fn style(&self, node: Self::NodeId) -> FlexStyle;
    fn children(&self, node: Self::NodeId) -> Vec<Self::NodeId>;
    /// A node with a custom intrinsic-sizing callback (spec.md §4.I)
    /// returns `Some` here; nodes without one return `None` and are sized
    /// purely from style.
    fn measure(&self, node: Self::NodeId, available: AvailableSize) -> Option<Size>;
    fn set_layout(&mut self, node: Self::NodeId, result: LayoutResult);
    /// The result `set_layout` last wrote for `node`, or `None` if it has
    /// never been laid out. Used to compute the "did anything change"
    /// signal `calculate_layout` returns (spec.md §4.I).
    fn get_layout(&self, node: Self::NodeId) -> Option<LayoutResult>;
    fn resolve_context(&self, node: Self::NodeId) -> ResolveContext;
}

fn resolve_edges<H: LayoutHost>(ctx: &ResolveContext, edges: EdgesL) -> Edges {
    Edges::new(
        ctx.resolve(edges.left, true),
        ctx.resolve(edges.top, false),
        ctx.resolve(edges.right, true),
        ctx.resolve(edges.bottom, false),
    )
}

struct ChildLayout<Id> {
    id: Id,
    style: FlexStyle,
    basis: f32,
    margin: Edges,
    main_margin: f32,
    cross_margin: f32,
    main_size: f32,
    cross_size: f32,
}

/// Runs the flexbox algorithm for `root` and every descendant, writing each
/// node's resolved rectangle via `host.set_layout`. Returns whether any
/// node's rectangle changed relative to what `host` reported before the
/// call (the "flag per subtree whether anything changed" spec.md §4.I
/// names) — callers that don't need change tracking can ignore it.
pub fn calculate_layout<H: LayoutHost>(host: &mut H, root: H::NodeId, available: AvailableSize) -> bool {
    let origin = crate::geometry::Point::ZERO;
    layout_node(host, root, available, origin)
}

fn axis_main(direction: FlexDirection, size: Size) -> f32 {
    if direction.is_row() {
        size.width
    } else {
        size.height
    }
}

fn axis_cross(direction: FlexDirection, size: Size) -> f32 {
    if direction.is_row() {
        size.height
    } else {
        size.width
    }
}

fn make_size(direction: FlexDirection, main: f32, cross: f32) -> Size {
    if direction.is_row() {
        Size::new(main, cross)
    } else {
        Size::new(cross, main)
    }
}

fn layout_node<H: LayoutHost>(
    host: &mut H,
    node: H::NodeId,
    available: AvailableSize,
    origin: crate::geometry::Point,
) -> bool {
    let style = host.style(node);
    let ctx = host.resolve_context(node);

    let margin = resolve_edges::<H>(&ctx, style.margin);
    let padding = resolve_edges::<H>(&ctx, style.padding);
    let border = resolve_edges::<H>(&ctx, style.border);

    let outer_width = match available.width.mode {
        MeasureMode::Undefined => style_axis_size(&ctx, style.width, true, 0.0),
        _ => available.width.value,
    };
    let outer_height = match available.height.mode {
        MeasureMode::Undefined => style_axis_size(&ctx, style.height, false, 0.0),
        _ => available.height.value,
    };

    let width = if style.width.has_value() {
        style_axis_size(&ctx, style.width, true, outer_width)
    } else {
        outer_width
    };
    let height = if style.height.has_value() {
        style_axis_size(&ctx, style.height, false, outer_height)
    } else {
        outer_height
    };

    let width = clamp_axis(&ctx, width, style.min_width, style.max_width, true);
    let height = clamp_axis(&ctx, height, style.min_height, style.max_height, false);

    let rect = Rectangle::from_origin_size(origin, Size::new(width, height));

    let content_width = (width - padding.horizontal() - border.horizontal()).max(0.0);
    let content_height = (height - padding.vertical() - border.vertical()).max(0.0);
    let content_origin = crate::geometry::Point::new(
        origin.x + padding.left + border.left,
        origin.y + padding.top + border.top,
    );

    let children: Vec<H::NodeId> = host
        .children(node)
        .into_iter()
        .filter(|&c| host.style(c).display != Display::None)
        .collect();

    let (flow, absolute): (Vec<_>, Vec<_>) = children
        .into_iter()
        .partition(|&c| host.style(c).position != PositionType::Absolute);

    let content_size = Size::new(content_width, content_height);
    let new_result = LayoutResult { rect, margin, padding, border, content_size };
    let mut changed = host.get_layout(node) != Some(new_result);

    changed = layout_children(host, node, &style, &ctx, flow, content_size, content_origin) || changed;

    for child in absolute {
        layout_absolute_child(host, child, content_size, content_origin);
    }

    host.set_layout(node, new_result);

    changed
}

fn style_axis_size(ctx: &ResolveContext, length: Length, along_width: bool, fallback: f32) -> f32 {
    if length.has_value() {
        ctx.resolve(length, along_width)
    } else {
        fallback
    }
}

fn clamp_axis(ctx: &ResolveContext, value: f32, min: Length, max: Length, along_width: bool) -> f32 {
    let mut v = value;
    if min.has_value() {
        v = v.max(ctx.resolve(min, along_width));
    }
    if max.has_value() {
        v = v.min(ctx.resolve(max, along_width));
    }
    v.max(0.0)
}

fn layout_absolute_child<H: LayoutHost>(
    host: &mut H,
    node: H::NodeId,
    container: Size,
    container_origin: crate::geometry::Point,
) {
    let style = host.style(node);
    let ctx = host.resolve_context(node);
    let width = if style.width.has_value() {
        ctx.resolve(style.width, true)
    } else {
        container.width
    };
    let height = if style.height.has_value() {
        ctx.resolve(style.height, false)
    } else {
        container.height
    };
    let x = if style.left.has_value() {
        container_origin.x + ctx.resolve(style.left, true)
    } else if style.right.has_value() {
        container_origin.x + container.width - ctx.resolve(style.right, true) - width
    } else {
        container_origin.x
    };
    let y = if style.top.has_value() {
        container_origin.y + ctx.resolve(style.top, false)
    } else if style.bottom.has_value() {
        container_origin.y + container.height - ctx.resolve(style.bottom, false) - height
    } else {
        container_origin.y
    };
    layout_node(
        host,
        node,
        AvailableSize::exactly(Size::new(width, height)),
        crate::geometry::Point::new(x, y),
    );
}

#[allow(clippy::too_many_arguments)]
fn layout_children<H: LayoutHost>(
    host: &mut H,
    _parent: H::NodeId,
    style: &FlexStyle,
    ctx: &ResolveContext,
    children: Vec<H::NodeId>,
    content: Size,
    content_origin: crate::geometry::Point,
) -> bool {
    if children.is_empty() {
        return false;
    }

    let direction = style.direction;
    let main_available = axis_main(direction, content);
    let cross_available = axis_cross(direction, content);
    let gap = if direction.is_row() {
        ctx.resolve(style.gap_column, true)
    } else {
        ctx.resolve(style.gap_row, false)
    };

    let mut items: Vec<ChildLayout<H::NodeId>> = Vec::with_capacity(children.len());
    for child in children {
        let child_style = host.style(child);
        let child_ctx = host.resolve_context(child);
        let margin = resolve_edges::<H>(&child_ctx, child_style.margin);
        let (main_margin, cross_margin) = if direction.is_row() {
            (margin.horizontal(), margin.vertical())
        } else {
            (margin.vertical(), margin.horizontal())
        };

        let basis = if child_style.flex_basis.has_value() {
            ctx.resolve(child_style.flex_basis, direction.is_row())
        } else {
            let intrinsic = if direction.is_row() { child_style.width } else { child_style.height };
            if intrinsic.has_value() {
                child_ctx.resolve(intrinsic, direction.is_row())
            } else if let Some(size) = host.measure(
                child,
                AvailableSize {
                    width: AvailableLength::at_most(content.width),
                    height: AvailableLength::at_most(content.height),
                },
            ) {
                axis_main(direction, size)
            } else {
                0.0
            }
        };

        items.push(ChildLayout {
            id: child,
            style: child_style,
            basis,
            margin,
            main_margin,
            cross_margin,
            main_size: basis,
            cross_size: 0.0,
        });
    }

    let total_gap = gap * (items.len().saturating_sub(1)) as f32;
    let used: f32 = items.iter().map(|i| i.main_size + i.main_margin).sum::<f32>() + total_gap;
    let free = main_available - used;

    if free > 0.0 {
        let grow_sum: f32 = items.iter().map(|i| i.style.flex_grow).sum();
        if grow_sum > 0.0 {
            for item in items.iter_mut() {
                item.main_size += free * (item.style.flex_grow / grow_sum);
            }
        }
    } else if free < 0.0 {
        let shrink_sum: f32 = items.iter().map(|i| i.style.flex_shrink * i.basis).sum();
        if shrink_sum > 0.0 {
            for item in items.iter_mut() {
                let weight = item.style.flex_shrink * item.basis / shrink_sum;
                item.main_size = (item.main_size + free * weight).max(0.0);
            }
        }
    }

    for item in items.iter_mut() {
        let item_ctx = host.resolve_context(item.id);
        let (min, max) = if direction.is_row() {
            (item.style.min_width, item.style.max_width)
        } else {
            (item.style.min_height, item.style.max_height)
        };
        item.main_size = clamp_axis(&item_ctx, item.main_size, min, max, direction.is_row());

        let align = match item.style.align_self {
            Align::Auto => style.align_items,
            other => other,
        };
        item.cross_size = if align == Align::Stretch {
            let explicit = if direction.is_row() { item.style.height } else { item.style.width };
            if explicit.has_value() {
                item_ctx.resolve(explicit, !direction.is_row())
            } else {
                (cross_available - item.cross_margin).max(0.0)
            }
        } else {
            let explicit = if direction.is_row() { item.style.height } else { item.style.width };
            if explicit.has_value() {
                item_ctx.resolve(explicit, !direction.is_row())
            } else if let Some(size) = host.measure(
                item.id,
                AvailableSize {
                    width: AvailableLength::at_most(content.width),
                    height: AvailableLength::at_most(content.height),
                },
            ) {
                axis_cross(direction, size)
            } else {
                0.0
            }
        };
    }

    let used_main: f32 =
        items.iter().map(|i| i.main_size + i.main_margin).sum::<f32>() + total_gap;
    let remaining = (main_available - used_main).max(0.0);
    let count = items.len();

    let (mut cursor, extra_gap, leading) = match style.justify_content {
        Justify::FlexStart => (0.0, 0.0, 0.0),
        Justify::FlexEnd => (remaining, 0.0, 0.0),
        Justify::Center => (remaining / 2.0, 0.0, 0.0),
        Justify::SpaceBetween if count > 1 => (0.0, remaining / (count - 1) as f32, 0.0),
        Justify::SpaceBetween => (0.0, 0.0, 0.0),
        Justify::SpaceAround => {
            let each = remaining / count as f32;
            (each / 2.0, each, 0.0)
        }
        Justify::SpaceEvenly => {
            let each = remaining / (count + 1) as f32;
            (each, each, 0.0)
        }
    };
    let _ = leading;

    let mut changed = false;
    let reversed = direction.is_reversed();
    let ordered: Vec<usize> = if reversed {
        (0..items.len()).rev().collect()
    } else {
        (0..items.len()).collect()
    };

    for idx in ordered {
        let item = &items[idx];
        let child_ctx = host.resolve_context(item.id);
        let align = match item.style.align_self {
            Align::Auto => style.align_items,
            other => other,
        };
        let cross_offset = match align {
            Align::FlexEnd => cross_available - item.cross_size - item.cross_margin,
            Align::Center => (cross_available - item.cross_size - item.cross_margin) / 2.0,
            _ => 0.0,
        };

        let (main_pos, cross_pos) = (cursor + item.main_margin / 2.0, cross_offset);
        let child_origin = if direction.is_row() {
            crate::geometry::Point::new(content_origin.x + main_pos, content_origin.y + cross_pos)
        } else {
            crate::geometry::Point::new(content_origin.x + cross_pos, content_origin.y + main_pos)
        };

        let child_size = make_size(direction, item.main_size, item.cross_size);
        let _ = child_ctx;
        changed |= layout_node(host, item.id, AvailableSize::exactly(child_size), child_origin);

        cursor += item.main_size + item.main_margin + gap + extra_gap;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct TestTree {
        styles: Vec<RefCell<FlexStyle>>,
        children: Vec<Vec<usize>>,
        results: Vec<RefCell<LayoutResult>>,
    }

    impl TestTree {
        fn add(&mut self, style: FlexStyle, children: Vec<usize>) -> usize {
            self.styles.push(RefCell::new(style));
            self.children.push(children);
            self.results.push(RefCell::new(LayoutResult::default()));
            self.styles.len() - 1
        }
    }

    impl LayoutHost for TestTree {
        type NodeId = usize;

        fn style(&self, node: usize) -> FlexStyle {
            *self.styles[node].borrow()
        }

        fn children(&self, node: usize) -> Vec<usize> {
            self.children[node].clone()
        }

        fn measure(&self, _node: usize, _available: AvailableSize) -> Option<Size> {
            None
        }

        fn set_layout(&mut self, node: usize, result: LayoutResult) {
            *self.results[node].borrow_mut() = result;
        }

        fn get_layout(&self, node: usize) -> Option<LayoutResult> {
            Some(*self.results[node].borrow())
        }

        fn resolve_context(&self, _node: usize) -> ResolveContext {
            ResolveContext {
                parent_width: 0.0,
                parent_height: 0.0,
                font_height: 16.0,
                pixel_ratio: 1.0,
                viewport_width: 400.0,
                viewport_height: 300.0,
            }
        }
    }

    /// spec.md §8 scenario S4: root 400x300, horizontal, two children
    /// flexGrow=1 height=100; default AlignItems::Stretch stretches height
    /// to the container.
    #[test]
    fn s4_two_children_grow_stretch() {
        let mut tree = TestTree::default();
        let mut child_style = FlexStyle { height: Length::px(100.0), flex_grow: 1.0, ..Default::default() };
        let a = tree.add(child_style, vec![]);
        child_style.height = Length::px(100.0);
        let b = tree.add(child_style, vec![]);
        let root_style = FlexStyle { direction: FlexDirection::Row, ..Default::default() };
        let root = tree.add(root_style, vec![a, b]);

        calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(400.0, 300.0)));

        let ra = *tree.results[a].borrow();
        let rb = *tree.results[b].borrow();
        assert_eq!(ra.rect, Rectangle::from_corners((0.0, 0.0), (200.0, 300.0)));
        assert_eq!(rb.rect, Rectangle::from_corners((200.0, 0.0), (400.0, 300.0)));
    }

    #[test]
    fn s4_flex_start_keeps_explicit_height() {
        let mut tree = TestTree::default();
        let child_style = FlexStyle {
            height: Length::px(100.0),
            flex_grow: 1.0,
            align_self: Align::FlexStart,
            ..Default::default()
        };
        let a = tree.add(child_style, vec![]);
        let b = tree.add(child_style, vec![]);
        let root_style = FlexStyle {
            direction: FlexDirection::Row,
            align_items: Align::FlexStart,
            ..Default::default()
        };
        let root = tree.add(root_style, vec![a, b]);

        calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(400.0, 300.0)));

        let ra = *tree.results[a].borrow();
        assert_eq!(ra.rect, Rectangle::from_corners((0.0, 0.0), (200.0, 100.0)));
    }

    #[test]
    fn justify_center_centers_a_single_fixed_child() {
        let mut tree = TestTree::default();
        let child_style =
            FlexStyle { width: Length::px(50.0), height: Length::px(50.0), ..Default::default() };
        let a = tree.add(child_style, vec![]);
        let root_style = FlexStyle {
            direction: FlexDirection::Row,
            justify_content: Justify::Center,
            ..Default::default()
        };
        let root = tree.add(root_style, vec![a]);

        calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(200.0, 50.0)));

        let ra = *tree.results[a].borrow();
        assert_eq!(ra.rect.min.x, 75.0);
    }

    #[test]
    fn percent_resolves_against_content_box() {
        let mut tree = TestTree::default();
        let child_style = FlexStyle { width: Length::percent(50.0), height: Length::px(10.0), ..Default::default() };
        let a = tree.add(child_style, vec![]);
        let root_style = FlexStyle {
            direction: FlexDirection::Row,
            padding: EdgesL::uniform(Length::px(10.0)),
            ..Default::default()
        };
        let root = tree.add(root_style, vec![a]);

        calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(220.0, 100.0)));
        // content box width = 220 - 2*10 = 200; 50% of that = 100
        let ra = *tree.results[a].borrow();
        assert_eq!(ra.rect.width(), 100.0);
    }

    #[test]
    fn calculate_layout_reports_unchanged_once_stable() {
        let mut tree = TestTree::default();
        let child_style = FlexStyle { width: Length::px(50.0), height: Length::px(50.0), ..Default::default() };
        let a = tree.add(child_style, vec![]);
        let root_style = FlexStyle { direction: FlexDirection::Row, ..Default::default() };
        let root = tree.add(root_style, vec![a]);

        let first = calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(200.0, 200.0)));
        assert!(first, "first pass always reports changed");

        let second = calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(200.0, 200.0)));
        assert!(!second, "an identical re-run should report nothing changed");
    }

    #[test]
    fn calculate_layout_reports_changed_when_a_child_resizes() {
        let mut tree = TestTree::default();
        let child_style = FlexStyle { width: Length::px(50.0), height: Length::px(50.0), ..Default::default() };
        let a = tree.add(child_style, vec![]);
        let root_style = FlexStyle { direction: FlexDirection::Row, ..Default::default() };
        let root = tree.add(root_style, vec![a]);

        calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(200.0, 200.0)));

        tree.styles[a].replace(FlexStyle { width: Length::px(80.0), height: Length::px(50.0), ..Default::default() });
        let changed = calculate_layout(&mut tree, root, AvailableSize::exactly(Size::new(200.0, 200.0)));
        assert!(changed, "a child's own rect change should propagate up to the root's return");
    }
}
