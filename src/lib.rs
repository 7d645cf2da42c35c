//! # Vellum
//!
//! Vellum is the core graphics and GUI subsystem beneath a cross-platform
//! retained-mode UI toolkit: geometry and color primitives, a pixel/image
//! model, sprite and gradient atlases, a path rasterizer built on
//! [`lyon`](https://crates.io/crates/lyon), a fixed-size render-state record
//! and command stream, a renderer backend abstraction with GPU
//! ([`wgpu`](https://crates.io/crates/wgpu)) and CPU implementations, a
//! retained-mode canvas, a font-shaping consumer, a flexbox layout adapter, a
//! typed widget property system, a widget tree with a per-frame pipeline, and
//! input/event dispatch wired up by a small application shell.
//!
//! ## Layout
//!
//! Each module corresponds to one layer of that pipeline, bottom-up:
//!
//! - [`geometry`] / [`color`] — numeric primitives shared by everything above
//! - [`pixel`] — CPU-addressable image storage
//! - [`atlas`] — sprite and gradient caches shared across a device
//! - [`path`] — path construction and tessellation into draw vertices
//! - [`render_state`] — the fixed-size GPU-uniform-compatible draw record and
//!   the command stream that batches it
//! - [`backend`] — the device/encoder contract the GPU and CPU backends
//!   satisfy identically
//! - [`canvas`] — the immediate-mode drawing surface built on top of a
//!   command stream
//! - [`font`] — glyph shaping and caching, consumed by the canvas's text ops
//! - [`layout`] — the flexbox subset the widget tree resolves against
//! - [`widget`] — the typed property system and per-widget paint/layout state
//! - [`tree`] — the widget tree and its per-frame styling/layout/paint pipeline
//! - [`input`] — hit-testing, focus, and event dispatch over that tree
//! - [`app`] — the application shell tying scheduling and window events together

pub use lyon;
pub use wgpu;
pub use glyphon;
pub use glyphon::fontdb;

pub mod app;
pub mod atlas;
pub mod backend;
pub mod canvas;
pub mod color;
pub mod error;
pub mod font;
pub mod geometry;
pub mod input;
pub mod layout;
pub mod path;
pub mod pixel;
pub mod render_state;
pub mod tree;
mod util;
pub mod widget;

pub use app::{DisplaySettings, ManagedWindow, QuitCondition, SchedulingModel, TaskHandle, TaskQueue, WindowApplication};
pub use atlas::{Gradient, GradientAtlas, GradientId, GradientStop, GradientType, SpriteAtlas, SpriteId};
pub use canvas::{Canvas, RawCanvas};
pub use color::{Color, ColorF};
pub use error::{EArgument, EImageError, ERange, FontError, RenderDeviceError};
pub use geometry::{Edges, Length, LengthUnit, Matrix2D, Point, Rectangle, Size};
pub use input::{ClickKind, Event, HitTestEntry, InputQueue, MouseButton};
pub use path::{
    rasterize, CapStyle, FillParams, FillRule, JoinStyle, Path, PathElement, PathVertex,
    RasterizedPath, StrokeParams,
};
pub use pixel::{Image, ImageData, PixelFormat, PixelType};
pub use render_state::{CommandStream, RenderFlags, RenderState, SamplerMode, ShaderKind};
pub use widget::{Widget, WidgetId};
pub use tree::WidgetTree;
