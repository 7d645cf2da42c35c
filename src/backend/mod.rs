//! Renderer backend abstraction: a small device/encoder/target contract
//! that the two concrete backends (`wgpu_backend` for GPU presentation,
//! `cpu_backend` for headless/software presentation) satisfy identically,
//! so the pipeline above (`crate::canvas`, `crate::widget`) never branches
//! on which backend is active.
//!
//! Grounded on the teacher's `Renderer`/`renderer/{construction,surface,
//! rendering}.rs` split (device creation, surface/target management,
//! per-frame submission kept as separate concerns) — generalized from one
//! concrete wgpu type into a trait so a CPU backend can stand in for it in
//! tests and headless scenarios, per spec.md §4.F.

pub mod cpu;
pub mod device;
pub mod encoder;
pub mod wgpu_backend;

pub use device::{DeviceInfo, DeviceSelection, Limits, RenderDevice};
pub use encoder::{ImageRenderTarget, RenderEncoder, WindowRenderTarget};

/// The external OS-window collaborator this core consumes (spec.md §6).
/// Window creation, cursors, and clipboard are out of scope; this crate
/// only needs a handle to draw into and a framebuffer size.
pub trait PlatformWindow {
    fn framebuffer_size(&self) -> crate::geometry::SizeI;
    fn scale_factor(&self) -> f64;

    /// Opaque native handle, passed through to the GPU backend's surface
    /// creation. `raw-window-handle` is the idiomatic crate for this in the
    /// wgpu ecosystem; kept as an associated type here so a headless/CPU
    /// `PlatformWindow` implementation used in tests need not provide one.
    type NativeHandle;
    fn native_handle(&self) -> Self::NativeHandle;
}
