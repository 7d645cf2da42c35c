//! `RenderDevice`: the top-level handle a host application holds. Creates
//! encoders and render targets and reports backend capabilities.

use crate::error::RenderDeviceError;

/// Mirrors the teacher's implicit choice of "the adapter wgpu hands back"
/// with an explicit preference, per spec.md §4.F.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceSelection {
    HighPerformance,
    LowPower,
    #[default]
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceInfo {
    pub api: String,
    pub api_version: String,
    pub vendor: String,
    pub device: String,
}

/// Device-wide limits consulted by the command stream (`render_state::
/// stream`) and the atlases (`crate::atlas`) when deciding flush/eviction
/// policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_data_size: usize,
    pub max_atlas_size: u32,
    pub max_gradients: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Limits { max_data_size: 1 << 20, max_atlas_size: 8192, max_gradients: 256 }
    }
}

/// Top-level renderer device contract. One device is created per host
/// application (or per headless test); all encoders and targets it
/// produces share the device's resources.
pub trait RenderDevice {
    type Encoder: super::RenderEncoder;
    type WindowTarget: super::WindowRenderTarget;
    type ImageTarget: super::ImageRenderTarget;

    fn info(&self) -> DeviceInfo;
    fn limits(&self) -> Limits;

    fn create_encoder(&self) -> Self::Encoder;

    fn create_window_target<W: super::PlatformWindow>(
        &self,
        window: &W,
        pixel_type: crate::pixel::PixelType,
        depth_stencil: bool,
        samples: u32,
    ) -> Result<Self::WindowTarget, RenderDeviceError>;

    fn create_image_target(
        &self,
        size: crate::geometry::SizeI,
    ) -> Result<Self::ImageTarget, RenderDeviceError>;
}
