//! CPU-side pixel storage and format tags.

pub mod format;
pub mod image;

pub use format::{PixelFormat, PixelType};
pub use image::{AccessMode, Image, ImageAccess, ImageBackend, ImageData};
