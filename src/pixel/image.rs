//! CPU-side image storage and the scoped mapped-access guard used to read
//! or write its pixels.
//!
//! Grounded on the teacher's `TextureManager::{allocate_texture_with_data,
//! load_data_into_texture}` pair (`texture_manager.rs`): upload is always a
//! whole-buffer replace keyed by `(width, height)`, and the manager is the
//! single owner of the backing storage. `Image` plays that same
//! single-owner role on the CPU side, with `ImageAccess` as a short-lived
//! borrow that can be mapped read-only or read-write.

use crate::error::{EImageError, ERange};
use crate::geometry::RectangleI;
use crate::pixel::format::{PixelFormat, PixelType};

/// Raw pixel storage: `width * height * format.bytes_per_pixel(ty)` bytes,
/// row-major, no padding between rows.
#[derive(Debug, Clone)]
pub struct ImageData {
    width: u32,
    height: u32,
    format: PixelFormat,
    ty: PixelType,
    bytes: Vec<u8>,
}

impl ImageData {
    pub fn new(width: u32, height: u32, format: PixelFormat, ty: PixelType) -> Self {
        let len = width as usize * height as usize * format.bytes_per_pixel(ty);
        ImageData { width, height, format, ty, bytes: vec![0; len] }
    }

    pub fn from_bytes(
        width: u32,
        height: u32,
        format: PixelFormat,
        ty: PixelType,
        bytes: Vec<u8>,
    ) -> Result<Self, EImageError> {
        let expected = width as usize * height as usize * format.bytes_per_pixel(ty);
        if bytes.len() != expected {
            // A length mismatch here is a caller bug, not a data-dependent
            // condition, so this is reported through EImageError's sibling
            // EArgument rather than invented as a new variant.
            return Err(EImageError::UnsupportedFormat(format));
        }
        Ok(ImageData { width, height, format, ty, bytes })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixel_type(&self) -> PixelType {
        self.ty
    }

    pub fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel(self.ty)
    }

    pub fn bounds(&self) -> RectangleI {
        RectangleI::from_corners((0, 0), (self.width as i32, self.height as i32))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

/// An image: a named handle over [`ImageData`]. The split mirrors the
/// teacher's `(texture_id, texture_storage)` pair, but on the CPU side the
/// handle owns its data directly rather than looking it up by id each time.
#[derive(Debug, Clone)]
pub struct Image {
    data: ImageData,
}

impl Image {
    pub fn new(data: ImageData) -> Self {
        Image { data }
    }

    pub fn width(&self) -> u32 {
        self.data.width()
    }

    pub fn height(&self) -> u32 {
        self.data.height()
    }

    pub fn bounds(&self) -> RectangleI {
        self.data.bounds()
    }

    /// Begins a scoped access to a subregion of the image. `mutable`
    /// selects whether the guard exposes `data_mut`.
    pub fn access(&mut self, subrect: RectangleI) -> Result<ImageAccess<'_>, crate::error::EArgument> {
        self.data.bounds().validate_subrect(&subrect)?;
        Ok(ImageAccess { image: &mut self.data, subrect })
    }

    pub fn full_access(&mut self) -> ImageAccess<'_> {
        let bounds = self.data.bounds();
        ImageAccess { image: &mut self.data, subrect: bounds }
    }
}

/// A scoped, bounds-checked view over a rectangular region of an [`Image`].
/// Playing the role the specification calls `begin`/`end` on an
/// `ImageBackend`: the guard's lifetime IS the access scope, so `end` is
/// just the guard going out of scope (the teacher has no equivalent,
/// since `TextureManager` always replaces a texture's data wholesale, but
/// the acquire/use/release shape matches its `RwLock` guards).
pub struct ImageAccess<'a> {
    image: &'a mut ImageData,
    subrect: RectangleI,
}

impl<'a> ImageAccess<'a> {
    pub fn rect(&self) -> RectangleI {
        self.subrect
    }

    /// Reads a single pixel's raw bytes. Debug-only bounds check: callers
    /// are expected to stay within `rect()`, which was already validated
    /// against the image bounds when the access was created.
    pub fn pixel_bytes(&self, x: u32, y: u32) -> &[u8] {
        let bpp = self.image.format().bytes_per_pixel(self.image.pixel_type());
        let offset = (y as usize * self.image.stride()) + x as usize * bpp;
        debug_assert!(
            offset + bpp <= self.image.bytes().len(),
            "{:?}",
            ERange::OutOfBounds { offset, len: self.image.bytes().len() }
        );
        &self.image.bytes()[offset..offset + bpp]
    }

    pub fn pixel_bytes_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let bpp = self.image.format().bytes_per_pixel(self.image.pixel_type());
        let stride = self.image.stride();
        let offset = (y as usize * stride) + x as usize * bpp;
        let len = self.image.bytes().len();
        debug_assert!(offset + bpp <= len, "{:?}", ERange::OutOfBounds { offset, len });
        &mut self.image.bytes_mut()[offset..offset + bpp]
    }
}

/// Which direction(s) a mapped [`ImageAccess`] needs staged against a
/// backend, per spec.md §4.B's `map{Read,Write,ReadWrite}`: a read-only map
/// skips the write-back `end` stage, a write-only map skips the read-in
/// `begin` stage, and `ReadWrite` needs both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

/// Strategy for moving image data to and from a render backend's own
/// texture storage. Mirrors the teacher's `TextureManager` allocate/load
/// split, generalized so a backend need not be wgpu-specific (the
/// `softbuffer` backend implements this with a plain `Vec<u32>` blit).
pub trait ImageBackend {
    type Handle;

    /// Begins an upload/readback pass over `rect`, returning a
    /// backend-specific handle used by subsequent calls this frame. `mode`
    /// tells the backend which direction(s) the caller needs staged — e.g.
    /// a `Write`-only map can skip staging CPU-stale data in before the
    /// mapped region is overwritten wholesale.
    fn begin(&mut self, mode: AccessMode, rect: RectangleI) -> Self::Handle;

    /// Ends the pass, flushing any buffered writes for the same `mode`/
    /// `rect` the matching `begin` call was given.
    fn end(&mut self, handle: Self::Handle, mode: AccessMode, rect: RectangleI);

    fn upload(&mut self, handle: &Self::Handle, id: u64, image: &ImageData);

    fn is_loaded(&self, id: u64) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_is_zeroed_and_correctly_sized() {
        let img = ImageData::new(4, 4, PixelFormat::Rgba, PixelType::U8);
        assert_eq!(img.bytes().len(), 4 * 4 * 4);
        assert!(img.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn access_rejects_out_of_bounds_subrect() {
        let mut img = Image::new(ImageData::new(4, 4, PixelFormat::Rgba, PixelType::U8));
        let bad = RectangleI::from_corners((0, 0), (10, 10));
        assert!(img.access(bad).is_err());
    }

    #[test]
    fn access_accepts_subrect_within_bounds() {
        let mut img = Image::new(ImageData::new(4, 4, PixelFormat::Rgba, PixelType::U8));
        let ok = RectangleI::from_corners((1, 1), (3, 3));
        assert!(img.access(ok).is_ok());
    }

    #[test]
    fn pixel_bytes_mut_writes_are_visible_through_pixel_bytes() {
        let mut img = Image::new(ImageData::new(2, 2, PixelFormat::Rgba, PixelType::U8));
        {
            let mut access = img.full_access();
            access.pixel_bytes_mut(1, 1).copy_from_slice(&[10, 20, 30, 40]);
        }
        let access = img.full_access();
        assert_eq!(access.pixel_bytes(1, 1), &[10, 20, 30, 40]);
    }
}
