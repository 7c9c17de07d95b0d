//! Local pixel surface and the bounded pixel-write primitive.
//!
//! The [`Framebuffer`] mirrors the window surface the presenter shows.
//! Every write goes through [`write_pixel`], which checks the target
//! against the backing slice, so a bad offset can never touch memory
//! outside the buffer.

use crate::error::ViewError;

// ── PixelFormat ──────────────────────────────────────────────────

/// Byte layout of one pixel in a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    /// 4 bytes per pixel: Blue, Green, Red, Alpha. Little-endian
    /// `0xAARRGGBB`, the native layout of most window surfaces.
    #[default]
    Bgra8,
    /// 4 bytes per pixel: Red, Green, Blue, Alpha.
    Rgba8,
    /// 3 bytes per pixel: Red, Green, Blue.
    Rgb8,
}

impl PixelFormat {
    /// Bytes consumed by a single pixel in this format.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgra8 | PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }

    /// Pack 8-bit RGBA channels into this format.
    ///
    /// Only the first [`bytes_per_pixel`](Self::bytes_per_pixel) bytes
    /// of the result are meaningful.
    pub const fn pack(self, [r, g, b, a]: [u8; 4]) -> [u8; 4] {
        match self {
            PixelFormat::Bgra8 => [b, g, r, a],
            PixelFormat::Rgba8 => [r, g, b, a],
            PixelFormat::Rgb8 => [r, g, b, 0],
        }
    }

    /// Read one pixel in this format back as RGBA. Formats without an
    /// alpha channel report it as opaque.
    ///
    /// `px` must hold at least `bytes_per_pixel()` bytes.
    pub fn unpack(self, px: &[u8]) -> [u8; 4] {
        match self {
            PixelFormat::Bgra8 => [px[2], px[1], px[0], px[3]],
            PixelFormat::Rgba8 => [px[0], px[1], px[2], px[3]],
            PixelFormat::Rgb8 => [px[0], px[1], px[2], 0xFF],
        }
    }
}

// ── Bounded write ────────────────────────────────────────────────

/// Store one RGBA pixel at `(x, y)` in a raw surface buffer.
///
/// The byte offset is `y * pitch + x * bpp`. Returns `false` without
/// writing when the pixel would not fit entirely inside `buf`.
pub fn write_pixel(
    buf: &mut [u8],
    x: usize,
    y: usize,
    pitch: usize,
    format: PixelFormat,
    rgba: [u8; 4],
) -> bool {
    let bpp = format.bytes_per_pixel();
    let Some(offset) = y
        .checked_mul(pitch)
        .and_then(|row| x.checked_mul(bpp).and_then(|col| row.checked_add(col)))
    else {
        return false;
    };
    let Some(dst) = offset
        .checked_add(bpp)
        .and_then(|end| buf.get_mut(offset..end))
    else {
        return false;
    };
    dst.copy_from_slice(&format.pack(rgba)[..bpp]);
    true
}

// ── Framebuffer ──────────────────────────────────────────────────

/// Fixed-size pixel surface owned by the display layer.
///
/// `data` holds `height` rows of `pitch` bytes each; `pitch` may be
/// larger than `width * bytes_per_pixel` when rows are padded.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Framebuffer {
    /// A zeroed surface with tightly packed rows.
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self, ViewError> {
        let pitch = width as usize * format.bytes_per_pixel();
        Self::with_pitch(width, height, pitch, format)
    }

    /// A zeroed surface with an explicit row pitch in bytes.
    pub fn with_pitch(
        width: u32,
        height: u32,
        pitch: usize,
        format: PixelFormat,
    ) -> Result<Self, ViewError> {
        if width == 0 || height == 0 {
            return Err(ViewError::InvalidSurface("surface has no pixels"));
        }
        let bpp = format.bytes_per_pixel();
        if pitch < width as usize * bpp {
            return Err(ViewError::PitchTooSmall { pitch, width, bpp });
        }
        let len = pitch
            .checked_mul(height as usize)
            .ok_or(ViewError::InvalidSurface("surface too large"))?;
        Ok(Self {
            width,
            height,
            pitch,
            format,
            data: vec![0u8; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row stride in bytes.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Raw surface bytes, `pitch * height` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write one pixel in surface coordinates.
    ///
    /// Coordinates outside `[0, width) × [0, height)` are skipped and
    /// `false` is returned; this is the normal outcome for the
    /// off-screen part of a tile.
    pub fn set_pixel(&mut self, x: i64, y: i64, rgba: [u8; 4]) -> bool {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return false;
        }
        write_pixel(
            &mut self.data,
            x as usize,
            y as usize,
            self.pitch,
            self.format,
            rgba,
        )
    }

    /// Read a pixel back as RGBA, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let bpp = self.format.bytes_per_pixel();
        let offset = y as usize * self.pitch + x as usize * bpp;
        self.data
            .get(offset..offset + bpp)
            .map(|px| self.format.unpack(px))
    }

    /// Fill every pixel with one colour.
    pub fn clear(&mut self, rgba: [u8; 4]) {
        let bpp = self.format.bytes_per_pixel();
        let packed = self.format.pack(rgba);
        let row_bytes = self.width as usize * bpp;
        for row in self.data.chunks_exact_mut(self.pitch) {
            for px in row[..row_bytes].chunks_exact_mut(bpp) {
                px.copy_from_slice(&packed[..bpp]);
            }
        }
    }

    /// Convert into `0x00RRGGBB` words, one per pixel, row-major
    /// without padding.
    ///
    /// Copies `min(out.len(), width * height)` pixels.
    pub fn to_xrgb(&self, out: &mut [u32]) {
        let bpp = self.format.bytes_per_pixel();
        let width = self.width as usize;
        for (row, dst_row) in self.data.chunks_exact(self.pitch).zip(out.chunks_mut(width)) {
            for (px, dst) in row.chunks_exact(bpp).zip(dst_row.iter_mut()) {
                let [r, g, b, _] = self.format.unpack(px);
                *dst = u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b);
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [0xFF, 0x00, 0x00, 0xFF];

    #[test]
    fn channel_packing() {
        let rgba = [0x11, 0x22, 0x33, 0x44];
        assert_eq!(PixelFormat::Bgra8.pack(rgba), [0x33, 0x22, 0x11, 0x44]);
        assert_eq!(PixelFormat::Rgba8.pack(rgba), rgba);
        assert_eq!(&PixelFormat::Rgb8.pack(rgba)[..3], &[0x11, 0x22, 0x33]);
        assert_eq!(PixelFormat::Bgra8.unpack(&[0x33, 0x22, 0x11, 0x44]), rgba);
    }

    #[test]
    fn write_pixel_respects_buffer_end() {
        let mut buf = vec![0u8; 8];
        assert!(write_pixel(&mut buf, 1, 0, 8, PixelFormat::Rgba8, RED));
        assert_eq!(&buf[4..8], &RED);
        assert!(!write_pixel(&mut buf, 2, 0, 8, PixelFormat::Rgba8, RED));
        assert!(!write_pixel(&mut buf, 0, 1, 8, PixelFormat::Rgba8, RED));
        assert!(!write_pixel(&mut buf, usize::MAX, usize::MAX, 8, PixelFormat::Rgba8, RED));
    }

    #[test]
    fn set_pixel_bounds() {
        let mut fb = Framebuffer::new(10, 10, PixelFormat::Bgra8).unwrap();
        assert!(fb.set_pixel(0, 0, RED));
        assert!(fb.set_pixel(9, 9, RED));
        assert!(!fb.set_pixel(10, 0, RED));
        assert!(!fb.set_pixel(0, 10, RED));
        assert!(!fb.set_pixel(-1, 3, RED));
        assert!(!fb.set_pixel(3, -1, RED));
        assert_eq!(fb.pixel(9, 9), Some(RED));
        assert_eq!(fb.pixel(10, 9), None);
    }

    #[test]
    fn padded_pitch_leaves_padding_untouched() {
        let mut fb = Framebuffer::with_pitch(2, 2, 12, PixelFormat::Bgra8).unwrap();
        fb.clear([0xFF; 4]);
        let bytes = fb.as_bytes();
        assert_eq!(bytes.len(), 24);
        assert!(bytes[8..12].iter().all(|&b| b == 0));
        assert!(bytes[20..24].iter().all(|&b| b == 0));
        assert_eq!(fb.pixel(1, 1), Some([0xFF; 4]));
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(matches!(
            Framebuffer::with_pitch(10, 2, 39, PixelFormat::Bgra8),
            Err(ViewError::PitchTooSmall { .. })
        ));
        assert!(Framebuffer::new(0, 5, PixelFormat::Rgba8).is_err());
    }

    #[test]
    fn xrgb_conversion() {
        let mut fb = Framebuffer::with_pitch(2, 1, 8, PixelFormat::Rgb8).unwrap();
        fb.set_pixel(0, 0, [0x12, 0x34, 0x56, 0x00]);
        fb.set_pixel(1, 0, [0xAB, 0xCD, 0xEF, 0xFF]);
        let mut out = [0u32; 2];
        fb.to_xrgb(&mut out);
        assert_eq!(out, [0x0012_3456, 0x00AB_CDEF]);
    }
}
