//! Surface compositor: paints decoded bitmap tiles into the framebuffer.
//!
//! Tiles arrive at arbitrary positions and sizes. Whatever part of a
//! tile falls outside the surface is dropped pixel by pixel; a window
//! dragged half off the remote screen produces exactly that, so it is
//! not treated as an error.

use crate::error::ViewError;
use crate::surface::Framebuffer;

// ── BitmapTile ───────────────────────────────────────────────────

/// One decoded rectangular update positioned in surface coordinates.
///
/// Pixel data is tightly packed 8-bit RGBA, `width * height * 4` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapTile {
    dest_x: i32,
    dest_y: i32,
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl BitmapTile {
    /// Wrap a decoded tile, checking that `rgba` covers the tile.
    pub fn new(
        dest_x: i32,
        dest_y: i32,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, ViewError> {
        let expected =
            tile_bytes(width, height).ok_or(ViewError::InvalidTile { width, height })?;
        if rgba.len() < expected {
            return Err(ViewError::TileTooShort {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            dest_x,
            dest_y,
            width,
            height,
            rgba,
        })
    }

    /// A tile filled with one colour. A size whose byte count overflows
    /// `usize` gives a tile with no pixel data, which paints nothing.
    pub fn solid(dest_x: i32, dest_y: i32, width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = match tile_bytes(width, height) {
            Some(len) => rgba.repeat(len / 4),
            None => Vec::new(),
        };
        Self {
            dest_x,
            dest_y,
            width,
            height,
            rgba: data,
        }
    }

    pub fn dest_x(&self) -> i32 {
        self.dest_x
    }

    pub fn dest_y(&self) -> i32 {
        self.dest_y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA value at tile-local `(x, y)`, or `None` outside the tile
    /// or past the end of its pixel data.
    pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?
            .checked_mul(4)?;
        let px = self.rgba.get(offset..offset.checked_add(4)?)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Whether any part of the tile overlaps a `width × height` surface.
    pub fn intersects(&self, width: u32, height: u32) -> bool {
        let left = i64::from(self.dest_x);
        let top = i64::from(self.dest_y);
        let right = left + i64::from(self.width);
        let bottom = top + i64::from(self.height);
        right > 0 && bottom > 0 && left < i64::from(width) && top < i64::from(height)
    }
}

// ── paint ────────────────────────────────────────────────────────

/// Paint one tile into the framebuffer, converting each pixel to the
/// surface's format. Returns the number of pixels written.
///
/// The caller holds the surface lock and presents once the batch is
/// done.
pub fn paint(tile: &BitmapTile, fb: &mut Framebuffer) -> usize {
    if !tile.intersects(fb.width(), fb.height()) {
        return 0;
    }

    // Tile-local rows and columns that land on the surface.
    let (rows, cols) = (
        visible_span(tile.dest_y, tile.height, fb.height()),
        visible_span(tile.dest_x, tile.width, fb.width()),
    );

    let mut written = 0;
    for y in rows {
        let sy = i64::from(tile.dest_y) + i64::from(y);
        for x in cols.clone() {
            let sx = i64::from(tile.dest_x) + i64::from(x);
            let Some(rgba) = tile.rgba(x, y) else {
                continue;
            };
            if fb.set_pixel(sx, sy, rgba) {
                written += 1;
            }
        }
    }
    written
}

/// `width * height * 4`, or `None` if it overflows `usize`.
fn tile_bytes(width: u32, height: u32) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// Offsets in `0..len` that fall inside `0..limit` once shifted by `start`.
fn visible_span(start: i32, len: u32, limit: u32) -> std::ops::Range<u32> {
    let start = i64::from(start);
    let first = (-start).clamp(0, i64::from(len));
    let end = (i64::from(limit) - start).clamp(first, i64::from(len));
    first as u32..end as u32
}

// ── Tests ────────────────────────────────────────────────────────
