//! Display presenter. Copies the framebuffer into the window surface.
//!
//! Uses softbuffer for CPU-side presentation. The surface keeps the
//! framebuffer's fixed size; the window is not resizable.

use std::num::NonZeroU32;
use std::sync::Arc;

use rdview_core::{CursorImage, Framebuffer, ViewError};
use softbuffer::{Context, Surface};
use winit::window::{CustomCursor, CustomCursorSource, Window};

/// Presents [`Framebuffer`]s into a winit window.
pub struct Presenter {
    _context: Context<Arc<Window>>,
    surface: Surface<Arc<Window>, Arc<Window>>,
    width: u32,
    height: u32,
    /// Last presented frame as `0x00RRGGBB` words, kept for redraws.
    frame: Vec<u32>,
}

impl Presenter {
    /// Create a presenter targeting `window`, sized `width × height`.
    pub fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, ViewError> {
        let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
            return Err(ViewError::InvalidSurface("presenter needs a non-zero size"));
        };
        let context = Context::new(Arc::clone(&window))
            .map_err(|e| ViewError::Backend(format!("softbuffer context: {e}")))?;
        let mut surface = Surface::new(&context, window)
            .map_err(|e| ViewError::Backend(format!("softbuffer surface: {e}")))?;
        surface
            .resize(w, h)
            .map_err(|e| ViewError::Backend(format!("softbuffer resize: {e}")))?;

        Ok(Self {
            _context: context,
            surface,
            width,
            height,
            frame: vec![0; width as usize * height as usize],
        })
    }

    /// Convert `fb` and show it.
    pub fn present(&mut self, fb: &Framebuffer) -> Result<(), ViewError> {
        if (fb.width(), fb.height()) != (self.width, self.height) {
            return Err(ViewError::Backend(format!(
                "frame is {}x{}, surface is {}x{}",
                fb.width(),
                fb.height(),
                self.width,
                self.height
            )));
        }
        fb.to_xrgb(&mut self.frame);
        self.redraw()
    }

    /// Show the last presented frame again.
    pub fn redraw(&mut self) -> Result<(), ViewError> {
        let mut buffer = self
            .surface
            .buffer_mut()
            .map_err(|e| ViewError::Backend(format!("softbuffer buffer: {e}")))?;
        let n = buffer.len().min(self.frame.len());
        buffer[..n].copy_from_slice(&self.frame[..n]);
        buffer
            .present()
            .map_err(|e| ViewError::Backend(format!("softbuffer present: {e}")))
    }
}

/// Turn a built cursor into a winit cursor source.
pub fn cursor_source(cursor: &CursorImage) -> Result<CustomCursorSource, ViewError> {
    CustomCursor::from_rgba(
        cursor.pixels.clone(),
        cursor.width,
        cursor.height,
        cursor.hot_x,
        cursor.hot_y,
    )
    .map_err(|e| ViewError::Backend(format!("cursor image: {e}")))
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn image(width: u16, height: u16, hot_x: u16, hot_y: u16) -> CursorImage {
        CursorImage {
            width,
            height,
            hot_x,
            hot_y,
            pixels: vec![0x80; width as usize * height as usize * 4],
        }
    }

    #[test]
    fn built_cursor_is_accepted() {
        assert!(cursor_source(&image(32, 31, 31, 30)).is_ok());
    }

    #[test]
    fn mismatched_pixels_are_rejected() {
        let mut bad = image(4, 4, 0, 0);
        bad.pixels.truncate(10);
        assert!(matches!(cursor_source(&bad), Err(ViewError::Backend(_))));
    }
}
