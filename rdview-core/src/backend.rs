//! Contract with the windowing / presentation layer.

use crate::cursor::CursorImage;
use crate::error::ViewError;
use crate::input::InputEvent;
use crate::surface::{Framebuffer, PixelFormat};

/// A fixed-size window that shows the framebuffer and reports input.
///
/// Implementations are driven from the dispatcher thread only.
pub trait DisplayBackend {
    /// Surface size in pixels.
    fn surface_size(&self) -> (u32, u32);

    /// Native pixel layout of the surface.
    fn surface_format(&self) -> PixelFormat {
        PixelFormat::Bgra8
    }

    /// Drain pending input events. Must not block.
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Show the current framebuffer contents.
    fn present(&mut self, frame: &Framebuffer) -> Result<(), ViewError>;

    /// Replace the system cursor.
    fn set_cursor(&mut self, cursor: &CursorImage) -> Result<(), ViewError>;

    /// Show or hide the system cursor.
    fn set_cursor_visible(&mut self, visible: bool);

    /// Release the window and its surface.
    fn close(&mut self) -> Result<(), ViewError>;
}
