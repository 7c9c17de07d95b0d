//! # rdview-core
//!
//! Display compositor and input-translation core of the rdview remote
//! desktop client.
//!
//! This crate contains:
//! - **Keymap**: `PhysicalKey` → set-1 `Scancode` translation
//! - **Surface**: `Framebuffer`, `PixelFormat` and the bounded `write_pixel` primitive
//! - **Compositor**: clipped painting of remote `BitmapTile`s
//! - **Cursor**: bottom-up cursor bitmaps → `CursorImage`, cache and visibility
//! - **Input**: normalized local `InputEvent`s → outbound `InputCommand`s
//! - **Session / Backend**: contracts with the protocol client and the window layer
//! - **Dispatcher**: the single-threaded display loop tying it together
//! - **Error**: `ViewError`, the typed `thiserror`-based error hierarchy

pub mod backend;
pub mod compositor;
pub mod cursor;
pub mod dispatcher;
pub mod error;
pub mod input;
pub mod keymap;
pub mod session;
pub mod surface;

/// Remote desktop and window width. Not configurable.
pub const DESKTOP_WIDTH: u32 = 1280;
/// Remote desktop and window height. Not configurable.
pub const DESKTOP_HEIGHT: u32 = 800;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use backend::DisplayBackend;
pub use compositor::{BitmapTile, paint};
pub use cursor::{
    CursorImage, CursorState, CursorVisibility, RawCursorUpdate, build_cursor, flip_rows,
};
pub use dispatcher::{Dispatcher, FRAME_INTERVAL, LoopControl};
pub use error::{CursorError, SessionError, ViewError};
pub use input::{InputCommand, InputEvent, InputPolicy, translate};
pub use keymap::{PhysicalKey, Scancode, scancode};
pub use session::{
    Credentials, RemoteSession, SessionConnector, SessionEvent, SessionHandlers, SessionLink,
    SessionTarget,
};
pub use surface::{Framebuffer, PixelFormat, write_pixel};
