//! Domain-specific error types for the rdview display core.
//!
//! Only startup failures travel up to the process boundary. Everything
//! raised while handling a remote update is logged by the dispatcher and
//! the previous display state is kept.

use thiserror::Error;

/// The canonical error type for the display core.
#[derive(Debug, Error)]
pub enum ViewError {
    // ── Surface Errors ───────────────────────────────────────────
    /// The framebuffer geometry is unusable.
    #[error("invalid surface: {0}")]
    InvalidSurface(&'static str),

    /// Row pitch does not fit a full row of pixels.
    #[error("pitch too small: {pitch} bytes for a {width}px row at {bpp} bytes per pixel")]
    PitchTooSmall { pitch: usize, width: u32, bpp: usize },

    /// A bitmap tile's pixel buffer does not cover its declared size.
    #[error("tile data too short: expected {expected} bytes, got {actual}")]
    TileTooShort { expected: usize, actual: usize },

    /// A bitmap tile's declared size does not fit in memory.
    #[error("invalid tile size: {width}x{height}")]
    InvalidTile { width: u32, height: u32 },

    // ── Presentation Errors ──────────────────────────────────────
    /// The windowing / presentation layer reported a failure.
    #[error("presentation backend: {0}")]
    Backend(String),

    /// The surface was used after it had been released.
    #[error("display surface already released")]
    SurfaceReleased,

    // ── Startup Errors ───────────────────────────────────────────
    /// The configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Logging in to the remote session failed, or the session broke.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    // ── Per-update Errors ────────────────────────────────────────
    /// A remote cursor update could not be turned into a cursor image.
    #[error("cursor error: {0}")]
    Cursor(#[from] CursorError),

    /// The I/O layer reported an error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

// ── CursorError ──────────────────────────────────────────────────

/// Reasons a remote cursor update is rejected.
///
/// All of these are recoverable: the caller logs and keeps the
/// cursor that is currently shown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// Only true-colour (32 bpp) cursor bitmaps are supported.
    #[error("unsupported cursor depth: {0} bpp")]
    UnsupportedDepth(u16),

    /// Nothing left to draw once the trailing row is dropped.
    #[error("empty cursor image: {width}x{height}")]
    Empty { width: u16, height: u16 },

    /// The colour buffer is shorter than the declared geometry.
    #[error("cursor data truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// A cache hit referenced an index that was never built.
    #[error("no cached cursor at index {0}")]
    CacheMiss(u16),
}

// ── SessionError ─────────────────────────────────────────────────

/// Errors raised by, or about, the remote session collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Session negotiation or authentication failed.
    #[error("login failed: {0}")]
    Login(String),

    /// The session is no longer connected.
    #[error("session disconnected")]
    Disconnected,

    /// An outbound input command could not be delivered.
    #[error("failed to send {command}: {reason}")]
    Send {
        command: &'static str,
        reason: String,
    },

    /// Error reported by the remote side through the error callback.
    #[error("{0}")]
    Remote(String),
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = ViewError::PitchTooSmall {
            pitch: 12,
            width: 10,
            bpp: 4,
        };
        assert!(e.to_string().contains("12"));
        assert!(e.to_string().contains("10px"));

        let e = CursorError::UnsupportedDepth(24);
        assert_eq!(e.to_string(), "unsupported cursor depth: 24 bpp");
    }

    #[test]
    fn from_cursor_and_session() {
        let e: ViewError = CursorError::CacheMiss(7).into();
        assert!(matches!(e, ViewError::Cursor(CursorError::CacheMiss(7))));

        let e: ViewError = SessionError::Disconnected.into();
        assert!(e.to_string().contains("disconnected"));
    }

    #[test]
    fn from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let e: ViewError = io_err.into();
        assert!(matches!(e, ViewError::Io(_)));
    }
}
