//! Loopback session.
//!
//! Stands in for a protocol client: login checks the target and the
//! credentials, then a background task plays a fixed script of remote
//! updates (a test pattern and a cursor) through the session handlers,
//! then reports through the error callback that it has run dry.
//! Outbound input is logged and counted, never sent anywhere.

use std::time::Duration;

use rdview_core::{
    BitmapTile, Credentials, RawCursorUpdate, RemoteSession, Scancode, SessionConnector,
    SessionError, SessionHandlers, SessionTarget,
};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Cache slot used for the scripted cursor.
pub const CURSOR_INDEX: u16 = 1;

/// Reported through the error callback once the script has played.
pub const SCRIPT_END: &str = "loopback script finished; no further updates";

const TILE: u32 = 64;
const CURSOR_SIZE: u16 = 16;

// ── LoopbackConnector ────────────────────────────────────────────

/// Connector producing [`LoopbackSession`]s.
#[derive(Debug, Clone)]
pub struct LoopbackConnector {
    /// Pause between scripted updates.
    pub step_delay: Duration,
}

impl Default for LoopbackConnector {
    fn default() -> Self {
        Self {
            step_delay: Duration::from_millis(100),
        }
    }
}

impl LoopbackConnector {
    pub fn with_delay(step_delay: Duration) -> Self {
        Self { step_delay }
    }
}

impl SessionConnector for LoopbackConnector {
    type Session = LoopbackSession;

    fn login(
        &self,
        target: &SessionTarget,
        credentials: &Credentials,
        handlers: SessionHandlers,
    ) -> Result<LoopbackSession, SessionError> {
        if target.address.trim().is_empty() {
            return Err(SessionError::Login("empty target address".into()));
        }
        if credentials.user.is_empty() {
            return Err(SessionError::Login("no user name given".into()));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| SessionError::Login(format!("no async runtime: {e}")))?;

        info!(
            address = %target.address,
            user = %credentials.user,
            width = target.width,
            height = target.height,
            "loopback session logged in"
        );

        let (width, height, delay) = (target.width, target.height, self.step_delay);
        let producer = runtime.spawn(async move {
            handlers.ready();
            tokio::time::sleep(delay).await;
            handlers.bitmap(test_pattern(width, height));
            tokio::time::sleep(delay).await;
            handlers.pointer_update(arrow_cursor(CURSOR_INDEX));
            tokio::time::sleep(delay).await;
            handlers.pointer_cached(CURSOR_INDEX);
            tokio::time::sleep(delay).await;
            handlers.error(SessionError::Remote(SCRIPT_END.into()));
            debug!("loopback script finished");
        });

        Ok(LoopbackSession {
            producer: Some(producer),
            sent: 0,
        })
    }
}

// ── LoopbackSession ──────────────────────────────────────────────

/// Session end of the loopback.
#[derive(Debug)]
pub struct LoopbackSession {
    producer: Option<JoinHandle<()>>,
    sent: u64,
}

impl LoopbackSession {
    /// Number of outbound commands received so far.
    pub fn sent(&self) -> u64 {
        self.sent
    }

    fn record(&mut self, command: &'static str) -> Result<(), SessionError> {
        if self.producer.is_none() {
            return Err(SessionError::Send {
                command,
                reason: "session disconnected".into(),
            });
        }
        self.sent += 1;
        Ok(())
    }
}

impl RemoteSession for LoopbackSession {
    fn key_down(&mut self, code: Scancode) -> Result<(), SessionError> {
        debug!(%code, "key down");
        self.record("key-down")
    }

    fn key_up(&mut self, code: Scancode) -> Result<(), SessionError> {
        debug!(%code, "key up");
        self.record("key-up")
    }

    fn mouse_move(&mut self, x: i32, y: i32) -> Result<(), SessionError> {
        debug!(x, y, "mouse move");
        self.record("mouse-move")
    }

    fn mouse_down(&mut self, button: u8, x: i32, y: i32) -> Result<(), SessionError> {
        debug!(button, x, y, "mouse down");
        self.record("mouse-down")
    }

    fn mouse_up(&mut self, button: u8, x: i32, y: i32) -> Result<(), SessionError> {
        debug!(button, x, y, "mouse up");
        self.record("mouse-up")
    }

    fn mouse_wheel(&mut self, delta: i32) -> Result<(), SessionError> {
        debug!(delta, "mouse wheel");
        self.record("mouse-wheel")
    }

    fn disconnect(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
            info!(sent = self.sent, "loopback session disconnected");
        }
    }
}

impl Drop for LoopbackSession {
    fn drop(&mut self) {
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}

// ── Script content ───────────────────────────────────────────────

/// Gradient tiles over the whole desktop, plus tiles hanging over the
/// right and bottom edges and one placed entirely off the surface.
pub fn test_pattern(width: u32, height: u32) -> Vec<BitmapTile> {
    let mut tiles = Vec::new();
    for ty in (0..height).step_by(TILE as usize) {
        for tx in (0..width).step_by(TILE as usize) {
            let r = (tx * 255 / width.max(1)) as u8;
            let g = (ty * 255 / height.max(1)) as u8;
            let b = if (tx / TILE + ty / TILE) % 2 == 0 { 0x40 } else { 0xA0 };
            tiles.push(BitmapTile::solid(
                tx as i32,
                ty as i32,
                TILE,
                TILE,
                [r, g, b, 0xFF],
            ));
        }
    }

    let (w, h) = (width as i32, height as i32);
    let half = (TILE / 2) as i32;
    tiles.push(BitmapTile::solid(w - half, h / 2, TILE, TILE, [0xFF, 0xFF, 0xFF, 0xFF]));
    tiles.push(BitmapTile::solid(w / 2, h - half, TILE, TILE, [0xFF, 0xFF, 0x00, 0xFF]));
    tiles.push(BitmapTile::solid(w + 10, h + 10, TILE, TILE, [0xFF, 0x00, 0xFF, 0xFF]));
    tiles
}

/// A small arrow cursor, bottom-up, with the trailing row the remote
/// side always adds.
pub fn arrow_cursor(index: u16) -> RawCursorUpdate {
    let size = CURSOR_SIZE as usize;
    let mut top_down = vec![0u8; size * size * 4];
    for y in 0..size {
        for x in 0..=y.min(size / 2) {
            let edge = x == 0 || x == y.min(size / 2) || y == size - 1;
            let px = if edge {
                [0x00, 0x00, 0x00, 0xFF]
            } else {
                [0xFF, 0xFF, 0xFF, 0xFF]
            };
            let at = (y * size + x) * 4;
            top_down[at..at + 4].copy_from_slice(&px);
        }
    }

    let mut color: Vec<u8> = top_down.chunks(size * 4).rev().flatten().copied().collect();
    color.extend(std::iter::repeat_n(0xCD, size * 4));

    RawCursorUpdate {
        index,
        bits_per_pixel: 32,
        hot_x: 0,
        hot_y: 0,
        width: CURSOR_SIZE,
        height: CURSOR_SIZE + 1,
        mask: vec![0; size * size / 8],
        color,
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rdview_core::{CursorState, Framebuffer, PixelFormat, SessionEvent, SessionLink, paint};

    fn target() -> SessionTarget {
        SessionTarget {
            address: "127.0.0.1:3389".into(),
            width: 320,
            height: 200,
        }
    }

    fn creds(user: &str) -> Credentials {
        Credentials {
            user: user.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn login_requires_user_and_address() {
        let connector = LoopbackConnector::with_delay(Duration::ZERO);
        let (_link, handlers) = SessionLink::new();
        let err = connector
            .login(&target(), &creds(""), handlers.clone())
            .unwrap_err();
        assert!(matches!(err, SessionError::Login(_)));

        let mut empty = target();
        empty.address = " ".into();
        assert!(connector.login(&empty, &creds("alice"), handlers).is_err());
    }

    #[tokio::test]
    async fn script_arrives_in_order() {
        let connector = LoopbackConnector::with_delay(Duration::ZERO);
        let (mut link, handlers) = SessionLink::new();
        let _session = connector.login(&target(), &creds("alice"), handlers).unwrap();

        let mut events = Vec::new();
        tokio::time::timeout(Duration::from_secs(5), async {
            while events.len() < 5 {
                match link.try_next() {
                    Some(event) => events.push(event),
                    None => tokio::time::sleep(Duration::from_millis(1)).await,
                }
            }
        })
        .await
        .expect("timeout");

        assert_eq!(events[0], SessionEvent::Ready);
        assert!(matches!(events[1], SessionEvent::Bitmap(_)));
        assert!(matches!(&events[2], SessionEvent::PointerUpdate(u) if u.index == CURSOR_INDEX));
        assert_eq!(events[3], SessionEvent::PointerCached(CURSOR_INDEX));
        assert_eq!(
            events[4],
            SessionEvent::Error(SessionError::Remote(SCRIPT_END.into()))
        );
    }

    #[tokio::test]
    async fn outbound_calls_are_counted_until_disconnect() {
        let connector = LoopbackConnector::with_delay(Duration::from_secs(60));
        let (_link, handlers) = SessionLink::new();
        let mut session = connector.login(&target(), &creds("alice"), handlers).unwrap();

        session.key_down(Scancode(0x1E)).unwrap();
        session.mouse_move(1, 2).unwrap();
        session.mouse_wheel(-1).unwrap();
        assert_eq!(session.sent(), 3);

        session.disconnect();
        assert!(matches!(
            session.mouse_move(3, 4),
            Err(SessionError::Send { command: "mouse-move", .. })
        ));
        assert_eq!(session.sent(), 3);
    }

    #[test]
    fn test_pattern_covers_edges() {
        let tiles = test_pattern(320, 200);
        let mut fb = Framebuffer::new(320, 200, PixelFormat::Bgra8).unwrap();
        let painted: usize = tiles.iter().map(|t| paint(t, &mut fb)).sum();

        let off = tiles.last().unwrap();
        assert!(!off.intersects(320, 200));
        assert!(painted > 320 * 200);
        assert_eq!(fb.pixel(319, 100), Some([0xFF, 0xFF, 0xFF, 0xFF]));
        assert_eq!(fb.pixel(160, 199), Some([0xFF, 0xFF, 0x00, 0xFF]));
    }

    #[test]
    fn arrow_cursor_builds() {
        let mut cursors = CursorState::new();
        let image = cursors.update(&arrow_cursor(7)).unwrap();
        assert_eq!((image.width, image.height), (CURSOR_SIZE, CURSOR_SIZE));
        // Top-left pixel is the opaque tip of the arrow.
        assert_eq!(&image.pixels[..4], &[0x00, 0x00, 0x00, 0xFF]);
    }
}
