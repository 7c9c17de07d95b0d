//! Contract with the remote-session collaborator.
//!
//! The protocol client lives outside this crate. It is driven through
//! three pieces:
//!
//! - [`SessionConnector`] logs in and hands back a [`RemoteSession`],
//! - [`RemoteSession`] takes outbound input commands,
//! - [`SessionHandlers`] receives inbound callbacks. A protocol client
//!   may invoke them from any of its own threads.
//!
//! [`SessionLink`] builds a set of handlers that queue every callback
//! for the dispatcher thread, so all surface and cursor work stays on
//! one thread.
//!
//! ```text
//! protocol thread(s) ──handlers──► mpsc queue ──► Dispatcher::tick
//! Dispatcher ──InputCommand──► RemoteSession
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tracing::trace;

use crate::compositor::BitmapTile;
use crate::cursor::RawCursorUpdate;
use crate::error::SessionError;
use crate::keymap::Scancode;

// ── Outbound ─────────────────────────────────────────────────────

/// Outbound half of a connected remote session.
///
/// Failures are reported per call and never end the display loop.
pub trait RemoteSession {
    fn key_down(&mut self, code: Scancode) -> Result<(), SessionError>;
    fn key_up(&mut self, code: Scancode) -> Result<(), SessionError>;
    fn mouse_move(&mut self, x: i32, y: i32) -> Result<(), SessionError>;
    /// `button` is 0-based.
    fn mouse_down(&mut self, button: u8, x: i32, y: i32) -> Result<(), SessionError>;
    /// `button` is 0-based.
    fn mouse_up(&mut self, button: u8, x: i32, y: i32) -> Result<(), SessionError>;
    fn mouse_wheel(&mut self, delta: i32) -> Result<(), SessionError>;

    /// Tear the session down. Callbacks may still arrive afterwards.
    fn disconnect(&mut self) {}
}

// ── Login ────────────────────────────────────────────────────────

/// Where to connect and the desktop size to request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTarget {
    /// `host:port`.
    pub address: String,
    pub width: u32,
    pub height: u32,
}

/// Login credentials.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub domain: String,
    pub user: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Opens remote sessions.
pub trait SessionConnector {
    type Session: RemoteSession;

    /// Log in and start delivering callbacks through `handlers`.
    fn login(
        &self,
        target: &SessionTarget,
        credentials: &Credentials,
        handlers: SessionHandlers,
    ) -> Result<Self::Session, SessionError>;
}

// ── Inbound ──────────────────────────────────────────────────────

/// One inbound callback, as queued for the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Error(SessionError),
    Ready,
    Bitmap(Vec<BitmapTile>),
    PointerHide,
    PointerCached(u16),
    PointerUpdate(RawCursorUpdate),
}

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;
type Notify = Arc<dyn Fn() + Send + Sync>;

/// Named callback slots for the remote session.
///
/// Register with the `on_*` methods; the protocol client fires them
/// with the matching emit methods. Unregistered slots do nothing.
#[derive(Clone)]
pub struct SessionHandlers {
    error: Handler<SessionError>,
    ready: Notify,
    bitmap: Handler<Vec<BitmapTile>>,
    pointer_hide: Notify,
    pointer_cached: Handler<u16>,
    pointer_update: Handler<RawCursorUpdate>,
}

impl Default for SessionHandlers {
    fn default() -> Self {
        Self {
            error: Arc::new(|_| {}),
            ready: Arc::new(|| {}),
            bitmap: Arc::new(|_| {}),
            pointer_hide: Arc::new(|| {}),
            pointer_cached: Arc::new(|_| {}),
            pointer_update: Arc::new(|_| {}),
        }
    }
}

impl fmt::Debug for SessionHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandlers").finish_non_exhaustive()
    }
}

impl SessionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Registration ─────────────────────────────────────────────

    pub fn on_error(&mut self, f: impl Fn(SessionError) + Send + Sync + 'static) {
        self.error = Arc::new(f);
    }

    pub fn on_ready(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.ready = Arc::new(f);
    }

    pub fn on_bitmap(&mut self, f: impl Fn(Vec<BitmapTile>) + Send + Sync + 'static) {
        self.bitmap = Arc::new(f);
    }

    pub fn on_pointer_hide(&mut self, f: impl Fn() + Send + Sync + 'static) {
        self.pointer_hide = Arc::new(f);
    }

    pub fn on_pointer_cached(&mut self, f: impl Fn(u16) + Send + Sync + 'static) {
        self.pointer_cached = Arc::new(f);
    }

    pub fn on_pointer_update(&mut self, f: impl Fn(RawCursorUpdate) + Send + Sync + 'static) {
        self.pointer_update = Arc::new(f);
    }

    // ── Emitting (called by the protocol client) ─────────────────

    pub fn error(&self, err: SessionError) {
        (self.error)(err)
    }

    pub fn ready(&self) {
        (self.ready)()
    }

    pub fn bitmap(&self, tiles: Vec<BitmapTile>) {
        (self.bitmap)(tiles)
    }

    pub fn pointer_hide(&self) {
        (self.pointer_hide)()
    }

    pub fn pointer_cached(&self, index: u16) {
        (self.pointer_cached)(index)
    }

    pub fn pointer_update(&self, update: RawCursorUpdate) {
        (self.pointer_update)(update)
    }

    /// Fire the handler matching a queued event.
    pub fn emit(&self, event: SessionEvent) {
        match event {
            SessionEvent::Error(e) => self.error(e),
            SessionEvent::Ready => self.ready(),
            SessionEvent::Bitmap(tiles) => self.bitmap(tiles),
            SessionEvent::PointerHide => self.pointer_hide(),
            SessionEvent::PointerCached(index) => self.pointer_cached(index),
            SessionEvent::PointerUpdate(update) => self.pointer_update(update),
        }
    }
}

// ── SessionLink ──────────────────────────────────────────────────

/// Dispatcher-side end of the callback queue.
#[derive(Debug)]
pub struct SessionLink {
    events: mpsc::UnboundedReceiver<SessionEvent>,
    closed: Arc<AtomicBool>,
}

impl SessionLink {
    /// Create the queue and a set of handlers that feed it.
    pub fn new() -> (Self, SessionHandlers) {
        let (tx, rx) = mpsc::unbounded_channel();
        let closed = Arc::new(AtomicBool::new(false));

        let forward = {
            let closed = Arc::clone(&closed);
            move |event: SessionEvent| {
                if closed.load(Ordering::Acquire) {
                    trace!("session callback after teardown ignored");
                    return;
                }
                // Receiver gone means the loop is already torn down.
                let _ = tx.send(event);
            }
        };
        let forward: Handler<SessionEvent> = Arc::new(forward);

        let mut handlers = SessionHandlers::new();
        let f = Arc::clone(&forward);
        handlers.on_error(move |e| f(SessionEvent::Error(e)));
        let f = Arc::clone(&forward);
        handlers.on_ready(move || f(SessionEvent::Ready));
        let f = Arc::clone(&forward);
        handlers.on_bitmap(move |tiles| f(SessionEvent::Bitmap(tiles)));
        let f = Arc::clone(&forward);
        handlers.on_pointer_hide(move || f(SessionEvent::PointerHide));
        let f = Arc::clone(&forward);
        handlers.on_pointer_cached(move |index| f(SessionEvent::PointerCached(index)));
        handlers.on_pointer_update(move |update| forward(SessionEvent::PointerUpdate(update)));

        (Self { events: rx, closed }, handlers)
    }

    /// Next queued event, without blocking.
    pub fn try_next(&mut self) -> Option<SessionEvent> {
        if self.is_closed() {
            return None;
        }
        self.events.try_recv().ok()
    }

    /// Number of events queued right now.
    pub fn pending(&self) -> usize {
        if self.is_closed() {
            0
        } else {
            self.events.len()
        }
    }

    /// Stop accepting callbacks and drop anything still queued.
    pub fn close(&mut self) {
        self.closed.store(true, Ordering::Release);
        self.events.close();
        while self.events.try_recv().is_ok() {}
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn unregistered_handlers_are_noops() {
        let handlers = SessionHandlers::new();
        handlers.ready();
        handlers.pointer_hide();
        handlers.pointer_cached(3);
        handlers.error(SessionError::Disconnected);
    }

    #[test]
    fn registered_handler_fires() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut handlers = SessionHandlers::new();
        let h = Arc::clone(&hits);
        handlers.on_pointer_cached(move |index| {
            h.fetch_add(index as usize, Ordering::SeqCst);
        });
        handlers.pointer_cached(4);
        handlers.emit(SessionEvent::PointerCached(5));
        assert_eq!(hits.load(Ordering::SeqCst), 9);
    }

    #[test]
    fn link_queues_in_order() {
        let (mut link, handlers) = SessionLink::new();
        handlers.ready();
        handlers.pointer_hide();
        handlers.pointer_cached(2);

        assert_eq!(link.try_next(), Some(SessionEvent::Ready));
        assert_eq!(link.try_next(), Some(SessionEvent::PointerHide));
        assert_eq!(link.try_next(), Some(SessionEvent::PointerCached(2)));
        assert_eq!(link.try_next(), None);
    }

    #[test]
    fn pending_counts_queued_events() {
        let (mut link, handlers) = SessionLink::new();
        assert_eq!(link.pending(), 0);
        handlers.ready();
        handlers.pointer_hide();
        assert_eq!(link.pending(), 2);
        link.try_next();
        assert_eq!(link.pending(), 1);
        link.close();
        assert_eq!(link.pending(), 0);
    }

    #[test]
    fn callbacks_from_other_threads_are_queued() {
        let (mut link, handlers) = SessionLink::new();
        let workers: Vec<_> = (0..4u16)
            .map(|i| {
                let h = handlers.clone();
                std::thread::spawn(move || h.pointer_cached(i))
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }
        let mut seen = Vec::new();
        while let Some(SessionEvent::PointerCached(i)) = link.try_next() {
            seen.push(i);
        }
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn callbacks_after_close_are_dropped() {
        let (mut link, handlers) = SessionLink::new();
        handlers.ready();
        link.close();
        handlers.pointer_hide();
        assert!(link.is_closed());
        assert_eq!(link.try_next(), None);

        drop(link);
        handlers.pointer_cached(1);
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials {
            domain: "CORP".into(),
            user: "alice".into(),
            password: "hunter2".into(),
        };
        let text = format!("{creds:?}");
        assert!(text.contains("alice"));
        assert!(!text.contains("hunter2"));
    }
}
