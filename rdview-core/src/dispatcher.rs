//! The display loop.
//!
//! One [`Dispatcher`] owns the framebuffer, the cursor state, the
//! window backend and the outbound session. Each [`tick`](Dispatcher::tick)
//! drains local input first, then whatever the remote session queued
//! since the last tick. Nothing here blocks except the caller's sleep
//! between ticks.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, error, info, trace, warn};

use crate::backend::DisplayBackend;
use crate::compositor::{self, BitmapTile};
use crate::cursor::{CursorState, RawCursorUpdate};
use crate::error::ViewError;
use crate::input::{self, InputEvent, InputPolicy};
use crate::session::{RemoteSession, SessionEvent, SessionLink};
use crate::surface::Framebuffer;

/// Pause between ticks in [`Dispatcher::run`].
pub const FRAME_INTERVAL: Duration = Duration::from_millis(1);

/// Whether the loop should keep going after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

// ── Dispatcher ───────────────────────────────────────────────────

pub struct Dispatcher<B: DisplayBackend, S: RemoteSession> {
    backend: B,
    session: S,
    link: SessionLink,
    policy: InputPolicy,
    framebuffer: Arc<Mutex<Framebuffer>>,
    cursors: CursorState,
}

impl<B: DisplayBackend, S: RemoteSession> Dispatcher<B, S> {
    /// Wire a backend and a logged-in session together. The
    /// framebuffer takes the backend's surface size and format.
    pub fn new(
        backend: B,
        session: S,
        link: SessionLink,
        policy: InputPolicy,
    ) -> Result<Self, ViewError> {
        let (width, height) = backend.surface_size();
        let framebuffer = Framebuffer::new(width, height, backend.surface_format())?;
        info!(width, height, format = ?framebuffer.format(), "display surface ready");
        Ok(Self {
            backend,
            session,
            link,
            policy,
            framebuffer: Arc::new(Mutex::new(framebuffer)),
            cursors: CursorState::new(),
        })
    }

    /// Shared handle to the framebuffer. Hold the lock only briefly:
    /// the loop takes it for every bitmap batch.
    pub fn framebuffer(&self) -> Arc<Mutex<Framebuffer>> {
        Arc::clone(&self.framebuffer)
    }

    /// Copy of the current framebuffer.
    pub fn snapshot(&self) -> Framebuffer {
        self.framebuffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cursors(&self) -> &CursorState {
        &self.cursors
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    /// Tick until the user quits.
    pub async fn run(&mut self) {
        while self.tick() == LoopControl::Continue {
            tokio::time::sleep(FRAME_INTERVAL).await;
        }
    }

    /// One loop iteration.
    pub fn tick(&mut self) -> LoopControl {
        let mut control = LoopControl::Continue;

        for event in self.backend.poll_events() {
            if event == InputEvent::Quit {
                info!("quit requested");
                control = LoopControl::Quit;
                continue;
            }
            self.forward_input(&event);
        }

        if control == LoopControl::Quit {
            return control;
        }

        // Only what was queued before this point; later callbacks wait
        // for the next tick so input keeps being polled.
        for _ in 0..self.link.pending() {
            let Some(event) = self.link.try_next() else {
                break;
            };
            self.handle_session_event(event);
        }

        control
    }

    /// Stop taking callbacks, disconnect, and release the surface.
    pub fn shutdown(mut self) -> Result<(), ViewError> {
        info!("shutting down display loop");
        self.link.close();
        self.session.disconnect();
        self.backend.close()
    }

    // ── Local input ──────────────────────────────────────────────

    fn forward_input(&mut self, event: &InputEvent) {
        if !self.policy.allows(event) {
            return;
        }
        let Some(command) = input::translate(event) else {
            return;
        };
        trace!(?command, "forwarding input");
        if let Err(e) = command.send_to(&mut self.session) {
            warn!(command = command.name(), "failed to send input: {e}");
        }
    }

    // ── Remote callbacks ─────────────────────────────────────────

    fn handle_session_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Error(e) => error!("session error: {e}"),
            SessionEvent::Ready => info!("session ready"),
            SessionEvent::Bitmap(tiles) => self.paint_batch(&tiles),
            SessionEvent::PointerHide => {
                if self.cursors.hide() {
                    self.backend.set_cursor_visible(false);
                }
            }
            SessionEvent::PointerCached(index) => self.select_cached_cursor(index),
            SessionEvent::PointerUpdate(update) => self.update_cursor(&update),
        }
    }

    /// Paint a batch under one surface lock and present once.
    fn paint_batch(&mut self, tiles: &[BitmapTile]) {
        let mut fb = self
            .framebuffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let painted: usize = tiles.iter().map(|tile| compositor::paint(tile, &mut fb)).sum();
        if let Err(e) = self.backend.present(&fb) {
            warn!("present failed: {e}");
        }
        drop(fb);

        trace!(tiles = tiles.len(), painted, "bitmap batch");
    }

    fn reveal_cursor(&mut self) {
        if self.cursors.show() {
            self.backend.set_cursor_visible(true);
        }
    }

    fn select_cached_cursor(&mut self, index: u16) {
        self.reveal_cursor();
        match self.cursors.cached(index) {
            Ok(image) => {
                if let Err(e) = self.backend.set_cursor(image) {
                    warn!(index, "failed to set cached cursor: {e}");
                }
            }
            Err(e) => warn!(index, "cursor cache inconsistent with remote: {e}"),
        }
    }

    fn update_cursor(&mut self, update: &RawCursorUpdate) {
        self.reveal_cursor();
        match self.cursors.update(update) {
            Ok(image) => {
                debug!(
                    index = update.index,
                    width = image.width,
                    height = image.height,
                    "cursor updated"
                );
                if let Err(e) = self.backend.set_cursor(image) {
                    warn!(index = update.index, "failed to set cursor: {e}");
                }
            }
            Err(e) => warn!(
                index = update.index,
                bpp = update.bits_per_pixel,
                width = update.width,
                height = update.height,
                len = update.color.len(),
                "cursor update rejected: {e}"
            ),
        }
    }
}
