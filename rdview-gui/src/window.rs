//! Native window and event pump.
//!
//! A winit window driven in pump mode: every [`poll_events`] call runs
//! the platform event loop once without blocking and hands back the
//! [`InputEvent`]s it produced. The window also owns the softbuffer
//! [`Presenter`] and applies custom cursors, which winit only builds
//! from inside the event loop.
//!
//! [`poll_events`]: DisplayBackend::poll_events

use std::sync::Arc;
use std::time::Duration;

use rdview_core::{CursorImage, DisplayBackend, Framebuffer, InputEvent, ViewError};
use tracing::{debug, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CustomCursorSource, Window, WindowId};

use crate::display::{self, Presenter};
use crate::keys;

/// Pixels of smooth scrolling that make one wheel notch.
const PIXELS_PER_NOTCH: f64 = 40.0;

/// How long `create` keeps pumping while waiting for the window.
const CREATE_TIMEOUT: Duration = Duration::from_secs(5);
const CREATE_POLL: Duration = Duration::from_millis(10);

// ── WindowState ──────────────────────────────────────────────────

/// Everything the event loop callbacks touch.
struct WindowState {
    title: String,
    size: PhysicalSize<u32>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    init_error: Option<ViewError>,
    closed: bool,
    events: Vec<InputEvent>,
    pointer: (i32, i32),
    scroll: (f64, f64),
    pending_cursor: Option<CustomCursorSource>,
}

impl WindowState {
    fn new(title: &str, width: u32, height: u32) -> Self {
        Self {
            title: title.to_owned(),
            size: PhysicalSize::new(width, height),
            window: None,
            presenter: None,
            init_error: None,
            closed: false,
            events: Vec::new(),
            pointer: (0, 0),
            scroll: (0.0, 0.0),
            pending_cursor: None,
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewError> {
        let attrs = Window::default_attributes()
            .with_title(self.title.clone())
            .with_inner_size(self.size)
            .with_resizable(false);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| ViewError::Backend(format!("create window: {e}")))?,
        );
        let presenter = Presenter::new(Arc::clone(&window), self.size.width, self.size.height)?;
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn push_button(&mut self, button: MouseButton, state: ElementState) {
        let button = match button {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::Back => 4,
            MouseButton::Forward => 5,
            MouseButton::Other(n) => {
                debug!(button = n, "unmapped mouse button");
                return;
            }
        };
        let (x, y) = self.pointer;
        self.events.push(InputEvent::MouseButton {
            button,
            pressed: state == ElementState::Pressed,
            x,
            y,
        });
    }

    fn push_wheel(&mut self, delta: MouseScrollDelta) {
        let (x, y) = match delta {
            MouseScrollDelta::LineDelta(x, y) => (x.round() as i32, y.round() as i32),
            MouseScrollDelta::PixelDelta(pos) => {
                self.scroll.0 += pos.x;
                self.scroll.1 += pos.y;
                let notches = (
                    (self.scroll.0 / PIXELS_PER_NOTCH).trunc(),
                    (self.scroll.1 / PIXELS_PER_NOTCH).trunc(),
                );
                self.scroll.0 -= notches.0 * PIXELS_PER_NOTCH;
                self.scroll.1 -= notches.1 * PIXELS_PER_NOTCH;
                (notches.0 as i32, notches.1 as i32)
            }
        };
        if x != 0 || y != 0 {
            self.events.push(InputEvent::MouseWheel { x, y });
        }
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.init_error.is_some() || self.closed {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            self.init_error = Some(e);
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.events.push(InputEvent::Quit),
            WindowEvent::KeyboardInput { event, .. } => {
                self.events.push(InputEvent::Key {
                    key: keys::physical_key(event.physical_key),
                    pressed: event.state == ElementState::Pressed,
                });
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.pointer = (position.x.floor() as i32, position.y.floor() as i32);
                let (x, y) = self.pointer;
                self.events.push(InputEvent::MouseMotion { x, y });
            }
            WindowEvent::MouseInput { state, button, .. } => self.push_button(button, state),
            WindowEvent::MouseWheel { delta, .. } => self.push_wheel(delta),
            WindowEvent::RedrawRequested => {
                if let Some(presenter) = self.presenter.as_mut() {
                    if let Err(e) = presenter.redraw() {
                        warn!("redraw failed: {e}");
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let (Some(source), Some(window)) = (self.pending_cursor.take(), self.window.as_ref()) {
            window.set_cursor(event_loop.create_custom_cursor(source));
        }
    }
}

// ── NativeWindow ─────────────────────────────────────────────────

/// Handle to the native window.
pub struct NativeWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
}

impl NativeWindow {
    /// Create and show a fixed-size window.
    pub fn create(title: &str, width: u32, height: u32) -> Result<Self, ViewError> {
        let mut event_loop =
            EventLoop::new().map_err(|e| ViewError::Backend(format!("event loop: {e}")))?;
        let mut state = WindowState::new(title, width, height);

        let mut waited = Duration::ZERO;
        while state.window.is_none() {
            if let Some(e) = state.init_error.take() {
                return Err(e);
            }
            if waited >= CREATE_TIMEOUT {
                return Err(ViewError::Backend("window was not created in time".into()));
            }
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(CREATE_POLL), &mut state)
            {
                return Err(ViewError::Backend(format!(
                    "event loop exited during startup ({code})"
                )));
            }
            waited += CREATE_POLL;
        }

        info!(title, width, height, "window created");
        Ok(Self { event_loop, state })
    }

    fn window(&self) -> Result<&Window, ViewError> {
        self.state.window.as_deref().ok_or(ViewError::SurfaceReleased)
    }
}

impl DisplayBackend for NativeWindow {
    fn surface_size(&self) -> (u32, u32) {
        (self.state.size.width, self.state.size.height)
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        let status = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            if !self.state.events.contains(&InputEvent::Quit) {
                self.state.events.push(InputEvent::Quit);
            }
        }
        std::mem::take(&mut self.state.events)
    }

    fn present(&mut self, frame: &Framebuffer) -> Result<(), ViewError> {
        self.state
            .presenter
            .as_mut()
            .ok_or(ViewError::SurfaceReleased)?
            .present(frame)
    }

    fn set_cursor(&mut self, cursor: &CursorImage) -> Result<(), ViewError> {
        self.window()?;
        self.state.pending_cursor = Some(display::cursor_source(cursor)?);
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        if let Ok(window) = self.window() {
            window.set_cursor_visible(visible);
        }
    }

    fn close(&mut self) -> Result<(), ViewError> {
        self.state.closed = true;
        self.state.pending_cursor = None;
        self.state.presenter = None;
        if let Some(window) = self.state.window.take() {
            window.set_visible(false);
        }
        // Let the platform process the destroy.
        let _ = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.state);
        info!("window closed");
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn state() -> WindowState {
        WindowState::new("test", 64, 64)
    }

    #[test]
    fn buttons_are_numbered_from_one() {
        let mut s = state();
        s.pointer = (10, 20);
        s.push_button(MouseButton::Left, ElementState::Pressed);
        s.push_button(MouseButton::Right, ElementState::Released);
        s.push_button(MouseButton::Other(9), ElementState::Pressed);
        assert_eq!(
            s.events,
            vec![
                InputEvent::MouseButton {
                    button: 1,
                    pressed: true,
                    x: 10,
                    y: 20
                },
                InputEvent::MouseButton {
                    button: 3,
                    pressed: false,
                    x: 10,
                    y: 20
                },
            ]
        );
    }

    #[test]
    fn line_wheel_passes_through() {
        let mut s = state();
        s.push_wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        s.push_wheel(MouseScrollDelta::LineDelta(0.0, 0.0));
        assert_eq!(s.events, vec![InputEvent::MouseWheel { x: 0, y: -1 }]);
    }

    #[test]
    fn pixel_wheel_accumulates_into_notches() {
        let mut s = state();
        s.push_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 25.0)));
        assert!(s.events.is_empty());
        s.push_wheel(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 25.0)));
        assert_eq!(s.events, vec![InputEvent::MouseWheel { x: 0, y: 1 }]);
        assert!((s.scroll.1 - 10.0).abs() < f64::EPSILON);
    }
}
