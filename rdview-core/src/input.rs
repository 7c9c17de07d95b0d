//! Local input events → outbound session commands.
//!
//! The window layer reports [`InputEvent`]s in its own terms (physical
//! keys, 1-based mouse buttons). [`translate`] turns them into the
//! protocol-agnostic [`InputCommand`]s sent to the remote session.

use crate::error::SessionError;
use crate::keymap::{PhysicalKey, Scancode, scancode};
use crate::session::RemoteSession;

// ── InputEvent ───────────────────────────────────────────────────

/// A normalized event from the local window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The user asked to close the window.
    Quit,
    /// Key pressed (`true`) or released.
    Key { key: PhysicalKey, pressed: bool },
    /// Pointer moved, in surface coordinates.
    MouseMotion { x: i32, y: i32 },
    /// Mouse button pressed or released. Buttons are numbered from 1
    /// (1 = left, 2 = middle, 3 = right, 4/5 = side buttons).
    MouseButton {
        button: u8,
        pressed: bool,
        x: i32,
        y: i32,
    },
    /// Wheel motion in notches. `x` is horizontal, `y` vertical with
    /// positive values away from the user.
    MouseWheel { x: i32, y: i32 },
}

impl InputEvent {
    pub fn is_keyboard(&self) -> bool {
        matches!(self, InputEvent::Key { .. })
    }

    pub fn is_mouse(&self) -> bool {
        matches!(
            self,
            InputEvent::MouseMotion { .. }
                | InputEvent::MouseButton { .. }
                | InputEvent::MouseWheel { .. }
        )
    }
}

// ── InputCommand ─────────────────────────────────────────────────

/// An outbound command for the remote session. Mouse buttons are
/// 0-based here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCommand {
    KeyDown(Scancode),
    KeyUp(Scancode),
    MouseMove { x: i32, y: i32 },
    MouseDown { button: u8, x: i32, y: i32 },
    MouseUp { button: u8, x: i32, y: i32 },
    MouseWheel(i32),
}

impl InputCommand {
    /// Short name used in logs and send errors.
    pub fn name(&self) -> &'static str {
        match self {
            InputCommand::KeyDown(_) => "key-down",
            InputCommand::KeyUp(_) => "key-up",
            InputCommand::MouseMove { .. } => "mouse-move",
            InputCommand::MouseDown { .. } => "mouse-down",
            InputCommand::MouseUp { .. } => "mouse-up",
            InputCommand::MouseWheel(_) => "mouse-wheel",
        }
    }

    /// Issue this command on a session.
    pub fn send_to<S: RemoteSession + ?Sized>(&self, session: &mut S) -> Result<(), SessionError> {
        match *self {
            InputCommand::KeyDown(code) => session.key_down(code),
            InputCommand::KeyUp(code) => session.key_up(code),
            InputCommand::MouseMove { x, y } => session.mouse_move(x, y),
            InputCommand::MouseDown { button, x, y } => session.mouse_down(button, x, y),
            InputCommand::MouseUp { button, x, y } => session.mouse_up(button, x, y),
            InputCommand::MouseWheel(delta) => session.mouse_wheel(delta),
        }
    }
}

/// Convert a window event to a session command (if applicable).
///
/// Horizontal wheel motion is not forwarded, and neither is button 0,
/// which has no 0-based counterpart.
pub fn translate(event: &InputEvent) -> Option<InputCommand> {
    match *event {
        InputEvent::Quit => None,
        InputEvent::Key { key, pressed } => {
            let code = scancode(key);
            Some(if pressed {
                InputCommand::KeyDown(code)
            } else {
                InputCommand::KeyUp(code)
            })
        }
        InputEvent::MouseMotion { x, y } => Some(InputCommand::MouseMove { x, y }),
        InputEvent::MouseButton {
            button,
            pressed,
            x,
            y,
        } => {
            let button = button.checked_sub(1)?;
            Some(if pressed {
                InputCommand::MouseDown { button, x, y }
            } else {
                InputCommand::MouseUp { button, x, y }
            })
        }
        InputEvent::MouseWheel { x, y } => {
            if x != 0 || y == 0 {
                return None;
            }
            Some(InputCommand::MouseWheel(y))
        }
    }
}

// ── InputPolicy ──────────────────────────────────────────────────

/// Which classes of local input are forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputPolicy {
    pub forward_keyboard: bool,
    pub forward_mouse: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            forward_keyboard: true,
            forward_mouse: true,
        }
    }
}

impl InputPolicy {
    pub fn allows(&self, event: &InputEvent) -> bool {
        (event.is_keyboard() && self.forward_keyboard) || (event.is_mouse() && self.forward_mouse)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_translate_through_the_table() {
        let down = InputEvent::Key {
            key: PhysicalKey::RightAlt,
            pressed: true,
        };
        let up = InputEvent::Key {
            key: PhysicalKey::Escape,
            pressed: false,
        };
        assert_eq!(translate(&down), Some(InputCommand::KeyDown(Scancode(0xE038))));
        assert_eq!(translate(&up), Some(InputCommand::KeyUp(Scancode(0x0001))));
    }

    #[test]
    fn unknown_key_is_forwarded_as_noop_code() {
        let ev = InputEvent::Key {
            key: PhysicalKey::LeftGui,
            pressed: true,
        };
        assert_eq!(translate(&ev), Some(InputCommand::KeyDown(Scancode::NONE)));
    }

    #[test]
    fn buttons_are_rebased_to_zero() {
        let left = InputEvent::MouseButton {
            button: 1,
            pressed: true,
            x: 5,
            y: 6,
        };
        let right = InputEvent::MouseButton {
            button: 3,
            pressed: false,
            x: 7,
            y: 8,
        };
        assert_eq!(
            translate(&left),
            Some(InputCommand::MouseDown { button: 0, x: 5, y: 6 })
        );
        assert_eq!(
            translate(&right),
            Some(InputCommand::MouseUp { button: 2, x: 7, y: 8 })
        );

        let zero = InputEvent::MouseButton {
            button: 0,
            pressed: true,
            x: 0,
            y: 0,
        };
        assert_eq!(translate(&zero), None);
    }

    #[test]
    fn horizontal_wheel_is_ignored() {
        assert_eq!(
            translate(&InputEvent::MouseWheel { x: 0, y: -2 }),
            Some(InputCommand::MouseWheel(-2))
        );
        assert_eq!(translate(&InputEvent::MouseWheel { x: 1, y: 0 }), None);
        assert_eq!(translate(&InputEvent::MouseWheel { x: 1, y: 1 }), None);
    }

    #[test]
    fn quit_is_not_forwarded() {
        assert_eq!(translate(&InputEvent::Quit), None);
    }

    #[test]
    fn policy_filters_by_class() {
        let policy = InputPolicy {
            forward_keyboard: false,
            forward_mouse: true,
        };
        let key = InputEvent::Key {
            key: PhysicalKey::A,
            pressed: true,
        };
        assert!(!policy.allows(&key));
        assert!(policy.allows(&InputEvent::MouseMotion { x: 1, y: 1 }));
        assert!(!policy.allows(&InputEvent::Quit));
    }
}
