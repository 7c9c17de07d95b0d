//! winit key codes → [`PhysicalKey`].

use rdview_core::PhysicalKey;
use winit::keyboard::{self, KeyCode};

/// Identify the physical key behind a winit keyboard event.
pub fn physical_key(key: keyboard::PhysicalKey) -> PhysicalKey {
    match key {
        keyboard::PhysicalKey::Code(code) => from_key_code(code),
        keyboard::PhysicalKey::Unidentified(_) => PhysicalKey::Unknown,
    }
}

pub fn from_key_code(code: KeyCode) -> PhysicalKey {
    use PhysicalKey as K;
    match code {
        KeyCode::KeyA => K::A,
        KeyCode::KeyB => K::B,
        KeyCode::KeyC => K::C,
        KeyCode::KeyD => K::D,
        KeyCode::KeyE => K::E,
        KeyCode::KeyF => K::F,
        KeyCode::KeyG => K::G,
        KeyCode::KeyH => K::H,
        KeyCode::KeyI => K::I,
        KeyCode::KeyJ => K::J,
        KeyCode::KeyK => K::K,
        KeyCode::KeyL => K::L,
        KeyCode::KeyM => K::M,
        KeyCode::KeyN => K::N,
        KeyCode::KeyO => K::O,
        KeyCode::KeyP => K::P,
        KeyCode::KeyQ => K::Q,
        KeyCode::KeyR => K::R,
        KeyCode::KeyS => K::S,
        KeyCode::KeyT => K::T,
        KeyCode::KeyU => K::U,
        KeyCode::KeyV => K::V,
        KeyCode::KeyW => K::W,
        KeyCode::KeyX => K::X,
        KeyCode::KeyY => K::Y,
        KeyCode::KeyZ => K::Z,

        KeyCode::Digit1 => K::Digit1,
        KeyCode::Digit2 => K::Digit2,
        KeyCode::Digit3 => K::Digit3,
        KeyCode::Digit4 => K::Digit4,
        KeyCode::Digit5 => K::Digit5,
        KeyCode::Digit6 => K::Digit6,
        KeyCode::Digit7 => K::Digit7,
        KeyCode::Digit8 => K::Digit8,
        KeyCode::Digit9 => K::Digit9,
        KeyCode::Digit0 => K::Digit0,

        KeyCode::Enter => K::Return,
        KeyCode::Escape => K::Escape,
        KeyCode::Backspace => K::Backspace,
        KeyCode::Tab => K::Tab,
        KeyCode::Space => K::Space,
        KeyCode::Minus => K::Minus,
        KeyCode::Equal => K::Equals,
        KeyCode::BracketLeft => K::LeftBracket,
        KeyCode::BracketRight => K::RightBracket,
        KeyCode::Backslash => K::Backslash,
        KeyCode::Semicolon => K::Semicolon,
        KeyCode::Quote => K::Apostrophe,
        KeyCode::Backquote => K::Grave,
        KeyCode::Comma => K::Comma,
        KeyCode::Period => K::Period,
        KeyCode::Slash => K::Slash,
        KeyCode::CapsLock => K::CapsLock,
        KeyCode::IntlBackslash => K::NonUsBackslash,

        KeyCode::F1 => K::F1,
        KeyCode::F2 => K::F2,
        KeyCode::F3 => K::F3,
        KeyCode::F4 => K::F4,
        KeyCode::F5 => K::F5,
        KeyCode::F6 => K::F6,
        KeyCode::F7 => K::F7,
        KeyCode::F8 => K::F8,
        KeyCode::F9 => K::F9,
        KeyCode::F10 => K::F10,
        KeyCode::F11 => K::F11,
        KeyCode::F12 => K::F12,
        KeyCode::F13 => K::F13,
        KeyCode::F14 => K::F14,
        KeyCode::F15 => K::F15,
        KeyCode::F16 => K::F16,
        KeyCode::F17 => K::F17,
        KeyCode::F18 => K::F18,
        KeyCode::F19 => K::F19,
        KeyCode::F20 => K::F20,
        KeyCode::F21 => K::F21,
        KeyCode::F22 => K::F22,
        KeyCode::F23 => K::F23,
        KeyCode::F24 => K::F24,

        KeyCode::PrintScreen => K::PrintScreen,
        KeyCode::ScrollLock => K::ScrollLock,
        KeyCode::Pause => K::Pause,
        KeyCode::Insert => K::Insert,
        KeyCode::Home => K::Home,
        KeyCode::PageUp => K::PageUp,
        KeyCode::Delete => K::Delete,
        KeyCode::End => K::End,
        KeyCode::PageDown => K::PageDown,
        KeyCode::ArrowRight => K::Right,
        KeyCode::ArrowLeft => K::Left,
        KeyCode::ArrowDown => K::Down,
        KeyCode::ArrowUp => K::Up,

        KeyCode::NumLock => K::NumLock,
        KeyCode::NumpadDivide => K::KpDivide,
        KeyCode::NumpadMultiply => K::KpMultiply,
        KeyCode::NumpadSubtract => K::KpMinus,
        KeyCode::NumpadAdd => K::KpPlus,
        KeyCode::NumpadEnter => K::KpEnter,
        KeyCode::Numpad1 => K::Kp1,
        KeyCode::Numpad2 => K::Kp2,
        KeyCode::Numpad3 => K::Kp3,
        KeyCode::Numpad4 => K::Kp4,
        KeyCode::Numpad5 => K::Kp5,
        KeyCode::Numpad6 => K::Kp6,
        KeyCode::Numpad7 => K::Kp7,
        KeyCode::Numpad8 => K::Kp8,
        KeyCode::Numpad9 => K::Kp9,
        KeyCode::Numpad0 => K::Kp0,
        KeyCode::NumpadDecimal => K::KpDecimal,
        KeyCode::NumpadEqual => K::KpEquals,
        KeyCode::ContextMenu => K::Menu,

        KeyCode::ControlLeft => K::LeftCtrl,
        KeyCode::ShiftLeft => K::LeftShift,
        KeyCode::AltLeft => K::LeftAlt,
        KeyCode::SuperLeft => K::LeftGui,
        KeyCode::ControlRight => K::RightCtrl,
        KeyCode::ShiftRight => K::RightShift,
        KeyCode::AltRight => K::RightAlt,
        KeyCode::SuperRight => K::RightGui,

        _ => K::Unknown,
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rdview_core::{Scancode, scancode};
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn positional_keys_map_by_position() {
        assert_eq!(from_key_code(KeyCode::KeyQ), PhysicalKey::Q);
        assert_eq!(from_key_code(KeyCode::Enter), PhysicalKey::Return);
        assert_eq!(from_key_code(KeyCode::ArrowLeft), PhysicalKey::Left);
        assert_eq!(from_key_code(KeyCode::NumpadEnter), PhysicalKey::KpEnter);
    }

    #[test]
    fn unidentified_keys_are_unknown() {
        let key = keyboard::PhysicalKey::Unidentified(NativeKeyCode::Unidentified);
        assert_eq!(physical_key(key), PhysicalKey::Unknown);
        assert_eq!(from_key_code(KeyCode::MediaPlayPause), PhysicalKey::Unknown);
    }

    #[test]
    fn end_to_end_scancodes() {
        let code = |k| scancode(from_key_code(k));
        assert_eq!(code(KeyCode::Escape), Scancode(0x0001));
        assert_eq!(code(KeyCode::ControlRight), Scancode(0xE01D));
        assert_eq!(code(KeyCode::ContextMenu), Scancode(0xE05D));
        assert_eq!(code(KeyCode::Pause), Scancode(0xE046));
        assert_eq!(code(KeyCode::SuperLeft), Scancode::NONE);
    }
}
