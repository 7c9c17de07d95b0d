//! Physical key identifiers.
//!
//! Keys are named by position, not by the character they produce, so
//! the same identifier comes back whatever layout the local keyboard
//! uses. Discriminants are USB HID usage IDs from the keyboard/keypad
//! page (0x07), which is also the numbering most windowing toolkits use
//! for their scancodes.

/// A physical key on the local keyboard.
///
/// [`PhysicalKey::Unknown`] (0x0000) stands for any key the window
/// layer could not identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum PhysicalKey {
    #[default]
    Unknown = 0x00,

    // Letters
    A = 0x04,
    B = 0x05,
    C = 0x06,
    D = 0x07,
    E = 0x08,
    F = 0x09,
    G = 0x0A,
    H = 0x0B,
    I = 0x0C,
    J = 0x0D,
    K = 0x0E,
    L = 0x0F,
    M = 0x10,
    N = 0x11,
    O = 0x12,
    P = 0x13,
    Q = 0x14,
    R = 0x15,
    S = 0x16,
    T = 0x17,
    U = 0x18,
    V = 0x19,
    W = 0x1A,
    X = 0x1B,
    Y = 0x1C,
    Z = 0x1D,

    // Top-row digits
    Digit1 = 0x1E,
    Digit2 = 0x1F,
    Digit3 = 0x20,
    Digit4 = 0x21,
    Digit5 = 0x22,
    Digit6 = 0x23,
    Digit7 = 0x24,
    Digit8 = 0x25,
    Digit9 = 0x26,
    Digit0 = 0x27,

    Return = 0x28,
    Escape = 0x29,
    Backspace = 0x2A,
    Tab = 0x2B,
    Space = 0x2C,
    Minus = 0x2D,
    Equals = 0x2E,
    LeftBracket = 0x2F,
    RightBracket = 0x30,
    Backslash = 0x31,
    NonUsHash = 0x32,
    Semicolon = 0x33,
    Apostrophe = 0x34,
    Grave = 0x35,
    Comma = 0x36,
    Period = 0x37,
    Slash = 0x38,
    CapsLock = 0x39,

    // Function row
    F1 = 0x3A,
    F2 = 0x3B,
    F3 = 0x3C,
    F4 = 0x3D,
    F5 = 0x3E,
    F6 = 0x3F,
    F7 = 0x40,
    F8 = 0x41,
    F9 = 0x42,
    F10 = 0x43,
    F11 = 0x44,
    F12 = 0x45,

    PrintScreen = 0x46,
    ScrollLock = 0x47,
    Pause = 0x48,
    Insert = 0x49,
    Home = 0x4A,
    PageUp = 0x4B,
    Delete = 0x4C,
    End = 0x4D,
    PageDown = 0x4E,
    Right = 0x4F,
    Left = 0x50,
    Down = 0x51,
    Up = 0x52,

    // Keypad
    NumLock = 0x53,
    KpDivide = 0x54,
    KpMultiply = 0x55,
    KpMinus = 0x56,
    KpPlus = 0x57,
    KpEnter = 0x58,
    Kp1 = 0x59,
    Kp2 = 0x5A,
    Kp3 = 0x5B,
    Kp4 = 0x5C,
    Kp5 = 0x5D,
    Kp6 = 0x5E,
    Kp7 = 0x5F,
    Kp8 = 0x60,
    Kp9 = 0x61,
    Kp0 = 0x62,
    KpDecimal = 0x63,
    NonUsBackslash = 0x64,
    KpEquals = 0x67,

    F13 = 0x68,
    F14 = 0x69,
    F15 = 0x6A,
    F16 = 0x6B,
    F17 = 0x6C,
    F18 = 0x6D,
    F19 = 0x6E,
    F20 = 0x6F,
    F21 = 0x70,
    F22 = 0x71,
    F23 = 0x72,
    F24 = 0x73,

    /// Context-menu key.
    Menu = 0x76,

    // Modifiers
    LeftCtrl = 0xE0,
    LeftShift = 0xE1,
    LeftAlt = 0xE2,
    LeftGui = 0xE3,
    RightCtrl = 0xE4,
    RightShift = 0xE5,
    RightAlt = 0xE6,
    RightGui = 0xE7,
}

impl PhysicalKey {
    /// Every identifier, in usage-ID order.
    pub const ALL: [PhysicalKey; 120] = {
        use PhysicalKey::*;
        [
            Unknown, A, B, C, D, E, F, G, H, I, J, K, L, M, N, O, P, Q, R, S, T, U, V, W, X,
            Y, Z, Digit1, Digit2, Digit3, Digit4, Digit5, Digit6, Digit7, Digit8, Digit9,
            Digit0, Return, Escape, Backspace, Tab, Space, Minus, Equals, LeftBracket,
            RightBracket, Backslash, NonUsHash, Semicolon, Apostrophe, Grave, Comma, Period,
            Slash, CapsLock, F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12, PrintScreen,
            ScrollLock, Pause, Insert, Home, PageUp, Delete, End, PageDown, Right, Left, Down,
            Up, NumLock, KpDivide, KpMultiply, KpMinus, KpPlus, KpEnter, Kp1, Kp2, Kp3, Kp4,
            Kp5, Kp6, Kp7, Kp8, Kp9, Kp0, KpDecimal, NonUsBackslash, KpEquals, F13, F14, F15,
            F16, F17, F18, F19, F20, F21, F22, F23, F24, Menu, LeftCtrl, LeftShift, LeftAlt,
            LeftGui, RightCtrl, RightShift, RightAlt, RightGui,
        ]
    };

    /// HID usage ID of this key.
    pub const fn usage(self) -> u16 {
        self as u16
    }

    /// Look up a key by HID usage ID.
    ///
    /// Unassigned IDs give [`PhysicalKey::Unknown`].
    pub fn from_usage(usage: u16) -> Self {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.usage() == usage)
            .unwrap_or(PhysicalKey::Unknown)
    }
}
