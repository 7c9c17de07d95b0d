//! Physical key → remote scancode translation.
//!
//! The remote session speaks the PC/AT set-1 scancode set. Keys that
//! need the "extended" flag are carried as a 16-bit value with `0xE0`
//! in the high byte (right Alt is `0xE038`, the arrows are
//! `0xE048/E04B/E04D/E050`).
//!
//! The table below is fixed by the remote protocol and must be kept
//! entry-for-entry. New keys are added here explicitly; nothing is
//! inferred from neighbouring codes. Anything not listed translates to
//! [`Scancode::NONE`], which the remote side ignores.

mod key;

pub use key::PhysicalKey;

// ── Scancode ─────────────────────────────────────────────────────

/// A set-1 scancode, optionally `0xE0`-prefixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Scancode(pub u16);

impl Scancode {
    /// The no-op code sent for unmapped keys.
    pub const NONE: Scancode = Scancode(0x0000);

    /// Prefix byte marking an extended key.
    pub const EXTENDED_PREFIX: u8 = 0xE0;

    /// Whether this is an `0xE0`-prefixed code.
    pub const fn is_extended(self) -> bool {
        (self.0 >> 8) as u8 == Self::EXTENDED_PREFIX
    }

    /// The code byte without the extended prefix.
    pub const fn code(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Whether this is the no-op code.
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for Scancode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

// ── Translation ──────────────────────────────────────────────────

/// Translate a physical key to its remote scancode.
///
/// Pure and total: unmapped keys give [`Scancode::NONE`].
pub const fn scancode(key: PhysicalKey) -> Scancode {
    use PhysicalKey::*;
    let code = match key {
        Escape => 0x0001,
        Digit1 => 0x0002,
        Digit2 => 0x0003,
        Digit3 => 0x0004,
        Digit4 => 0x0005,
        Digit5 => 0x0006,
        Digit6 => 0x0007,
        Digit7 => 0x0008,
        Digit8 => 0x0009,
        Digit9 => 0x000A,
        Digit0 => 0x000B,
        Minus => 0x000C,
        Equals => 0x000D,
        Backspace => 0x000E,
        Tab => 0x000F,
        Q => 0x0010,
        W => 0x0011,
        E => 0x0012,
        R => 0x0013,
        T => 0x0014,
        Y => 0x0015,
        U => 0x0016,
        I => 0x0017,
        O => 0x0018,
        P => 0x0019,
        LeftBracket => 0x001A,
        RightBracket => 0x001B,
        Return => 0x001C,
        LeftCtrl => 0x001D,
        A => 0x001E,
        S => 0x001F,
        D => 0x0020,
        F => 0x0021,
        G => 0x0022,
        H => 0x0023,
        J => 0x0024,
        K => 0x0025,
        L => 0x0026,
        Semicolon => 0x0027,
        Apostrophe => 0x0028,
        Grave => 0x0029,
        LeftShift => 0x002A,
        Backslash => 0x002B,
        Z => 0x002C,
        X => 0x002D,
        C => 0x002E,
        V => 0x002F,
        B => 0x0030,
        N => 0x0031,
        M => 0x0032,
        Comma => 0x0033,
        Period => 0x0034,
        Slash => 0x0035,
        RightShift => 0x0036,
        KpMultiply => 0x0037,
        LeftAlt => 0x0038,
        Space => 0x0039,
        CapsLock => 0x003A,
        F1 => 0x003B,
        F2 => 0x003C,
        F3 => 0x003D,
        F4 => 0x003E,
        F5 => 0x003F,
        F6 => 0x0040,
        F7 => 0x0041,
        F8 => 0x0042,
        F9 => 0x0043,
        F10 => 0x0044,
        // 0x0045 is not used: Pause is sent extended below.
        ScrollLock => 0x0046,
        Kp7 => 0x0047,
        Kp8 => 0x0048,
        Kp9 => 0x0049,
        KpMinus => 0x004A,
        Kp4 => 0x004B,
        Kp5 => 0x004C,
        Kp6 => 0x004D,
        KpPlus => 0x004E,
        Kp1 => 0x004F,
        Kp2 => 0x0050,
        Kp3 => 0x0051,
        Kp0 => 0x0052,
        KpDecimal => 0x0053,
        F11 => 0x0057,
        F12 => 0x0058,
        KpEquals => 0x0059,
        KpEnter => 0xE01C,
        RightCtrl => 0xE01D,
        KpDivide => 0xE035,
        PrintScreen => 0xE037,
        RightAlt => 0xE038,
        NumLock => 0xE045,
        Pause => 0xE046,
        Home => 0xE047,
        Up => 0xE048,
        PageUp => 0xE049,
        Left => 0xE04B,
        Right => 0xE04D,
        End => 0xE04F,
        Down => 0xE050,
        PageDown => 0xE051,
        Insert => 0xE052,
        Delete => 0xE053,
        Menu => 0xE05D,
        _ => 0x0000,
    };
    Scancode(code)
}

// ── Tests ────────────────────────────────────────────────────────
