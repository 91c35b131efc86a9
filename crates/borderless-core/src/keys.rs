//! Virtual-key constants and key classification.
//!
//! The raw Win32 key codes are hardcoded here so the core crate stays
//! free of the `windows` dependency; the platform crate passes the same
//! values straight through to the OS.

pub const VK_XBUTTON2: u32 = 0x06;
pub const VK_BACK: u32 = 0x08;
pub const VK_TAB: u32 = 0x09;
pub const VK_SHIFT: u32 = 0x10;
pub const VK_CONTROL: u32 = 0x11;
pub const VK_MENU: u32 = 0x12;
pub const VK_ESCAPE: u32 = 0x1B;
pub const VK_PRIOR: u32 = 0x21;
pub const VK_NEXT: u32 = 0x22;
pub const VK_END: u32 = 0x23;
pub const VK_HOME: u32 = 0x24;
pub const VK_LEFT: u32 = 0x25;
pub const VK_UP: u32 = 0x26;
pub const VK_RIGHT: u32 = 0x27;
pub const VK_DOWN: u32 = 0x28;
pub const VK_INSERT: u32 = 0x2D;
pub const VK_DELETE: u32 = 0x2E;
pub const VK_LWIN: u32 = 0x5B;
pub const VK_RWIN: u32 = 0x5C;
pub const VK_NUMPAD0: u32 = 0x60;
pub const VK_NUMPAD9: u32 = 0x69;
pub const VK_MULTIPLY: u32 = 0x6A;
pub const VK_ADD: u32 = 0x6B;
pub const VK_SUBTRACT: u32 = 0x6D;
pub const VK_DECIMAL: u32 = 0x6E;
pub const VK_DIVIDE: u32 = 0x6F;
pub const VK_F1: u32 = 0x70;
pub const VK_F24: u32 = 0x87;
pub const VK_LSHIFT: u32 = 0xA0;
pub const VK_RSHIFT: u32 = 0xA1;
pub const VK_LCONTROL: u32 = 0xA2;
pub const VK_RCONTROL: u32 = 0xA3;
pub const VK_LMENU: u32 = 0xA4;
pub const VK_RMENU: u32 = 0xA5;
pub const VK_OEM_1: u32 = 0xBA;
pub const VK_OEM_PLUS: u32 = 0xBB;
pub const VK_OEM_COMMA: u32 = 0xBC;
pub const VK_OEM_MINUS: u32 = 0xBD;
pub const VK_OEM_PERIOD: u32 = 0xBE;
pub const VK_OEM_2: u32 = 0xBF;
pub const VK_OEM_3: u32 = 0xC0;
pub const VK_OEM_4: u32 = 0xDB;
pub const VK_OEM_5: u32 = 0xDC;
pub const VK_OEM_6: u32 = 0xDD;
pub const VK_OEM_7: u32 = 0xDE;

/// Returns whether `vk` is a function key (F1–F24).
///
/// A function key forms a valid hotkey on its own, without modifiers.
pub fn is_function(vk: u32) -> bool {
    (VK_F1..=VK_F24).contains(&vk)
}

/// Returns whether `vk` is a numeric-pad digit.
pub fn is_numpad_digit(vk: u32) -> bool {
    (VK_NUMPAD0..=VK_NUMPAD9).contains(&vk)
}

/// Returns whether `vk` is a letter (A–Z) or top-row digit (0–9).
///
/// These codes equal the uppercase ASCII character.
pub fn is_alphanumeric(vk: u32) -> bool {
    (0x41..=0x5A).contains(&vk) || (0x30..=0x39).contains(&vk)
}

/// Unshifted and shifted glyphs of an OEM punctuation key.
///
/// Either glyph parses back to the same key code; the unshifted one is
/// used when encoding.
pub fn oem_glyphs(vk: u32) -> Option<(char, char)> {
    match vk {
        VK_OEM_1 => Some((';', ':')),
        VK_OEM_2 => Some(('/', '?')),
        VK_OEM_3 => Some(('`', '~')),
        VK_OEM_4 => Some(('[', '{')),
        VK_OEM_5 => Some(('\\', '|')),
        VK_OEM_6 => Some((']', '}')),
        VK_OEM_7 => Some(('\'', '"')),
        VK_OEM_MINUS => Some(('-', '_')),
        VK_OEM_PLUS => Some(('=', '+')),
        VK_OEM_COMMA => Some((',', '<')),
        VK_OEM_PERIOD => Some(('.', '>')),
        _ => None,
    }
}

/// Resolves a punctuation glyph (shifted or unshifted) to its key code.
pub fn vk_from_glyph(glyph: char) -> Option<u32> {
    for vk in [
        VK_OEM_1, VK_OEM_2, VK_OEM_3, VK_OEM_4, VK_OEM_5, VK_OEM_6, VK_OEM_7, VK_OEM_MINUS,
        VK_OEM_PLUS, VK_OEM_COMMA, VK_OEM_PERIOD,
    ] {
        if let Some((plain, shifted)) = oem_glyphs(vk)
            && (glyph == plain || glyph == shifted)
        {
            return Some(vk);
        }
    }
    None
}

/// Fixed display names of the named keys, in parse priority order.
pub fn named_keys() -> &'static [(&'static str, u32)] {
    &[
        ("Insert", VK_INSERT),
        ("Delete", VK_DELETE),
        ("Home", VK_HOME),
        ("End", VK_END),
        ("PageUp", VK_PRIOR),
        ("PageDown", VK_NEXT),
        ("Divide", VK_DIVIDE),
        ("Multiply", VK_MULTIPLY),
        ("Subtract", VK_SUBTRACT),
        ("Add", VK_ADD),
        ("Decimal", VK_DECIMAL),
        ("Backspace", VK_BACK),
        ("Left", VK_LEFT),
        ("Up", VK_UP),
        ("Right", VK_RIGHT),
        ("Down", VK_DOWN),
        ("Tab", VK_TAB),
    ]
}

/// Returns the fixed display name of a named key.
pub fn name(vk: u32) -> Option<&'static str> {
    named_keys()
        .iter()
        .find(|&&(_, code)| code == vk)
        .map(|&(name, _)| name)
}

/// Returns whether `vk` may become the key half of a captured hotkey.
///
/// Arrow keys and Tab are excluded: they are needed for dialog
/// navigation, so capture treats them like any other non-key press.
pub fn is_assignable(vk: u32) -> bool {
    is_alphanumeric(vk)
        || is_numpad_digit(vk)
        || is_function(vk)
        || oem_glyphs(vk).is_some()
        || matches!(
            vk,
            VK_MULTIPLY
                | VK_DIVIDE
                | VK_SUBTRACT
                | VK_ADD
                | VK_DECIMAL
                | VK_INSERT
                | VK_DELETE
                | VK_HOME
                | VK_END
                | VK_PRIOR
                | VK_NEXT
                | VK_BACK
        )
}
