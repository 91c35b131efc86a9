//! Hotkey descriptors and the registration fallback chain.

use crate::keys;

/// OS modifier flag for the Alt key.
pub const MOD_FLAG_ALT: u32 = 0x0001;
/// OS modifier flag for the Ctrl key.
pub const MOD_FLAG_CONTROL: u32 = 0x0002;
/// OS modifier flag for the Shift key.
pub const MOD_FLAG_SHIFT: u32 = 0x0004;
/// OS modifier flag for the Windows key.
pub const MOD_FLAG_WIN: u32 = 0x0008;

/// The modifier half of a hotkey combination.
///
/// Stored as independent flags; the packed OS representation is produced
/// only at the registration boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
}

impl Modifiers {
    /// Returns whether no modifier is held.
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift || self.win)
    }

    /// Packs the flags into the OS modifier bitmask.
    pub fn to_flags(self) -> u32 {
        let mut flags = 0;
        if self.alt {
            flags |= MOD_FLAG_ALT;
        }
        if self.ctrl {
            flags |= MOD_FLAG_CONTROL;
        }
        if self.shift {
            flags |= MOD_FLAG_SHIFT;
        }
        if self.win {
            flags |= MOD_FLAG_WIN;
        }
        flags
    }

    /// Clears all modifier flags.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Which of the two application hotkeys a descriptor drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyId {
    Border,
    Menu,
}

impl HotkeyId {
    /// Stable integer id passed to the OS registration call.
    pub fn index(self) -> i32 {
        match self {
            Self::Border => 0,
            Self::Menu => 1,
        }
    }
}

/// Registers and unregisters global hotkeys with the operating system.
///
/// Implemented over `RegisterHotKey` on Windows; tests substitute
/// scripted fakes.
pub trait HotkeyBackend {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: u32) -> bool;
    fn unregister(&mut self, id: i32) -> bool;
}

/// Full state of one configurable hotkey.
///
/// Besides the current combination this carries the last combination
/// known to register successfully, so a failed re-registration can fall
/// back instead of leaving the slot dead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotkeyDescriptor {
    pub id: HotkeyId,
    pub modifiers: Modifiers,
    pub key: u32,
    pub working_modifiers: Modifiers,
    pub working_key: u32,
    pub disabled: bool,
    pub registered: bool,
    // Transient capture-session flags, only meaningful while an edit
    // field has focus.
    pub capturing: bool,
    pub pending_clear: bool,
    pub complete: bool,
}

impl HotkeyDescriptor {
    pub fn new(id: HotkeyId, modifiers: Modifiers, key: u32) -> Self {
        Self {
            id,
            modifiers,
            key,
            working_modifiers: modifiers,
            working_key: key,
            disabled: false,
            registered: false,
            capturing: false,
            pending_clear: false,
            complete: false,
        }
    }

    /// The out-of-the-box border hotkey, Alt+B.
    pub fn default_border() -> Self {
        Self::new(
            HotkeyId::Border,
            Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            u32::from(b'B'),
        )
    }

    /// The out-of-the-box menu hotkey, Alt+M.
    pub fn default_menu() -> Self {
        Self::new(
            HotkeyId::Menu,
            Modifiers {
                alt: true,
                ..Modifiers::default()
            },
            u32::from(b'M'),
        )
    }

    /// Returns whether the combination is complete: a function key on
    /// its own, or any other key together with at least one modifier.
    pub fn is_set(&self) -> bool {
        keys::is_function(self.key) || (self.key != 0 && !self.modifiers.is_empty())
    }

    /// Remembers the current combination as known-good.
    pub fn save_working(&mut self) {
        self.working_modifiers = self.modifiers;
        self.working_key = self.key;
    }

    /// Replaces the current combination with the known-good one.
    pub fn restore_working(&mut self) {
        self.modifiers = self.working_modifiers;
        self.key = self.working_key;
    }

    /// Unregisters the hotkey with the OS.
    pub fn unregister(&mut self, backend: &mut impl HotkeyBackend) -> bool {
        if !self.registered {
            return true;
        }
        if !backend.unregister(self.id.index()) {
            return false;
        }
        self.registered = false;
        true
    }

    /// Registers the current combination, falling back to the
    /// last-known-good one when the OS rejects it.
    ///
    /// Any previous registration is released first. A disabled or unset
    /// descriptor registers nothing and reports success. When both the
    /// current and the fallback combination are rejected, the descriptor
    /// is disabled so the dead slot is visible in the UI.
    pub fn register(&mut self, backend: &mut impl HotkeyBackend) -> bool {
        if !self.unregister(backend) {
            return false;
        }
        if self.disabled || self.key == 0 {
            return true;
        }
        if backend.register(self.id.index(), self.modifiers, self.key) {
            self.save_working();
            self.registered = true;
            return true;
        }
        let has_fallback = self.working_key != 0
            && (self.working_key != self.key || self.working_modifiers != self.modifiers);
        if has_fallback {
            self.restore_working();
            if backend.register(self.id.index(), self.modifiers, self.key) {
                self.registered = true;
            } else {
                self.disabled = true;
            }
        } else {
            self.disabled = true;
        }
        false
    }
}
