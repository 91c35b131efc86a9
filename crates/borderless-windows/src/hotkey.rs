//! Global hotkey backend.

use borderless_core::hotkey::{HotkeyBackend, Modifiers};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_NOREPEAT, RegisterHotKey, UnregisterHotKey,
};

/// Registers hotkeys on the current thread's message queue. `WM_HOTKEY`
/// messages arrive via the message pump running on the same thread.
#[derive(Debug, Default)]
pub struct WinHotkeys;

impl HotkeyBackend for WinHotkeys {
    fn register(&mut self, id: i32, modifiers: Modifiers, key: u32) -> bool {
        // MOD_NOREPEAT: holding the combination fires once, not per
        // keyboard repeat.
        let flags = HOT_KEY_MODIFIERS(modifiers.to_flags()) | MOD_NOREPEAT;

        // SAFETY: RegisterHotKey registers a system-wide hotkey on the
        // current thread's message queue. The two slot ids cannot
        // collide. Failure means another application owns the
        // combination.
        unsafe { RegisterHotKey(None, id, flags, key).is_ok() }
    }

    fn unregister(&mut self, id: i32) -> bool {
        // SAFETY: UnregisterHotKey removes the registration for an id
        // this thread registered.
        unsafe { UnregisterHotKey(None, id).is_ok() }
    }
}
