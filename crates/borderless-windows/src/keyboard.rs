//! Live keyboard state probe.

use borderless_core::capture::KeyStates;
use windows::Win32::UI::Input::KeyboardAndMouse::GetKeyState;

/// Samples the real keyboard through `GetKeyState`, so modifiers held
/// before the edit field gained focus are still seen.
#[derive(Debug, Default)]
pub struct LiveKeyStates;

impl KeyStates for LiveKeyStates {
    fn is_down(&self, vk: u32) -> bool {
        // SAFETY: GetKeyState reads the calling thread's keyboard state.
        // The high bit of the returned i16 is the down state.
        unsafe { GetKeyState(vk as i32) < 0 }
    }
}
