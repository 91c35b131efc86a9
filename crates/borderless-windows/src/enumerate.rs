//! Top-level window probe.

use borderless_core::store::WindowId;
use windows::Win32::Foundation::{HWND, LPARAM};
use windows::Win32::UI::WindowsAndMessaging::EnumWindows;
use windows::core::BOOL;

struct Probe {
    target: WindowId,
    found: bool,
}

/// Returns whether `window` is a top-level window.
///
/// `EnumWindows` only visits top-level windows, so finding the handle
/// among them is the test. Child windows and controls never appear.
pub fn is_top_level(window: WindowId) -> bool {
    let mut probe = Probe {
        target: window,
        found: false,
    };

    // SAFETY: EnumWindows calls our callback synchronously for each
    // top-level window. The Probe outlives the call, so passing its
    // address through LPARAM is safe. The Err return when the callback
    // stops early is expected and carries no failure information.
    unsafe {
        let _ = EnumWindows(Some(probe_callback), LPARAM(&raw mut probe as isize));
    }

    probe.found
}

/// Callback invoked by `EnumWindows` for each top-level window.
///
/// Returns `TRUE` to continue enumeration, `FALSE` once the target
/// handle is seen.
unsafe extern "system" fn probe_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the Probe pointer cast in is_top_level().
    let probe = unsafe { &mut *(lparam.0 as *mut Probe) };

    if hwnd.0 as WindowId == probe.target {
        probe.found = true;
        return BOOL(0);
    }

    BOOL(1)
}
