//! Win32 access to other applications' windows.
//!
//! Implements the style and menu seams the toggle stores operate
//! through. Window identities stay pointer-sized integers at the
//! boundary so the core crate never sees an `HWND`.

use borderless_core::store::{BorderTarget, MenuId, MenuTarget, WindowId};
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    GWL_EXSTYLE, GWL_STYLE, GetForegroundWindow, GetMenu, GetWindowLongPtrW, GetWindowPlacement,
    GetWindowRect, HMENU, MoveWindow, SW_SHOWMAXIMIZED, SWP_FRAMECHANGED, SWP_NOMOVE, SWP_NOSIZE,
    SWP_NOZORDER, SetMenu, SetWindowLongPtrW, SetWindowPos, WINDOWPLACEMENT,
};

fn hwnd(window: WindowId) -> HWND {
    HWND(window as *mut _)
}

/// Returns the handle value of the current foreground window, or zero
/// when there is none.
pub fn foreground_window() -> WindowId {
    // SAFETY: GetForegroundWindow is a simple query; a null handle means
    // no window has focus (e.g. a screensaver is active).
    let handle = unsafe { GetForegroundWindow() };
    handle.0 as WindowId
}

fn is_maximized(window: HWND) -> bool {
    let mut placement = WINDOWPLACEMENT {
        length: size_of::<WINDOWPLACEMENT>() as u32,
        ..Default::default()
    };
    // SAFETY: GetWindowPlacement fills the caller-provided struct.
    unsafe {
        if GetWindowPlacement(window, &mut placement).is_err() {
            return false;
        }
    }
    placement.showCmd == SW_SHOWMAXIMIZED.0 as u32
}

/// Live desktop: style and menu operations hit the real windows.
#[derive(Debug, Default)]
pub struct Desktop;

impl BorderTarget for Desktop {
    fn style(&self, window: WindowId) -> u32 {
        // SAFETY: GetWindowLongPtrW reads window data; it returns 0 for
        // an invalid handle, which the caller treats as a failed query.
        unsafe { GetWindowLongPtrW(hwnd(window), GWL_STYLE) as u32 }
    }

    fn ex_style(&self, window: WindowId) -> u32 {
        // SAFETY: as above.
        unsafe { GetWindowLongPtrW(hwnd(window), GWL_EXSTYLE) as u32 }
    }

    fn set_style(&mut self, window: WindowId, style: u32) {
        // SAFETY: SetWindowLongPtrW writes the style word; the change
        // does not render until the frame is invalidated.
        unsafe {
            SetWindowLongPtrW(hwnd(window), GWL_STYLE, style as isize);
        }
    }

    fn set_ex_style(&mut self, window: WindowId, ex_style: u32) {
        // SAFETY: as above.
        unsafe {
            SetWindowLongPtrW(hwnd(window), GWL_EXSTYLE, ex_style as isize);
        }
    }

    fn repaint(&mut self, window: WindowId) {
        let window = hwnd(window);

        // A maximized window must not be resized; telling it the frame
        // changed is enough to redraw with the new styles.
        if is_maximized(window) {
            // SAFETY: SetWindowPos with a valid HWND is safe.
            unsafe {
                let _ = SetWindowPos(
                    window,
                    None,
                    0,
                    0,
                    0,
                    0,
                    SWP_FRAMECHANGED | SWP_NOMOVE | SWP_NOSIZE | SWP_NOZORDER,
                );
            }
            return;
        }

        let mut rect = RECT::default();
        // SAFETY: GetWindowRect fills the caller-provided RECT; the two
        // MoveWindow calls shrink the window by one pixel and restore
        // it, which forces the non-client area to recalculate.
        unsafe {
            if GetWindowRect(window, &mut rect).is_err() {
                return;
            }
            let width = rect.right - rect.left;
            let height = rect.bottom - rect.top;
            let _ = MoveWindow(window, rect.left, rect.top, width - 1, height, true);
            let _ = MoveWindow(window, rect.left, rect.top, width, height, true);
        }
    }
}

impl MenuTarget for Desktop {
    fn is_top_level(&self, window: WindowId) -> bool {
        crate::enumerate::is_top_level(window)
    }

    fn menu(&self, window: WindowId) -> MenuId {
        // SAFETY: GetMenu returns the menu bar handle or null.
        let menu = unsafe { GetMenu(hwnd(window)) };
        menu.0 as MenuId
    }

    fn set_menu(&mut self, window: WindowId, menu: MenuId) -> bool {
        let menu = if menu == 0 {
            None
        } else {
            Some(HMENU(menu as *mut _))
        };
        // SAFETY: SetMenu attaches or detaches a menu bar; the window
        // redraws its frame itself.
        unsafe { SetMenu(hwnd(window), menu).is_ok() }
    }
}
