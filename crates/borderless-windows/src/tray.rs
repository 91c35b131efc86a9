//! Notification-area icon and its popup menu.

use windows::Win32::Foundation::{HWND, POINT};
use windows::Win32::UI::Shell::{
    NIF_ICON, NIF_MESSAGE, NIF_TIP, NIM_ADD, NIM_DELETE, NOTIFYICONDATAW, Shell_NotifyIconW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    AppendMenuW, CreatePopupMenu, DestroyMenu, GetCursorPos, IDI_APPLICATION, LoadIconW,
    MF_SEPARATOR, MF_STRING, SetForegroundWindow, SetMenuDefaultItem, TPM_NONOTIFY, TPM_RETURNCMD,
    TPM_RIGHTBUTTON, TrackPopupMenu, WM_APP,
};
use windows::core::{PCWSTR, w};

/// Message the tray icon posts to its owner window on mouse activity.
pub const WM_TRAYICON: u32 = WM_APP + 1;

const TRAY_ID: u32 = 1;
const IDM_CONFIGURE: usize = 1;
const IDM_COFFEE: usize = 2;
const IDM_EXIT: usize = 3;

/// A selected popup menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayCommand {
    Configure,
    Coffee,
    Exit,
}

fn icon_data(owner: HWND) -> NOTIFYICONDATAW {
    let mut data = NOTIFYICONDATAW {
        cbSize: size_of::<NOTIFYICONDATAW>() as u32,
        hWnd: owner,
        uID: TRAY_ID,
        ..Default::default()
    };
    for (slot, unit) in data.szTip.iter_mut().zip("Borderless".encode_utf16()) {
        *slot = unit;
    }
    data
}

/// Puts the icon in the notification area.
pub fn add(owner: HWND) {
    let mut data = icon_data(owner);
    data.uFlags = NIF_MESSAGE | NIF_TIP | NIF_ICON;
    data.uCallbackMessage = WM_TRAYICON;
    // SAFETY: LoadIconW with a null module loads a stock icon; the
    // shell copies the image when adding the entry.
    unsafe {
        data.hIcon = LoadIconW(None, IDI_APPLICATION).unwrap_or_default();
        let _ = Shell_NotifyIconW(NIM_ADD, &data);
    }
}

/// Removes the icon. Idempotent if it was never added.
pub fn remove(owner: HWND) {
    let data = icon_data(owner);
    // SAFETY: NIM_DELETE with a matching (hWnd, uID) pair removes the
    // entry and ignores an absent one.
    unsafe {
        let _ = Shell_NotifyIconW(NIM_DELETE, &data);
    }
}

/// Shows the popup menu at the cursor and returns the chosen entry.
///
/// The donation entry is only present when `show_coffee` is on. Blocks
/// until the menu is dismissed.
pub fn show_menu(owner: HWND, show_coffee: bool) -> Option<TrayCommand> {
    let mut cursor = POINT::default();
    // SAFETY: plain Win32 menu calls on handles we own. The owner must
    // be the foreground window or the menu will not dismiss when the
    // user clicks elsewhere; TPM_RETURNCMD makes TrackPopupMenu return
    // the selected id instead of posting WM_COMMAND.
    unsafe {
        if GetCursorPos(&mut cursor).is_err() {
            return None;
        }
        let menu = CreatePopupMenu().ok()?;
        let _ = AppendMenuW(menu, MF_STRING, IDM_CONFIGURE, w!("&Configure..."));
        if show_coffee {
            let _ = AppendMenuW(menu, MF_STRING, IDM_COFFEE, w!("Co&ffee..."));
        }
        let _ = AppendMenuW(menu, MF_SEPARATOR, 0, PCWSTR::null());
        let _ = AppendMenuW(menu, MF_STRING, IDM_EXIT, w!("E&xit"));
        let _ = SetMenuDefaultItem(menu, IDM_CONFIGURE as u32, 0);

        let _ = SetForegroundWindow(owner);
        let chosen = TrackPopupMenu(
            menu,
            TPM_RETURNCMD | TPM_NONOTIFY | TPM_RIGHTBUTTON,
            cursor.x,
            cursor.y,
            Some(0),
            owner,
            None,
        );
        let _ = DestroyMenu(menu);

        match chosen.0 as usize {
            IDM_CONFIGURE => Some(TrayCommand::Configure),
            IDM_COFFEE => Some(TrayCommand::Coffee),
            IDM_EXIT => Some(TrayCommand::Exit),
            _ => None,
        }
    }
}
