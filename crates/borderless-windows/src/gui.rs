//! Configuration window and tray message handling.
//!
//! The window has one checkbox + read-only edit pair per hotkey plus
//! the donation checkbox. The edit controls are subclassed; their raw
//! focus and key messages feed the capture session in the core crate,
//! and the actions coming back are applied here.
//!
//! All mutable state lives in a thread-local, reachable from the window
//! procedures. Window calls that synchronously re-enter a window
//! procedure (SetWindowTextW, EnableWindow, TrackPopupMenu, MessageBoxW)
//! are made only after the state borrow has been released.

use std::cell::RefCell;

use borderless_core::capture::{self, CaptureAction, CaptureEvent};
use borderless_core::codec;
use borderless_core::config::{self, Config};
use borderless_core::hotkey::{HotkeyDescriptor, HotkeyId};
use borderless_core::store::{BorderStore, MenuStore};
use borderless_core::{log_debug, log_error, log_info, log_warn};

use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, RECT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateFontW, FONT_CHARSET, FONT_CLIP_PRECISION, FONT_OUTPUT_PRECISION, FONT_QUALITY, HBRUSH,
};
use windows::Win32::UI::HiDpi::GetDpiForWindow;
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::{
    BM_GETCHECK, BM_SETCHECK, BS_AUTOCHECKBOX, CW_USEDEFAULT, CallWindowProcW, COLOR_WINDOW,
    CreateWindowExW, DefWindowProcW, DestroyWindow, ES_READONLY, GWLP_WNDPROC, GetClientRect,
    IDC_ARROW, LoadCursorW, MB_ICONWARNING, MB_OK, MessageBoxW, MoveWindow, PostQuitMessage,
    RegisterClassW, SW_HIDE, SW_SHOW, SW_SHOWNORMAL, SWP_NOMOVE, SWP_NOZORDER, SendMessageW,
    SetForegroundWindow, SetWindowLongPtrW, SetWindowPos, SetWindowTextW, ShowWindow,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_CHAR, WM_CLOSE, WM_COMMAND, WM_DESTROY, WM_KEYDOWN,
    WM_KEYUP, WM_KILLFOCUS, WM_LBUTTONUP, WM_RBUTTONUP, WM_SETFOCUS, WM_SETFONT, WM_SYSCHAR,
    WM_SYSKEYDOWN, WM_SYSKEYUP, WNDCLASSW, WNDPROC, WS_BORDER, WS_CAPTION, WS_CHILD,
    WS_MINIMIZEBOX, WS_SYSMENU, WS_TABSTOP, WS_VISIBLE,
};
use windows::core::{PCWSTR, w};

use crate::desktop::{self, Desktop};
use crate::hotkey::WinHotkeys;
use crate::keyboard::LiveKeyStates;
use crate::tray::{self, TrayCommand};

const ID_BORDER_CHECK: usize = 101;
const ID_MENU_CHECK: usize = 102;
const ID_COFFEE_CHECK: usize = 103;

const DONATION_URL: PCWSTR = w!("https://www.buymeacoffee.com/ubihazard");

/// Everything the window procedures operate on.
struct AppState {
    config: Config,
    borders: BorderStore,
    menus: MenuStore,
    main: HWND,
    border_check: HWND,
    border_edit: HWND,
    menu_check: HWND,
    menu_edit: HWND,
    coffee_check: HWND,
    border_edit_proc: WNDPROC,
    menu_edit_proc: WNDPROC,
}

thread_local! {
    static STATE: RefCell<Option<AppState>> = const { RefCell::new(None) };
}

/// Runs `f` against the state. A no-op while another frame up the stack
/// already holds the borrow (nested message dispatch).
fn with_state<R>(f: impl FnOnce(&mut AppState) -> R) -> Option<R> {
    STATE.with(|cell| {
        let mut guard = cell.try_borrow_mut().ok()?;
        guard.as_mut().map(f)
    })
}

fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

fn set_text(control: HWND, text: &str) {
    let wide = to_wide(text);
    // SAFETY: SetWindowTextW sends WM_SETTEXT to a control we own; the
    // buffer outlives the synchronous call.
    unsafe {
        let _ = SetWindowTextW(control, PCWSTR(wide.as_ptr()));
    }
}

fn set_check(control: HWND, checked: bool) {
    // SAFETY: BM_SETCHECK goes to the system button procedure.
    unsafe {
        SendMessageW(
            control,
            BM_SETCHECK,
            Some(WPARAM(usize::from(checked))),
            None,
        );
    }
}

fn is_checked(control: HWND) -> bool {
    // SAFETY: as above.
    unsafe { SendMessageW(control, BM_GETCHECK, None, None).0 != 0 }
}

fn open_donation_page() {
    // SAFETY: ShellExecuteW hands the URL to the default browser.
    unsafe {
        ShellExecuteW(
            None,
            w!("open"),
            DONATION_URL,
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        );
    }
}

fn scale(value: i32, dpi: u32) -> i32 {
    value * dpi as i32 / 96
}

fn create_child(
    parent: HWND,
    class: PCWSTR,
    text: PCWSTR,
    style: WINDOW_STYLE,
    id: usize,
) -> Result<HWND, String> {
    // SAFETY: standard child-control creation; the parent handle is valid.
    unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class,
            text,
            style,
            0,
            0,
            0,
            0,
            Some(parent),
            Some(windows::Win32::UI::WindowsAndMessaging::HMENU(id as *mut _)),
            None,
            None,
        )
        .map_err(|e| format!("failed to create control: {e}"))
    }
}

/// Builds the configuration window, tray icon and hotkey registrations.
///
/// The window starts hidden unless this is the first run. Returns the
/// main window handle for the message pump.
pub fn create(config: Config, first_run: bool) -> Result<HWND, String> {
    let class_name = w!("BorderlessMain");

    // SAFETY: window class registration and window creation with
    // handles owned by this thread.
    let main = unsafe {
        let wc = WNDCLASSW {
            lpfnWndProc: Some(main_proc),
            lpszClassName: class_name,
            hCursor: LoadCursorW(None, IDC_ARROW).unwrap_or_default(),
            hbrBackground: HBRUSH((COLOR_WINDOW.0 + 1) as usize as *mut _),
            ..Default::default()
        };
        if RegisterClassW(&wc) == 0 {
            return Err("failed to register the main window class".into());
        }

        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class_name,
            w!("Borderless"),
            WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            0,
            0,
            None,
            None,
            None,
            None,
        )
        .map_err(|e| format!("failed to create the main window: {e}"))?
    };

    let dpi = {
        // SAFETY: GetDpiForWindow is a simple query.
        let dpi = unsafe { GetDpiForWindow(main) };
        if dpi == 0 { 96 } else { dpi }
    };

    let checkbox_style =
        WINDOW_STYLE(WS_CHILD.0 | WS_VISIBLE.0 | WS_TABSTOP.0 | BS_AUTOCHECKBOX as u32);
    let edit_style =
        WINDOW_STYLE(WS_BORDER.0 | WS_CHILD.0 | WS_VISIBLE.0 | WS_TABSTOP.0 | ES_READONLY as u32);

    let border_check = create_child(
        main,
        w!("BUTTON"),
        w!("Hotkey to hide window border:"),
        checkbox_style,
        ID_BORDER_CHECK,
    )?;
    let border_edit = create_child(main, w!("EDIT"), w!(""), edit_style, 0)?;
    let menu_check = create_child(
        main,
        w!("BUTTON"),
        w!("Hotkey to hide window menu:"),
        checkbox_style,
        ID_MENU_CHECK,
    )?;
    let menu_edit = create_child(main, w!("EDIT"), w!(""), edit_style, 0)?;
    let coffee_check = create_child(
        main,
        w!("BUTTON"),
        w!("Show donation menu entry"),
        checkbox_style,
        ID_COFFEE_CHECK,
    )?;

    // SAFETY: sizing, font and layout calls on windows created above.
    unsafe {
        let _ = SetWindowPos(
            main,
            None,
            0,
            0,
            scale(270, dpi),
            scale(190, dpi),
            SWP_NOMOVE | SWP_NOZORDER,
        );

        let mut client = RECT::default();
        let _ = GetClientRect(main, &mut client);
        let width = client.right - client.left - scale(16, dpi);
        let x = scale(8, dpi);
        let row = |y: i32, h: i32| (scale(y, dpi), scale(h, dpi));

        let (y, h) = row(8, 16);
        let _ = MoveWindow(border_check, x, y, width, h, true);
        let (y, h) = row(27, 20);
        let _ = MoveWindow(border_edit, x, y, width, h, true);
        let (y, h) = row(55, 16);
        let _ = MoveWindow(menu_check, x, y, width, h, true);
        let (y, h) = row(74, 20);
        let _ = MoveWindow(menu_edit, x, y, width, h, true);
        let (y, h) = row(104, 16);
        let _ = MoveWindow(coffee_check, x, y, width, h, true);

        let font = CreateFontW(
            -scale(12, dpi),
            0,
            0,
            0,
            400,
            0,
            0,
            0,
            FONT_CHARSET(0),
            FONT_OUTPUT_PRECISION(0),
            FONT_CLIP_PRECISION(0),
            FONT_QUALITY(5),
            0,
            w!("Segoe UI"),
        );
        for control in [border_check, border_edit, menu_check, menu_edit, coffee_check] {
            SendMessageW(
                control,
                WM_SETFONT,
                Some(WPARAM(font.0 as usize)),
                Some(LPARAM(1)),
            );
        }
    }

    // Register the hotkeys before painting the initial control state,
    // so a combination another application owns shows up disabled.
    let mut config = config;
    let mut backend = WinHotkeys;
    if !config.border_hotkey.register(&mut backend) {
        log_warn!(
            "border hotkey '{}' could not be registered",
            codec::to_display(&config.border_hotkey)
        );
    }
    if !config.menu_hotkey.register(&mut backend) {
        log_warn!(
            "menu hotkey '{}' could not be registered",
            codec::to_display(&config.menu_hotkey)
        );
    }

    set_check(border_check, !config.border_hotkey.disabled);
    set_text(border_edit, &codec::to_display(&config.border_hotkey));
    set_check(menu_check, !config.menu_hotkey.disabled);
    set_text(menu_edit, &codec::to_display(&config.menu_hotkey));
    set_check(coffee_check, config.show_coffee);

    tray::add(main);

    let mut borders = BorderStore::new(config.masks);
    let mut menus = MenuStore::new();
    borders.exclude(main.0 as usize);
    menus.exclude(main.0 as usize);
    STATE.with(|cell| {
        *cell.borrow_mut() = Some(AppState {
            config,
            borders,
            menus,
            main,
            border_check,
            border_edit,
            menu_check,
            menu_edit,
            coffee_check,
            border_edit_proc: None,
            menu_edit_proc: None,
        });
    });

    // Subclass the edit controls last: from here on their messages run
    // through edit_proc, which expects the state to be in place.
    // SAFETY: GWLP_WNDPROC swap on controls owned by this thread; the
    // returned value is the previous window procedure.
    unsafe {
        let previous = SetWindowLongPtrW(border_edit, GWLP_WNDPROC, edit_proc as usize as isize);
        let previous: WNDPROC = std::mem::transmute(previous);
        let _ = with_state(|state| state.border_edit_proc = previous);

        let previous = SetWindowLongPtrW(menu_edit, GWLP_WNDPROC, edit_proc as usize as isize);
        let previous: WNDPROC = std::mem::transmute(previous);
        let _ = with_state(|state| state.menu_edit_proc = previous);
    }

    if first_run {
        // SAFETY: ShowWindow on our own window.
        unsafe {
            let _ = ShowWindow(main, SW_SHOW);
        }
        log_info!("first run, showing the configuration window");
    }

    Ok(main)
}

/// Applies a `WM_HOTKEY` press to the foreground window.
///
/// Called from the message pump. The configuration window itself is
/// excluded inside the stores.
pub fn dispatch_hotkey(id: i32) {
    let _ = with_state(|state| {
        let target = desktop::foreground_window();
        if target == 0 {
            return;
        }
        let mut desktop = Desktop;
        let (name, ok) = if id == HotkeyId::Border.index() {
            ("border", state.borders.toggle(&mut desktop, target))
        } else if id == HotkeyId::Menu.index() {
            ("menu", state.menus.toggle(&mut desktop, target))
        } else {
            return;
        };
        if ok {
            log_info!("toggled {name} of window 0x{target:X}");
        } else {
            log_debug!("{name} toggle had no effect on window 0x{target:X}");
        }
    });
}

/// What an edit-control event asks the UI to do once the state borrow
/// is gone.
#[derive(Default)]
struct EditOutcome {
    text: Option<String>,
    blur: bool,
    warn: bool,
    check: Option<bool>,
}

struct EditContext {
    id: HotkeyId,
    original: WNDPROC,
    check: HWND,
}

fn edit_context(edit: HWND) -> Option<EditContext> {
    STATE.with(|cell| {
        let guard = cell.try_borrow().ok()?;
        let state = guard.as_ref()?;
        if edit == state.border_edit {
            Some(EditContext {
                id: HotkeyId::Border,
                original: state.border_edit_proc,
                check: state.border_check,
            })
        } else if edit == state.menu_edit {
            Some(EditContext {
                id: HotkeyId::Menu,
                original: state.menu_edit_proc,
                check: state.menu_check,
            })
        } else {
            None
        }
    })
}

fn descriptor_mut(state: &mut AppState, id: HotkeyId) -> &mut HotkeyDescriptor {
    match id {
        HotkeyId::Border => &mut state.config.border_hotkey,
        HotkeyId::Menu => &mut state.config.menu_hotkey,
    }
}

fn handle_capture_event(id: HotkeyId, event: CaptureEvent) -> EditOutcome {
    with_state(|state| {
        let descriptor = descriptor_mut(state, id);
        let action = capture::handle(descriptor, &LiveKeyStates, event);
        let mut outcome = EditOutcome::default();
        match action {
            CaptureAction::None => {}
            CaptureAction::Refresh => {
                outcome.text = Some(codec::to_display(descriptor));
            }
            CaptureAction::Cancel | CaptureAction::Close => {
                outcome.blur = true;
            }
            CaptureAction::Register => {
                let registered = descriptor.register(&mut WinHotkeys);
                outcome.text = Some(codec::to_display(descriptor));
                outcome.check = Some(!descriptor.disabled);
                if !registered {
                    outcome.warn = true;
                    log_warn!(
                        "hotkey '{}' was rejected by the system",
                        codec::to_display(descriptor)
                    );
                }
            }
            CaptureAction::Revert => {
                outcome.text = Some(codec::to_display(descriptor));
            }
        }
        outcome
    })
    .unwrap_or_default()
}

fn apply_edit_outcome(edit: HWND, check: HWND, owner: HWND, outcome: EditOutcome) {
    if let Some(text) = outcome.text {
        set_text(edit, &text);
    }
    if let Some(checked) = outcome.check {
        set_check(check, checked);
    }
    if outcome.blur {
        // Disabling and re-enabling the control is the reliable way to
        // force a focus loss; WM_KILLFOCUS then finishes the session.
        // SAFETY: EnableWindow on a control owned by this thread.
        unsafe {
            let _ = EnableWindow(edit, false);
            let _ = EnableWindow(edit, true);
        }
    }
    if outcome.warn {
        // SAFETY: app-modal message box owned by the main window.
        unsafe {
            let _ = MessageBoxW(
                Some(owner),
                w!("This key combination is already in use by another application."),
                w!("Borderless"),
                MB_OK | MB_ICONWARNING,
            );
        }
    }
}

/// Window procedure of the subclassed hotkey edit controls.
unsafe extern "system" fn edit_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(context) = edit_context(hwnd) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };

    let event = match msg {
        WM_SETFOCUS => Some(CaptureEvent::FocusGained),
        WM_KILLFOCUS => Some(CaptureEvent::FocusLost),
        WM_KEYDOWN | WM_SYSKEYDOWN => Some(CaptureEvent::KeyDown(wparam.0 as u32)),
        WM_KEYUP | WM_SYSKEYUP => Some(CaptureEvent::KeyUp(wparam.0 as u32)),
        // Swallow character input so the read-only edit never beeps and
        // Alt combinations never open a system menu.
        WM_CHAR | WM_SYSCHAR => return LRESULT(0),
        _ => None,
    };

    let Some(event) = event else {
        return match context.original {
            Some(_) => unsafe { CallWindowProcW(context.original, hwnd, msg, wparam, lparam) },
            None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        };
    };

    let owner = with_state(|state| state.main).unwrap_or_default();
    let outcome = handle_capture_event(context.id, event);
    apply_edit_outcome(hwnd, context.check, owner, outcome);

    match msg {
        // Focus messages still reach the original procedure so the
        // caret behaves; key messages are fully consumed.
        WM_SETFOCUS | WM_KILLFOCUS => match context.original {
            Some(_) => unsafe { CallWindowProcW(context.original, hwnd, msg, wparam, lparam) },
            None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
        },
        _ => LRESULT(0),
    }
}

fn handle_hotkey_checkbox(id: HotkeyId) {
    let (edit, check, owner, outcome) = match with_state(|state| {
        let (edit, check) = match id {
            HotkeyId::Border => (state.border_edit, state.border_check),
            HotkeyId::Menu => (state.menu_edit, state.menu_check),
        };
        let main = state.main;
        let checked = is_checked(check);
        let descriptor = descriptor_mut(state, id);
        descriptor.disabled = !checked;
        let mut outcome = EditOutcome::default();
        if checked {
            if !descriptor.register(&mut WinHotkeys) {
                outcome.warn = true;
                outcome.check = Some(!descriptor.disabled);
                outcome.text = Some(codec::to_display(descriptor));
            }
        } else {
            descriptor.unregister(&mut WinHotkeys);
        }
        (edit, check, main, outcome)
    }) {
        Some(parts) => parts,
        None => return,
    };
    apply_edit_outcome(edit, check, owner, outcome);
}

fn handle_tray_command(hwnd: HWND, command: TrayCommand) {
    match command {
        TrayCommand::Configure => {
            // SAFETY: showing and focusing our own window.
            unsafe {
                let _ = ShowWindow(hwnd, SW_SHOW);
                let _ = SetForegroundWindow(hwnd);
            }
        }
        TrayCommand::Coffee => open_donation_page(),
        TrayCommand::Exit => {
            // SAFETY: DestroyWindow from the window's own thread.
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
        }
    }
}

/// Window procedure of the main configuration window.
unsafe extern "system" fn main_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match msg {
        tray::WM_TRAYICON => {
            let mouse = lparam.0 as u32;
            if mouse == WM_LBUTTONUP || mouse == WM_RBUTTONUP {
                let show_coffee =
                    with_state(|state| state.config.show_coffee).unwrap_or(true);
                // The popup runs its own modal loop; the state borrow
                // must already be released here.
                if let Some(command) = tray::show_menu(hwnd, show_coffee) {
                    handle_tray_command(hwnd, command);
                }
            }
            LRESULT(0)
        }
        WM_COMMAND => {
            match wparam.0 & 0xffff {
                ID_BORDER_CHECK => handle_hotkey_checkbox(HotkeyId::Border),
                ID_MENU_CHECK => handle_hotkey_checkbox(HotkeyId::Menu),
                ID_COFFEE_CHECK => {
                    let _ = with_state(|state| {
                        state.config.show_coffee = is_checked(state.coffee_check);
                    });
                }
                _ => {}
            }
            LRESULT(0)
        }
        WM_CLOSE => {
            // Closing hides to the tray; only the tray menu exits.
            // SAFETY: hiding our own window.
            unsafe {
                let _ = ShowWindow(hwnd, SW_HIDE);
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            tray::remove(hwnd);
            let _ = with_state(|state| {
                let mut backend = WinHotkeys;
                state.config.border_hotkey.unregister(&mut backend);
                state.config.menu_hotkey.unregister(&mut backend);
                if let Err(e) = config::save(&state.config) {
                    log_error!("failed to save the configuration: {e}");
                }
            });
            // SAFETY: ends the message pump.
            unsafe {
                PostQuitMessage(0);
            }
            LRESULT(0)
        }
        _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}
