//! Process lifecycle.
//!
//! Startup order matters: the instance guard comes first so a second
//! launch exits before touching the tray, DPI awareness is declared
//! before any window exists, and the configuration is loaded before the
//! hotkeys register. The configuration is written back when the main
//! window is destroyed.

use borderless_core::{config, log, log_info};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, TranslateMessage, WM_HOTKEY,
};

use crate::{dpi, gui, single_instance};

/// Runs the application until the user exits from the tray menu.
pub fn run(log_level: Option<&str>) -> Result<(), String> {
    log::init(log_level);

    let Some(_instance) = single_instance::acquire() else {
        eprintln!("Borderless is already running.");
        return Ok(());
    };

    dpi::enable_dpi_awareness();

    let loaded = config::load();
    log_info!(
        "starting (first_run={}, border='{}', menu='{}')",
        loaded.first_run,
        borderless_core::codec::to_canonical(&loaded.config.border_hotkey),
        borderless_core::codec::to_canonical(&loaded.config.menu_hotkey)
    );

    gui::create(loaded.config, loaded.first_run)?;

    run_message_pump();

    log_info!("stopped");
    Ok(())
}

/// The Win32 message pump. Routes `WM_HOTKEY` to the toggle dispatch
/// and blocks until `WM_QUIT`.
fn run_message_pump() {
    let mut msg = MSG::default();

    // SAFETY: standard message pump on the thread that owns the windows.
    while unsafe { GetMessageW(&mut msg, None, 0, 0).as_bool() } {
        if msg.message == WM_HOTKEY {
            gui::dispatch_hotkey(msg.wParam.0 as i32);
            continue;
        }

        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}
