//! Single-instance guard.

use windows::Win32::Foundation::{CloseHandle, ERROR_ALREADY_EXISTS, GetLastError, HANDLE};
use windows::Win32::System::Threading::CreateMutexW;
use windows::core::w;

/// Holds the named mutex for the lifetime of the process.
pub struct InstanceGuard {
    handle: HANDLE,
}

/// Claims the instance mutex.
///
/// Returns `None` when another process already holds it, i.e. the
/// application is already running.
pub fn acquire() -> Option<InstanceGuard> {
    // SAFETY: CreateMutexW with a name either creates the mutex or
    // opens the existing one; GetLastError distinguishes the two.
    unsafe {
        let handle = CreateMutexW(None, false, w!("BorderlessInstance")).ok()?;
        if GetLastError() == ERROR_ALREADY_EXISTS {
            let _ = CloseHandle(handle);
            return None;
        }
        Some(InstanceGuard { handle })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        // SAFETY: the handle was created by acquire() and not closed since.
        unsafe {
            let _ = CloseHandle(self.handle);
        }
    }
}
