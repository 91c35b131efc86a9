pub mod capture;
pub mod codec;
pub mod config;
pub mod hotkey;
pub mod keys;
pub mod log;
pub mod store;

pub use capture::{CaptureAction, CaptureEvent, KeyStates};
pub use config::Config;
pub use hotkey::{HotkeyBackend, HotkeyDescriptor, HotkeyId, Modifiers};
pub use store::{BorderStore, BorderTarget, MenuStore, MenuTarget, StyleMasks, WindowId};
