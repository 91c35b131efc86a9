pub mod app;
pub mod desktop;
pub mod dpi;
pub mod enumerate;
pub mod gui;
pub mod hotkey;
pub mod keyboard;
pub mod single_instance;
pub mod tray;

pub use app::run;
