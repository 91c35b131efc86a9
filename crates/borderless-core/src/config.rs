//! Settings persistence.
//!
//! The config is a fixed five-line text file: the two hotkeys in
//! canonical form, the two style masks in hex, and the coffee-button
//! flag. A missing or malformed hotkey or mask line falls back to that
//! line's default, so a damaged file degrades instead of failing the
//! launch; the flag line is `true` only when it reads exactly `true`.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::codec;
use crate::hotkey::HotkeyDescriptor;
use crate::store::StyleMasks;

/// Application settings, live while running and written back at exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub border_hotkey: HotkeyDescriptor,
    pub menu_hotkey: HotkeyDescriptor,
    pub masks: StyleMasks,
    pub show_coffee: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            border_hotkey: HotkeyDescriptor::default_border(),
            menu_hotkey: HotkeyDescriptor::default_menu(),
            masks: StyleMasks::default(),
            show_coffee: true,
        }
    }
}

/// Result of [`load`]: the settings plus whether this looks like the
/// first launch (no readable config file yet).
#[derive(Debug)]
pub struct Loaded {
    pub config: Config,
    pub first_run: bool,
}

/// Returns the application's config directory (`~/.config/borderless`).
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join("borderless"))
}

/// Returns the path of the config file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config"))
}

fn parse_hotkey_line(line: Option<&str>, default: &HotkeyDescriptor) -> HotkeyDescriptor {
    let Some(line) = line else {
        return default.clone();
    };
    match codec::parse(line.trim()) {
        Ok(parsed) => {
            let mut descriptor = HotkeyDescriptor::new(default.id, parsed.modifiers, parsed.key);
            descriptor.disabled = parsed.disabled;
            descriptor
        }
        Err(_) => default.clone(),
    }
}

fn parse_mask_line(line: Option<&str>, default: u32) -> u32 {
    let Some(line) = line else {
        return default;
    };
    let trimmed = line.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u32::from_str_radix(digits, 16).unwrap_or(default)
}

fn parse_flag_line(line: Option<&str>, default: bool) -> bool {
    match line.map(str::trim) {
        // A present line must read exactly "true"; anything else turns
        // the flag off. Only a missing line keeps the default.
        Some(line) => line == "true",
        None => default,
    }
}

/// Decodes config file text. Short files keep defaults for the missing
/// tail lines.
pub fn parse(text: &str) -> Config {
    let defaults = Config::default();
    let mut lines = text.lines();
    Config {
        border_hotkey: parse_hotkey_line(lines.next(), &defaults.border_hotkey),
        menu_hotkey: parse_hotkey_line(lines.next(), &defaults.menu_hotkey),
        masks: StyleMasks {
            style: parse_mask_line(lines.next(), defaults.masks.style),
            ex_style: parse_mask_line(lines.next(), defaults.masks.ex_style),
        },
        show_coffee: parse_flag_line(lines.next(), defaults.show_coffee),
    }
}

/// Encodes the settings as config file text.
pub fn render(config: &Config) -> String {
    format!(
        "{}\n{}\n0x{:x}\n0x{:x}\n{}\n",
        codec::to_canonical(&config.border_hotkey),
        codec::to_canonical(&config.menu_hotkey),
        config.masks.style,
        config.masks.ex_style,
        config.show_coffee
    )
}

/// Loads the settings, falling back to defaults when the file is
/// missing or unreadable.
pub fn load() -> Loaded {
    let text = config_path().and_then(|path| fs::read_to_string(path).ok());
    match text {
        Some(text) => Loaded {
            config: parse(&text),
            first_run: false,
        },
        None => Loaded {
            config: Config::default(),
            first_run: true,
        },
    }
}

/// Writes the settings back, creating the config directory on first use.
pub fn save(config: &Config) -> io::Result<()> {
    let Some(dir) = config_dir() else {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            "home directory not found",
        ));
    };
    fs::create_dir_all(&dir)?;
    fs::write(dir.join("config"), render(config))
}
