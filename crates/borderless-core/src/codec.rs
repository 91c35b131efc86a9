//! Textual hotkey representation.
//!
//! Two encodings share one grammar: the canonical form is written to the
//! config file (an `Off+` prefix marks a disabled hotkey, an unset
//! combination collapses to the empty string), while the display form
//! shown in the edit fields drops the prefix and the trailing `+` of a
//! half-typed combination.

use crate::hotkey::{HotkeyDescriptor, Modifiers};
use crate::keys;

/// Combination recovered from a canonical string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedHotkey {
    pub modifiers: Modifiers,
    pub key: u32,
    pub disabled: bool,
}

/// Why a hotkey string failed to parse. Positions are byte offsets into
/// the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The input was empty.
    Empty,
    /// No token matched at this position.
    Unrecognized(usize),
    /// A second non-modifier key appeared at this position.
    SecondKey(usize),
    /// All tokens parsed but the combination is incomplete.
    NotSet,
}

fn push_modifiers(out: &mut String, modifiers: Modifiers) {
    if modifiers.ctrl {
        out.push_str("Ctrl+");
    }
    if modifiers.alt {
        out.push_str("Alt+");
    }
    if modifiers.shift {
        out.push_str("Shift+");
    }
    if modifiers.win {
        out.push_str("Win+");
    }
}

fn key_name(vk: u32) -> Option<String> {
    if vk == 0 {
        return None;
    }
    if keys::is_function(vk) {
        return Some(format!("F{}", vk - keys::VK_F1 + 1));
    }
    if keys::is_numpad_digit(vk) {
        return Some(format!("Num{}", vk - keys::VK_NUMPAD0));
    }
    if let Some(name) = keys::name(vk) {
        return Some(name.to_string());
    }
    if keys::is_alphanumeric(vk) {
        return char::from_u32(vk).map(String::from);
    }
    keys::oem_glyphs(vk).map(|(plain, _)| String::from(plain))
}

/// Encodes a descriptor for the config file.
///
/// An unset combination produces the empty string regardless of any
/// modifiers or the disabled flag.
pub fn to_canonical(descriptor: &HotkeyDescriptor) -> String {
    if !descriptor.is_set() {
        return String::new();
    }
    let mut out = String::new();
    if descriptor.disabled {
        out.push_str("Off+");
    }
    push_modifiers(&mut out, descriptor.modifiers);
    if let Some(name) = key_name(descriptor.key) {
        out.push_str(&name);
    }
    out
}

/// Encodes a descriptor for the edit field.
///
/// Mid-capture states are shown as typed: held modifiers appear without
/// a trailing `+` until a key completes the combination.
pub fn to_display(descriptor: &HotkeyDescriptor) -> String {
    let mut out = String::new();
    push_modifiers(&mut out, descriptor.modifiers);
    match key_name(descriptor.key) {
        Some(name) => out.push_str(&name),
        None => {
            if out.ends_with('+') {
                out.pop();
            }
        }
    }
    out
}

fn starts_with_ignore_case(input: &str, prefix: &str) -> bool {
    // Byte-wise comparison, so a multi-byte character in the input
    // cannot land a slice on a non-boundary.
    input
        .as_bytes()
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
}

/// Parses a canonical hotkey string.
///
/// Tokens are matched left to right, longest first, so `Num5` is the
/// numpad digit rather than a letter `N`, and `F12` is a function key
/// rather than the letter `F`. Bare `Off+` is accepted as "disabled,
/// nothing bound"; any other incomplete combination is an error.
pub fn parse(input: &str) -> Result<ParsedHotkey, ParseError> {
    if input.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut modifiers = Modifiers::default();
    let mut key = 0u32;
    let mut disabled = false;
    let mut saw_off = false;
    let mut i = 0;
    while i < input.len() {
        let rest = &input[i..];
        if starts_with_ignore_case(rest, "Off+") {
            disabled = true;
            saw_off = true;
            i += 4;
            continue;
        }
        if starts_with_ignore_case(rest, "Ctrl+") {
            modifiers.ctrl = true;
            i += 5;
            continue;
        }
        if starts_with_ignore_case(rest, "Alt+") {
            modifiers.alt = true;
            i += 4;
            continue;
        }
        if starts_with_ignore_case(rest, "Shift+") {
            modifiers.shift = true;
            i += 6;
            continue;
        }
        if starts_with_ignore_case(rest, "Win+") {
            modifiers.win = true;
            i += 4;
            continue;
        }
        if starts_with_ignore_case(rest, "Num") {
            let digit = rest.as_bytes().get(3).copied().filter(u8::is_ascii_digit);
            let Some(digit) = digit else {
                return Err(ParseError::Unrecognized(i + 3));
            };
            if key != 0 {
                return Err(ParseError::SecondKey(i));
            }
            key = keys::VK_NUMPAD0 + u32::from(digit - b'0');
            i += 4;
            continue;
        }
        let bytes = rest.as_bytes();
        if (bytes[0] == b'F' || bytes[0] == b'f')
            && bytes.get(1).is_some_and(|b| (b'1'..=b'9').contains(b))
        {
            let mut len = 2;
            let mut number = u32::from(bytes[1] - b'0');
            if let Some(b) = bytes.get(2).filter(|b| b.is_ascii_digit()) {
                number = number * 10 + u32::from(b - b'0');
                len = 3;
            }
            if number > 24 {
                return Err(ParseError::Unrecognized(i));
            }
            if key != 0 {
                return Err(ParseError::SecondKey(i));
            }
            key = keys::VK_F1 + number - 1;
            i += len;
            continue;
        }
        if let Some(&(name, vk)) = keys::named_keys()
            .iter()
            .find(|&&(name, _)| starts_with_ignore_case(rest, name))
        {
            if key != 0 {
                return Err(ParseError::SecondKey(i));
            }
            key = vk;
            i += name.len();
            continue;
        }
        let ch = rest.chars().next().unwrap_or('\0');
        // A '+' after the bound key is the token separator, not the
        // shifted glyph of the plus key.
        if ch == '+' && key != 0 {
            i += 1;
            continue;
        }
        if ch.is_ascii_alphanumeric() {
            if key != 0 {
                return Err(ParseError::SecondKey(i));
            }
            key = u32::from(ch.to_ascii_uppercase());
            i += 1;
            continue;
        }
        if let Some(vk) = keys::vk_from_glyph(ch) {
            if key != 0 {
                return Err(ParseError::SecondKey(i));
            }
            key = vk;
            i += ch.len_utf8();
            continue;
        }
        return Err(ParseError::Unrecognized(i));
    }
    let is_set = keys::is_function(key) || (key != 0 && !modifiers.is_empty());
    if !is_set && !saw_off {
        return Err(ParseError::NotSet);
    }
    Ok(ParsedHotkey {
        modifiers,
        key,
        disabled,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::HotkeyId;

    fn descriptor(modifiers: Modifiers, key: u32) -> HotkeyDescriptor {
        HotkeyDescriptor::new(HotkeyId::Border, modifiers, key)
    }

    fn alt() -> Modifiers {
        Modifiers {
            alt: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn default_border_encodes_as_alt_b() {
        // Arrange
        let descriptor = HotkeyDescriptor::default_border();

        // Assert
        assert_eq!(to_canonical(&descriptor), "Alt+B");
        assert_eq!(to_display(&descriptor), "Alt+B");
    }

    #[test]
    fn disabled_hotkey_carries_the_off_prefix_in_canonical_only() {
        // Arrange
        let mut descriptor = HotkeyDescriptor::default_border();
        descriptor.disabled = true;

        // Assert
        assert_eq!(to_canonical(&descriptor), "Off+Alt+B");
        assert_eq!(to_display(&descriptor), "Alt+B");
    }

    #[test]
    fn unset_combination_encodes_as_empty_canonical() {
        // Arrange
        let mut descriptor = descriptor(alt(), 0);
        descriptor.disabled = true;

        // Assert: modifiers and the disabled flag do not survive an unset key.
        assert_eq!(to_canonical(&descriptor), "");
    }

    #[test]
    fn display_trims_the_trailing_plus_of_held_modifiers() {
        // Arrange
        let descriptor = descriptor(
            Modifiers {
                ctrl: true,
                shift: true,
                ..Modifiers::default()
            },
            0,
        );

        // Assert
        assert_eq!(to_display(&descriptor), "Ctrl+Shift");
    }

    #[test]
    fn canonical_round_trip_recovers_the_descriptor() {
        // Arrange
        let cases = [
            descriptor(alt(), u32::from(b'B')),
            descriptor(
                Modifiers {
                    ctrl: true,
                    shift: true,
                    ..Modifiers::default()
                },
                keys::VK_NUMPAD0 + 5,
            ),
            descriptor(Modifiers::default(), keys::VK_F1 + 12),
            descriptor(alt(), keys::VK_OEM_COMMA),
            descriptor(alt(), keys::VK_PRIOR),
            descriptor(alt(), keys::VK_LEFT),
            descriptor(alt(), keys::VK_TAB),
        ];

        for case in cases {
            // Act
            let parsed = parse(&to_canonical(&case)).unwrap();

            // Assert
            assert_eq!(parsed.modifiers, case.modifiers);
            assert_eq!(parsed.key, case.key);
            assert!(!parsed.disabled);
        }
    }

    #[test]
    fn off_prefix_round_trips() {
        // Arrange
        let mut case = descriptor(alt(), u32::from(b'B'));
        case.disabled = true;

        // Act
        let parsed = parse(&to_canonical(&case)).unwrap();

        // Assert
        assert!(parsed.disabled);
        assert_eq!(parsed.key, u32::from(b'B'));
    }

    #[test]
    fn numpad_and_function_tokens_win_over_letters() {
        // Act
        let num = parse("Alt+Num5").unwrap();
        let f1 = parse("Alt+F1").unwrap();
        let f24 = parse("F24").unwrap();

        // Assert
        assert_eq!(num.key, keys::VK_NUMPAD0 + 5);
        assert_eq!(f1.key, keys::VK_F1);
        assert_eq!(f24.key, keys::VK_F24);
    }

    #[test]
    fn f25_is_rejected() {
        // Assert
        assert_eq!(parse("F25"), Err(ParseError::Unrecognized(0)));
    }

    #[test]
    fn f0_reads_as_letter_then_second_key() {
        // Assert: "F" binds as a letter, then "0" is a second key.
        assert_eq!(parse("Alt+F0"), Err(ParseError::SecondKey(5)));
    }

    #[test]
    fn num_without_digit_is_rejected() {
        // Assert
        assert_eq!(parse("Alt+Num"), Err(ParseError::Unrecognized(7)));
    }

    #[test]
    fn two_plain_keys_are_rejected_at_the_second() {
        // Assert
        assert_eq!(parse("Ctrl+A+B"), Err(ParseError::SecondKey(7)));
    }

    #[test]
    fn modifiers_alone_are_not_a_combination() {
        // Assert
        assert_eq!(parse("Ctrl+Alt+"), Err(ParseError::NotSet));
        assert_eq!(parse(""), Err(ParseError::Empty));
    }

    #[test]
    fn bare_off_parses_as_disabled_nothing_bound() {
        // Act
        let parsed = parse("Off+").unwrap();

        // Assert
        assert!(parsed.disabled);
        assert_eq!(parsed.key, 0);
    }

    #[test]
    fn punctuation_parses_through_either_shift_state() {
        // Act
        let plain = parse("Ctrl+;").unwrap();
        let shifted = parse("Ctrl+:").unwrap();

        // Assert
        assert_eq!(plain.key, keys::VK_OEM_1);
        assert_eq!(shifted.key, keys::VK_OEM_1);
    }

    #[test]
    fn token_matching_ignores_case() {
        // Act
        let parsed = parse("ctrl+shift+pageup").unwrap();

        // Assert
        assert!(parsed.modifiers.ctrl);
        assert!(parsed.modifiers.shift);
        assert_eq!(parsed.key, keys::VK_PRIOR);
    }

    #[test]
    fn garbage_reports_its_position() {
        // Assert
        assert_eq!(parse("Alt+€"), Err(ParseError::Unrecognized(4)));
    }
}
