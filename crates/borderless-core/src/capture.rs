//! Key-capture session for the hotkey edit fields.
//!
//! The host UI forwards raw focus and key events; this module mutates
//! the descriptor's combination and tells the host what to do next.
//! Modifier state is sampled live through [`KeyStates`] rather than
//! trusted from the event, so modifiers held before focus arrived are
//! picked up too.

use crate::hotkey::{HotkeyDescriptor, Modifiers};
use crate::keys;

/// Live keyboard probe. The Win32 implementation reads `GetKeyState`.
pub trait KeyStates {
    fn is_down(&self, vk: u32) -> bool;
}

/// Raw event forwarded from the subclassed edit control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureEvent {
    FocusGained,
    FocusLost,
    KeyDown(u32),
    KeyUp(u32),
}

/// What the host UI must do after an event was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureAction {
    /// Nothing to do.
    None,
    /// Redraw the field with the descriptor's display text.
    Refresh,
    /// Escape was pressed: blur the field without keeping the input.
    Cancel,
    /// The combination is complete and the key was released: blur the
    /// field to commit it.
    Close,
    /// Focus left with a complete combination: run the registration
    /// chain and persist the result.
    Register,
    /// Focus left mid-capture: the working combination was restored,
    /// redraw and carry on.
    Revert,
}

fn sample_modifiers(states: &impl KeyStates) -> Modifiers {
    Modifiers {
        ctrl: states.is_down(keys::VK_CONTROL)
            || states.is_down(keys::VK_LCONTROL)
            || states.is_down(keys::VK_RCONTROL),
        alt: states.is_down(keys::VK_MENU)
            || states.is_down(keys::VK_LMENU)
            || states.is_down(keys::VK_RMENU),
        shift: states.is_down(keys::VK_SHIFT)
            || states.is_down(keys::VK_LSHIFT)
            || states.is_down(keys::VK_RSHIFT),
        win: states.is_down(keys::VK_LWIN) || states.is_down(keys::VK_RWIN),
    }
}

/// Feeds one event into the capture session.
pub fn handle(
    descriptor: &mut HotkeyDescriptor,
    states: &impl KeyStates,
    event: CaptureEvent,
) -> CaptureAction {
    match event {
        CaptureEvent::FocusGained => {
            descriptor.capturing = true;
            descriptor.pending_clear = true;
            descriptor.complete = false;
            CaptureAction::None
        }
        CaptureEvent::FocusLost => {
            descriptor.capturing = false;
            descriptor.pending_clear = false;
            if descriptor.complete {
                descriptor.complete = false;
                CaptureAction::Register
            } else {
                descriptor.restore_working();
                CaptureAction::Revert
            }
        }
        CaptureEvent::KeyDown(vk) => {
            if vk <= keys::VK_XBUTTON2 || !descriptor.capturing {
                return CaptureAction::None;
            }
            if vk == keys::VK_ESCAPE {
                return CaptureAction::Cancel;
            }
            if descriptor.complete {
                return CaptureAction::None;
            }
            if descriptor.pending_clear {
                descriptor.modifiers.clear();
                descriptor.key = 0;
                descriptor.pending_clear = false;
            }
            descriptor.modifiers = sample_modifiers(states);
            if keys::is_assignable(vk) {
                descriptor.key = vk;
            }
            descriptor.complete = descriptor.is_set();
            CaptureAction::Refresh
        }
        CaptureEvent::KeyUp(vk) => {
            if vk <= keys::VK_XBUTTON2 || !descriptor.capturing {
                return CaptureAction::None;
            }
            if descriptor.complete {
                return CaptureAction::Close;
            }
            if vk == descriptor.key {
                descriptor.key = 0;
            }
            descriptor.modifiers = sample_modifiers(states);
            descriptor.complete = descriptor.is_set();
            CaptureAction::Refresh
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hotkey::HotkeyId;

    struct FakeKeyStates {
        down: Vec<u32>,
    }

    impl FakeKeyStates {
        fn holding(down: &[u32]) -> Self {
            Self {
                down: down.to_vec(),
            }
        }

        fn idle() -> Self {
            Self::holding(&[])
        }
    }

    impl KeyStates for FakeKeyStates {
        fn is_down(&self, vk: u32) -> bool {
            self.down.contains(&vk)
        }
    }

    fn fresh() -> HotkeyDescriptor {
        let mut descriptor = HotkeyDescriptor::default_border();
        descriptor.working_modifiers = descriptor.modifiers;
        descriptor.working_key = descriptor.key;
        descriptor
    }

    #[test]
    fn focus_gain_arms_the_clear_without_touching_the_text() {
        // Arrange
        let mut descriptor = fresh();

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);

        // Assert
        assert_eq!(action, CaptureAction::None);
        assert!(descriptor.capturing);
        assert!(descriptor.pending_clear);
        assert_eq!(descriptor.key, u32::from(b'B'));
    }

    #[test]
    fn first_key_down_replaces_the_loaded_combination() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_CONTROL]);

        // Act
        let action = handle(&mut descriptor, &states, CaptureEvent::KeyDown(u32::from(b'X')));

        // Assert
        assert_eq!(action, CaptureAction::Refresh);
        assert!(descriptor.modifiers.ctrl);
        assert!(!descriptor.modifiers.alt);
        assert_eq!(descriptor.key, u32::from(b'X'));
        assert!(descriptor.complete);
    }

    #[test]
    fn modifier_press_alone_shows_but_does_not_complete() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_SHIFT]);

        // Act
        let action = handle(&mut descriptor, &states, CaptureEvent::KeyDown(keys::VK_SHIFT));

        // Assert
        assert_eq!(action, CaptureAction::Refresh);
        assert!(descriptor.modifiers.shift);
        assert_eq!(descriptor.key, 0);
        assert!(!descriptor.complete);
    }

    #[test]
    fn key_release_of_an_incomplete_combination_clears_the_key() {
        // Arrange: a bare letter was pressed and released with no modifier.
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::KeyDown(u32::from(b'X')));

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::KeyUp(u32::from(b'X')));

        // Assert
        assert_eq!(action, CaptureAction::Refresh);
        assert_eq!(descriptor.key, 0);
    }

    #[test]
    fn release_after_completion_closes_the_field() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_MENU]);
        handle(&mut descriptor, &states, CaptureEvent::KeyDown(u32::from(b'Z')));

        // Act
        let action = handle(&mut descriptor, &states, CaptureEvent::KeyUp(u32::from(b'Z')));

        // Assert
        assert_eq!(action, CaptureAction::Close);
    }

    #[test]
    fn blur_with_a_complete_combination_requests_registration() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_MENU]);
        handle(&mut descriptor, &states, CaptureEvent::KeyDown(u32::from(b'Z')));

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusLost);

        // Assert
        assert_eq!(action, CaptureAction::Register);
        assert!(!descriptor.capturing);
        assert_eq!(descriptor.key, u32::from(b'Z'));
    }

    #[test]
    fn blur_mid_capture_restores_the_working_combination() {
        // Arrange: capture started and a lone modifier was pressed.
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_CONTROL]);
        handle(&mut descriptor, &states, CaptureEvent::KeyDown(keys::VK_CONTROL));

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusLost);

        // Assert
        assert_eq!(action, CaptureAction::Revert);
        assert!(descriptor.modifiers.alt);
        assert_eq!(descriptor.key, u32::from(b'B'));
    }

    #[test]
    fn escape_cancels_without_mutating_the_combination() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::KeyDown(keys::VK_ESCAPE));

        // Assert
        assert_eq!(action, CaptureAction::Cancel);
        assert_eq!(descriptor.key, u32::from(b'B'));
    }

    #[test]
    fn mouse_button_codes_are_ignored() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);

        // Act
        let action = handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::KeyDown(0x01));

        // Assert
        assert_eq!(action, CaptureAction::None);
        assert!(descriptor.pending_clear);
    }

    #[test]
    fn arrow_keys_never_become_the_bound_key() {
        // Arrange
        let mut descriptor = fresh();
        handle(&mut descriptor, &FakeKeyStates::idle(), CaptureEvent::FocusGained);
        let states = FakeKeyStates::holding(&[keys::VK_CONTROL]);

        // Act
        handle(&mut descriptor, &states, CaptureEvent::KeyDown(keys::VK_LEFT));

        // Assert: the clear still happened but no key was taken.
        assert_eq!(descriptor.key, 0);
        assert!(descriptor.modifiers.ctrl);
        assert!(!descriptor.complete);
    }
}
