//! Saved-attribute stores behind the border and menu toggles.
//!
//! Each store keeps what a window had before hiding so the opposite
//! toggle can put it back exactly. Windows are tracked by their raw
//! handle value; the handles are never dereferenced here, so the
//! module stays platform-free.

/// Raw window handle value.
pub type WindowId = usize;

/// Raw menu handle value. Zero means "no menu".
pub type MenuId = usize;

/// Which style bits the border toggle strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleMasks {
    pub style: u32,
    pub ex_style: u32,
}

impl Default for StyleMasks {
    /// Caption, thick frame, min/max boxes and system menu, plus the
    /// four edge/frame extended styles.
    fn default() -> Self {
        Self {
            style: 0x00cf_0000,
            ex_style: 0x0002_0301,
        }
    }
}

/// Full style words of one window, captured before hiding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedBorder {
    pub style: u32,
    pub ex_style: u32,
}

/// Menu bar detached from one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedMenu {
    pub menu: MenuId,
}

/// Window style access used by the border toggle.
pub trait BorderTarget {
    fn style(&self, window: WindowId) -> u32;
    fn ex_style(&self, window: WindowId) -> u32;
    fn set_style(&mut self, window: WindowId, style: u32);
    fn set_ex_style(&mut self, window: WindowId, ex_style: u32);
    /// Forces the frame to redraw after a style change.
    fn repaint(&mut self, window: WindowId);
}

/// Menu bar access used by the menu toggle.
pub trait MenuTarget {
    fn is_top_level(&self, window: WindowId) -> bool;
    fn menu(&self, window: WindowId) -> MenuId;
    fn set_menu(&mut self, window: WindowId, menu: MenuId) -> bool;
}

/// Ordered map of windows to their saved attribute, one record per
/// window, insertion order preserved.
#[derive(Debug)]
pub struct ToggleStore<A> {
    records: Vec<(WindowId, A)>,
}

impl<A> Default for ToggleStore<A> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<A: Copy> ToggleStore<A> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, window: WindowId) -> Option<A> {
        self.records
            .iter()
            .find(|&&(id, _)| id == window)
            .map(|&(_, saved)| saved)
    }

    /// Reserves room for one more record. Returns `false` when the
    /// allocation fails, leaving the store untouched.
    fn reserve_one(&mut self) -> bool {
        self.records.try_reserve(1).is_ok()
    }

    /// Inserts after a successful [`reserve_one`], so it cannot fail.
    fn insert(&mut self, window: WindowId, saved: A) {
        self.records.push((window, saved));
    }

    /// Removes the record for `window`, compacting the store.
    fn remove(&mut self, window: WindowId) -> Option<A> {
        let index = self.records.iter().position(|&(id, _)| id == window)?;
        Some(self.records.remove(index).1)
    }
}

/// Border toggle: strips the masked style bits on first use, writes the
/// captured words back verbatim on the second.
#[derive(Debug, Default)]
pub struct BorderStore {
    store: ToggleStore<SavedBorder>,
    excluded: WindowId,
    pub masks: StyleMasks,
}

impl BorderStore {
    pub fn new(masks: StyleMasks) -> Self {
        Self {
            store: ToggleStore::new(),
            excluded: 0,
            masks,
        }
    }

    /// Marks a window the toggle must never touch (the application's
    /// own window).
    pub fn exclude(&mut self, window: WindowId) {
        self.excluded = window;
    }

    pub fn is_hidden(&self, window: WindowId) -> bool {
        self.store.get(window).is_some()
    }

    pub fn toggle(&mut self, target: &mut impl BorderTarget, window: WindowId) -> bool {
        if window == self.excluded {
            return false;
        }
        if let Some(saved) = self.store.remove(window) {
            target.set_style(window, saved.style);
            target.set_ex_style(window, saved.ex_style);
            target.repaint(window);
            return true;
        }
        let style = target.style(window);
        let ex_style = target.ex_style(window);
        if style == 0 && ex_style == 0 {
            return false;
        }
        if !self.store.reserve_one() {
            return false;
        }
        self.store.insert(window, SavedBorder { style, ex_style });
        target.set_style(window, style & !self.masks.style);
        target.set_ex_style(window, ex_style & !self.masks.ex_style);
        target.repaint(window);
        true
    }
}

/// Menu toggle: detaches the menu bar on first use, reattaches the same
/// handle on the second.
#[derive(Debug, Default)]
pub struct MenuStore {
    store: ToggleStore<SavedMenu>,
    excluded: WindowId,
}

impl MenuStore {
    pub fn new() -> Self {
        Self {
            store: ToggleStore::new(),
            excluded: 0,
        }
    }

    /// Marks a window the toggle must never touch (the application's
    /// own window).
    pub fn exclude(&mut self, window: WindowId) {
        self.excluded = window;
    }

    pub fn is_hidden(&self, window: WindowId) -> bool {
        self.store.get(window).is_some()
    }

    pub fn toggle(&mut self, target: &mut impl MenuTarget, window: WindowId) -> bool {
        if window == self.excluded {
            return false;
        }
        if let Some(saved) = self.store.get(window) {
            // Reattach before forgetting the handle: a failed SetMenu
            // leaves the record in place so a later toggle can retry.
            if !target.set_menu(window, saved.menu) {
                return false;
            }
            self.store.remove(window);
            return true;
        }
        if !target.is_top_level(window) {
            return false;
        }
        let menu = target.menu(window);
        if menu == 0 {
            return false;
        }
        if !self.store.reserve_one() {
            return false;
        }
        if !target.set_menu(window, 0) {
            return false;
        }
        self.store.insert(window, SavedMenu { menu });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeDesktop {
        styles: HashMap<WindowId, (u32, u32)>,
        menus: HashMap<WindowId, MenuId>,
        top_level: Vec<WindowId>,
        repaints: Vec<WindowId>,
        reject_attach: bool,
    }

    impl FakeDesktop {
        fn with_window(window: WindowId, style: u32, ex_style: u32) -> Self {
            let mut desktop = Self::default();
            desktop.styles.insert(window, (style, ex_style));
            desktop
        }
    }

    impl BorderTarget for FakeDesktop {
        fn style(&self, window: WindowId) -> u32 {
            self.styles.get(&window).map_or(0, |&(style, _)| style)
        }

        fn ex_style(&self, window: WindowId) -> u32 {
            self.styles.get(&window).map_or(0, |&(_, ex)| ex)
        }

        fn set_style(&mut self, window: WindowId, style: u32) {
            self.styles.entry(window).or_insert((0, 0)).0 = style;
        }

        fn set_ex_style(&mut self, window: WindowId, ex_style: u32) {
            self.styles.entry(window).or_insert((0, 0)).1 = ex_style;
        }

        fn repaint(&mut self, window: WindowId) {
            self.repaints.push(window);
        }
    }

    impl MenuTarget for FakeDesktop {
        fn is_top_level(&self, window: WindowId) -> bool {
            self.top_level.contains(&window)
        }

        fn menu(&self, window: WindowId) -> MenuId {
            self.menus.get(&window).copied().unwrap_or(0)
        }

        fn set_menu(&mut self, window: WindowId, menu: MenuId) -> bool {
            if menu == 0 {
                self.menus.remove(&window);
            } else {
                if self.reject_attach {
                    return false;
                }
                self.menus.insert(window, menu);
            }
            true
        }
    }

    const OVERLAPPED: u32 = 0x00cf_0000 | 0x1000_0000; // masked bits + WS_VISIBLE area bit
    const EDGES: u32 = 0x0002_0301;

    #[test]
    fn border_toggle_strips_only_the_masked_bits() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES | 0x0008_0000);
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act
        let ok = borders.toggle(&mut desktop, 7);

        // Assert
        assert!(ok);
        assert_eq!(desktop.style(7), 0x1000_0000);
        assert_eq!(desktop.ex_style(7), 0x0008_0000);
        assert_eq!(desktop.repaints, vec![7]);
    }

    #[test]
    fn border_round_trip_restores_the_exact_bits() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act
        borders.toggle(&mut desktop, 7);
        borders.toggle(&mut desktop, 7);

        // Assert
        assert_eq!(desktop.style(7), OVERLAPPED);
        assert_eq!(desktop.ex_style(7), EDGES);
        assert!(!borders.is_hidden(7));
    }

    #[test]
    fn restore_discards_bits_gained_while_hidden() {
        // Arrange: the window turned a style bit on while borderless.
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        let mut borders = BorderStore::new(StyleMasks::default());
        borders.toggle(&mut desktop, 7);
        desktop.set_style(7, desktop.style(7) | 0x0200_0000);

        // Act
        borders.toggle(&mut desktop, 7);

        // Assert: the words captured at hide time come back verbatim.
        assert_eq!(desktop.style(7), OVERLAPPED);
        assert_eq!(desktop.ex_style(7), EDGES);
    }

    #[test]
    fn one_record_per_window() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act: three toggles leave the window hidden exactly once.
        borders.toggle(&mut desktop, 7);
        borders.toggle(&mut desktop, 7);
        borders.toggle(&mut desktop, 7);

        // Assert
        assert!(borders.is_hidden(7));
        assert_eq!(borders.store.len(), 1);
    }

    #[test]
    fn window_with_no_styles_at_all_is_refused() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, 0, 0);
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act
        let ok = borders.toggle(&mut desktop, 7);

        // Assert
        assert!(!ok);
        assert!(desktop.repaints.is_empty());
    }

    #[test]
    fn empty_ex_style_alone_is_not_a_failure() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, 0);
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act
        let ok = borders.toggle(&mut desktop, 7);

        // Assert
        assert!(ok);
        assert_eq!(desktop.style(7), 0x1000_0000);
    }

    #[test]
    fn menu_round_trip_reattaches_the_same_handle() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.top_level.push(7);
        desktop.menus.insert(7, 0xbeef);
        let mut menus = MenuStore::new();

        // Act
        assert!(menus.toggle(&mut desktop, 7));
        assert_eq!(desktop.menu(7), 0);
        assert!(menus.toggle(&mut desktop, 7));

        // Assert
        assert_eq!(desktop.menu(7), 0xbeef);
        assert!(!menus.is_hidden(7));
    }

    #[test]
    fn menu_hide_refuses_a_window_without_a_menu() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.top_level.push(7);
        let mut menus = MenuStore::new();

        // Act
        let ok = menus.toggle(&mut desktop, 7);

        // Assert
        assert!(!ok);
        assert!(menus.store.is_empty());
    }

    #[test]
    fn menu_hide_refuses_a_non_top_level_window() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.menus.insert(7, 0xbeef);
        let mut menus = MenuStore::new();

        // Act
        let ok = menus.toggle(&mut desktop, 7);

        // Assert
        assert!(!ok);
        assert_eq!(desktop.menu(7), 0xbeef);
    }

    #[test]
    fn failed_menu_reattach_keeps_the_record() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.top_level.push(7);
        desktop.menus.insert(7, 0xbeef);
        let mut menus = MenuStore::new();
        menus.toggle(&mut desktop, 7);
        desktop.reject_attach = true;

        // Act
        let failed = menus.toggle(&mut desktop, 7);

        // Assert: the handle is still saved, so a retry can succeed.
        assert!(!failed);
        assert!(menus.is_hidden(7));
        desktop.reject_attach = false;
        assert!(menus.toggle(&mut desktop, 7));
        assert_eq!(desktop.menu(7), 0xbeef);
    }

    #[test]
    fn excluded_window_is_never_recorded() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.top_level.push(7);
        desktop.menus.insert(7, 0xbeef);
        let mut borders = BorderStore::new(StyleMasks::default());
        let mut menus = MenuStore::new();
        borders.exclude(7);
        menus.exclude(7);

        // Act + Assert
        assert!(!borders.toggle(&mut desktop, 7));
        assert!(!menus.toggle(&mut desktop, 7));
        assert_eq!(desktop.style(7), OVERLAPPED);
        assert_eq!(desktop.menu(7), 0xbeef);
        assert!(desktop.repaints.is_empty());
    }

    #[test]
    fn stores_track_windows_independently() {
        // Arrange
        let mut desktop = FakeDesktop::with_window(7, OVERLAPPED, EDGES);
        desktop.styles.insert(8, (OVERLAPPED, EDGES));
        let mut borders = BorderStore::new(StyleMasks::default());

        // Act
        borders.toggle(&mut desktop, 7);
        borders.toggle(&mut desktop, 8);
        borders.toggle(&mut desktop, 7);

        // Assert
        assert!(!borders.is_hidden(7));
        assert!(borders.is_hidden(8));
        assert_eq!(desktop.style(7), OVERLAPPED);
    }
}
