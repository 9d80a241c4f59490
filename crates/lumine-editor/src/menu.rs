//! Menu bar and toolbar model.
//!
//! Every entry carries the [`LocaleKey`] of its label rather than the text,
//! so switching language relabels the whole bar on the next paint. Entries
//! are found by their key or command, never by index.
//!
//! ```text
//!  File        Edit      Settings          Help
//!  New  Ctrl+N  Undo Ctrl+Z  Theme            About
//!  Open Ctrl+O  Redo Ctrl+Y    Light Theme
//!  Save Ctrl+S                 Dark Theme
//!  Save As                   Language
//!  ──────                      English
//!  Exit Ctrl+Q                 Türkçe
//! ```

use lumine_theme::ThemeName;

use crate::locale::{Language, LocaleKey};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Everything a menu entry, toolbar button or shortcut can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    New,
    Open,
    Save,
    SaveAs,
    Exit,
    Undo,
    Redo,
    SetTheme(ThemeName),
    SetLanguage(Language),
    About,
}

impl MenuCommand {
    /// Keyboard shortcut hint shown next to the entry.
    #[must_use]
    pub const fn shortcut(self) -> Option<&'static str> {
        match self {
            Self::New => Some("Ctrl+N"),
            Self::Open => Some("Ctrl+O"),
            Self::Save => Some("Ctrl+S"),
            Self::Exit => Some("Ctrl+Q"),
            Self::Undo => Some("Ctrl+Z"),
            Self::Redo => Some("Ctrl+Y"),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: LocaleKey,
    pub command: MenuCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    /// A non-selectable group title, e.g. "Theme" above the two themes.
    Heading(LocaleKey),
    Separator,
}

impl MenuEntry {
    const fn item(label: LocaleKey, command: MenuCommand) -> Self {
        Self::Item(MenuItem { label, command })
    }

    #[must_use]
    pub const fn as_item(&self) -> Option<&MenuItem> {
        match self {
            Self::Item(item) => Some(item),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub title: LocaleKey,
    /// Alt+`hotkey` opens this menu.
    pub hotkey: char,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// Index of the first selectable entry at or after `from`, wrapping.
    fn selectable_from(&self, from: usize, step: isize) -> Option<usize> {
        let n = self.entries.len();
        let n_signed = isize::try_from(n).ok()?;
        let mut idx = isize::try_from(from).ok()?;
        for _ in 0..n {
            idx = idx.rem_euclid(n_signed);
            let i = usize::try_from(idx).ok()?;
            if self.entries[i].as_item().is_some() {
                return Some(i);
            }
            idx += step;
        }
        None
    }
}

/// File, Edit, Settings, Help.
#[must_use]
pub fn menu_bar() -> Vec<Menu> {
    use MenuCommand as C;
    use MenuEntry as E;
    vec![
        Menu {
            title: LocaleKey::File,
            hotkey: 'f',
            entries: vec![
                E::item(LocaleKey::New, C::New),
                E::item(LocaleKey::Open, C::Open),
                E::item(LocaleKey::Save, C::Save),
                E::item(LocaleKey::SaveAs, C::SaveAs),
                E::Separator,
                E::item(LocaleKey::Exit, C::Exit),
            ],
        },
        Menu {
            title: LocaleKey::Edit,
            hotkey: 'e',
            entries: vec![
                E::item(LocaleKey::Undo, C::Undo),
                E::item(LocaleKey::Redo, C::Redo),
            ],
        },
        Menu {
            title: LocaleKey::Settings,
            hotkey: 's',
            entries: vec![
                E::Heading(LocaleKey::Theme),
                E::item(LocaleKey::LightTheme, C::SetTheme(ThemeName::Light)),
                E::item(LocaleKey::DarkTheme, C::SetTheme(ThemeName::Dark)),
                E::Heading(LocaleKey::Language),
                E::item(LocaleKey::English, C::SetLanguage(Language::En)),
                E::item(LocaleKey::Turkish, C::SetLanguage(Language::Tr)),
            ],
        },
        Menu {
            title: LocaleKey::Help,
            hotkey: 'h',
            entries: vec![E::item(LocaleKey::About, C::About)],
        },
    ]
}

/// The three toolbar buttons.
pub const TOOLBAR: [MenuItem; 3] = [
    MenuItem {
        label: LocaleKey::New,
        command: MenuCommand::New,
    },
    MenuItem {
        label: LocaleKey::Open,
        command: MenuCommand::Open,
    },
    MenuItem {
        label: LocaleKey::Save,
        command: MenuCommand::Save,
    },
];

// ---------------------------------------------------------------------------
// Open-menu state
// ---------------------------------------------------------------------------

/// Which drop-down is open and which entry in it is highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuState {
    pub menu: usize,
    pub entry: usize,
}

impl MenuState {
    /// Open `menu` with its first selectable entry highlighted.
    #[must_use]
    pub fn open(menus: &[Menu], menu: usize) -> Self {
        let menu = menu.min(menus.len().saturating_sub(1));
        let entry = menus
            .get(menu)
            .and_then(|m| m.selectable_from(0, 1))
            .unwrap_or(0);
        Self { menu, entry }
    }

    /// The menu whose hotkey is `ch`, if any.
    #[must_use]
    pub fn for_hotkey(menus: &[Menu], ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        menus
            .iter()
            .position(|m| m.hotkey == ch)
            .map(|i| Self::open(menus, i))
    }

    pub fn next_menu(&mut self, menus: &[Menu]) {
        if !menus.is_empty() {
            *self = Self::open(menus, (self.menu + 1) % menus.len());
        }
    }

    pub fn prev_menu(&mut self, menus: &[Menu]) {
        if !menus.is_empty() {
            *self = Self::open(menus, (self.menu + menus.len() - 1) % menus.len());
        }
    }

    pub fn next_entry(&mut self, menus: &[Menu]) {
        self.step(menus, 1);
    }

    pub fn prev_entry(&mut self, menus: &[Menu]) {
        self.step(menus, -1);
    }

    fn step(&mut self, menus: &[Menu], step: isize) {
        let Some(menu) = menus.get(self.menu) else {
            return;
        };
        let from = self
            .entry
            .checked_add_signed(step)
            .unwrap_or_else(|| menu.entries.len().saturating_sub(1));
        if let Some(i) = menu.selectable_from(from, step) {
            self.entry = i;
        }
    }

    /// The highlighted item.
    #[must_use]
    pub fn selected<'m>(&self, menus: &'m [Menu]) -> Option<&'m MenuItem> {
        menus.get(self.menu)?.entries.get(self.entry)?.as_item()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::strings_for;
    use pretty_assertions::assert_eq;

    fn labels(menu: &Menu) -> Vec<LocaleKey> {
        menu.entries
            .iter()
            .filter_map(|e| match e {
                MenuEntry::Item(i) => Some(i.label),
                MenuEntry::Heading(k) => Some(*k),
                MenuEntry::Separator => None,
            })
            .collect()
    }

    #[test]
    fn bar_has_four_menus_in_order() {
        let titles: Vec<_> = menu_bar().iter().map(|m| m.title).collect();
        assert_eq!(
            titles,
            [LocaleKey::File, LocaleKey::Edit, LocaleKey::Settings, LocaleKey::Help]
        );
    }

    #[test]
    fn file_menu_entries() {
        let bar = menu_bar();
        assert_eq!(
            labels(&bar[0]),
            [LocaleKey::New, LocaleKey::Open, LocaleKey::Save, LocaleKey::SaveAs, LocaleKey::Exit]
        );
    }

    #[test]
    fn every_label_resolves_in_both_languages() {
        for lang in Language::ALL {
            let strings = strings_for(lang);
            for menu in menu_bar() {
                assert!(!strings.get(menu.title).is_empty());
                for key in labels(&menu) {
                    assert!(!strings.get(key).is_empty());
                }
            }
        }
    }

    #[test]
    fn relabelling_follows_language() {
        let bar = menu_bar();
        let titles = |lang| -> Vec<&str> {
            bar.iter().map(|m| strings_for(lang).get(m.title)).collect()
        };
        assert_eq!(titles(Language::En), ["File", "Edit", "Settings", "Help"]);
        assert_eq!(titles(Language::Tr), ["Dosya", "Düzenle", "Ayarlar", "Yardım"]);
    }

    #[test]
    fn shortcuts() {
        assert_eq!(MenuCommand::Save.shortcut(), Some("Ctrl+S"));
        assert_eq!(MenuCommand::SaveAs.shortcut(), None);
        assert_eq!(MenuCommand::About.shortcut(), None);
    }

    #[test]
    fn toolbar_buttons() {
        let cmds: Vec<_> = TOOLBAR.iter().map(|b| b.command).collect();
        assert_eq!(cmds, [MenuCommand::New, MenuCommand::Open, MenuCommand::Save]);
    }

    // -- Navigation ---------------------------------------------------------

    #[test]
    fn open_skips_headings() {
        let bar = menu_bar();
        let state = MenuState::open(&bar, 2);
        assert_eq!(
            state.selected(&bar).map(|i| i.command),
            Some(MenuCommand::SetTheme(ThemeName::Light))
        );
    }

    #[test]
    fn down_skips_separator_and_wraps() {
        let bar = menu_bar();
        let mut state = MenuState::open(&bar, 0);
        for _ in 0..4 {
            state.next_entry(&bar);
        }
        assert_eq!(state.selected(&bar).map(|i| i.command), Some(MenuCommand::Exit));
        state.next_entry(&bar);
        assert_eq!(state.selected(&bar).map(|i| i.command), Some(MenuCommand::New));
    }

    #[test]
    fn up_from_first_wraps_to_last() {
        let bar = menu_bar();
        let mut state = MenuState::open(&bar, 0);
        state.prev_entry(&bar);
        assert_eq!(state.selected(&bar).map(|i| i.command), Some(MenuCommand::Exit));
    }

    #[test]
    fn down_skips_heading_in_settings() {
        let bar = menu_bar();
        let mut state = MenuState::open(&bar, 2);
        state.next_entry(&bar);
        state.next_entry(&bar);
        assert_eq!(
            state.selected(&bar).map(|i| i.command),
            Some(MenuCommand::SetLanguage(Language::En))
        );
    }

    #[test]
    fn left_right_cycle_menus() {
        let bar = menu_bar();
        let mut state = MenuState::open(&bar, 0);
        state.prev_menu(&bar);
        assert_eq!(state.menu, 3);
        state.next_menu(&bar);
        assert_eq!(state.menu, 0);
        state.next_menu(&bar);
        assert_eq!(state.selected(&bar).map(|i| i.command), Some(MenuCommand::Undo));
    }

    #[test]
    fn hotkeys() {
        let bar = menu_bar();
        assert_eq!(MenuState::for_hotkey(&bar, 'H').map(|s| s.menu), Some(3));
        assert_eq!(MenuState::for_hotkey(&bar, 'e').map(|s| s.menu), Some(1));
        assert_eq!(MenuState::for_hotkey(&bar, 'x'), None);
    }
}
